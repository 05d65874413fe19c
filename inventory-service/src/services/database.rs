//! PostgreSQL-backed store for inventory-service.

use crate::models::{
    CreateDocument, Customer, Document, DocumentKind, LineItem, ListDocumentsFilter, Product,
    Supplier, UpdateDocument,
};
use crate::services::store::{CatalogStore, DocumentStore};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::FromRow;
use std::time::Duration;
use tracing::{info, instrument};

const DOCUMENT_COLUMNS: &str = "id, kind, number, party_id, doc_date, status, payment_method, notes, lines, total, created_utc";

/// Database row for a document; lines travel as a JSONB column.
#[derive(FromRow)]
struct DocumentRow {
    id: i64,
    kind: String,
    number: String,
    party_id: i64,
    doc_date: NaiveDate,
    status: String,
    payment_method: String,
    notes: String,
    lines: Json<Vec<LineItem>>,
    total: Decimal,
    created_utc: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            kind: row.kind,
            number: row.number,
            party_id: row.party_id,
            date: row.doc_date,
            status: row.status,
            payment_method: row.payment_method,
            notes: row.notes,
            lines: row.lines.0,
            total: row.total,
            created_utc: row.created_utc,
        }
    }
}

/// PostgreSQL connection pool wrapper implementing both store traits.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new connection pool.
    #[instrument(skip(database_url), fields(service = "inventory-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, code, unit_price FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list products: {}", e)))?;
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn list_suppliers(&self) -> Result<Vec<Supplier>, AppError> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            "SELECT id, name, tax_id FROM suppliers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list suppliers: {}", e)))?;
        Ok(suppliers)
    }

    #[instrument(skip(self))]
    async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, name, tax_id FROM customers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list customers: {}", e)))?;
        Ok(customers)
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    #[instrument(skip(self, filter))]
    async fn list(&self, filter: &ListDocumentsFilter) -> Result<Vec<Document>, AppError> {
        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            SELECT {DOCUMENT_COLUMNS}
            FROM documents
            WHERE ($1::text IS NULL OR kind = $1)
              AND ($2::bigint IS NULL OR party_id = $2)
              AND ($3::date IS NULL OR doc_date >= $3)
              AND ($4::date IS NULL OR doc_date <= $4)
              AND ($5::text IS NULL OR status = $5)
            ORDER BY id
            "#,
        ))
        .bind(filter.kind.map(|k| k.as_str()))
        .bind(filter.party_id)
        .bind(filter.date_from)
        .bind(filter.date_to)
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list documents: {}", e)))?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    #[instrument(skip(self))]
    async fn get(&self, id: i64) -> Result<Option<Document>, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get document: {}", e)))?;

        Ok(row.map(Document::from))
    }

    #[instrument(skip(self, input), fields(kind = input.kind.as_str(), number = %input.number))]
    async fn create(&self, input: &CreateDocument) -> Result<Document, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            INSERT INTO documents (kind, number, party_id, doc_date, status, payment_method, notes, lines, total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {DOCUMENT_COLUMNS}
            "#,
        ))
        .bind(input.kind.as_str())
        .bind(&input.number)
        .bind(input.party_id)
        .bind(input.date)
        .bind(input.status.as_str())
        .bind(&input.payment_method)
        .bind(&input.notes)
        .bind(Json(&input.lines))
        .bind(input.total)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create document: {}", e)))?;

        let document = Document::from(row);
        info!(document_id = document.id, number = %document.number, "Document created");
        Ok(document)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: i64, input: &UpdateDocument) -> Result<Document, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            UPDATE documents
            SET party_id = COALESCE($2::bigint, party_id),
                doc_date = COALESCE($3::date, doc_date),
                status = COALESCE($4::text, status),
                payment_method = COALESCE($5::text, payment_method),
                notes = COALESCE($6::text, notes),
                lines = COALESCE($7::jsonb, lines),
                total = COALESCE($8::numeric, total)
            WHERE id = $1
            RETURNING {DOCUMENT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(input.party_id)
        .bind(input.date)
        .bind(input.status.map(|s| s.as_str()))
        .bind(input.payment_method.as_deref())
        .bind(input.notes.as_deref())
        .bind(input.lines.as_ref().map(Json))
        .bind(input.total)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(Document::from(row))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete document: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Document {} not found",
                id
            )));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn last_number(&self, kind: DocumentKind) -> Result<Option<String>, AppError> {
        let number = sqlx::query_scalar::<_, String>(
            "SELECT number FROM documents WHERE kind = $1 ORDER BY id DESC LIMIT 1",
        )
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to read last number: {}", e))
        })?;

        Ok(number)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }
}
