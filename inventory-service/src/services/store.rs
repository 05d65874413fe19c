//! Repository abstraction over catalog and document persistence.
//!
//! Two backends implement the same traits: `InMemoryStore` (the default for
//! local runs and the test double) and `PgStore` in `services::database`.
//! Handlers only ever see the traits.

use crate::models::{
    CreateDocument, Customer, Document, DocumentKind, LineItem, ListDocumentsFilter, Product,
    Supplier, UpdateDocument,
};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use service_core::error::AppError;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

/// Read access to the catalog snapshot a screen works against.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, AppError>;
    async fn list_suppliers(&self) -> Result<Vec<Supplier>, AppError>;
    async fn list_customers(&self) -> Result<Vec<Customer>, AppError>;
}

/// Document persistence.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list(&self, filter: &ListDocumentsFilter) -> Result<Vec<Document>, AppError>;
    async fn get(&self, id: i64) -> Result<Option<Document>, AppError>;
    async fn create(&self, input: &CreateDocument) -> Result<Document, AppError>;
    async fn update(&self, id: i64, input: &UpdateDocument) -> Result<Document, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Last issued document number in the kind's series, if any.
    async fn last_number(&self, kind: DocumentKind) -> Result<Option<String>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

/// In-memory backend: a fixed catalog snapshot plus a document list guarded
/// by an async lock (never held across an await point).
pub struct InMemoryStore {
    products: Vec<Product>,
    suppliers: Vec<Supplier>,
    customers: Vec<Customer>,
    documents: RwLock<Vec<Document>>,
    next_id: AtomicI64,
}

impl InMemoryStore {
    pub fn new(products: Vec<Product>, suppliers: Vec<Supplier>, customers: Vec<Customer>) -> Self {
        Self {
            products,
            suppliers,
            customers,
            documents: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Backend seeded with the sample dataset, including one issued document
    /// per series so number generation continues each series rather than
    /// restarting it.
    pub fn seeded() -> Self {
        let mut store = Self::new(
            vec![
                Product {
                    id: 1,
                    name: "Router".to_string(),
                    code: "PR-1001".to_string(),
                    unit_price: Decimal::from(1200),
                },
                Product {
                    id: 2,
                    name: "Switch".to_string(),
                    code: "PR-1002".to_string(),
                    unit_price: Decimal::from(3000),
                },
            ],
            vec![
                Supplier {
                    id: 1,
                    name: "Distribuidora ABC".to_string(),
                    tax_id: "0801199901234".to_string(),
                },
                Supplier {
                    id: 2,
                    name: "Comercial XYZ".to_string(),
                    tax_id: "0801200105678".to_string(),
                },
            ],
            vec![
                Customer {
                    id: 1,
                    name: "Juan Pérez".to_string(),
                    tax_id: Some("0801199901234".to_string()),
                },
                Customer {
                    id: 2,
                    name: "María López".to_string(),
                    tax_id: None,
                },
            ],
        );

        let seeds = [
            (DocumentKind::Purchase, "FAC-0012", 1),
            (DocumentKind::Order, "PED-0001", 1),
            (DocumentKind::Receipt, "REC-0015", 2),
            (DocumentKind::Return, "DEV-0010", 1),
        ];
        let documents = store.documents.get_mut();
        for (index, (kind, number, party_id)) in seeds.into_iter().enumerate() {
            documents.push(Document {
                id: index as i64 + 1,
                kind: kind.as_str().to_string(),
                number: number.to_string(),
                party_id,
                date: chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default(),
                status: "processed".to_string(),
                payment_method: String::new(),
                notes: String::new(),
                lines: vec![LineItem {
                    product_id: 1,
                    quantity: 1,
                }],
                total: Decimal::from(1200),
                created_utc: Utc::now(),
            });
        }
        store.next_id = AtomicI64::new(seeds.len() as i64 + 1);
        store
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.products.clone())
    }

    async fn list_suppliers(&self) -> Result<Vec<Supplier>, AppError> {
        Ok(self.suppliers.clone())
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        Ok(self.customers.clone())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn list(&self, filter: &ListDocumentsFilter) -> Result<Vec<Document>, AppError> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Document>, AppError> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| d.id == id).cloned())
    }

    async fn create(&self, input: &CreateDocument) -> Result<Document, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let document = Document {
            id,
            kind: input.kind.as_str().to_string(),
            number: input.number.clone(),
            party_id: input.party_id,
            date: input.date,
            status: input.status.as_str().to_string(),
            payment_method: input.payment_method.clone(),
            notes: input.notes.clone(),
            lines: input.lines.clone(),
            total: input.total,
            created_utc: Utc::now(),
        };
        self.documents.write().await.push(document.clone());
        Ok(document)
    }

    async fn update(&self, id: i64, input: &UpdateDocument) -> Result<Document, AppError> {
        let mut documents = self.documents.write().await;
        let document = documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Document {} not found", id)))?;

        if let Some(party_id) = input.party_id {
            document.party_id = party_id;
        }
        if let Some(date) = input.date {
            document.date = date;
        }
        if let Some(status) = input.status {
            document.status = status.as_str().to_string();
        }
        if let Some(ref payment_method) = input.payment_method {
            document.payment_method = payment_method.clone();
        }
        if let Some(ref notes) = input.notes {
            document.notes = notes.clone();
        }
        if let Some(ref lines) = input.lines {
            document.lines = lines.clone();
        }
        if let Some(total) = input.total {
            document.total = total;
        }
        Ok(document.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|d| d.id != id);
        if documents.len() == before {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Document {} not found",
                id
            )));
        }
        Ok(())
    }

    async fn last_number(&self, kind: DocumentKind) -> Result<Option<String>, AppError> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|d| d.kind == kind.as_str())
            .max_by_key(|d| d.id)
            .map(|d| d.number.clone()))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
