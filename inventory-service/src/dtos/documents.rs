use crate::models::{
    Document, DocumentKind, DocumentStatus, LineItem, ListDocumentsFilter, Product,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One requested line. Quantity defaults to 1 when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct LineRequest {
    pub product_id: i64,
    pub quantity: Option<i64>,
}

/// Payload for creating a document directly (without a draft session).
/// The number is generated from the kind's series when omitted.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDocumentRequest {
    pub kind: DocumentKind,
    pub number: Option<String>,
    pub party_id: i64,
    pub date: NaiveDate,
    pub status: Option<DocumentStatus>,
    #[validate(length(max = 100))]
    pub payment_method: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub lines: Vec<LineRequest>,
}

/// Payload for replacing a document's mutable fields.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDocumentRequest {
    pub party_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub status: Option<DocumentStatus>,
    #[validate(length(max = 100))]
    pub payment_method: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub lines: Option<Vec<LineRequest>>,
}

/// Query parameters for the document list.
#[derive(Debug, Default, Deserialize)]
pub struct ListDocumentsParams {
    pub kind: Option<DocumentKind>,
    pub party_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<DocumentStatus>,
}

impl ListDocumentsParams {
    pub fn into_filter(self) -> ListDocumentsFilter {
        ListDocumentsFilter {
            kind: self.kind,
            party_id: self.party_id,
            date_from: self.date_from,
            date_to: self.date_to,
            status: self.status,
        }
    }
}

/// One document line as rendered: resolved against the product snapshot.
/// A product missing from the snapshot leaves label/price empty and
/// contributes a zero subtotal.
#[derive(Debug, Serialize)]
pub struct LineView {
    pub product_id: i64,
    pub label: Option<String>,
    pub unit_price: Option<Decimal>,
    pub quantity: i64,
    pub subtotal: Decimal,
}

impl LineView {
    pub fn resolve(line: &LineItem, products: &[Product]) -> Self {
        let product = products.iter().find(|p| p.id == line.product_id);
        Self {
            product_id: line.product_id,
            label: product.map(|p| p.name.clone()),
            unit_price: product.map(|p| p.unit_price),
            quantity: line.quantity,
            subtotal: product
                .map(|p| p.unit_price * Decimal::from(line.quantity))
                .unwrap_or(Decimal::ZERO),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub id: i64,
    pub kind: String,
    pub number: String,
    pub party_id: i64,
    pub date: NaiveDate,
    pub status: String,
    pub payment_method: String,
    pub notes: String,
    pub lines: Vec<LineView>,
    pub total: Decimal,
}

impl DocumentResponse {
    pub fn from_document(doc: Document, products: &[Product]) -> Self {
        Self {
            id: doc.id,
            kind: doc.kind,
            number: doc.number,
            party_id: doc.party_id,
            date: doc.date,
            status: doc.status,
            payment_method: doc.payment_method,
            notes: doc.notes,
            lines: doc
                .lines
                .iter()
                .map(|l| LineView::resolve(l, products))
                .collect(),
            total: doc.total,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentResponse>,
    pub count: usize,
}
