//! Domain models for inventory-service.

mod catalog;
mod document;
mod number;

pub use catalog::{CatalogEntry, Customer, Product, Supplier};
pub use document::{
    CreateDocument, Document, DocumentKind, DocumentStatus, LineItem, ListDocumentsFilter,
    UpdateDocument,
};
pub use number::next_document_number;
