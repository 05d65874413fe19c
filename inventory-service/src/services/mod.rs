//! Services module for inventory-service.

pub mod catalog;
pub mod database;
pub mod draft;
pub mod metrics;
pub mod store;

pub use catalog::{compute_total, filter_by_label, resolve_exact};
pub use database::PgStore;
pub use draft::{DraftDocument, DraftError, DraftMode, DraftRegistry, DraftState, HeaderPatch};
pub use metrics::{get_metrics, init_metrics, record_document_submitted, record_draft_opened};
pub use store::{CatalogStore, DocumentStore, InMemoryStore};
