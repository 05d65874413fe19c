//! Interactive document drafts.
//!
//! A `DraftDocument` is the single owner of one editing session's in-progress
//! document: header fields, the ordered line collection, and the lifecycle
//! state. All line invariants (unique product per document, quantity >= 1)
//! are enforced here, not per screen.

use crate::models::{
    CreateDocument, Document, DocumentKind, DocumentStatus, LineItem, Product, UpdateDocument,
};
use crate::services::catalog::compute_total;
use chrono::NaiveDate;
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::Serialize;
use service_core::error::AppError;
use thiserror::Error;
use uuid::Uuid;

/// Domain errors raised by draft operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Product {0} is already on the document")]
    DuplicateLine(i64),

    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),

    #[error("No line at position {0}")]
    LineIndexOutOfRange(usize),

    #[error("Select a {0} before submitting")]
    MissingParty(&'static str),

    #[error("Add at least one line before submitting")]
    NoLines,

    #[error("Document has already been submitted")]
    AlreadySubmitted,
}

impl From<DraftError> for AppError {
    fn from(err: DraftError) -> Self {
        match err {
            DraftError::DuplicateLine(_) | DraftError::AlreadySubmitted => {
                AppError::Conflict(anyhow::anyhow!(err.to_string()))
            }
            _ => AppError::BadRequest(anyhow::anyhow!(err.to_string())),
        }
    }
}

/// Lifecycle state of a draft, derived from its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftState {
    Editing,
    Submittable,
    Submitted,
}

/// Whether the draft creates a new document or edits a persisted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftMode {
    Create,
    Edit { document_id: i64 },
}

/// Partial header update. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct HeaderPatch {
    pub party_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub status: Option<DocumentStatus>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// One editing session's document-in-progress.
#[derive(Debug, Clone)]
pub struct DraftDocument {
    pub draft_id: Uuid,
    pub kind: DocumentKind,
    pub mode: DraftMode,
    pub number: String,
    pub party_id: i64,
    pub date: NaiveDate,
    pub status: DocumentStatus,
    pub payment_method: String,
    pub notes: String,
    pub lines: Vec<LineItem>,
    submitted: bool,
}

impl DraftDocument {
    /// Fresh create-mode draft with an eagerly generated document number.
    pub fn new(kind: DocumentKind, number: String, date: NaiveDate) -> Self {
        Self {
            draft_id: Uuid::new_v4(),
            kind,
            mode: DraftMode::Create,
            number,
            party_id: 0,
            date,
            status: DocumentStatus::Pending,
            payment_method: String::new(),
            notes: String::new(),
            lines: Vec::new(),
            submitted: false,
        }
    }

    /// Edit-mode draft seeded from a persisted document. The document number
    /// is preserved and treated as read-only.
    pub fn for_edit(doc: &Document) -> Self {
        Self {
            draft_id: Uuid::new_v4(),
            kind: DocumentKind::from_string(&doc.kind),
            mode: DraftMode::Edit {
                document_id: doc.id,
            },
            number: doc.number.clone(),
            party_id: doc.party_id,
            date: doc.date,
            status: DocumentStatus::from_string(&doc.status),
            payment_method: doc.payment_method.clone(),
            notes: doc.notes.clone(),
            lines: doc.lines.clone(),
            submitted: false,
        }
    }

    /// Current lifecycle state, derived from content on demand.
    pub fn state(&self) -> DraftState {
        if self.submitted {
            DraftState::Submitted
        } else if self.party_id != 0 && !self.lines.is_empty() {
            DraftState::Submittable
        } else {
            DraftState::Editing
        }
    }

    fn ensure_open(&self) -> Result<(), DraftError> {
        if self.submitted {
            Err(DraftError::AlreadySubmitted)
        } else {
            Ok(())
        }
    }

    /// Apply a partial header update.
    pub fn apply_header(&mut self, patch: HeaderPatch) -> Result<(), DraftError> {
        self.ensure_open()?;
        if let Some(party_id) = patch.party_id {
            self.party_id = party_id;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(payment_method) = patch.payment_method {
            self.payment_method = payment_method;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        Ok(())
    }

    /// Append a line for the product. A product already on the document is
    /// rejected, not merged; the new line always starts at quantity 1.
    pub fn add_line(&mut self, product_id: i64) -> Result<(), DraftError> {
        self.ensure_open()?;
        if self.lines.iter().any(|l| l.product_id == product_id) {
            return Err(DraftError::DuplicateLine(product_id));
        }
        self.lines.push(LineItem {
            product_id,
            quantity: 1,
        });
        Ok(())
    }

    /// Replace the quantity at a position. Positions are those of the current
    /// line order; a stale or out-of-range index is a request error.
    pub fn update_quantity(&mut self, index: usize, quantity: i64) -> Result<(), DraftError> {
        self.ensure_open()?;
        if quantity < 1 {
            return Err(DraftError::InvalidQuantity(quantity));
        }
        match self.lines.get_mut(index) {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(DraftError::LineIndexOutOfRange(index)),
        }
    }

    /// Remove the line referencing the product. Removing an absent product is
    /// a no-op, so the operation is idempotent.
    pub fn remove_line(&mut self, product_id: i64) -> Result<(), DraftError> {
        self.ensure_open()?;
        self.lines.retain(|l| l.product_id != product_id);
        Ok(())
    }

    /// Derived total against a product snapshot.
    pub fn total(&self, products: &[Product]) -> Decimal {
        compute_total(&self.lines, products)
    }

    /// Check the submit preconditions without persisting anything.
    pub fn validate_submit(&self) -> Result<(), DraftError> {
        self.ensure_open()?;
        if self.party_id == 0 {
            return Err(DraftError::MissingParty(self.kind.party_role()));
        }
        if self.lines.is_empty() {
            return Err(DraftError::NoLines);
        }
        Ok(())
    }

    /// Create-input snapshot of the draft, total included.
    pub fn to_create(&self, products: &[Product]) -> CreateDocument {
        CreateDocument {
            kind: self.kind,
            number: self.number.clone(),
            party_id: self.party_id,
            date: self.date,
            status: self.status,
            payment_method: self.payment_method.clone(),
            notes: self.notes.clone(),
            lines: self.lines.clone(),
            total: self.total(products),
        }
    }

    /// Update-input snapshot of the draft (full replacement of the mutable
    /// header fields and lines).
    pub fn to_update(&self, products: &[Product]) -> UpdateDocument {
        UpdateDocument {
            party_id: Some(self.party_id),
            date: Some(self.date),
            status: Some(self.status),
            payment_method: Some(self.payment_method.clone()),
            notes: Some(self.notes.clone()),
            lines: Some(self.lines.clone()),
            total: Some(self.total(products)),
        }
    }

    /// Terminal view of the draft as of a successful submit.
    pub fn into_submitted(mut self) -> Self {
        self.submitted = true;
        self
    }

    /// Reset in place to a fresh create-mode draft in the same series,
    /// keeping the draft id so the editing session continues seamlessly.
    pub fn reset_for_next(&mut self, number: String, date: NaiveDate) {
        self.mode = DraftMode::Create;
        self.number = number;
        self.party_id = 0;
        self.date = date;
        self.status = DocumentStatus::Pending;
        self.payment_method.clear();
        self.notes.clear();
        self.lines.clear();
        self.submitted = false;
    }
}

/// Registry of open drafts, one per editing session.
///
/// Each draft is exclusively owned by its session; the registry only provides
/// keyed access. No guard is held across an await: callers snapshot, do their
/// async work, then re-enter.
#[derive(Default)]
pub struct DraftRegistry {
    drafts: DashMap<Uuid, DraftDocument>,
}

impl DraftRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, draft: DraftDocument) {
        self.drafts.insert(draft.draft_id, draft);
    }

    /// Snapshot of a draft by id.
    pub fn get(&self, id: &Uuid) -> Option<DraftDocument> {
        self.drafts.get(id).map(|d| d.value().clone())
    }

    /// Run a mutation against a draft, returning its result, or `None` when
    /// the draft does not exist (discarded or never opened).
    pub fn with_mut<F, R>(&self, id: &Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut DraftDocument) -> R,
    {
        self.drafts.get_mut(id).map(|mut d| f(d.value_mut()))
    }

    /// Drop a draft. Discarding an unknown id is a no-op.
    pub fn discard(&self, id: &Uuid) -> bool {
        self.drafts.remove(id).is_some()
    }

    /// Apply the post-submit reset for a create-mode session: the same draft
    /// becomes a fresh editing document with the next series number.
    ///
    /// When the draft was discarded while the persistence round trip was in
    /// flight, the late completion must not resurrect it; this is a no-op
    /// returning `None` in that case.
    pub fn complete_submit(
        &self,
        id: &Uuid,
        number: String,
        date: NaiveDate,
    ) -> Option<DraftDocument> {
        self.with_mut(id, |draft| {
            draft.reset_for_next(number, date);
            draft.clone()
        })
    }
}
