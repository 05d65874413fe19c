use crate::dtos::documents::{DocumentResponse, LineView};
use crate::models::{DocumentKind, DocumentStatus, Product};
use crate::services::draft::{DraftDocument, DraftMode, DraftState};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload for opening a draft session: either a fresh document of a kind,
/// or an edit session seeded from a persisted document.
#[derive(Debug, Deserialize)]
pub struct OpenDraftRequest {
    pub kind: Option<DocumentKind>,
    pub document_id: Option<i64>,
}

/// Partial header update. `party_query` carries typeahead display text and
/// is resolved against the kind's party catalog; no match clears the party.
/// An explicit `party_id` wins over the query.
#[derive(Debug, Default, Deserialize)]
pub struct DraftHeaderRequest {
    pub party_id: Option<i64>,
    pub party_query: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<DocumentStatus>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// Payload for adding a line: a product id, or the typeahead display text
/// (`"<name> - <code>"`) to resolve.
#[derive(Debug, Deserialize)]
pub struct AddLineRequest {
    pub product_id: Option<i64>,
    pub product_query: Option<String>,
}

/// Payload for a positional quantity update.
#[derive(Debug, Deserialize)]
pub struct UpdateLineRequest {
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub draft_id: Uuid,
    pub kind: &'static str,
    pub mode: &'static str,
    pub document_id: Option<i64>,
    pub state: DraftState,
    pub number: String,
    pub party_id: i64,
    pub date: NaiveDate,
    pub status: &'static str,
    pub payment_method: String,
    pub notes: String,
    pub lines: Vec<LineView>,
    pub total: Decimal,
}

impl DraftResponse {
    pub fn from_draft(draft: &DraftDocument, products: &[Product]) -> Self {
        let (mode, document_id) = match draft.mode {
            DraftMode::Create => ("create", None),
            DraftMode::Edit { document_id } => ("edit", Some(document_id)),
        };
        Self {
            draft_id: draft.draft_id,
            kind: draft.kind.as_str(),
            mode,
            document_id,
            state: draft.state(),
            number: draft.number.clone(),
            party_id: draft.party_id,
            date: draft.date,
            status: draft.status.as_str(),
            payment_method: draft.payment_method.clone(),
            notes: draft.notes.clone(),
            lines: draft
                .lines
                .iter()
                .map(|l| LineView::resolve(l, products))
                .collect(),
            total: draft.total(products),
        }
    }
}

/// Outcome of a successful submit: the persisted document plus the draft the
/// session continues with (a fresh one for create sessions, the terminal
/// view for edit sessions).
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub document: DocumentResponse,
    pub draft: DraftResponse,
}
