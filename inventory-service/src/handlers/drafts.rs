use crate::dtos::{
    AddLineRequest, DocumentResponse, DraftHeaderRequest, DraftResponse, OpenDraftRequest,
    SubmitResponse, UpdateLineRequest,
};
use crate::models::{next_document_number, DocumentKind};
use crate::services::catalog::resolve_exact;
use crate::services::draft::{DraftDocument, DraftMode, HeaderPatch};
use crate::services::metrics::{record_document_submitted, record_draft_opened};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use service_core::error::AppError;
use uuid::Uuid;

fn draft_not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Draft not found"))
}

pub async fn open_draft(
    State(state): State<AppState>,
    Json(payload): Json<OpenDraftRequest>,
) -> Result<impl IntoResponse, AppError> {
    let products = state.catalog.list_products().await?;

    let draft = match payload.document_id {
        Some(document_id) => {
            let document = state.documents.get(document_id).await?.ok_or_else(|| {
                AppError::NotFound(anyhow::anyhow!("Document {} not found", document_id))
            })?;
            DraftDocument::for_edit(&document)
        }
        None => {
            let kind = payload.kind.ok_or_else(|| {
                AppError::BadRequest(anyhow::anyhow!("kind is required to open a new draft"))
            })?;
            let last = state.documents.last_number(kind).await?;
            let number = next_document_number(kind, last.as_deref());
            DraftDocument::new(kind, number, Utc::now().date_naive())
        }
    };

    record_draft_opened(draft.kind.as_str());
    tracing::info!(draft_id = %draft.draft_id, kind = draft.kind.as_str(), number = %draft.number, "Draft opened");

    let response = DraftResponse::from_draft(&draft, &products);
    state.drafts.insert(draft);

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
) -> Result<Json<DraftResponse>, AppError> {
    let draft = state.drafts.get(&draft_id).ok_or_else(draft_not_found)?;
    let products = state.catalog.list_products().await?;
    Ok(Json(DraftResponse::from_draft(&draft, &products)))
}

/// Resolve typeahead display text to a party id for the kind's catalog
/// side. No match clears the selection back to 0.
async fn resolve_party(state: &AppState, kind: DocumentKind, text: &str) -> Result<i64, AppError> {
    let resolved = match kind.party_role() {
        "supplier" => {
            let suppliers = state.catalog.list_suppliers().await?;
            resolve_exact(&suppliers, text).map(|s| s.id)
        }
        _ => {
            let customers = state.catalog.list_customers().await?;
            resolve_exact(&customers, text).map(|c| c.id)
        }
    };
    Ok(resolved.unwrap_or(0))
}

pub async fn update_draft_header(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    Json(payload): Json<DraftHeaderRequest>,
) -> Result<Json<DraftResponse>, AppError> {
    let snapshot = state.drafts.get(&draft_id).ok_or_else(draft_not_found)?;

    let party_id = match (payload.party_id, payload.party_query.as_deref()) {
        (Some(id), _) => Some(id),
        (None, Some(text)) => Some(resolve_party(&state, snapshot.kind, text).await?),
        (None, None) => None,
    };

    let patch = HeaderPatch {
        party_id,
        date: payload.date,
        status: payload.status,
        payment_method: payload.payment_method,
        notes: payload.notes,
    };

    let products = state.catalog.list_products().await?;
    let outcome = state
        .drafts
        .with_mut(&draft_id, |draft| {
            draft.apply_header(patch).map(|_| draft.clone())
        })
        .ok_or_else(draft_not_found)?;
    let updated = outcome?;

    Ok(Json(DraftResponse::from_draft(&updated, &products)))
}

pub async fn add_draft_line(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    Json(payload): Json<AddLineRequest>,
) -> Result<Json<DraftResponse>, AppError> {
    let products = state.catalog.list_products().await?;

    let product_id = match (payload.product_id, payload.product_query.as_deref()) {
        (Some(id), _) => id,
        (None, Some(text)) => resolve_exact(&products, text)
            .map(|p| p.id)
            .ok_or_else(|| {
                AppError::BadRequest(anyhow::anyhow!("No product matches '{}'", text))
            })?,
        (None, None) => {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "product_id or product_query is required"
            )))
        }
    };

    // Line ids must come from the loaded catalog.
    if !products.iter().any(|p| p.id == product_id) {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Unknown product {}",
            product_id
        )));
    }

    let outcome = state
        .drafts
        .with_mut(&draft_id, |draft| {
            draft.add_line(product_id).map(|_| draft.clone())
        })
        .ok_or_else(draft_not_found)?;
    let updated = outcome?;

    Ok(Json(DraftResponse::from_draft(&updated, &products)))
}

pub async fn update_draft_line(
    State(state): State<AppState>,
    Path((draft_id, index)): Path<(Uuid, usize)>,
    Json(payload): Json<UpdateLineRequest>,
) -> Result<Json<DraftResponse>, AppError> {
    let products = state.catalog.list_products().await?;
    let outcome = state
        .drafts
        .with_mut(&draft_id, |draft| {
            draft
                .update_quantity(index, payload.quantity)
                .map(|_| draft.clone())
        })
        .ok_or_else(draft_not_found)?;
    let updated = outcome?;

    Ok(Json(DraftResponse::from_draft(&updated, &products)))
}

pub async fn remove_draft_line(
    State(state): State<AppState>,
    Path((draft_id, product_id)): Path<(Uuid, i64)>,
) -> Result<Json<DraftResponse>, AppError> {
    let products = state.catalog.list_products().await?;
    let outcome = state
        .drafts
        .with_mut(&draft_id, |draft| {
            draft.remove_line(product_id).map(|_| draft.clone())
        })
        .ok_or_else(draft_not_found)?;
    let updated = outcome?;

    Ok(Json(DraftResponse::from_draft(&updated, &products)))
}

pub async fn submit_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
) -> Result<Json<SubmitResponse>, AppError> {
    let snapshot = state.drafts.get(&draft_id).ok_or_else(draft_not_found)?;
    snapshot.validate_submit()?;

    let products = state.catalog.list_products().await?;

    match snapshot.mode {
        DraftMode::Create => {
            // A store failure propagates here and leaves the draft untouched,
            // so the session can retry without re-entering anything.
            let document = state
                .documents
                .create(&snapshot.to_create(&products))
                .await?;
            record_document_submitted(snapshot.kind.as_str());
            tracing::info!(
                document_id = document.id,
                number = %document.number,
                "Document submitted"
            );

            let next = next_document_number(snapshot.kind, Some(&document.number));
            // A draft discarded while the round trip was in flight stays gone.
            let draft_view = match state.drafts.complete_submit(
                &draft_id,
                next,
                Utc::now().date_naive(),
            ) {
                Some(fresh) => DraftResponse::from_draft(&fresh, &products),
                None => DraftResponse::from_draft(&snapshot.into_submitted(), &products),
            };

            Ok(Json(SubmitResponse {
                document: DocumentResponse::from_document(document, &products),
                draft: draft_view,
            }))
        }
        DraftMode::Edit { document_id } => {
            let document = state
                .documents
                .update(document_id, &snapshot.to_update(&products))
                .await?;
            state.drafts.discard(&draft_id);
            tracing::info!(document_id = document.id, "Document updated via draft");

            let terminal = snapshot.into_submitted();
            Ok(Json(SubmitResponse {
                document: DocumentResponse::from_document(document, &products),
                draft: DraftResponse::from_draft(&terminal, &products),
            }))
        }
    }
}

pub async fn discard_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
) -> StatusCode {
    state.drafts.discard(&draft_id);
    StatusCode::NO_CONTENT
}
