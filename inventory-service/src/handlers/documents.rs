use crate::dtos::{
    CreateDocumentRequest, DocumentListResponse, DocumentResponse, LineRequest,
    ListDocumentsParams, UpdateDocumentRequest,
};
use crate::models::{next_document_number, Product};
use crate::services::draft::{DraftDocument, HeaderPatch};
use crate::services::metrics::record_document_submitted;
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use validator::Validate;

/// Run requested lines through the draft builder so the line invariants
/// (known product, no duplicates, quantity >= 1) hold no matter which
/// surface created the document.
fn apply_lines(
    draft: &mut DraftDocument,
    lines: &[LineRequest],
    products: &[Product],
) -> Result<(), AppError> {
    for req in lines {
        if !products.iter().any(|p| p.id == req.product_id) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Unknown product {}",
                req.product_id
            )));
        }
        draft.add_line(req.product_id)?;
        if let Some(quantity) = req.quantity {
            let index = draft.lines.len() - 1;
            draft.update_quantity(index, quantity)?;
        }
    }
    Ok(())
}

pub async fn list_documents(
    State(state): State<AppState>,
    Query(params): Query<ListDocumentsParams>,
) -> Result<Json<DocumentListResponse>, AppError> {
    let filter = params.into_filter();
    let documents = state.documents.list(&filter).await?;
    let products = state.catalog.list_products().await?;

    let documents: Vec<DocumentResponse> = documents
        .into_iter()
        .map(|d| DocumentResponse::from_document(d, &products))
        .collect();
    let count = documents.len();

    Ok(Json(DocumentListResponse { documents, count }))
}

pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DocumentResponse>, AppError> {
    let document = state
        .documents
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Document {} not found", id)))?;
    let products = state.catalog.list_products().await?;
    Ok(Json(DocumentResponse::from_document(document, &products)))
}

pub async fn create_document(
    State(state): State<AppState>,
    Json(payload): Json<CreateDocumentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let products = state.catalog.list_products().await?;
    let number = match payload.number {
        Some(n) if !n.trim().is_empty() => n,
        _ => {
            let last = state.documents.last_number(payload.kind).await?;
            next_document_number(payload.kind, last.as_deref())
        }
    };

    let mut draft = DraftDocument::new(payload.kind, number, payload.date);
    draft.apply_header(HeaderPatch {
        party_id: Some(payload.party_id),
        date: Some(payload.date),
        status: payload.status,
        payment_method: payload.payment_method,
        notes: payload.notes,
    })?;
    apply_lines(&mut draft, &payload.lines, &products)?;
    draft.validate_submit()?;

    let document = state.documents.create(&draft.to_create(&products)).await?;
    record_document_submitted(draft.kind.as_str());

    tracing::info!(
        document_id = document.id,
        number = %document.number,
        kind = %document.kind,
        "Document created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DocumentResponse::from_document(document, &products)),
    ))
}

pub async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateDocumentRequest>,
) -> Result<Json<DocumentResponse>, AppError> {
    payload.validate()?;

    let existing = state
        .documents
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Document {} not found", id)))?;
    let products = state.catalog.list_products().await?;

    let mut draft = DraftDocument::for_edit(&existing);
    draft.apply_header(HeaderPatch {
        party_id: payload.party_id,
        date: payload.date,
        status: payload.status,
        payment_method: payload.payment_method,
        notes: payload.notes,
    })?;
    if let Some(ref lines) = payload.lines {
        draft.lines.clear();
        apply_lines(&mut draft, lines, &products)?;
    }
    draft.validate_submit()?;

    let document = state
        .documents
        .update(id, &draft.to_update(&products))
        .await?;

    Ok(Json(DocumentResponse::from_document(document, &products)))
}

pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.documents.delete(id).await?;
    tracing::info!(document_id = id, "Document deleted");
    Ok(StatusCode::NO_CONTENT)
}
