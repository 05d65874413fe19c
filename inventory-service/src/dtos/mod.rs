//! Request/response shapes for the REST surface.

mod catalog;
mod documents;
mod drafts;

pub use catalog::{LabelQuery, ResolveQuery};
pub use documents::{
    CreateDocumentRequest, DocumentListResponse, DocumentResponse, LineRequest, LineView,
    ListDocumentsParams, UpdateDocumentRequest,
};
pub use drafts::{
    AddLineRequest, DraftHeaderRequest, DraftResponse, OpenDraftRequest, SubmitResponse,
    UpdateLineRequest,
};
