use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use renoprop_core::proposal::PROPOSAL_OBJECT_NAME;
use renoprop_pdf::{PdfRenderer, RenderError};
use renoprop_storage::{ObjectStore, StorageError};

/// Content type stamped on every uploaded proposal document.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Fixed confirmation string reported to the user after a successful
/// upload. Downstream consumers match on this exact text.
pub const UPLOAD_CONFIRMATION: &str = "Successfully uploaded PDF to GCS!!";

#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Receipt for a stored proposal document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishedDocument {
    pub object_name: String,
    pub bytes_written: usize,
}

/// Renders proposal text to PDF and stores it under the fixed object key.
///
/// The publisher owns every deterministic decision in the pipeline: the
/// object key, the content type, and the success report. Rendering happens
/// before any network traffic, so a document that cannot be rendered never
/// reaches the store. Upload failures surface immediately; there is no
/// retry here, re-running the publish is the recovery path and simply
/// overwrites the key.
pub struct DocumentPublisher {
    renderer: PdfRenderer,
    store: Arc<dyn ObjectStore>,
    object_name: String,
}

impl DocumentPublisher {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self::with_object_name(store, PROPOSAL_OBJECT_NAME)
    }

    pub fn with_object_name(store: Arc<dyn ObjectStore>, object_name: impl Into<String>) -> Self {
        Self { renderer: PdfRenderer::new(), store, object_name: object_name.into() }
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub async fn publish(&self, proposal_text: &str) -> Result<PublishedDocument, PublishError> {
        let pdf_bytes = self.renderer.render(proposal_text)?;
        let bytes_written = pdf_bytes.len();

        self.store.put(&self.object_name, pdf_bytes, PDF_CONTENT_TYPE).await?;

        info!(object = %self.object_name, bytes = bytes_written, "proposal document published");
        Ok(PublishedDocument { object_name: self.object_name.clone(), bytes_written })
    }
}
