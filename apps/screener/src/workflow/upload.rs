use std::sync::Arc;

use tracing::{debug, warn};

use super::repository::ResumeRepository;
use super::status::{OpKind, OpStatus};
use super::Shared;
use crate::errors::{ClientError, ValidationError};
use crate::models::{SelectedFile, UploadResponse};

/// Owns the one in-flight upload/extraction task and its visible result.
/// At most one upload's extracted text is shown at a time; there is no
/// queueing and no cancellation.
#[derive(Clone)]
pub struct UploadOrchestrator {
    shared: Arc<Shared>,
    repository: ResumeRepository,
}

impl UploadOrchestrator {
    pub(super) fn new(shared: Arc<Shared>, repository: ResumeRepository) -> Self {
        Self { shared, repository }
    }

    /// Records the chosen file. No network activity; selecting while an
    /// upload is in flight simply means the next `upload` sends the new file.
    pub fn select_file(&self, file: SelectedFile) {
        debug!(file = %file.name, "file selected");
        self.shared.lock().selected_file = Some(file);
    }

    pub fn selected_file_name(&self) -> Option<String> {
        self.shared
            .lock()
            .selected_file
            .as_ref()
            .map(|file| file.name.clone())
    }

    /// Sends the selected file for extraction.
    ///
    /// With no selection this fails locally, and also clears any previously
    /// displayed extracted text so stale extraction never sits next to an
    /// empty selection. Otherwise the old text is cleared up front, the file
    /// goes out as a multipart upload, and on an applied success the returned
    /// extracted text becomes visible and a repository refresh is triggered.
    /// A refresh failure is logged and does not undo the upload.
    pub async fn upload(&self) -> Result<UploadResponse, ClientError> {
        let (file, seq) = {
            let mut state = self.shared.lock();
            match state.selected_file.clone() {
                None => {
                    state.extracted_text.clear();
                    return Err(ValidationError::NoFileSelected.into());
                }
                Some(file) => {
                    let seq = state.ops.begin(OpKind::Upload);
                    state.extracted_text.clear();
                    (file, seq)
                }
            }
        };

        let result = self.shared.api.upload_resume(&file).await;

        let applied = {
            let mut state = self.shared.lock();
            match &result {
                Ok(response) => {
                    let applied = state.ops.try_complete(OpKind::Upload, seq, OpStatus::Succeeded);
                    if applied {
                        debug!(file = %file.name, "extracted text stored");
                        state.extracted_text = response.extracted_text.clone();
                    }
                    applied
                }
                Err(_) => {
                    state.ops.try_complete(OpKind::Upload, seq, OpStatus::Failed);
                    false
                }
            }
        };

        let response = result?;
        if applied {
            if let Err(err) = self.repository.refresh().await {
                warn!(error = %err, "post-upload resume refresh failed");
            }
        }
        Ok(response)
    }

    /// The currently visible extraction result. Empty until an upload
    /// succeeds, and emptied again whenever a new upload begins.
    pub fn extracted_text(&self) -> String {
        self.shared.lock().extracted_text.clone()
    }
}
