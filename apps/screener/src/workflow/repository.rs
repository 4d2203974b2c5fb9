use std::sync::Arc;

use tracing::debug;

use super::status::{OpKind, OpStatus};
use super::Shared;
use crate::errors::ClientError;
use crate::models::ResumeRecord;

/// Cached view of the resumes the service already holds. The cache is only
/// ever replaced wholesale by a successful fetch; a failed fetch leaves it
/// exactly as it was. No pagination, no incremental sync.
#[derive(Clone)]
pub struct ResumeRepository {
    shared: Arc<Shared>,
}

impl ResumeRepository {
    pub(super) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Fetches the full resume list and replaces the cache atomically.
    ///
    /// Runs automatically when a session appears (login, bootstrap with a
    /// persisted token) and after a successful upload; callers may also
    /// invoke it directly. The bearer token rides along when present but the
    /// listing works without one.
    pub async fn refresh(&self) -> Result<usize, ClientError> {
        let seq = self.shared.lock().ops.begin(OpKind::Refresh);
        let token = self.shared.session.session();

        let result = self.shared.api.fetch_resumes(token.as_ref()).await;

        let mut state = self.shared.lock();
        match result {
            Ok(records) => {
                if state.ops.try_complete(OpKind::Refresh, seq, OpStatus::Succeeded) {
                    debug!(count = records.len(), "resume cache replaced");
                    state.resumes = records;
                }
                Ok(state.resumes.len())
            }
            Err(err) => {
                state.ops.try_complete(OpKind::Refresh, seq, OpStatus::Failed);
                Err(err)
            }
        }
    }

    /// Snapshot of the cached records, in service order.
    pub fn records(&self) -> Vec<ResumeRecord> {
        self.shared.lock().resumes.clone()
    }

    /// The cached resume texts, in cache order. This is what a ranking
    /// request is built from; names are not sent, the ranking response is
    /// the sole source of candidate identity.
    pub fn texts(&self) -> Vec<String> {
        self.shared
            .lock()
            .resumes
            .iter()
            .map(|record| record.text.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.shared.lock().resumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
