use std::sync::Arc;

use tracing::debug;

use super::status::{OpKind, OpStatus};
use super::Shared;
use crate::errors::{ClientError, ValidationError};
use crate::models::{RankRequest, RankedCandidate};

/// Submits the job description plus the cached resume texts for scoring and
/// holds the latest successful result set.
#[derive(Clone)]
pub struct RankingEngine {
    shared: Arc<Shared>,
}

impl RankingEngine {
    pub(super) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Ranks the cached resumes against `job_description`.
    ///
    /// A description that is empty after trimming fails locally without a
    /// network call and without touching the prior result. A remote failure
    /// also leaves the prior result untouched; only an applied success
    /// replaces it, wholesale, in response order.
    pub async fn rank(&self, job_description: &str) -> Result<usize, ClientError> {
        let trimmed = job_description.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyJobDescription.into());
        }

        let (request, seq) = {
            let mut state = self.shared.lock();
            let seq = state.ops.begin(OpKind::Rank);
            let request = RankRequest {
                resumes: state
                    .resumes
                    .iter()
                    .map(|record| record.text.clone())
                    .collect(),
                job_description: trimmed.to_string(),
            };
            (request, seq)
        };
        debug!(resumes = request.resumes.len(), "ranking requested");

        let result = self.shared.api.rank_resumes(&request).await;

        let mut state = self.shared.lock();
        match result {
            Ok(response) => {
                if state.ops.try_complete(OpKind::Rank, seq, OpStatus::Succeeded) {
                    state.ranked = response.ranked_candidates;
                }
                Ok(state.ranked.len())
            }
            Err(err) => {
                state.ops.try_complete(OpKind::Rank, seq, OpStatus::Failed);
                Err(err)
            }
        }
    }

    /// The stored result set, in the order the service returned it.
    pub fn results(&self) -> Vec<RankedCandidate> {
        self.shared.lock().ranked.clone()
    }

    /// The result set as it should be displayed: descending by score. The
    /// sort is stable and happens here, not in storage, so tied scores keep
    /// the order the service returned them in.
    pub fn display_ranking(&self) -> Vec<RankedCandidate> {
        let mut ranked = self.shared.lock().ranked.clone();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }
}
