//! The workflow orchestrator: owns the shared client state and wires user
//! actions to the sub-components that perform the remote calls.
//!
//! Concurrency model: cooperative async. The state mutex is only ever taken
//! for short, await-free sections; every remote call is made with the lock
//! released and its outcome is written back in the completion continuation.
//! Operations are not serialized against each other, so any number may be in
//! flight at once; per-operation sequence numbers (see [`status`]) decide
//! which completion is allowed to publish its result.

mod notify;
mod ranking;
mod repository;
mod status;
mod upload;

pub use notify::NotificationDispatcher;
pub use ranking::RankingEngine;
pub use repository::ResumeRepository;
pub use status::{OpKind, OpStatus};
pub use upload::UploadOrchestrator;

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, warn};

use crate::api::ScreeningApi;
use crate::auth::{Access, Authorizer, SessionAuthorizer, View};
use crate::errors::{ClientError, ValidationError};
use crate::models::{
    LoginRequest, RankedCandidate, ResumeRecord, SelectedFile, SignupRequest, SignupResponse,
    UploadResponse,
};
use crate::session::{SessionStore, SessionToken};
use status::OpTable;

/// State shared by the orchestrator and its sub-components.
pub(crate) struct Shared {
    pub(crate) api: Arc<dyn ScreeningApi>,
    pub(crate) session: Arc<SessionStore>,
    state: Mutex<WorkflowState>,
}

#[derive(Default)]
struct WorkflowState {
    ops: OpTable,
    selected_file: Option<SelectedFile>,
    extracted_text: String,
    resumes: Vec<ResumeRecord>,
    ranked: Vec<RankedCandidate>,
}

impl Shared {
    /// Short, await-free critical sections only; never hold this across a
    /// suspension point.
    fn lock(&self) -> MutexGuard<'_, WorkflowState> {
        self.state.lock().expect("workflow state lock poisoned")
    }
}

/// Top-level composition of the screening client.
#[derive(Clone)]
pub struct Workflow {
    shared: Arc<Shared>,
    authorizer: Arc<dyn Authorizer>,
    repository: ResumeRepository,
    uploads: UploadOrchestrator,
    ranking: RankingEngine,
    notifier: NotificationDispatcher,
}

impl Workflow {
    pub fn new(api: Arc<dyn ScreeningApi>, session: Arc<SessionStore>) -> Self {
        let shared = Arc::new(Shared {
            api,
            session: session.clone(),
            state: Mutex::new(WorkflowState::default()),
        });
        let repository = ResumeRepository::new(shared.clone());
        let uploads = UploadOrchestrator::new(shared.clone(), repository.clone());
        let ranking = RankingEngine::new(shared.clone());
        let notifier = NotificationDispatcher::new(shared.clone());
        let authorizer = Arc::new(SessionAuthorizer::new(session));

        Self {
            shared,
            authorizer,
            repository,
            uploads,
            ranking,
            notifier,
        }
    }

    /// Restores the session-dependent parts of the client after a restart:
    /// when a persisted session exists, the resume cache is refreshed, the
    /// same automatic fetch that a fresh login performs.
    pub async fn bootstrap(&self) -> Result<(), ClientError> {
        if self.shared.session.session().is_some() {
            self.repository.refresh().await?;
        }
        Ok(())
    }

    // ── sub-components ──────────────────────────────────────────────────

    pub fn repository(&self) -> &ResumeRepository {
        &self.repository
    }

    pub fn uploads(&self) -> &UploadOrchestrator {
        &self.uploads
    }

    pub fn ranking(&self) -> &RankingEngine {
        &self.ranking
    }

    pub fn notifier(&self) -> &NotificationDispatcher {
        &self.notifier
    }

    // ── user actions, delegated ─────────────────────────────────────────

    pub fn select_file(&self, file: SelectedFile) {
        self.uploads.select_file(file);
    }

    pub async fn upload(&self) -> Result<UploadResponse, ClientError> {
        self.uploads.upload().await
    }

    pub async fn rank(&self, job_description: &str) -> Result<usize, ClientError> {
        self.ranking.rank(job_description).await
    }

    pub async fn notify(&self, recipient: &str, message: &str) -> Result<(), ClientError> {
        self.notifier.notify(recipient, message).await
    }

    pub async fn refresh(&self) -> Result<usize, ClientError> {
        self.repository.refresh().await
    }

    // ── auth flow (untracked: never touches the loading indicator) ──────

    /// Authenticates and persists the session. A session appearing triggers
    /// the automatic resume refresh; a failure of that refresh is logged and
    /// does not undo the login.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ValidationError::MissingCredentials.into());
        }
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self.shared.api.login(&request).await?;
        self.shared
            .session
            .set_session(SessionToken::new(response.token))?;
        info!(username, "logged in");

        if let Err(err) = self.repository.refresh().await {
            warn!(error = %err, "post-login resume refresh failed");
        }
        Ok(())
    }

    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<SignupResponse, ClientError> {
        if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(ValidationError::IncompleteSignup.into());
        }
        let request = SignupRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.shared.api.signup(&request).await
    }

    pub fn logout(&self) -> Result<(), ClientError> {
        self.shared.session.clear_session()?;
        info!("logged out");
        Ok(())
    }

    pub fn session(&self) -> Option<SessionToken> {
        self.shared.session.session()
    }

    // ── navigation and shared-state reads ───────────────────────────────

    /// Re-evaluated on every navigation attempt; never cached.
    pub fn authorize(&self, view: View) -> Access {
        self.authorizer.authorize(view)
    }

    /// Derived aggregate: true while any tracked operation is in flight.
    /// It deliberately does not say which one; per-operation status is
    /// available through [`Workflow::status`].
    pub fn is_loading(&self) -> bool {
        self.shared.lock().ops.any_in_flight()
    }

    pub fn status(&self, kind: OpKind) -> OpStatus {
        self.shared.lock().ops.status(kind)
    }

    pub fn extracted_text(&self) -> String {
        self.uploads.extracted_text()
    }

    pub fn dark_mode(&self) -> bool {
        self.shared.session.dark_mode()
    }

    pub fn toggle_dark_mode(&self) -> Result<bool, ClientError> {
        let enabled = !self.shared.session.dark_mode();
        self.shared.session.set_dark_mode(enabled)?;
        Ok(enabled)
    }
}
