// Interleaving properties of the orchestrator: overlapping invocations of
// the same operation resolve by stale-response suppression, and the loading
// aggregate spans independently in-flight operations.
//
// These use a scripted ScreeningApi whose calls can be held open with
// oneshot gates, so tests control exactly which invocation resolves when.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use screener::api::ScreeningApi;
use screener::errors::{ClientError, RemoteError};
use screener::models::{
    LoginRequest, LoginResponse, NotificationRequest, RankRequest, RankResponse, RankedCandidate,
    ResumeRecord, SelectedFile, SignupRequest, SignupResponse, UploadResponse,
};
use screener::session::SessionToken;
use screener::workflow::{OpKind, OpStatus};
use screener::{SessionStore, Workflow};

struct Call<T> {
    /// Fired when the scripted call is entered, so tests can order starts.
    started: Option<oneshot::Sender<()>>,
    /// When present, the call stays in flight until the sender fires.
    gate: Option<oneshot::Receiver<()>>,
    outcome: Result<T, RemoteError>,
}

impl<T> Call<T> {
    fn immediate(outcome: Result<T, RemoteError>) -> Self {
        Self {
            started: None,
            gate: None,
            outcome,
        }
    }

    fn gated(outcome: Result<T, RemoteError>) -> (Self, oneshot::Sender<()>, oneshot::Receiver<()>) {
        let (started_tx, started_rx) = oneshot::channel();
        let (gate_tx, gate_rx) = oneshot::channel();
        (
            Self {
                started: Some(started_tx),
                gate: Some(gate_rx),
                outcome,
            },
            gate_tx,
            started_rx,
        )
    }

    async fn resolve(mut self) -> Result<T, ClientError> {
        if let Some(started) = self.started.take() {
            let _ = started.send(());
        }
        if let Some(gate) = self.gate.take() {
            let _ = gate.await;
        }
        self.outcome.map_err(ClientError::from)
    }
}

#[derive(Default)]
struct ScriptedApi {
    uploads: Mutex<VecDeque<Call<UploadResponse>>>,
    fetches: Mutex<VecDeque<Call<Vec<ResumeRecord>>>>,
    fetch_calls: AtomicUsize,
}

impl ScriptedApi {
    fn push_upload(&self, call: Call<UploadResponse>) {
        self.uploads.lock().unwrap().push_back(call);
    }

    fn push_fetch(&self, call: Call<Vec<ResumeRecord>>) {
        self.fetches.lock().unwrap().push_back(call);
    }

    fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

fn extraction(text: &str) -> UploadResponse {
    UploadResponse {
        message: "Resume uploaded successfully!".to_string(),
        extracted_text: text.to_string(),
    }
}

fn record(name: &str) -> ResumeRecord {
    ResumeRecord {
        id: None,
        name: name.to_string(),
        text: format!("{name} text"),
    }
}

#[async_trait]
impl ScreeningApi for ScriptedApi {
    async fn login(&self, _req: &LoginRequest) -> Result<LoginResponse, ClientError> {
        Err(RemoteError::InvalidResponse("login not scripted".into()).into())
    }

    async fn signup(&self, _req: &SignupRequest) -> Result<SignupResponse, ClientError> {
        Err(RemoteError::InvalidResponse("signup not scripted".into()).into())
    }

    async fn fetch_resumes(
        &self,
        _token: Option<&SessionToken>,
    ) -> Result<Vec<ResumeRecord>, ClientError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.fetches.lock().unwrap().pop_front();
        match scripted {
            Some(call) => call.resolve().await,
            None => Ok(Vec::new()),
        }
    }

    async fn upload_resume(&self, _file: &SelectedFile) -> Result<UploadResponse, ClientError> {
        let scripted = self.uploads.lock().unwrap().pop_front();
        match scripted {
            Some(call) => call.resolve().await,
            None => Err(RemoteError::InvalidResponse("upload not scripted".into()).into()),
        }
    }

    async fn rank_resumes(&self, _req: &RankRequest) -> Result<RankResponse, ClientError> {
        Ok(RankResponse {
            ranked_candidates: vec![RankedCandidate {
                name: "Candidate 1".to_string(),
                score: 50.0,
            }],
        })
    }

    async fn send_notification(&self, _req: &NotificationRequest) -> Result<(), ClientError> {
        Ok(())
    }
}

fn workflow_with(api: Arc<ScriptedApi>, state_dir: &Path) -> Workflow {
    let store = Arc::new(SessionStore::open(Some(state_dir)).unwrap());
    Workflow::new(api, store)
}

#[tokio::test]
async fn superseded_upload_resolution_is_discarded() {
    let api = Arc::new(ScriptedApi::default());
    let (slow, release_slow, slow_started) = Call::gated(Ok(extraction("first text")));
    api.push_upload(slow);
    api.push_upload(Call::immediate(Ok(extraction("second text"))));

    let dir = tempfile::tempdir().unwrap();
    let workflow = workflow_with(api.clone(), dir.path());

    workflow.select_file(SelectedFile::new("first.pdf", &b"one"[..]));
    let first = {
        let workflow = workflow.clone();
        tokio::spawn(async move { workflow.upload().await })
    };
    slow_started.await.unwrap();

    // A newer selection and upload start while the first is still in flight.
    workflow.select_file(SelectedFile::new("second.pdf", &b"two"[..]));
    workflow.upload().await.unwrap();
    assert_eq!(workflow.extracted_text(), "second text");
    let fetches_after_second = api.fetch_calls();
    assert_eq!(fetches_after_second, 1, "the applied upload refreshes once");

    // Now let the superseded call resolve; its result must not land.
    release_slow.send(()).unwrap();
    first.await.unwrap().unwrap();

    assert_eq!(workflow.extracted_text(), "second text");
    assert_eq!(workflow.status(OpKind::Upload), OpStatus::Succeeded);
    assert_eq!(
        api.fetch_calls(),
        fetches_after_second,
        "a suppressed upload must not trigger a refresh"
    );
    assert!(!workflow.is_loading());
}

#[tokio::test]
async fn stale_failure_does_not_mask_a_newer_success() {
    let api = Arc::new(ScriptedApi::default());
    let (slow, release_slow, slow_started) =
        Call::gated(Err(RemoteError::UploadFailed { detail: None }));
    api.push_upload(slow);
    api.push_upload(Call::immediate(Ok(extraction("good text"))));

    let dir = tempfile::tempdir().unwrap();
    let workflow = workflow_with(api.clone(), dir.path());

    workflow.select_file(SelectedFile::new("doomed.pdf", &b"one"[..]));
    let first = {
        let workflow = workflow.clone();
        tokio::spawn(async move { workflow.upload().await })
    };
    slow_started.await.unwrap();

    workflow.select_file(SelectedFile::new("good.pdf", &b"two"[..]));
    workflow.upload().await.unwrap();

    release_slow.send(()).unwrap();
    let stale_result = first.await.unwrap();
    assert!(stale_result.is_err(), "the stale caller still sees its error");

    // The visible state belongs to the newest invocation.
    assert_eq!(workflow.status(OpKind::Upload), OpStatus::Succeeded);
    assert_eq!(workflow.extracted_text(), "good text");
}

#[tokio::test]
async fn loading_aggregate_stays_on_while_any_operation_is_in_flight() {
    let api = Arc::new(ScriptedApi::default());
    let (slow, release_slow, slow_started) = Call::gated(Ok(extraction("slow text")));
    api.push_upload(slow);

    let dir = tempfile::tempdir().unwrap();
    let workflow = workflow_with(api.clone(), dir.path());

    workflow.select_file(SelectedFile::new("slow.pdf", &b"zzz"[..]));
    let upload = {
        let workflow = workflow.clone();
        tokio::spawn(async move { workflow.upload().await })
    };
    slow_started.await.unwrap();
    assert!(workflow.is_loading());

    // A notification completes while the upload is still out; the aggregate
    // must not flicker off.
    workflow.notify("a@b.com", "hi").await.unwrap();
    assert_eq!(workflow.status(OpKind::Notify), OpStatus::Succeeded);
    assert!(workflow.is_loading());

    release_slow.send(()).unwrap();
    upload.await.unwrap().unwrap();
    assert!(!workflow.is_loading());
}

#[tokio::test]
async fn overlapping_refreshes_keep_the_latest_list() {
    let api = Arc::new(ScriptedApi::default());
    let (slow, release_slow, slow_started) = Call::gated(Ok(vec![record("stale.pdf")]));
    api.push_fetch(slow);
    api.push_fetch(Call::immediate(Ok(vec![record("fresh.pdf")])));

    let dir = tempfile::tempdir().unwrap();
    let workflow = workflow_with(api.clone(), dir.path());

    let first = {
        let workflow = workflow.clone();
        tokio::spawn(async move { workflow.refresh().await })
    };
    slow_started.await.unwrap();

    workflow.refresh().await.unwrap();
    let names = |wf: &Workflow| -> Vec<String> {
        wf.repository().records().into_iter().map(|r| r.name).collect()
    };
    assert_eq!(names(&workflow), ["fresh.pdf"]);

    release_slow.send(()).unwrap();
    first.await.unwrap().unwrap();

    assert_eq!(names(&workflow), ["fresh.pdf"]);
    assert_eq!(workflow.status(OpKind::Refresh), OpStatus::Succeeded);
}
