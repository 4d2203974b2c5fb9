use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One previously uploaded resume, as returned by the screening service.
/// The client never mutates these; the cached list is replaced wholesale on
/// every successful refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub text: String,
}

/// A file the user picked for upload. Selection alone performs no network
/// activity; a later selection simply replaces an earlier one.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Success body of `POST /upload`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub extracted_text: String,
}

/// Body of `POST /rank_resumes`. Carries resume texts only; candidate
/// identity is re-associated from the response.
#[derive(Debug, Clone, Serialize)]
pub struct RankRequest {
    pub resumes: Vec<String>,
    pub job_description: String,
}

/// Success body of `POST /rank_resumes`.
#[derive(Debug, Clone, Deserialize)]
pub struct RankResponse {
    pub ranked_candidates: Vec<RankedCandidate>,
}

/// One scored candidate. Stored in response order; sorting happens at
/// display time so ties keep the order the service returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub name: String,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resume_record_tolerates_missing_id() {
        let record: ResumeRecord =
            serde_json::from_str(r#"{"name": "resume.pdf", "text": "Jane Doe"}"#).unwrap();
        assert_eq!(record.id, None);
        assert_eq!(record.name, "resume.pdf");
    }

    #[test]
    fn rank_request_serializes_service_field_names() {
        let req = RankRequest {
            resumes: vec!["text a".to_string()],
            job_description: "rust engineer".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["job_description"], "rust engineer");
        assert_eq!(json["resumes"][0], "text a");
    }
}
