//! HTTP client for the analysis backend and auth service.
//!
//! Thin request/response mapping only: every method turns one endpoint call
//! into a domain value or a `VerifierError`. No retry, no caching, no state.
//! All policy (what to do with a failure) lives with the callers.

use reqwest::multipart;

use sdlcv_core::db::now_secs;
use sdlcv_core::error::{AuthError, VerifierError};
use sdlcv_core::types::{AnalysisReport, AuthSession, ProjectFile, ReviewFeedback};

use super::types::{
    AckResponse, AnalyzeResponse, AuthFailure, ChatResponse, CredentialsRequest, ReportPackage,
    ReportRequest, SignInResponse, UploadOutcome, UploadResponse,
};

/// Client for all backend endpoints, rooted at one base URL.
///
/// Cheap to clone; the inner `reqwest::Client` shares its connection pool.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /upload`: sends the selected files as multipart `files` parts.
    pub async fn upload(&self, files: Vec<ProjectFile>) -> Result<UploadOutcome, VerifierError> {
        let mut form = multipart::Form::new();
        for file in files {
            let part = multipart::Part::bytes(file.content).file_name(file.name);
            form = form.part("files", part);
        }
        let response = self
            .http
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(net_err)?;
        let body: UploadResponse = decode(response).await?;
        if !body.success {
            return Err(VerifierError::Backend(if body.message.is_empty() {
                "Upload failed".to_string()
            } else {
                body.message
            }));
        }
        Ok(UploadOutcome { message: body.message, files: body.files })
    }

    /// `POST /analyze`: runs the analysis over the server-held file set.
    ///
    /// A 200 response without a `phases` object still counts as a failed
    /// analysis.
    pub async fn analyze(&self) -> Result<AnalysisReport, VerifierError> {
        let response = self
            .http
            .post(self.url("/analyze"))
            .send()
            .await
            .map_err(net_err)?;
        let body: AnalyzeResponse = decode(response).await?;
        let phases = body
            .phases
            .ok_or_else(|| VerifierError::Backend("Analysis returned no results".to_string()))?;
        Ok(AnalysisReport {
            phases,
            files_analyzed: body.files_analyzed.unwrap_or_default(),
        })
    }

    /// `POST /chat`: sends the question as a form field and returns the reply
    /// text, preferring `response` over `message`, with a fixed placeholder
    /// when the backend answers under neither key.
    pub async fn chat(&self, message: &str) -> Result<String, VerifierError> {
        let response = self
            .http
            .post(self.url("/chat"))
            .form(&[("message", message)])
            .send()
            .await
            .map_err(net_err)?;
        let body: ChatResponse = decode(response).await?;
        let text = [body.response, body.message]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| "No response".to_string());
        Ok(text)
    }

    /// `POST /generate-pdf`: returns the rendered PDF bytes for the packaged
    /// report. The caller owns saving them to disk.
    pub async fn generate_pdf(&self, package: &ReportPackage) -> Result<Vec<u8>, VerifierError> {
        let body = ReportRequest {
            analysis_results: &package.report.phases,
            overall_score: &package.overall_score,
            files_analyzed: &package.files,
            timestamp: None,
        };
        let response = self
            .http
            .post(self.url("/generate-pdf"))
            .json(&body)
            .send()
            .await
            .map_err(net_err)?;
        let response = check_status(response)?;
        let bytes = response.bytes().await.map_err(net_err)?;
        Ok(bytes.to_vec())
    }

    /// `POST /send-to-reviewer`: hands the packaged report off, stamped with
    /// the current time.
    pub async fn send_to_reviewer(&self, package: &ReportPackage) -> Result<String, VerifierError> {
        let body = ReportRequest {
            analysis_results: &package.report.phases,
            overall_score: &package.overall_score,
            files_analyzed: &package.files,
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
        };
        let response = self
            .http
            .post(self.url("/send-to-reviewer"))
            .json(&body)
            .send()
            .await
            .map_err(net_err)?;
        ack(response, "Report sent to reviewer").await
    }

    /// `POST /review-feedback`: transmits composed reviewer feedback.
    pub async fn submit_review(&self, feedback: &ReviewFeedback) -> Result<String, VerifierError> {
        let response = self
            .http
            .post(self.url("/review-feedback"))
            .json(feedback)
            .send()
            .await
            .map_err(net_err)?;
        ack(response, "Feedback submitted").await
    }

    /// `POST /auth/sign-in`: exchanges a credential for a session.
    ///
    /// `reviewer` marks the pre-provisioned reviewer credential; the session
    /// gets the reviewer role tag even when the provider omits one.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        reviewer: bool,
    ) -> Result<AuthSession, VerifierError> {
        let response = self
            .http
            .post(self.url("/auth/sign-in"))
            .json(&CredentialsRequest { email, password })
            .send()
            .await
            .map_err(net_err)?;
        if !response.status().is_success() {
            return Err(auth_failure(response).await);
        }
        let body: SignInResponse = response
            .json()
            .await
            .map_err(|e| VerifierError::Backend(format!("bad sign-in response: {e}")))?;
        let role = body
            .role
            .or_else(|| reviewer.then(|| "reviewer".to_string()));
        Ok(AuthSession {
            user_id: body.user_id,
            role,
            signed_in_at: now_secs(),
        })
    }

    /// `POST /auth/register`: creates an account. Returns the confirmation
    /// message shown on the login screen.
    pub async fn register(&self, email: &str, password: &str) -> Result<String, VerifierError> {
        let response = self
            .http
            .post(self.url("/auth/register"))
            .json(&CredentialsRequest { email, password })
            .send()
            .await
            .map_err(net_err)?;
        if !response.status().is_success() {
            return Err(auth_failure(response).await);
        }
        Ok("Account created! You can sign in now.".to_string())
    }
}

/// Maps a transport failure to `Network`.
fn net_err(err: reqwest::Error) -> VerifierError {
    VerifierError::Network(err.to_string())
}

/// Rejects non-2xx responses as `Backend` errors.
fn check_status(response: reqwest::Response) -> Result<reqwest::Response, VerifierError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(VerifierError::Backend(format!(
            "server returned {}",
            response.status()
        )))
    }
}

/// Decodes a 2xx JSON body, mapping status and decode failures to `Backend`.
async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, VerifierError> {
    let response = check_status(response)?;
    response
        .json()
        .await
        .map_err(|e| VerifierError::Backend(format!("bad response body: {e}")))
}

/// Decodes a `{success, message}` acknowledgement into its message.
async fn ack(response: reqwest::Response, default_msg: &str) -> Result<String, VerifierError> {
    let body: AckResponse = decode(response).await?;
    if !body.success {
        return Err(VerifierError::Backend(
            body.message.unwrap_or_else(|| "Request failed".to_string()),
        ));
    }
    Ok(body.message.unwrap_or_else(|| default_msg.to_string()))
}

/// Decodes an auth error body into the mapped `AuthError`.
async fn auth_failure(response: reqwest::Response) -> VerifierError {
    let status = response.status();
    match response.json::<AuthFailure>().await {
        Ok(body) => VerifierError::Auth(AuthError::from_code(&body.code, &body.message)),
        Err(_) => VerifierError::Backend(format!("server returned {status}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_files() -> Vec<ProjectFile> {
        vec![ProjectFile {
            name: "requirements.txt".into(),
            content: b"shall respond in 2s".to_vec(),
            size: 19,
        }]
    }

    #[tokio::test]
    async fn upload_happy_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "1 file uploaded",
                "files": ["requirements.txt"],
            })))
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let outcome = client.upload(sample_files()).await.unwrap();
        assert_eq!(outcome.message, "1 file uploaded");
        assert_eq!(outcome.files, vec!["requirements.txt"]);
    }

    #[tokio::test]
    async fn upload_backend_rejection_maps_to_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "unsupported file type",
            })))
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let err = client.upload(sample_files()).await.unwrap_err();
        assert_eq!(err, VerifierError::Backend("unsupported file type".into()));
    }

    #[tokio::test]
    async fn analyze_decodes_phases_with_lenient_scores() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "phases": {
                    "requirements": {"score": 80, "strengths": ["clear"], "recommendations": []},
                    "design": {"score": "60", "strengths": [], "recommendations": ["add diagrams"]},
                    "testing": {"analysis": "No test artifacts were provided."},
                },
                "files_analyzed": ["requirements.txt"],
            })))
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let report = client.analyze().await.unwrap();
        assert_eq!(report.phases["requirements"].score, Some(80.0));
        assert_eq!(report.phases["design"].score, Some(60.0));
        assert_eq!(report.phases["testing"].score, None);
        assert_eq!(
            report.phases["testing"].analysis.as_deref(),
            Some("No test artifacts were provided.")
        );
        assert_eq!(report.files_analyzed, vec!["requirements.txt"]);
    }

    #[tokio::test]
    async fn analyze_without_phases_is_a_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "no files"})))
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let err = client.analyze().await.unwrap_err();
        assert!(matches!(err, VerifierError::Backend(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        // Port 1 is never listening.
        let client = BackendClient::new("http://127.0.0.1:1");
        let err = client.analyze().await.unwrap_err();
        assert!(matches!(err, VerifierError::Network(_)));
    }

    #[tokio::test]
    async fn chat_prefers_response_over_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "Your overall score is 70.0.",
                "message": "ignored",
            })))
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let reply = client.chat("what is my score?").await.unwrap();
        assert_eq!(reply, "Your overall score is 70.0.");
    }

    #[tokio::test]
    async fn chat_falls_back_to_message_then_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "from the message key",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let reply = client.chat("hello").await.unwrap();
        assert_eq!(reply, "from the message key");

        server.reset().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;
        let reply = client.chat("hello").await.unwrap();
        assert_eq!(reply, "No response");
    }

    #[tokio::test]
    async fn sign_in_maps_auth_error_codes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/sign-in"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": "auth/wrong-password",
                "message": "provider text",
            })))
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let err = client.sign_in("a@b.com", "nope", false).await.unwrap_err();
        assert_eq!(err.to_string(), "Incorrect password!");
    }

    #[tokio::test]
    async fn reviewer_sign_in_gets_role_tag() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/sign-in"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"user_id": "rev-1"})),
            )
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri());
        let session = client
            .sign_in(crate::session::REVIEWER_EMAIL, crate::session::REVIEWER_PASSWORD, true)
            .await
            .unwrap();
        assert!(session.is_reviewer());
    }

    #[tokio::test]
    async fn handoff_sends_camel_case_payload() {
        use std::collections::BTreeMap;
        use sdlcv_core::types::PhaseResult;
        use wiremock::matchers::body_partial_json;

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send-to-reviewer"))
            .and(body_partial_json(json!({"overallScore": "80.0"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "queued for review",
            })))
            .mount(&server)
            .await;

        let mut phases = BTreeMap::new();
        phases.insert(
            "requirements".to_string(),
            PhaseResult { score: Some(80.0), ..Default::default() },
        );
        let package = ReportPackage {
            report: AnalysisReport { phases, files_analyzed: vec![] },
            overall_score: "80.0".into(),
            files: vec!["requirements.txt".into()],
        };

        let client = BackendClient::new(server.uri());
        let msg = client.send_to_reviewer(&package).await.unwrap();
        assert_eq!(msg, "queued for review");
    }
}
