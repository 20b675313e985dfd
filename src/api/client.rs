//! HTTP client for the MiniJira REST backend.
//!
//! Every request flows through one pipeline: the bearer token is attached
//! from persisted session storage on the way out, and the backend's
//! response envelope is normalized on the way in. Failures are pushed to
//! the notifier once and then returned to the caller.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::models::{AuthResponse, DashboardStats, Issue, IssuePriority, IssueUpdate, Project};
use crate::session::SharedSession;

use super::error::{ApiError, DEFAULT_APPLICATION_MESSAGE};
use super::notify::Notifier;

/// HTTP request timeout in seconds.
/// The backend answers quickly when healthy; a hanging request fails fast
/// so the status line shows an error instead of a frozen screen.
const REQUEST_TIMEOUT_SECS: u64 = 5;

/// Called when the server rejects the session.
/// The client never signs out or navigates by itself; whoever constructs
/// it decides what a rejected session means.
pub type AuthFailureHook = Arc<dyn Fn() + Send + Sync>;

/// Client for the MiniJira backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SharedSession,
    notifier: Arc<dyn Notifier>,
    on_auth_failure: Option<AuthFailureHook>,
}

impl ApiClient {
    /// Create a new API client against the given base URL
    pub fn new(
        base_url: impl Into<String>,
        session: SharedSession,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            session,
            notifier,
            on_auth_failure: None,
        })
    }

    /// Install a callback fired when the server rejects the session
    /// (HTTP 401 or an authentication business code)
    pub fn on_auth_failure(mut self, hook: AuthFailureHook) -> Self {
        self.on_auth_failure = Some(hook);
        self
    }

    /// Read the token from persisted storage.
    /// Going through storage rather than a captured copy means a token
    /// written or cleared elsewhere is picked up on the very next request.
    fn bearer_token(&self) -> Result<Option<String>, ApiError> {
        let session = self
            .session
            .lock()
            .map_err(|_| ApiError::Storage("session lock poisoned".to_string()))?;
        session
            .persisted_token()
            .map_err(|err| ApiError::Storage(err.to_string()))
    }

    /// Run one request through the full pipeline.
    /// Any failure is reported to the notifier exactly once before being
    /// returned; the auth-failure hook fires when the session was rejected.
    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let result = self.dispatch(method, path, body).await;
        if let Err(ref err) = result {
            self.notifier.notify_error(&err.notification_message());
            if err.is_auth_failure() {
                if let Some(ref hook) = self.on_auth_failure {
                    hook();
                }
            }
        }
        result
    }

    async fn dispatch<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        // Outbound: a storage failure rejects the call before anything is sent
        let token = self.bearer_token()?;

        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method.clone(), &url);
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            debug!(%status, %method, url = %url, "Request failed");
            return Err(ApiError::from_status(status, &text));
        }

        debug!(%method, url = %url, "Request succeeded");
        unwrap_envelope(&text)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, Value>(Method::GET, path, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, Some(body)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::PUT, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request::<(), Value>(Method::DELETE, path, None).await
    }

    // ===== Auth =====

    /// Sign in. The returned token is NOT stored here; the caller owns
    /// writing it into the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.post("/auth/login", &body).await
    }

    /// Create an account. The backend signs nobody in on registration.
    pub async fn register(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.post("/auth/register", &body).await
    }

    // ===== Projects =====

    pub async fn fetch_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get("/projects").await
    }

    pub async fn fetch_project(&self, project_id: i64) -> Result<Project, ApiError> {
        self.get(&format!("/projects/{}", project_id)).await
    }

    pub async fn create_project(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Project, ApiError> {
        let body = serde_json::json!({ "name": name, "description": description });
        self.post("/projects", &body).await
    }

    pub async fn update_project(
        &self,
        project_id: i64,
        name: &str,
        description: &str,
    ) -> Result<Project, ApiError> {
        let body = serde_json::json!({ "name": name, "description": description });
        self.put(&format!("/projects/{}", project_id), &body).await
    }

    // ===== Issues =====

    pub async fn fetch_issues(&self, project_id: i64) -> Result<Vec<Issue>, ApiError> {
        self.get(&format!("/projects/{}/issues", project_id)).await
    }

    pub async fn create_issue(
        &self,
        project_id: i64,
        title: &str,
        description: &str,
        priority: IssuePriority,
    ) -> Result<Issue, ApiError> {
        let body = serde_json::json!({
            "title": title,
            "description": description,
            "priority": priority,
        });
        self.post(&format!("/projects/{}/issues", project_id), &body)
            .await
    }

    pub async fn update_issue(
        &self,
        issue_id: i64,
        update: &IssueUpdate,
    ) -> Result<Issue, ApiError> {
        self.put(&format!("/issues/{}", issue_id), update).await
    }

    pub async fn delete_issue(&self, issue_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/issues/{}", issue_id)).await
    }

    // ===== Dashboard =====

    pub async fn fetch_dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get("/dashboard/stats").await
    }
}

/// Normalize a successful response body.
///
/// Bodies shaped as `{code, message, data}` are the backend's envelope:
/// code 0 yields `data` as the caller's type, any other code is an
/// application failure carrying the envelope message. A body without a
/// `code` field deserializes directly as the caller's type, so callers
/// never see the envelope either way.
fn unwrap_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let value: Value = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body)
            .map_err(|err| ApiError::InvalidResponse(format!("Malformed body: {}", err)))?
    };

    match value.get("code").and_then(Value::as_i64) {
        None => serde_json::from_value(value)
            .map_err(|err| ApiError::InvalidResponse(format!("Unexpected body shape: {}", err))),
        Some(0) => {
            let data = value.get("data").cloned().unwrap_or(Value::Null);
            serde_json::from_value(data).map_err(|err| {
                ApiError::InvalidResponse(format!("Unexpected payload shape: {}", err))
            })
        }
        Some(code) => {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_APPLICATION_MESSAGE)
                .to_string();
            Err(ApiError::Application { code, message })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionStore, Storage};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // ==== Envelope normalization ====

    #[test]
    fn test_envelope_code_zero_unwraps_data() {
        let body = r#"{"code":0,"message":"ok","data":{"id":7,"name":"Apollo","description":null}}"#;
        let project: Project = unwrap_envelope(body).unwrap();
        assert_eq!(project.id, 7);
        assert_eq!(project.name, "Apollo");
    }

    #[test]
    fn test_envelope_absent_code_passes_body_through() {
        let body = r#"{"id":7,"name":"Apollo","description":"moon"}"#;
        let project: Project = unwrap_envelope(body).unwrap();
        assert_eq!(project.id, 7);
        assert_eq!(project.description.as_deref(), Some("moon"));
    }

    #[test]
    fn test_envelope_array_body_passes_through() {
        let body = r#"[{"id":1,"name":"A","description":null},{"id":2,"name":"B","description":null}]"#;
        let projects: Vec<Project> = unwrap_envelope(body).unwrap();
        assert_eq!(projects.len(), 2);
    }

    #[test]
    fn test_envelope_nonzero_code_fails_with_message() {
        let body = r#"{"code":1000,"message":"Project name is required","data":null}"#;
        let result: Result<Project, ApiError> = unwrap_envelope(body);
        match result {
            Err(ApiError::Application { code, message }) => {
                assert_eq!(code, 1000);
                assert_eq!(message, "Project name is required");
            }
            other => panic!("expected application error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_envelope_missing_message_defaults() {
        let body = r#"{"code":5000,"data":null}"#;
        let result: Result<Project, ApiError> = unwrap_envelope(body);
        match result {
            Err(err @ ApiError::Application { .. }) => {
                assert_eq!(err.notification_message(), "Error");
            }
            other => panic!("expected application error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_envelope_unit_results() {
        // Registration and deletion return no payload
        let body = r#"{"code":0,"message":"ok","data":null}"#;
        unwrap_envelope::<()>(body).unwrap();
        unwrap_envelope::<()>("").unwrap();
    }

    // ==== Pipeline over a canned HTTP server ====

    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                messages: Mutex::new(Vec::new()),
            })
        }

        fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify_error(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    static DIR_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn test_session() -> SharedSession {
        let seq = DIR_SEQ.fetch_add(1, Ordering::SeqCst);
        let dir: PathBuf = std::env::temp_dir().join(format!(
            "minijira-client-test-{}-{}",
            std::process::id(),
            seq
        ));
        let store = SessionStore::load(Storage::new(dir)).unwrap();
        Arc::new(Mutex::new(store))
    }

    /// Serve exactly one canned response, returning the base URL and a
    /// receiver that yields the raw request text.
    async fn canned_server(
        status_line: &'static str,
        response_body: &'static str,
    ) -> (String, tokio::sync::oneshot::Receiver<String>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let response = format!(
                "{}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                response_body.len(),
                response_body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = tx.send(request);
        });

        (format!("http://{}", addr), rx)
    }

    #[tokio::test]
    async fn test_bearer_header_attached_from_persisted_token() {
        let (base_url, request_rx) = canned_server("HTTP/1.1 200 OK", "[]").await;
        let session = test_session();
        session.lock().unwrap().set_token("jwt-abc").unwrap();

        let notifier = RecordingNotifier::new();
        let client = ApiClient::new(base_url, session, notifier.clone()).unwrap();

        client.fetch_projects().await.unwrap();

        let request = request_rx.await.unwrap();
        assert!(
            request.contains("authorization: Bearer jwt-abc")
                || request.contains("Authorization: Bearer jwt-abc"),
            "missing bearer header in request: {}",
            request
        );
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_no_auth_header_when_signed_out() {
        let (base_url, request_rx) = canned_server("HTTP/1.1 200 OK", "[]").await;
        let session = test_session();

        let notifier = RecordingNotifier::new();
        let client = ApiClient::new(base_url, session, notifier).unwrap();

        client.fetch_projects().await.unwrap();

        let request = request_rx.await.unwrap();
        assert!(
            !request.to_lowercase().contains("authorization:"),
            "unexpected auth header in request: {}",
            request
        );
    }

    #[tokio::test]
    async fn test_application_error_notifies_exactly_once() {
        let (base_url, _request_rx) = canned_server(
            "HTTP/1.1 200 OK",
            r#"{"code":3000,"message":"Project not found","data":null}"#,
        )
        .await;
        let session = test_session();

        let notifier = RecordingNotifier::new();
        let client = ApiClient::new(base_url, session, notifier.clone()).unwrap();

        let result = client.fetch_projects().await;
        assert!(matches!(
            result,
            Err(ApiError::Application { code: 3000, .. })
        ));
        assert_eq!(notifier.messages(), vec!["Project not found".to_string()]);
    }

    #[tokio::test]
    async fn test_auth_failure_hook_fires_on_401() {
        let (base_url, _request_rx) =
            canned_server("HTTP/1.1 401 Unauthorized", r#"{"error":"expired"}"#).await;
        let session = test_session();

        let fired = Arc::new(AtomicUsize::new(0));
        let fired_in_hook = fired.clone();
        let notifier = RecordingNotifier::new();
        let client = ApiClient::new(base_url, session, notifier.clone())
            .unwrap()
            .on_auth_failure(Arc::new(move || {
                fired_in_hook.fetch_add(1, Ordering::SeqCst);
            }));

        let result = client.fetch_projects().await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_auth_failure_hook_fires_on_auth_code_band() {
        let (base_url, _request_rx) = canned_server(
            "HTTP/1.1 200 OK",
            r#"{"code":2001,"message":"Invalid email or password","data":null}"#,
        )
        .await;
        let session = test_session();

        let fired = Arc::new(AtomicUsize::new(0));
        let fired_in_hook = fired.clone();
        let notifier = RecordingNotifier::new();
        let client = ApiClient::new(base_url, session, notifier)
            .unwrap()
            .on_auth_failure(Arc::new(move || {
                fired_in_hook.fetch_add(1, Ordering::SeqCst);
            }));

        let result = client.login("a@b.c", "pw").await;
        assert!(matches!(
            result,
            Err(ApiError::Application { code: 2001, .. })
        ));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transport_error_notifies_exactly_once() {
        // Nothing is listening on this port
        let session = test_session();
        let notifier = RecordingNotifier::new();
        let client =
            ApiClient::new("http://127.0.0.1:1", session, notifier.clone()).unwrap();

        let result = client.fetch_projects().await;
        assert!(matches!(result, Err(ApiError::Network(_))));
        assert_eq!(notifier.messages().len(), 1);
    }
}
