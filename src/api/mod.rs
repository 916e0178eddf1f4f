mod endpoints;
mod push;

pub(crate) use endpoints::{
    ContactEndpoint, PushEndpoint, StatsEndpoint, TodoEndpoint, UserInfoService,
};
pub(crate) use push::Subscription;

use crate::storage::{clear_logged_in, is_logged_in, KeyValueStorage, LocalStorage};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use thiserror::Error;

pub(crate) const DEFAULT_ENDPOINT_PREFIX: &str = "connect";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    Network,
    Validation,
    Http,
    Parse,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub(crate) enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Network(String),

    /// Rejected by endpoint-side validation; `message` is meant for the user.
    #[error("{message}")]
    Validation { message: String },

    #[error("Request failed ({status}): {body}")]
    Http { status: u16, body: String },

    #[error("{0}")]
    Parse(String),
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Unauthorized => ApiErrorKind::Unauthorized,
            ApiError::Network(_) => ApiErrorKind::Network,
            ApiError::Validation { .. } => ApiErrorKind::Validation,
            ApiError::Http { .. } => ApiErrorKind::Http,
            ApiError::Parse(_) => ApiErrorKind::Parse,
        }
    }

    fn network(e: reqwest::Error) -> Self {
        ApiError::Network(e.to_string())
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        ApiError::Parse(e.to_string())
    }

    /// Classify a non-2xx endpoint response.
    ///
    /// Endpoint exceptions come back as JSON with a `type` naming the
    /// exception class and a user-facing `message`.
    pub(crate) fn from_response(status: u16, body: String) -> Self {
        if status == 401 {
            return ApiError::Unauthorized;
        }

        #[derive(Deserialize)]
        struct EndpointFailure {
            #[serde(rename = "type", default)]
            kind: String,
            #[serde(default)]
            message: Option<String>,
        }

        if let Ok(failure) = serde_json::from_str::<EndpointFailure>(&body) {
            let is_endpoint_exception = failure.kind.ends_with("EndpointException")
                || failure.kind.ends_with("EndpointValidationException");
            if is_endpoint_exception {
                if let Some(message) = failure.message {
                    return ApiError::Validation { message };
                }
            }
        }

        ApiError::Http { status, body }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        // Same origin unless the page says otherwise.
        let default_api_url = String::new();

        // Both `window.ENV.API_URL` and `window.ENV.api_url` are accepted.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    for name in ["API_URL", "api_url"] {
                        if let Ok(api_url) = js_sys::Reflect::get(&env, &name.into()) {
                            if let Some(url_str) = api_url.as_string() {
                                return Self { api_url: url_str };
                            }
                        }
                    }
                }
            }
        }

        Self {
            api_url: default_api_url,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a successful form login.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct LoginResult {
    pub default_url: Option<String>,
    pub redirect_url: Option<String>,
}

impl LoginResult {
    pub fn target(&self) -> String {
        self.redirect_url
            .clone()
            .or_else(|| self.default_url.clone())
            .unwrap_or_else(|| "/".to_string())
    }
}

thread_local! {
    static IN_FLIGHT: Cell<u32> = const { Cell::new(0) };
}

/// Shows the `wait` cursor while at least one endpoint call is running.
struct BusyCursor;

impl BusyCursor {
    fn start() -> Self {
        if IN_FLIGHT.with(|n| n.replace(n.get() + 1)) == 0 {
            set_body_cursor("wait");
        }
        BusyCursor
    }
}

impl Drop for BusyCursor {
    fn drop(&mut self) {
        if IN_FLIGHT.with(|n| {
            let left = n.get().saturating_sub(1);
            n.set(left);
            left
        }) == 0
        {
            set_body_cursor("default");
        }
    }
}

fn set_body_cursor(cursor: &str) {
    if let Some(body) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
    {
        let _ = body.style().set_property("cursor", cursor);
    }
}

/// Drops the session flag when the server rejects an authenticated session.
///
/// Returns `true` when the caller should send the user to `/login`. A 401
/// for a visitor who never logged in is left to the view.
pub(crate) fn end_rejected_session(storage: &dyn KeyValueStorage) -> bool {
    if is_logged_in(storage) {
        clear_logged_in(storage);
        true
    } else {
        false
    }
}

fn redirect_to_login() {
    if let Some(w) = web_sys::window() {
        let _ = w.location().set_href("/login");
    }
}

#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) prefix: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            prefix: DEFAULT_ENDPOINT_PREFIX.to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(EnvConfig::new().api_url)
    }

    /// Absolute URL for requests; an empty base means the page origin.
    fn absolute(&self, path: &str) -> String {
        if self.base_url.is_empty() {
            let origin = web_sys::window()
                .and_then(|w| w.location().origin().ok())
                .unwrap_or_default();
            format!("{origin}{path}")
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    pub(crate) fn endpoint_path(&self, endpoint: &str, method: &str) -> String {
        format!("/{}/{}/{}", self.prefix, endpoint, method)
    }

    pub(crate) fn push_path(&self, endpoint: &str, method: &str) -> String {
        format!("/{}/push/{}/{}", self.prefix, endpoint, method)
    }

    /// Invoke `endpoint.method` with named parameters.
    async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: &str,
        params: serde_json::Value,
    ) -> ApiResult<T> {
        let _busy = BusyCursor::start();
        let url = self.absolute(&self.endpoint_path(endpoint, method));

        let res = self
            .http
            .post(url)
            .json(&params)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(endpoint, method, error = %e, "endpoint unreachable");
                ApiError::network(e)
            })?;

        let status = res.status();
        let body = res.text().await.map_err(ApiError::network)?;

        if status.is_success() {
            parse_body(&body)
        } else {
            let err = ApiError::from_response(status.as_u16(), body);
            tracing::warn!(endpoint, method, status = status.as_u16(), error = %err, "endpoint call failed");
            if err.kind() == ApiErrorKind::Unauthorized && end_rejected_session(&LocalStorage) {
                redirect_to_login();
            }
            Err(err)
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResult> {
        let _busy = BusyCursor::start();
        let body = format!(
            "username={}&password={}",
            urlencoding::encode(username),
            urlencoding::encode(password)
        );

        let res = self
            .http
            .post(self.absolute("/login"))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(ApiError::network)?;

        let header = |name: &str| {
            res.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        };

        let failed = header("Result").as_deref() == Some("error");
        if res.status().is_success() && !failed {
            Ok(LoginResult {
                default_url: header("Default-url"),
                redirect_url: header("Saved-url"),
            })
        } else {
            Err(ApiError::Unauthorized)
        }
    }

    pub async fn logout(&self) -> ApiResult<()> {
        let _busy = BusyCursor::start();
        clear_logged_in(&LocalStorage);
        self.http
            .post(self.absolute("/logout"))
            .send()
            .await
            .map_err(ApiError::network)?;
        Ok(())
    }
}

/// Endpoint bodies: JSON, or nothing at all for `void`/`null` results.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(ApiError::parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Todo;
    use crate::storage::{set_logged_in, MemoryStorage};

    #[test]
    fn validation_error_is_recognized() {
        let body = r#"{"type":"dev.hilla.exception.EndpointException","message":"Assignee 3 already has a todo!","detail":null}"#;
        let err = ApiError::from_response(400, body.to_string());
        assert_eq!(
            err,
            ApiError::Validation {
                message: "Assignee 3 already has a todo!".to_string()
            }
        );
        assert_eq!(err.to_string(), "Assignee 3 already has a todo!");
    }

    #[test]
    fn bean_validation_error_is_recognized() {
        let body = r#"{"type":"dev.hilla.exception.EndpointValidationException","message":"Validation error in endpoint 'TodoEndpoint' method 'save'"}"#;
        let err = ApiError::from_response(400, body.to_string());
        assert_eq!(err.kind(), ApiErrorKind::Validation);
    }

    #[test]
    fn other_failures_stay_http() {
        let err = ApiError::from_response(500, "boom".to_string());
        assert_eq!(err.kind(), ApiErrorKind::Http);
        assert_eq!(err.to_string(), "Request failed (500): boom");

        let err = ApiError::from_response(
            400,
            r#"{"type":"java.lang.IllegalStateException","message":"x"}"#.to_string(),
        );
        assert_eq!(err.kind(), ApiErrorKind::Http);
    }

    #[test]
    fn unauthorized_wins_over_body() {
        let err = ApiError::from_response(401, r#"{"type":"x.EndpointException"}"#.to_string());
        assert_eq!(err, ApiError::Unauthorized);
    }

    #[test]
    fn empty_body_parses_as_none() {
        let parsed: Option<Todo> = parse_body("").expect("empty body is null");
        assert!(parsed.is_none());
        parse_body::<()>("null").expect("null is unit");
        assert_eq!(
            parse_body::<Vec<Todo>>("{").map_err(|e| e.kind()),
            Err(ApiErrorKind::Parse)
        );
    }

    #[test]
    fn rejected_session_only_for_logged_in_users() {
        let s = MemoryStorage::default();
        assert!(!end_rejected_session(&s));

        set_logged_in(&s);
        assert!(end_rejected_session(&s));
        assert!(!is_logged_in(&s));
        assert!(!end_rejected_session(&s));
    }

    #[test]
    fn endpoint_paths() {
        let client = ApiClient::new("http://localhost:8080/".to_string());
        assert_eq!(client.base_url, "http://localhost:8080");
        assert_eq!(
            client.endpoint_path("TodoEndpoint", "findAll"),
            "/connect/TodoEndpoint/findAll"
        );
        assert_eq!(
            client.push_path("EventEndpoint", "getEventsCancellable"),
            "/connect/push/EventEndpoint/getEventsCancellable"
        );
    }

    #[test]
    fn login_target_prefers_saved_url() {
        let r = LoginResult {
            default_url: Some("/".to_string()),
            redirect_url: Some("/stats".to_string()),
        };
        assert_eq!(r.target(), "/stats");
        assert_eq!(LoginResult::default().target(), "/");
    }
}
