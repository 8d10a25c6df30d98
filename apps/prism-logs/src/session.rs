//! # Prism Central Session
//!
//! Wrapper around the Prism Central v3 REST API.
//!
//! Holds the connection identity, sends Basic-authenticated requests and
//! sorts failures into connectivity errors (no answer) and rejections (an
//! answer we did not want). Nothing is retried.

use prism_logs_core::PrismError;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

/// Default Prism Central HTTPS port.
pub const DEFAULT_PORT: u16 = 9440;

/// Path of the v3 API below the host.
pub const API_PREFIX: &str = "/api/nutanix/v3/";

/// Identity probe used by [`Session::authenticate`].
pub const CURRENT_USER_PATH: &str = "users/me";

// =============================================================================
// CONNECTION
// =============================================================================

/// Who to talk to and as whom.
#[derive(Clone)]
pub struct Connection {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Verify the server certificate. Off by default: Prism Central ships
    /// with a self-signed certificate.
    pub verify_tls: bool,
}

impl Connection {
    /// `https://<host>:<port>/api/nutanix/v3/`
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("https://{}:{}{}", self.host, self.port, API_PREFIX)
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Authenticated HTTP session against one Prism Central.
///
/// Single owner for the duration of a retrieval; requests are awaited one
/// at a time.
#[derive(Debug)]
pub struct Session {
    http: reqwest::Client,
    base_url: String,
    connection: Connection,
}

impl Session {
    /// Build a session for `connection`, using its HTTPS base URL.
    pub fn new(connection: Connection) -> Result<Self, PrismError> {
        let base_url = connection.base_url();
        Self::with_base_url(connection, base_url)
    }

    /// Build a session against an explicit base URL (ending in `/`).
    pub fn with_base_url(
        connection: Connection,
        base_url: impl Into<String>,
    ) -> Result<Self, PrismError> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(!connection.verify_tls)
            .build()
            .map_err(|e| PrismError::Config(format!("Cannot build HTTP client: {e}")))?;

        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            http,
            base_url,
            connection,
        })
    }

    /// Base URL every path is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Build a request with Basic auth.
    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.connection.username, Some(&self.connection.password))
    }

    /// Send a request and map transport failures.
    async fn send(
        &self,
        url: &str,
        req: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, PrismError> {
        req.send().await.map_err(|e| PrismError::Connectivity {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// Check status codes and parse the JSON body.
    async fn handle_response(url: &str, resp: reqwest::Response) -> Result<Value, PrismError> {
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(PrismError::Rejected {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
            return Err(PrismError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        resp.json::<Value>()
            .await
            .map_err(|e| PrismError::MalformedResponse(format!("{url}: {e}")))
    }

    /// GET users/me → `true` iff the server answers 200.
    ///
    /// Any other status is a failed login, not an error. Only an unreachable
    /// server is reported as `Err`.
    pub async fn authenticate(&self) -> Result<bool, PrismError> {
        let url = self.url(CURRENT_USER_PATH);
        let resp = self
            .send(&url, self.request(reqwest::Method::GET, &url))
            .await?;
        let status = resp.status();

        if status == StatusCode::OK {
            tracing::debug!(event = "auth_probe", status = status.as_u16(), "Credentials accepted");
            Ok(true)
        } else {
            tracing::warn!(
                event = "auth_probe",
                status = status.as_u16(),
                user = %self.connection.username,
                "Credentials rejected"
            );
            Ok(false)
        }
    }

    /// POST a JSON payload to `path` (relative to the API base).
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Value, PrismError> {
        let url = self.url(path);
        let req = self.request(reqwest::Method::POST, &url).json(payload);
        let resp = self.send(&url, req).await?;
        Self::handle_response(&url, resp).await
    }
}
