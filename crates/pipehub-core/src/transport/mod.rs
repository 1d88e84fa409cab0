//! Backend REST surface and the transport seam used by the controller.
//!
//! The controller never talks to reqwest directly. It builds an
//! [`ApiRequest`] for one of the five [`Endpoint`]s and gets back the raw
//! status, `Location` header and body text. Interpreting the response is
//! left to the caller.

use std::fmt;
use std::future::Future;

use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE, LOCATION};
use reqwest::{Client, Method};

use crate::config::ClientConfig;
use crate::error::Result;

/// Operations exposed by the settings backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    FetchProfile,
    SaveProfile,
    RotateKey,
    FetchChannel,
    SaveChannel,
}

impl Endpoint {
    pub fn method(self) -> Method {
        match self {
            Self::FetchProfile | Self::FetchChannel => Method::GET,
            Self::SaveProfile | Self::SaveChannel => Method::PUT,
            Self::RotateKey => Method::POST,
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            Self::FetchProfile | Self::SaveProfile => "/user",
            Self::RotateKey => "/user/reset_key",
            Self::FetchChannel | Self::SaveChannel => "/wechat",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {}", self.method(), self.path())
    }
}

/// A request to one endpoint, with an optional JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub body: Option<String>,
}

impl ApiRequest {
    pub const fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            body: None,
        }
    }

    pub const fn with_json(endpoint: Endpoint, body: String) -> Self {
        Self {
            endpoint,
            body: Some(body),
        }
    }
}

/// What the controller needs from an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub location: Option<String>,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            location: None,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Anything below 400 counts as success, redirects included.
    pub const fn is_success(&self) -> bool {
        self.status < 400
    }

    pub const fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// Sends settings requests on behalf of the controller.
///
/// Implementations attach session credentials themselves; the controller
/// never sees them.
pub trait SettingsTransport: Send + Sync {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse>> + Send;
}

/// reqwest-backed transport for a live backend.
#[derive(Clone)]
pub struct HttpTransport {
    base_url: String,
    session_cookie: Option<String>,
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            base_url: config.backend_url().to_string(),
            session_cookie: config.session_cookie().map(str::to_string),
            client: Client::builder().build()?,
        })
    }

    /// Returns the base URL this transport was configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

impl SettingsTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let ApiRequest { endpoint, body } = request;
        let mut builder = self
            .client
            .request(endpoint.method(), self.url_for(endpoint))
            .header(ACCEPT, "application/json");
        if let Some(cookie) = &self.session_cookie {
            builder = builder.header(COOKIE, cookie);
        }
        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;
        tracing::debug!(%endpoint, status, "settings request completed");

        Ok(ApiResponse {
            status,
            location,
            body,
        })
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field(
                "session_cookie",
                &self.session_cookie.as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_map_to_backend_routes() {
        assert_eq!(Endpoint::FetchProfile.to_string(), "GET /user");
        assert_eq!(Endpoint::SaveProfile.to_string(), "PUT /user");
        assert_eq!(Endpoint::RotateKey.to_string(), "POST /user/reset_key");
        assert_eq!(Endpoint::FetchChannel.to_string(), "GET /wechat");
        assert_eq!(Endpoint::SaveChannel.to_string(), "PUT /wechat");
    }

    #[test]
    fn success_class_is_below_400() {
        assert!(ApiResponse::new(200, "").is_success());
        assert!(ApiResponse::new(302, "").is_success());
        assert!(!ApiResponse::new(400, "").is_success());
        assert!(!ApiResponse::new(500, "").is_success());
        assert!(ApiResponse::new(401, "").is_unauthorized());
    }

    #[test]
    fn url_for_joins_base_and_path() {
        let config = ClientConfig::new("http://localhost:8080/").unwrap();
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(
            transport.url_for(Endpoint::RotateKey),
            "http://localhost:8080/user/reset_key"
        );
    }

    #[test]
    fn debug_redacts_cookie() {
        let config = ClientConfig::new("http://localhost:8080")
            .unwrap()
            .with_session_cookie(Some("id=secret".to_string()));
        let transport = HttpTransport::new(&config).unwrap();
        assert!(!format!("{transport:?}").contains("secret"));
    }
}
