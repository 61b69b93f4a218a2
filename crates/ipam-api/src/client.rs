// HTTP client core
//
// Wraps `reqwest::Client` with base-URL joining, bearer auth pulled from a
// `TokenSource`, a hard deadline per exchange, and envelope decoding.
// Resource clients hold a clone of `HttpClient` and never touch reqwest.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::{Url, form_urlencoded};

use crate::auth::TokenSource;
use crate::envelope::{self, ApiResponse};
use crate::error::Error;
use crate::query::Query;
use crate::transport::TransportConfig;

/// Percent-encode one path segment (an id), so `/`, `?` and `#` inside it
/// stay part of the segment.
pub(crate) fn segment(raw: &str) -> String {
    // Form encoding writes spaces as `+`; a literal `+` is already `%2B`.
    form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

// ── Request description ──────────────────────────────────────────────

/// One call against the API: method, path relative to the base URL,
/// optional query, optional JSON body and extra headers.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Query,
    body: Option<serde_json::Value>,
    headers: HeaderMap,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Query::default(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, Error> {
        self.body = Some(serde_json::to_value(body).map_err(Error::Encode)?);
        Ok(self)
    }

    /// Add a header; it overrides the client default of the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Shared request executor for every resource client.
///
/// Cheaply cloneable (`Arc` inside). Each call reads the current bearer
/// token from the [`TokenSource`], races the exchange against the deadline,
/// and turns the response into exactly one `Result`.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    /// Base URL without a trailing slash; paths are appended verbatim.
    base_url: String,
    timeout: Duration,
    tokens: Arc<dyn TokenSource>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Build a client from a base URL (e.g. `https://ipam.example.net/api`)
    /// and transport settings.
    pub fn new(
        base_url: &str,
        transport: &TransportConfig,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url, transport.timeout, tokens)
    }

    /// Wrap a pre-built `reqwest::Client`.
    ///
    /// The caller's client should send `Content-Type: application/json`
    /// by default; [`TransportConfig::build_client`] does.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        timeout: Duration,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self, Error> {
        let parsed = Url::parse(base_url)?;
        let base_url = parsed.as_str().trim_end_matches('/').to_owned();
        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url,
                timeout,
                tokens,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// `{base}{path}?{query}`. Plain concatenation keeps any path prefix
    /// on the base URL (`/api`) intact.
    fn url(&self, path: &str, query: &Query) -> Result<Url, Error> {
        let sep = if path.starts_with('/') { "" } else { "/" };
        let mut url = Url::parse(&format!("{}{sep}{path}", self.inner.base_url))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.pairs().iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    // ── Execution ────────────────────────────────────────────────────

    /// Send a request and decode the envelope.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<ApiResponse<T>, Error> {
        let ApiRequest {
            method,
            path,
            query,
            body,
            headers,
        } = request;

        let url = self.url(&path, &query)?;
        let token = self.inner.tokens.bearer_token();
        let authenticated = token.is_some();

        let mut builder = self.inner.http.request(method.clone(), url.clone());
        if let Some(ref token) = token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }
        builder = builder.headers(headers);

        debug!(%method, %url, authenticated, "sending request");

        // Dropping this future on timeout aborts the connection.
        let exchange = async move {
            let resp = builder.send().await?;
            let status = resp.status();
            let text = resp.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };

        let (status, text) = match tokio::time::timeout(self.inner.timeout, exchange).await {
            Ok(Ok(pair)) => pair,
            Ok(Err(e)) => {
                let err = self.classify(e, &url);
                debug!(%method, %url, error = %err, "request failed");
                return Err(err);
            }
            Err(_) => {
                warn!(%method, %url, timeout = ?self.inner.timeout, "request timed out, aborted");
                return Err(Error::Timeout {
                    timeout: self.inner.timeout,
                });
            }
        };

        if !status.is_success() {
            let message = envelope::error_message(status, &text);
            debug!(%method, %url, %status, %message, "request rejected");
            if status == StatusCode::UNAUTHORIZED {
                if let Some(ref token) = token {
                    self.inner.tokens.reject(token);
                }
                return Err(Error::Unauthorized { message });
            }
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        envelope::decode(status, &text).inspect_err(|err| {
            debug!(%method, %url, error = %err, "response envelope carried a failure");
        })
    }

    fn classify(&self, err: reqwest::Error, url: &Url) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout: self.inner.timeout,
            }
        } else if err.is_connect() {
            Error::Unreachable {
                url: url.to_string(),
                source: err,
            }
        } else {
            Error::Transport(err)
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<T>, Error> {
        self.execute(ApiRequest::get(path)).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query,
    ) -> Result<ApiResponse<T>, Error> {
        self.execute(ApiRequest::get(path).query(query)).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, Error> {
        self.execute(ApiRequest::post(path).json(body)?).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<T>, Error> {
        self.execute(ApiRequest::post(path)).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, Error> {
        self.execute(ApiRequest::put(path).json(body)?).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<T>, Error> {
        self.execute(ApiRequest::delete(path)).await
    }
}
