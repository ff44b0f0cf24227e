//! HTTP transport layer for the relay.
//!
//! [`HttpTransport`] moves JSON documents over HTTP. [`JsonRestClient`]
//! sits on top of it and adds typed requests, resource resolution against
//! the API base URL, default headers and the no-authorization mode used for
//! the login call.

use crate::errors::{NetworkError, RelayError, RelayResult, ResponseError};
use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, Method};
use reqwest::{Client, ClientBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Header carrying the session user id
pub const USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");

/// Header carrying the session auth token
pub const AUTH_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-auth-token");

/// HTTP transport trait for making API requests
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a JSON request and receive the JSON response body.
    ///
    /// An empty body or a literal `null` yields [`Value::Null`].
    async fn send_json(&self, request: TransportRequest) -> RelayResult<Value>;
}

/// Transport request for JSON payloads
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Option<Value>,
}

impl TransportRequest {
    /// Create a new POST request
    pub fn post(url: impl Into<String>, headers: HeaderMap, body: Value) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers,
            body: Some(body),
        }
    }
}

/// Default HTTP transport implementation using reqwest
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a new transport bounding every request by `timeout`
    pub fn new(timeout: Duration) -> RelayResult<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayError::Network(NetworkError::Http(e.to_string())))?;

        Ok(Self { client, timeout })
    }

    /// Parse the response body as JSON, whatever the status.
    ///
    /// Rocket.Chat reports login and post failures in the body of 4xx
    /// responses, so the body wins over the status when it is JSON.
    async fn parse_response(&self, response: Response) -> RelayResult<Value> {
        let status = response.status();

        let body = response
            .bytes()
            .await
            .map_err(|e| RelayError::Network(NetworkError::from(e)))?;

        debug!(status = %status, body_len = body.len(), "Received response");

        parse_body(status.as_u16(), &body)
    }
}

/// Interpret a response body given its HTTP status
pub(crate) fn parse_body(status: u16, body: &Bytes) -> RelayResult<Value> {
    let success = (200..300).contains(&status);

    if body.iter().all(u8::is_ascii_whitespace) {
        if success {
            return Ok(Value::Null);
        }
        return Err(RelayError::Response(ResponseError::HttpStatus {
            status,
            body: String::new(),
        }));
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(json) => {
            if !success {
                warn!(status, "Request failed with non-success status");
            }
            Ok(json)
        }
        Err(_) if !success => Err(RelayError::Response(ResponseError::HttpStatus {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        })),
        Err(e) => Err(RelayError::Response(ResponseError::from(e))),
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send_json(&self, request: TransportRequest) -> RelayResult<Value> {
        let mut req_builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);

        if let Some(body) = &request.body {
            req_builder = req_builder.json(body);
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| RelayError::Network(NetworkError::from(e)))?;

        self.parse_response(response).await
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Typed JSON client for resources under one REST API base URL
#[derive(Clone)]
pub struct JsonRestClient {
    transport: Arc<dyn HttpTransport>,
    base_url: Url,
    default_headers: HeaderMap,
    do_not_authorize: bool,
}

impl JsonRestClient {
    /// Create a client for the given base URL
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: Url) -> Self {
        Self {
            transport,
            base_url,
            default_headers: HeaderMap::new(),
            do_not_authorize: false,
        }
    }

    /// Headers added to every request
    pub fn with_default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    /// Suppress any ambient authorization carried by the default headers.
    ///
    /// Headers passed explicitly to [`post`](Self::post) are still sent.
    pub fn without_authorization(mut self) -> Self {
        self.do_not_authorize = true;
        self
    }

    /// Absolute URI of a resource under the base URL
    pub fn uri_for_resource(&self, resource: &str) -> String {
        let base = self.base_url.as_str();
        let resource = resource.trim_start_matches('/');
        if base.ends_with('/') {
            format!("{}{}", base, resource)
        } else {
            format!("{}/{}", base, resource)
        }
    }

    fn build_headers(&self, extra: Option<HeaderMap>) -> HeaderMap {
        let mut headers = self.default_headers.clone();

        if self.do_not_authorize {
            for name in [AUTHORIZATION, USER_ID_HEADER, AUTH_TOKEN_HEADER] {
                headers.remove(name);
            }
        }

        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static("application/json; charset=utf-8"),
            );
        }

        if let Some(extra) = extra {
            for (name, value) in extra.iter() {
                headers.insert(name.clone(), value.clone());
            }
        }

        headers
    }

    /// POST `body` to `resource` and deserialize the answer.
    ///
    /// Returns `None` when the server answered with an empty body or `null`.
    pub async fn post<Res, Req>(
        &self,
        resource: &str,
        body: &Req,
        extra_headers: Option<HeaderMap>,
    ) -> RelayResult<Option<Res>>
    where
        Res: DeserializeOwned,
        Req: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body).map_err(|e| {
            RelayError::Response(ResponseError::UnexpectedResponse {
                message: format!("Failed to serialize request body: {}", e),
            })
        })?;

        let request = TransportRequest::post(
            self.uri_for_resource(resource),
            self.build_headers(extra_headers),
            body,
        );

        let json = self.transport.send_json(request).await?;

        serde_json::from_value::<Option<Res>>(json)
            .map_err(|e| RelayError::Response(ResponseError::from(e)))
    }
}

impl std::fmt::Debug for JsonRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRestClient")
            .field("base_url", &self.base_url.as_str())
            .field("do_not_authorize", &self.do_not_authorize)
            .finish()
    }
}
