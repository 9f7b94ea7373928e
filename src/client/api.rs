//! Resource-level client built on top of [`RequestSender`].
//!
//! Resource-specific clients (iTwins, repositories, exports, images) embed an
//! [`ApiClient`] and describe their endpoints as paths relative to the
//! configured base URL. All redirect and error handling stays in the sender.
//!
//! # Examples
//!
//! ```ignore
//! use itwins_client::{ApiClient, ClientConfig};
//! use serde_json::Value;
//!
//! let client = ApiClient::with_config(ClientConfig::default())?;
//! let favorites = client
//!     .get_with_query::<Value>(&token, "favorites", &[("subClass", "Project")])
//!     .await?;
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::config::ClientConfig;
use crate::client::fetch::RequestSender;
use crate::client::transport::{ReqwestTransport, Transport};
use crate::client::utils::join_url;
use crate::error::Result;
use crate::types::{ApiRequest, RequestBody, ResponseEnvelope};

/// Verb helpers over a shared [`RequestSender`].
///
/// Requests built by the verb helpers refuse redirects unless the client was
/// created with [`ApiClient::allow_redirects`].
pub struct ApiClient<T = ReqwestTransport> {
    sender: RequestSender<T>,
    allow_redirects: bool,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        ApiClient {
            sender: self.sender.clone(),
            allow_redirects: self.allow_redirects,
        }
    }
}

impl ApiClient<ReqwestTransport> {
    /// Client with default configuration over `reqwest`.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Client with custom configuration over `reqwest`.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_sender(RequestSender::with_config(config)?))
    }
}

impl<T: Transport> ApiClient<T> {
    /// Wrap an existing sender, sharing its transport and configuration.
    pub fn from_sender(sender: RequestSender<T>) -> Self {
        ApiClient {
            sender,
            allow_redirects: false,
        }
    }

    /// Let the verb helpers follow validated redirects.
    #[must_use]
    pub fn allow_redirects(mut self, allow: bool) -> Self {
        self.allow_redirects = allow;
        self
    }

    /// The underlying sender.
    pub fn sender(&self) -> &RequestSender<T> {
        &self.sender
    }

    /// Absolute URL for a path under the base URL.
    pub fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        join_url(&self.sender.config().base_url, path, query)
    }

    /// Send a fully described request as-is, including its own redirect opt-in.
    pub async fn send<R: DeserializeOwned>(
        &self,
        credential: &str,
        request: ApiRequest,
    ) -> Result<ResponseEnvelope<R>> {
        self.sender.send(credential, request).await
    }

    /// `GET` a path under the base URL.
    pub async fn get<R: DeserializeOwned>(
        &self,
        credential: &str,
        path: &str,
    ) -> Result<ResponseEnvelope<R>> {
        self.get_with_query(credential, path, &[]).await
    }

    /// `GET` with query parameters, percent-encoded.
    pub async fn get_with_query<R: DeserializeOwned>(
        &self,
        credential: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<ResponseEnvelope<R>> {
        let url = self.url(path, query)?;
        self.dispatch(credential, ApiRequest::get(url)).await
    }

    /// `POST` a JSON body.
    pub async fn post<R: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        credential: &str,
        path: &str,
        body: &B,
    ) -> Result<ResponseEnvelope<R>> {
        let request = ApiRequest::post(self.url(path, &[])?).with_body(RequestBody::json(body)?);
        self.dispatch(credential, request).await
    }

    /// `PATCH` a JSON body.
    pub async fn patch<R: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        credential: &str,
        path: &str,
        body: &B,
    ) -> Result<ResponseEnvelope<R>> {
        let request = ApiRequest::patch(self.url(path, &[])?).with_body(RequestBody::json(body)?);
        self.dispatch(credential, request).await
    }

    /// Upload an opaque payload (e.g. an image) without JSON encoding.
    pub async fn put_binary<R: DeserializeOwned>(
        &self,
        credential: &str,
        path: &str,
        data: impl Into<bytes::Bytes>,
        content_type: &str,
    ) -> Result<ResponseEnvelope<R>> {
        let request = ApiRequest::put(self.url(path, &[])?)
            .with_body(RequestBody::binary(data, Some(content_type)));
        self.dispatch(credential, request).await
    }

    /// `DELETE` a path under the base URL.
    pub async fn delete<R: DeserializeOwned>(
        &self,
        credential: &str,
        path: &str,
    ) -> Result<ResponseEnvelope<R>> {
        let url = self.url(path, &[])?;
        self.dispatch(credential, ApiRequest::delete(url)).await
    }

    async fn dispatch<R: DeserializeOwned>(
        &self,
        credential: &str,
        request: ApiRequest,
    ) -> Result<ResponseEnvelope<R>> {
        let request = request.allow_redirects(self.allow_redirects);
        self.sender.send(credential, request).await
    }
}
