//! HTTP transport used to reach the MGM

use crate::error::Result;
use async_trait::async_trait;
use eosconfig::HttpOptions;
use std::sync::Arc;
use tracing::debug;

/// Raw HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Performs HTTP GET requests
///
/// Implementations report network and I/O failures as
/// [`EosClientError::Transport`](crate::EosClientError::Transport) and return
/// every received response, whatever its status.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        (**self).get(url).await
    }
}

/// [`Transport`] backed by a pooled `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(options: &HttpOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout.0)
            .connect_timeout(options.connect_timeout.0)
            .pool_max_idle_per_host(options.pool_max_idle.0 as usize)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("HTTP Response: {} ({} bytes)", status, body.len());
        Ok(HttpResponse { status, body })
    }
}
