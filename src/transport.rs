use log::debug;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

use crate::error::{Error, Result};

/// Moves a serialized request to the API and hands back the raw body.
///
/// Implementations report connection problems and non-2xx responses as
/// transport errors; they never look inside the body.
pub trait Transport {
    fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        (**self).post(url, body)
    }
}

/// Blocking HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: HttpClient,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("blsapi-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("blsapi-rs")),
        );

        let http = HttpClient::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        let transport_err = |source| Error::Transport {
            url: url.to_string(),
            source,
        };

        let resp = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(transport_err)?;

        let status = resp.status();
        let bytes = resp.bytes().map_err(transport_err)?;
        debug!("HTTP {} from {} ({} bytes)", status, url, bytes.len());

        if !status.is_success() {
            return Err(Error::HttpStatus {
                status,
                url: url.to_string(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(bytes.to_vec())
    }
}
