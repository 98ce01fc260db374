use log::{debug, info};
use std::time::Duration;

use crate::config::{DEFAULT_TIMEOUT, DEFAULT_URL, load_config};
use crate::decode::decode;
use crate::error::Result;
use crate::model::ResultEnvelope;
use crate::request::{FlagEncoding, RequestPayload};
use crate::transport::{HttpTransport, Transport};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Endpoint URL, typically `https://api.bls.gov/publicAPI/v2/timeseries/data`.
    pub url: String,
    /// Registration key, sent with requests that do not carry their own.
    pub key: Option<String>,
    /// HTTP timeout for the whole call.
    pub timeout: Duration,
    /// How optional request flags are written.
    pub flag_encoding: FlagEncoding,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            key: None,
            timeout: DEFAULT_TIMEOUT,
            flag_encoding: FlagEncoding::default(),
        }
    }
}

/// Sends one request per call and decodes the reply.
#[derive(Debug, Clone)]
pub struct Client<T = HttpTransport> {
    url: String,
    key: Option<String>,
    flag_encoding: FlagEncoding,
    transport: T,
}

impl Client<HttpTransport> {
    /// Creates a client using environment variables and/or `.blsapirc`.
    ///
    /// This is equivalent to `Client::new(None, None)`.
    pub fn from_env() -> Result<Self> {
        Self::new(None, None)
    }

    /// Creates a client using (in order of precedence):
    /// - explicit `url`/`key` arguments
    /// - environment variables `BLS_API_URL` / `BLS_API_KEY`
    /// - config file from `BLS_API_RC` or `.blsapirc`
    /// - the public endpoint and no key
    pub fn new(url: Option<String>, key: Option<String>) -> Result<Self> {
        Self::with_config(load_config(url, key)?)
    }

    pub fn with_config(cfg: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(cfg.timeout)?;
        Ok(Self::with_transport(cfg, transport))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(cfg: ClientConfig, transport: T) -> Self {
        Self {
            url: cfg.url,
            key: cfg.key,
            flag_encoding: cfg.flag_encoding,
            transport,
        }
    }

    pub fn with_flag_encoding(mut self, flag_encoding: FlagEncoding) -> Self {
        self.flag_encoding = flag_encoding;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches the requested series.
    ///
    /// The configured key is used when the payload carries none. Server
    /// reported problems come back as `RequestFailed` / `InvalidSeries`
    /// with the decoded envelope attached.
    pub fn fetch(&self, payload: &RequestPayload) -> Result<ResultEnvelope> {
        payload.validate()?;

        let body = match (&payload.registration_key, &self.key) {
            (None, Some(key)) => payload
                .clone()
                .with_registration_key(key.as_str())
                .to_json(self.flag_encoding)?,
            _ => payload.to_json(self.flag_encoding)?,
        };

        info!(
            "requesting {} series ({}-{}) from {}",
            payload.series_ids.len(),
            payload.start_year,
            payload.end_year,
            self.url
        );
        debug!(
            "series={:?} catalog={} calculations={} annualaverage={} keyed={}",
            payload.series_ids,
            payload.catalog,
            payload.calculations,
            payload.annual_average,
            payload.registration_key.is_some() || self.key.is_some()
        );

        let raw = self.transport.post(&self.url, body)?;
        decode(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};
    use std::cell::RefCell;

    struct Recorder {
        reply: Vec<u8>,
        sent: RefCell<Vec<(String, serde_json::Value)>>,
    }

    impl Recorder {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.as_bytes().to_vec(),
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for Recorder {
        fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>> {
            let json = serde_json::from_slice(&body).map_err(Error::MalformedResponse)?;
            self.sent.borrow_mut().push((url.to_string(), json));
            Ok(self.reply.clone())
        }
    }

    const OK: &str = r#"{"status":"REQUEST_SUCCEEDED","responseTime":3,"message":[],"Results":{"series":[]}}"#;

    #[test]
    fn configured_key_is_sent_when_payload_has_none() {
        let rec = Recorder::new(OK);
        let cfg = ClientConfig {
            key: Some("secret".to_string()),
            ..ClientConfig::default()
        };
        let client = Client::with_transport(cfg, &rec);
        client
            .fetch(&RequestPayload::new(2020, 2021, ["A"]))
            .unwrap();

        let sent = rec.sent.borrow();
        assert_eq!(sent[0].0, DEFAULT_URL);
        assert_eq!(sent[0].1["registrationkey"], "secret");
    }

    #[test]
    fn payload_key_overrides_configured_key() {
        let rec = Recorder::new(OK);
        let cfg = ClientConfig {
            key: Some("secret".to_string()),
            ..ClientConfig::default()
        };
        let client = Client::with_transport(cfg, &rec);
        let payload = RequestPayload::new(2020, 2021, ["A"]).with_registration_key("mine");
        client.fetch(&payload).unwrap();
        assert_eq!(rec.sent.borrow()[0].1["registrationkey"], "mine");
    }

    #[test]
    fn flag_encoding_is_applied() {
        let rec = Recorder::new(OK);
        let client = Client::with_transport(ClientConfig::default(), &rec)
            .with_flag_encoding(FlagEncoding::Always);
        client
            .fetch(&RequestPayload::new(2020, 2021, ["A"]))
            .unwrap();
        let sent = rec.sent.borrow();
        assert_eq!(sent[0].1["catalog"], false);
        assert!(sent[0].1.get("registrationkey").is_none());
    }

    #[test]
    fn invalid_payload_never_reaches_transport() {
        let rec = Recorder::new(OK);
        let client = Client::with_transport(ClientConfig::default(), &rec);
        let err = client
            .fetch(&RequestPayload::new(2022, 2021, ["A"]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
        assert!(rec.sent.borrow().is_empty());
    }
}
