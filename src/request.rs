use serde::Serialize;

use crate::error::{Error, Result};

/// Controls how the optional boolean flags are written to the wire.
///
/// The public API ignores `catalog`, `calculations` and `annualaverage`
/// unless a registration key is sent, and tolerates both shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlagEncoding {
    /// Only write flags that are `true`.
    #[default]
    OmitDefaults,
    /// Always write all three flags.
    Always,
}

/// A time-series data request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPayload {
    pub start_year: u16,
    pub end_year: u16,
    pub series_ids: Vec<String>,
    pub catalog: bool,
    pub calculations: bool,
    pub annual_average: bool,
    pub registration_key: Option<String>,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    startyear: String,
    endyear: String,
    seriesid: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    catalog: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    calculations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    annualaverage: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    registrationkey: Option<&'a str>,
}

impl RequestPayload {
    pub fn new<I, S>(start_year: u16, end_year: u16, series_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            start_year,
            end_year,
            series_ids: series_ids.into_iter().map(Into::into).collect(),
            catalog: false,
            calculations: false,
            annual_average: false,
            registration_key: None,
        }
    }

    pub fn with_catalog(mut self, catalog: bool) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_calculations(mut self, calculations: bool) -> Self {
        self.calculations = calculations;
        self
    }

    pub fn with_annual_average(mut self, annual_average: bool) -> Self {
        self.annual_average = annual_average;
        self
    }

    /// Sets the registration key. Blank keys are treated as absent.
    pub fn with_registration_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        let key = key.trim();
        self.registration_key = (!key.is_empty()).then(|| key.to_string());
        self
    }

    /// Rejects payloads the server could never serve. Flag/key combinations
    /// are left to the server.
    pub fn validate(&self) -> Result<()> {
        if self.series_ids.is_empty() {
            return Err(Error::invalid_request("at least one series id is required"));
        }
        if let Some(id) = self.series_ids.iter().find(|s| s.trim().is_empty()) {
            return Err(Error::invalid_request(format!("blank series id {:?}", id)));
        }
        if self.start_year > self.end_year {
            return Err(Error::invalid_request(format!(
                "start year {} is after end year {}",
                self.start_year, self.end_year
            )));
        }
        Ok(())
    }

    /// Serializes the payload into the JSON body the endpoint expects.
    pub fn to_json(&self, encoding: FlagEncoding) -> Result<Vec<u8>> {
        let flag = |value: bool| match encoding {
            FlagEncoding::Always => Some(value),
            FlagEncoding::OmitDefaults => value.then_some(true),
        };

        let wire = WireRequest {
            startyear: self.start_year.to_string(),
            endyear: self.end_year.to_string(),
            seriesid: &self.series_ids,
            catalog: flag(self.catalog),
            calculations: flag(self.calculations),
            annualaverage: flag(self.annual_average),
            registrationkey: self.registration_key.as_deref(),
        };

        serde_json::to_vec(&wire).map_err(|e| Error::invalid_request(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn wire(payload: &RequestPayload, encoding: FlagEncoding) -> Value {
        serde_json::from_slice(&payload.to_json(encoding).unwrap()).unwrap()
    }

    #[test]
    fn minimal_payload_omits_flags() {
        let payload = RequestPayload::new(2019, 2020, ["CUUR0000SA0"]);
        assert_eq!(
            wire(&payload, FlagEncoding::OmitDefaults),
            json!({"startyear": "2019", "endyear": "2020", "seriesid": ["CUUR0000SA0"]})
        );
    }

    #[test]
    fn always_encoding_writes_false_flags() {
        let payload = RequestPayload::new(2019, 2020, ["A", "B"]).with_catalog(true);
        assert_eq!(
            wire(&payload, FlagEncoding::Always),
            json!({
                "startyear": "2019",
                "endyear": "2020",
                "seriesid": ["A", "B"],
                "catalog": true,
                "calculations": false,
                "annualaverage": false
            })
        );
    }

    #[test]
    fn key_and_true_flags_are_sent() {
        let payload = RequestPayload::new(2010, 2011, ["A"])
            .with_calculations(true)
            .with_annual_average(true)
            .with_registration_key(" abc123 ");
        assert_eq!(
            wire(&payload, FlagEncoding::OmitDefaults),
            json!({
                "startyear": "2010",
                "endyear": "2011",
                "seriesid": ["A"],
                "calculations": true,
                "annualaverage": true,
                "registrationkey": "abc123"
            })
        );
    }

    #[test]
    fn blank_key_is_absent() {
        let payload = RequestPayload::new(2010, 2011, ["A"]).with_registration_key("  ");
        assert_eq!(payload.registration_key, None);
    }

    #[test]
    fn validate_rejects_unservable_payloads() {
        let empty: [&str; 0] = [];
        assert!(RequestPayload::new(2010, 2011, empty).validate().is_err());
        assert!(RequestPayload::new(2012, 2011, ["A"]).validate().is_err());
        assert!(RequestPayload::new(2010, 2011, ["A", " "]).validate().is_err());
        assert!(RequestPayload::new(2011, 2011, ["A"]).validate().is_ok());
    }
}
