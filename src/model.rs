use serde::{Deserialize, Deserializer, Serialize};

/// Status string the API reports when a request was fully served.
pub const SUCCESS_STATUS: &str = "REQUEST_SUCCEEDED";

/// Period code the API uses for annual averages.
pub const ANNUAL_AVERAGE_PERIOD: &str = "M13";

// The API sends `null` for some empty collections; treat it like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Annotation attached to a single observation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footnote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Change over 1, 3, 6 and 12 months, as sent by the server (strings).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeSet {
    #[serde(rename = "1", deserialize_with = "null_as_default")]
    pub one_month: String,
    #[serde(rename = "3", deserialize_with = "null_as_default")]
    pub three_month: String,
    #[serde(rename = "6", deserialize_with = "null_as_default")]
    pub six_month: String,
    #[serde(rename = "12", deserialize_with = "null_as_default")]
    pub twelve_month: String,
}

/// Net and percent change calculations. Only present when requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calculation {
    #[serde(rename = "net_changes", deserialize_with = "null_as_default")]
    pub net_change: ChangeSet,
    #[serde(rename = "pct_changes", deserialize_with = "null_as_default")]
    pub pct_change: ChangeSet,
}

/// One observation (usually a month) of a series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Period {
    #[serde(deserialize_with = "null_as_default")]
    pub year: String,
    /// Period code, e.g. `M01` or `M13` for the annual average.
    #[serde(rename = "period", deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(rename = "periodName", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(deserialize_with = "null_as_default")]
    pub footnotes: Vec<Footnote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculations: Option<Calculation>,
}

impl Period {
    /// Parses the value as a number. Placeholders such as `-` yield `None`.
    pub fn numeric_value(&self) -> Option<f64> {
        self.value.trim().parse().ok()
    }

    pub fn is_annual_average(&self) -> bool {
        self.code == ANNUAL_AVERAGE_PERIOD
    }
}

/// Descriptive metadata of a series. Only sent when catalog data was
/// requested with a registration key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    #[serde(rename = "series_title", deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(rename = "series_id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub seasonality: String,
    #[serde(deserialize_with = "null_as_default")]
    pub survey_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub survey_abbreviation: String,
    #[serde(rename = "measure_data_type", deserialize_with = "null_as_default")]
    pub data_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub area: String,
    #[serde(deserialize_with = "null_as_default")]
    pub area_type: String,
}

/// All data received for one series identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesResult {
    #[serde(rename = "seriesID", deserialize_with = "null_as_default")]
    pub series_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<Catalog>,
    /// Observations in the order the server sent them (newest first).
    #[serde(rename = "data", deserialize_with = "null_as_default")]
    pub periods: Vec<Period>,
}

impl SeriesResult {
    /// Reverses the periods in place so the oldest observation comes first.
    pub fn reverse_periods(&mut self) -> &mut [Period] {
        crate::decode::reverse(&mut self.periods)
    }

    pub fn into_ascending(mut self) -> Self {
        self.reverse_periods();
        self
    }
}

/// The `Results` object of a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesCollection {
    #[serde(deserialize_with = "null_as_default")]
    pub series: Vec<SeriesResult>,
}

/// Top-level decoded response: status, server messages and series data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultEnvelope {
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    /// Server processing time in milliseconds.
    #[serde(rename = "responseTime", deserialize_with = "null_as_default")]
    pub response_time: i64,
    #[serde(rename = "message", deserialize_with = "null_as_default")]
    pub messages: Vec<String>,
    #[serde(rename = "Results", deserialize_with = "null_as_default")]
    pub results: SeriesCollection,
}

impl ResultEnvelope {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS_STATUS
    }

    /// Looks a series up by identifier. The server does not guarantee the
    /// request order, so positional access is not meaningful.
    pub fn series(&self, series_id: &str) -> Option<&SeriesResult> {
        self.results.series.iter().find(|s| s.series_id == series_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(code: &str, value: &str) -> Period {
        Period {
            year: "2020".to_string(),
            code: code.to_string(),
            name: String::new(),
            value: value.to_string(),
            ..Period::default()
        }
    }

    #[test]
    fn numeric_value_parses_decimal_strings() {
        assert_eq!(period("M01", "256.974").numeric_value(), Some(256.974));
        assert_eq!(period("M01", " 3.5 ").numeric_value(), Some(3.5));
        assert_eq!(period("M01", "-").numeric_value(), None);
    }

    #[test]
    fn annual_average_is_m13() {
        assert!(period("M13", "1").is_annual_average());
        assert!(!period("M12", "1").is_annual_average());
    }

    #[test]
    fn null_collections_become_empty() {
        let json = r#"{"status":"REQUEST_SUCCEEDED","message":null,"Results":null}"#;
        let env: ResultEnvelope = serde_json::from_str(json).unwrap();
        assert!(env.messages.is_empty());
        assert!(env.results.series.is_empty());
    }

    #[test]
    fn null_leaves_catalog_and_changes_empty() {
        let json = r#"{
            "seriesID": "CUUR0000SA0",
            "catalog": {"series_title": "t", "area": null, "survey_name": null},
            "data": [{
                "year": "2021", "period": "M06", "value": "3.1",
                "calculations": {
                    "net_changes": {"1": null, "3": "0.2", "6": null, "12": "1.0"},
                    "pct_changes": null
                }
            }]
        }"#;
        let series: SeriesResult = serde_json::from_str(json).unwrap();

        let catalog = series.catalog.unwrap();
        assert_eq!(catalog.title, "t");
        assert_eq!(catalog.area, "");
        assert_eq!(catalog.survey_name, "");

        let calc = series.periods[0].calculations.as_ref().unwrap();
        assert_eq!(calc.net_change.one_month, "");
        assert_eq!(calc.net_change.three_month, "0.2");
        assert_eq!(calc.pct_change, ChangeSet::default());
    }

    #[test]
    fn negative_response_time_is_kept() {
        let env: ResultEnvelope =
            serde_json::from_str(r#"{"status":"REQUEST_SUCCEEDED","responseTime":-1}"#).unwrap();
        assert_eq!(env.response_time, -1);
    }

    #[test]
    fn calculation_reads_numeric_keys() {
        let json = r#"{
            "year": "2021", "period": "M06", "periodName": "June", "value": "3.1",
            "footnotes": [{}],
            "calculations": {
                "net_changes": {"1": "0.1", "3": "0.2", "6": "-0.4", "12": "1.0"},
                "pct_changes": {"1": "3.3", "3": "6.9", "6": "-11.4", "12": "47.6"}
            }
        }"#;
        let p: Period = serde_json::from_str(json).unwrap();
        let calc = p.calculations.unwrap();
        assert_eq!(calc.net_change.six_month, "-0.4");
        assert_eq!(calc.pct_change.twelve_month, "47.6");
        assert_eq!(p.footnotes, vec![Footnote::default()]);
    }

    #[test]
    fn series_lookup_is_by_identifier() {
        let env = ResultEnvelope {
            results: SeriesCollection {
                series: vec![
                    SeriesResult {
                        series_id: "B".to_string(),
                        ..SeriesResult::default()
                    },
                    SeriesResult {
                        series_id: "A".to_string(),
                        ..SeriesResult::default()
                    },
                ],
            },
            ..ResultEnvelope::default()
        };
        assert_eq!(env.series("A").map(|s| s.series_id.as_str()), Some("A"));
        assert!(env.series("C").is_none());
    }

    #[test]
    fn absent_optional_parts_are_not_serialized() {
        let out = serde_json::to_value(SeriesResult {
            series_id: "X".to_string(),
            catalog: None,
            periods: vec![period("M01", "1.0")],
        })
        .unwrap();
        assert!(out.get("catalog").is_none());
        assert!(out["data"][0].get("calculations").is_none());
    }
}
