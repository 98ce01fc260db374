use log::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{Period, ResultEnvelope};

/// Message prefixes the server uses when a requested series is unknown.
pub const INVALID_SERIES_PREFIXES: [&str; 2] = ["Invalid Series", "Series does not exist"];

/// Decodes a raw response body and classifies server-reported problems.
///
/// Missing fields decode to their empty values and unknown fields are
/// ignored. Bytes that are not JSON of the expected shape yield
/// [`Error::MalformedResponse`]. A non-success status yields
/// [`Error::RequestFailed`]; a success status with a message about an
/// unknown series yields [`Error::InvalidSeries`]. Both carry the decoded
/// envelope.
pub fn decode(body: &[u8]) -> Result<ResultEnvelope> {
    let envelope: ResultEnvelope = serde_json::from_slice(body).map_err(Error::MalformedResponse)?;
    debug!(
        "decoded response: status={} series={} messages={}",
        envelope.status,
        envelope.results.series.len(),
        envelope.messages.len()
    );
    classify(envelope)
}

fn classify(envelope: ResultEnvelope) -> Result<ResultEnvelope> {
    if !envelope.is_success() {
        warn!("request failed with status {}", envelope.status);
        return Err(Error::RequestFailed {
            status: envelope.status.clone(),
            messages: envelope.messages.clone(),
            envelope: Box::new(envelope),
        });
    }

    // The first matching message is enough to classify the whole response.
    if let Some(msg) = envelope.messages.iter().find(|m| is_invalid_series_message(m)) {
        warn!("server rejected a series: {}", msg);
        return Err(Error::InvalidSeries {
            messages: envelope.messages.clone(),
            envelope: Box::new(envelope),
        });
    }

    Ok(envelope)
}

fn is_invalid_series_message(message: &str) -> bool {
    INVALID_SERIES_PREFIXES
        .iter()
        .any(|prefix| message.starts_with(prefix))
}

/// Reverses periods in place and hands the same slice back.
///
/// The API sends the newest observation first; this puts the oldest first.
pub fn reverse(periods: &mut [Period]) -> &mut [Period] {
    let (mut i, mut j) = (0, periods.len());
    while i + 1 < j {
        j -= 1;
        periods.swap(i, j);
        i += 1;
    }
    periods
}
