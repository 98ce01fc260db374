//! A small Rust client for the BLS.gov public time-series data API (v2).
//!
//! Build a [`RequestPayload`], hand it to [`Client::fetch`], and get back a
//! typed [`ResultEnvelope`]. Problems the server reports inside a well-formed
//! response are surfaced as [`Error::RequestFailed`] or
//! [`Error::InvalidSeries`], both of which keep the decoded envelope.
//!
//! ## Quick start
//! - Optionally configure a registration key via `BLS_API_KEY` or a
//!   `.blsapirc` file (current directory or home directory). Catalog data,
//!   calculations and annual averages are only served to keyed requests.
//!
//! ```no_run
//! use anyhow::Result;
//! use blsapi::{Client, RequestPayload};
//!
//! fn main() -> Result<()> {
//!     let client = Client::from_env()?;
//!     let payload = RequestPayload::new(2019, 2020, ["CUUR0000SA0", "SUUR0000SA0"]);
//!     let envelope = client.fetch(&payload)?;
//!     for series in envelope.results.series {
//!         let series = series.into_ascending();
//!         println!("{}: {} periods", series.series_id, series.periods.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Decoding is available on its own for bodies obtained elsewhere:
//!
//! ```
//! let body = br#"{"status":"REQUEST_SUCCEEDED","responseTime":7,"message":[],"Results":{"series":[]}}"#;
//! let envelope = blsapi::decode(body).unwrap();
//! assert_eq!(envelope.response_time, 7);
//! ```

#![forbid(unsafe_code)]

mod client;
mod config;
mod decode;
mod error;
mod model;
mod request;
mod transport;

pub use client::{Client, ClientConfig};
pub use config::DEFAULT_URL;
pub use decode::{INVALID_SERIES_PREFIXES, decode, reverse};
pub use error::{Error, ErrorKind, INVALID_SERIES_SUMMARY, Result};
pub use model::{
    ANNUAL_AVERAGE_PERIOD, Calculation, Catalog, ChangeSet, Footnote, Period, ResultEnvelope,
    SUCCESS_STATUS, SeriesCollection, SeriesResult,
};
pub use request::{FlagEncoding, RequestPayload};
pub use transport::{HttpTransport, Transport};
