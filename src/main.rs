//! `bls` - fetch BLS.gov time series from the command line.

use anyhow::{Context, Result, bail};
use blsapi::{Client, Error, FlagEncoding, RequestPayload, SeriesResult};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "bls", version, about = "Query the BLS.gov time-series API")]
struct Cli {
    /// Series identifiers, e.g. CUUR0000SA0
    #[arg(required = true)]
    series: Vec<String>,

    #[arg(long)]
    start_year: u16,

    #[arg(long)]
    end_year: u16,

    /// Request catalog metadata (needs a key)
    #[arg(long)]
    catalog: bool,

    /// Request net and percent changes (needs a key)
    #[arg(long)]
    calculations: bool,

    /// Request annual averages (needs a key)
    #[arg(long)]
    annual_average: bool,

    /// Registration key; falls back to BLS_API_KEY or .blsapirc
    #[arg(long)]
    key: Option<String>,

    /// Endpoint URL; falls back to BLS_API_URL or .blsapirc
    #[arg(long)]
    url: Option<String>,

    /// Send false flags instead of omitting them
    #[arg(long)]
    always_send_flags: bool,

    /// Print oldest periods first
    #[arg(long)]
    ascending: bool,

    /// Print the decoded response as JSON
    #[arg(long)]
    json: bool,

    /// Hide the progress spinner
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let encoding = if cli.always_send_flags {
        FlagEncoding::Always
    } else {
        FlagEncoding::OmitDefaults
    };
    let client = Client::new(cli.url.clone(), cli.key.clone())
        .context("failed to configure client")?
        .with_flag_encoding(encoding);

    let payload = RequestPayload::new(cli.start_year, cli.end_year, cli.series.clone())
        .with_catalog(cli.catalog)
        .with_calculations(cli.calculations)
        .with_annual_average(cli.annual_average);

    let spinner = (!cli.quiet).then(|| {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("fetching {} series", payload.series_ids.len()));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });
    let result = client.fetch(&payload);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let mut envelope = match result {
        Ok(envelope) => envelope,
        Err(err @ (Error::RequestFailed { .. } | Error::InvalidSeries { .. })) => {
            for msg in err.details() {
                eprintln!("server: {}", msg);
            }
            bail!(err);
        }
        Err(err) => return Err(err).context("request failed"),
    };

    if cli.ascending {
        for series in &mut envelope.results.series {
            series.reverse_periods();
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    for msg in &envelope.messages {
        eprintln!("server: {}", msg);
    }
    for series in &envelope.results.series {
        print_series(series);
    }
    Ok(())
}

fn print_series(series: &SeriesResult) {
    match &series.catalog {
        Some(catalog) if !catalog.title.is_empty() => {
            println!("{} - {}", series.series_id, catalog.title)
        }
        _ => println!("{}", series.series_id),
    }
    for p in &series.periods {
        let notes: Vec<&str> = p
            .footnotes
            .iter()
            .filter_map(|f| f.text.as_deref())
            .collect();
        println!(
            "  {:<6}{:<5}{:<12}{:>12}  {}",
            p.year,
            p.code,
            p.name,
            p.value,
            notes.join("; ")
        );
    }
}
