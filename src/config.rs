use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::ClientConfig;
use crate::error::{Error, Result};
use crate::request::FlagEncoding;

/// Public v2 time-series endpoint.
pub const DEFAULT_URL: &str = "https://api.bls.gov/publicAPI/v2/timeseries/data";

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Default, PartialEq)]
struct RcConfig {
    url: Option<String>,
    key: Option<String>,
    timeout: Option<Duration>,
}

/// Resolves configuration from (in order of precedence) the explicit
/// arguments, `BLS_API_URL` / `BLS_API_KEY`, then the first rc file found.
/// The key is optional: without one the API serves unregistered requests.
pub(crate) fn load_config(url: Option<String>, key: Option<String>) -> Result<ClientConfig> {
    let mut url = url.or_else(|| env_non_empty("BLS_API_URL"));
    let mut key = key.or_else(|| env_non_empty("BLS_API_KEY"));
    let mut timeout = None;

    for rc_path in rc_candidates() {
        if rc_path.exists() {
            let cfg = read_rc(&rc_path)?;
            if url.is_none() {
                url = cfg.url;
            }
            if key.is_none() {
                key = cfg.key;
            }
            timeout = cfg.timeout;
            break;
        }
    }

    let url = url.unwrap_or_else(|| DEFAULT_URL.to_string());
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(Error::config(format!("url must be http(s), got {:?}", url)));
    }

    Ok(ClientConfig {
        url,
        key: key.filter(|k| !k.trim().is_empty()),
        timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
        flag_encoding: FlagEncoding::default(),
    })
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn read_rc(path: &Path) -> Result<RcConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;
    parse_rc(&text).map_err(|msg| Error::config(format!("{}: {}", path.display(), msg)))
}

fn parse_rc(text: &str) -> std::result::Result<RcConfig, String> {
    let mut cfg = RcConfig::default();

    // `key:` may be followed by the value on the next line.
    let mut pending_key: Option<&str> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(pk) = pending_key.take() {
            if !line.contains(':') || (pk == "url" && is_url(line)) {
                let v = strip_quotes(line);
                match pk {
                    "url" => cfg.url = Some(v.to_string()),
                    "key" => cfg.key = Some(v.to_string()),
                    _ => {}
                }
                continue;
            }
        }

        if let Some((k, v)) = line.split_once(':') {
            let k = k.trim();
            let v = strip_quotes(v.trim());
            match k {
                "url" | "key" if v.is_empty() => pending_key = Some(k),
                "url" => cfg.url = Some(v.to_string()),
                "key" => cfg.key = Some(v.to_string()),
                "timeout" if !v.is_empty() => {
                    let secs: u64 = v
                        .parse()
                        .map_err(|_| format!("timeout must be whole seconds, got {:?}", v))?;
                    cfg.timeout = Some(Duration::from_secs(secs));
                }
                _ => {}
            }
        }
    }

    Ok(cfg)
}

fn is_url(s: &str) -> bool {
    let s = strip_quotes(s);
    s.starts_with("http://") || s.starts_with("https://")
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates() -> Vec<PathBuf> {
    // 1) BLS_API_RC (explicit)
    // 2) ./.blsapirc
    // 3) ~/.blsapirc
    if let Some(p) = env_non_empty("BLS_API_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".blsapirc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".blsapirc"));
    }
    v
}
