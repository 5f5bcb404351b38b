//! Command-line arguments and their precedence over file configuration.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::loader::{load_file, ConfigError};
use crate::config::schema::ServerConfig;
use crate::config::validation::validate_config;

#[derive(Debug, Parser)]
#[command(name = "api-server")]
#[command(about = "String, sequence, header and IP lookup API", long_about = None)]
pub struct Args {
    /// Optional TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Port to listen on when no explicit address is given.
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// HTTP listen address (":8080" listens on every interface).
    #[arg(long = "http.addr")]
    pub http_addr: Option<String>,

    /// Time to wait for in-flight requests before forcefully terminating the server.
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,
}

/// Long flags that may also be written with a single dash (`-http.addr :80`).
const LONG_FLAGS: &[&str] = &["config", "port", "http.addr", "timeout"];

impl Args {
    /// Parse the process arguments, accepting single-dash long flags.
    pub fn from_env() -> Self {
        Self::parse_from(expand_single_dash(std::env::args_os()))
    }

    /// Resolve the final configuration: defaults, then the file, then the
    /// environment, then flags. The result is validated.
    pub fn resolve(&self) -> Result<ServerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_file(path)?,
            None => ServerConfig::default(),
        };

        if let Some(port) = self.port {
            config.listener.bind_address = format!("0.0.0.0:{port}");
        }
        if let Some(addr) = &self.http_addr {
            config.listener.bind_address = normalize_addr(addr);
        }
        if let Some(timeout) = self.timeout {
            config.shutdown.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

/// Rewrite `-flag` and `-flag=value` to their `--` form for every name in
/// [`LONG_FLAGS`]. Everything else passes through untouched.
pub fn expand_single_dash<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some(text) if is_single_dash_long(text) => OsString::from(format!("-{text}")),
            _ => arg,
        })
        .collect()
}

fn is_single_dash_long(arg: &str) -> bool {
    let Some(flag) = arg.strip_prefix('-') else {
        return false;
    };
    if flag.starts_with('-') {
        return false;
    }
    let name = flag.split_once('=').map_or(flag, |(name, _)| name);
    LONG_FLAGS.contains(&name)
}

/// Expand a host-less address such as `:8080` to `0.0.0.0:8080`.
pub fn normalize_addr(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{addr}")
    } else {
        addr.to_string()
    }
}

/// Parse a duration such as `5s`, `250ms`, `1.5s` or `1m30s`. A bare number
/// counts as seconds.
///
/// Units: `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`.
pub fn parse_duration(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    let invalid = || format!("invalid duration {value:?}");
    if value.is_empty() {
        return Err(invalid());
    }
    if value.bytes().all(|b| b.is_ascii_digit()) {
        return value.parse().map(Duration::from_secs).map_err(|_| invalid());
    }

    let mut nanos = 0f64;
    let mut rest = value;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(invalid)?;
        let (number, tail) = rest.split_at(number_end);
        let amount: f64 = number.parse().map_err(|_| invalid())?;

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);
        let scale = match unit {
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3_600e9,
            _ => return Err(format!("invalid duration unit {unit:?} in {value:?}")),
        };
        nanos += amount * scale;
        rest = tail;
    }

    if !nanos.is_finite() || nanos >= u64::MAX as f64 {
        return Err(invalid());
    }
    Ok(Duration::from_nanos(nanos.round() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["api-server"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn durations() {
        assert_eq!(parse_duration("5s"), Ok(Duration::from_secs(5)));
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("7"), Ok(Duration::from_secs(7)));
        assert_eq!(parse_duration("1.5s"), Ok(Duration::from_millis(1_500)));
        assert_eq!(parse_duration("1m30s"), Ok(Duration::from_secs(90)));
        assert_eq!(parse_duration("1h2m"), Ok(Duration::from_secs(3_720)));
        assert_eq!(parse_duration("750us"), Ok(Duration::from_micros(750)));
        assert_eq!(parse_duration("20µs"), Ok(Duration::from_micros(20)));
        assert_eq!(parse_duration("300ns"), Ok(Duration::from_nanos(300)));
        assert!(parse_duration("5d").is_err());
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("5s3").is_err());
        assert!(parse_duration("-1s").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn single_dash_long_flags_are_accepted() {
        let argv = ["api-server", "-http.addr", ":9002", "-timeout=1.5s", "-config", "/x.toml"]
            .map(OsString::from);
        let parsed = Args::try_parse_from(expand_single_dash(argv)).unwrap();
        assert_eq!(parsed.http_addr.as_deref(), Some(":9002"));
        assert_eq!(parsed.timeout, Some(Duration::from_millis(1_500)));
        assert_eq!(parsed.config, Some(PathBuf::from("/x.toml")));
    }

    #[test]
    fn other_arguments_pass_through() {
        let argv = ["api-server", "-h", "--timeout", "2s", "-x"].map(OsString::from);
        assert_eq!(expand_single_dash(argv.clone()), argv.to_vec());
    }

    #[test]
    fn file_values_are_validated_after_overrides() {
        let path = std::env::temp_dir()
            .join(format!("api-server-args-{}.toml", std::process::id()));
        std::fs::write(&path, "[shutdown]\ntimeout_ms = 0\n").unwrap();

        let mut parsed = args(&["--config", path.to_str().unwrap()]);
        parsed.port = None;
        let err = parsed.resolve().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("shutdown.timeout_ms"));

        parsed.timeout = Some(Duration::from_secs(1));
        assert_eq!(parsed.resolve().unwrap().shutdown.timeout_ms, 1_000);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn go_style_addresses_are_expanded() {
        assert_eq!(normalize_addr(":9000"), "0.0.0.0:9000");
        assert_eq!(normalize_addr("127.0.0.1:9000"), "127.0.0.1:9000");
    }

    #[test]
    fn flags_override_port() {
        let mut parsed = args(&["--http.addr", ":9001", "--timeout", "2s"]);
        parsed.port = Some(7000);
        let config = parsed.resolve().unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:9001");
        assert_eq!(config.shutdown.timeout_ms, 2_000);
    }

    #[test]
    fn port_sets_bind_address() {
        let mut parsed = args(&[]);
        parsed.port = Some(7000);
        let config = parsed.resolve().unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:7000");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut parsed = args(&["--timeout", "0s"]);
        parsed.port = None;
        assert!(matches!(parsed.resolve(), Err(ConfigError::Validation(_))));
    }
}
