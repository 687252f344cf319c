use crate::common::net::{DEFAULT_HTTP_PORT, parse_target_url};
use crate::config::{
    DEFAULT_HOST, DEFAULT_OUTPUT_FILE, DEFAULT_PATH, ProbeOptions, ProbeTarget, Timeouts,
};
use crate::data_model::settings::AppSettings;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Single-dash spellings accepted by existing driver scripts.
const LEGACY_FLAGS: &[(&str, &str)] = &[
    ("-ping", "--ping"),
    ("-pkt", "--pkt"),
    ("-packets", "--packets"),
    ("-info", "--info"),
    ("-verbose", "--verbose"),
    ("-json", "--json"),
    ("-nf", "--no-file"),
];

#[derive(Parser, Debug)]
#[command(name = "webprobe")]
#[command(
    about = "Single-shot HTTP/1.0 probe: connect RTT, per-read packet trace and kernel TCP RTT",
    long_about = None
)]
pub struct CliArgs {
    /// Hostname of the server (or a full http:// URL)
    #[arg(default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to connect to
    #[arg(default_value_t = DEFAULT_HTTP_PORT)]
    port: u16,

    /// Path to request from the server
    #[arg(default_value = DEFAULT_PATH)]
    path: String,

    /// Output file to save the response
    #[arg(short = 'f', long = "file", value_name = "PATH", default_value = DEFAULT_OUTPUT_FILE)]
    file: PathBuf,

    /// Do not save the response to a file
    #[arg(long = "no-file")]
    no_file: bool,

    /// Print peer IP and connect RTT
    #[arg(long)]
    ping: bool,

    /// Print one `<bytes> bytes <ms> ms` line per read
    #[arg(long = "pkt", visible_alias = "packets")]
    packets: bool,

    /// Print kernel TCP_INFO RTT and RTT variance
    #[arg(long)]
    info: bool,

    /// Print the full report block
    #[arg(short, long)]
    verbose: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Connect timeout in milliseconds (default: wait indefinitely)
    #[arg(long, value_name = "MS")]
    connect_timeout_ms: Option<u64>,

    /// Read timeout in milliseconds (default: wait indefinitely)
    #[arg(long, value_name = "MS")]
    read_timeout_ms: Option<u64>,

    /// Enable debug logging on stderr
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{name} must be greater than zero")]
    ZeroTimeout { name: &'static str },
    #[error("invalid target URL '{value}'")]
    InvalidUrl { value: String },
    #[error("unsupported scheme '{scheme}' (only http is supported)")]
    UnsupportedScheme { scheme: String },
}

/// Rewrites the single-dash long flags used by driver scripts to their
/// `--` forms. Arguments after `--` are left alone.
pub fn normalize_legacy_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(|arg| {
            if passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }
            LEGACY_FLAGS
                .iter()
                .find(|(legacy, _)| *legacy == arg)
                .map(|(_, modern)| modern.to_string())
                .unwrap_or(arg)
        })
        .collect()
}

pub fn load_from_cli() -> Result<AppSettings, SettingsError> {
    let args = CliArgs::parse_from(normalize_legacy_args(std::env::args()));
    from_args(args)
}

pub fn from_args(args: CliArgs) -> Result<AppSettings, SettingsError> {
    let target = build_target(&args.host, args.port, &args.path)?;

    let timeouts = Timeouts {
        connect: millis("connect timeout", args.connect_timeout_ms)?,
        read: millis("read timeout", args.read_timeout_ms)?,
    };

    let mut options = ProbeOptions {
        emit_ping: args.ping,
        emit_packets: args.packets,
        emit_kernel_info: args.info,
        verbose: args.verbose,
        json: args.json,
        output_path: if args.no_file { None } else { Some(args.file) },
    };
    if !options.any_report() {
        options.verbose = true;
    }

    Ok(AppSettings {
        target,
        options,
        timeouts,
        debug: args.debug,
    })
}

fn build_target(host: &str, port: u16, path: &str) -> Result<ProbeTarget, SettingsError> {
    if !host.contains("://") {
        return Ok(ProbeTarget::new(host, port, path));
    }

    let url = parse_target_url(host).ok_or_else(|| SettingsError::InvalidUrl {
        value: host.to_string(),
    })?;
    if url.scheme() != "http" {
        return Err(SettingsError::UnsupportedScheme {
            scheme: url.scheme().to_string(),
        });
    }
    let url_host = url.host_str().ok_or_else(|| SettingsError::InvalidUrl {
        value: host.to_string(),
    })?;
    let url_path = match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    };

    Ok(ProbeTarget::new(
        url_host,
        url.port_or_known_default().unwrap_or(DEFAULT_HTTP_PORT),
        &url_path,
    ))
}

fn millis(name: &'static str, value: Option<u64>) -> Result<Option<Duration>, SettingsError> {
    match value {
        Some(0) => Err(SettingsError::ZeroTimeout { name }),
        Some(ms) => Ok(Some(Duration::from_millis(ms))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::{CliArgs, SettingsError, from_args, normalize_legacy_args};
    use crate::config::{DEFAULT_HOST, DEFAULT_OUTPUT_FILE};
    use clap::Parser;
    use std::path::PathBuf;
    use std::time::Duration;

    fn parse(args: &[&str]) -> CliArgs {
        let args = std::iter::once("webprobe")
            .chain(args.iter().copied())
            .map(String::from);
        CliArgs::try_parse_from(normalize_legacy_args(args)).expect("cli args")
    }

    #[test]
    fn defaults_to_verbose_report_and_output_file() {
        let settings = from_args(parse(&[])).expect("settings");
        assert_eq!(settings.target.host(), DEFAULT_HOST);
        assert_eq!(settings.target.port(), 80);
        assert_eq!(settings.target.path(), "/");
        assert!(settings.options.verbose);
        assert!(!settings.options.emit_ping);
        assert_eq!(
            settings.options.output_path,
            Some(PathBuf::from(DEFAULT_OUTPUT_FILE))
        );
        assert_eq!(settings.timeouts.connect, None);
        assert_eq!(settings.timeouts.read, None);
    }

    #[test]
    fn legacy_single_dash_flags_are_accepted() {
        let settings =
            from_args(parse(&["example.org", "80", "/file", "-pkt", "-ping", "-info", "-nf"]))
                .expect("settings");
        assert!(settings.options.emit_packets);
        assert!(settings.options.emit_ping);
        assert!(settings.options.emit_kernel_info);
        assert!(!settings.options.verbose);
        assert_eq!(settings.options.output_path, None);
        assert_eq!(settings.target.path(), "/file");
    }

    #[test]
    fn normalize_leaves_arguments_after_separator() {
        let args = ["webprobe", "-ping", "--", "-ping"].map(String::from);
        assert_eq!(
            normalize_legacy_args(args),
            vec!["webprobe", "--ping", "--", "-ping"]
        );
    }

    #[test]
    fn packets_alias_and_file_option() {
        let settings =
            from_args(parse(&["host", "--packets", "-f", "out.html"])).expect("settings");
        assert!(settings.options.emit_packets);
        assert_eq!(settings.options.output_path, Some(PathBuf::from("out.html")));
    }

    #[test]
    fn url_form_host_overrides_port_and_path() {
        let settings =
            from_args(parse(&["http://example.com:8080/a/b?x=1"])).expect("settings");
        assert_eq!(settings.target.host(), "example.com");
        assert_eq!(settings.target.port(), 8080);
        assert_eq!(settings.target.path(), "/a/b?x=1");
    }

    #[test]
    fn https_urls_are_rejected() {
        let err = from_args(parse(&["https://example.com/"])).expect_err("should error");
        match err {
            SettingsError::UnsupportedScheme { scheme } => assert_eq!(scheme, "https"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn timeouts_are_parsed_and_zero_rejected() {
        let settings = from_args(parse(&[
            "host",
            "--connect-timeout-ms",
            "1500",
            "--read-timeout-ms",
            "250",
        ]))
        .expect("settings");
        assert_eq!(settings.timeouts.connect, Some(Duration::from_millis(1500)));
        assert_eq!(settings.timeouts.read, Some(Duration::from_millis(250)));

        let err = from_args(parse(&["host", "--read-timeout-ms", "0"])).expect_err("zero");
        match err {
            SettingsError::ZeroTimeout { name } => assert_eq!(name, "read timeout"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
