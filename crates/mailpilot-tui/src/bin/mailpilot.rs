use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use mailpilot_core::samples::{load_emails, lunch_thread};
use mailpilot_gateway::config::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SCHEME};
use mailpilot_gateway::{GatewayConfig, HttpGateway};
use mailpilot_tui::runtime::{self, RuntimeConfig};
use mailpilot_tui_adapter::style::{ThemeKind, ThemeSpec};
use tracing_subscriber::EnvFilter;

/// Terminal client for reviewing agent-proposed email actions.
#[derive(Debug, Parser)]
#[command(name = "mailpilot", version, about)]
struct Cli {
    /// Gateway host.
    #[arg(long, env = "MAILPILOT_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Gateway port.
    #[arg(long, env = "MAILPILOT_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Gateway scheme (http or https).
    #[arg(long, env = "MAILPILOT_SCHEME", default_value = DEFAULT_SCHEME)]
    scheme: String,

    /// Full gateway base URL; overrides host, port and scheme.
    #[arg(long, env = "MAILPILOT_BASE_URL")]
    base_url: Option<String>,

    /// Per-request budget in seconds.
    #[arg(long, env = "MAILPILOT_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// JSON file holding an array of emails to review instead of the built-in thread.
    #[arg(long, env = "MAILPILOT_EMAILS")]
    emails: Option<PathBuf>,

    /// Color theme: dark, light or high-contrast.
    #[arg(long, env = "MAILPILOT_THEME", default_value = "dark", value_parser = parse_theme)]
    theme: ThemeKind,

    /// Append diagnostic logs to this file (filtered by MAILPILOT_LOG).
    #[arg(long, env = "MAILPILOT_LOG_FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            host: self.host.clone(),
            port: self.port,
            scheme: self.scheme.clone(),
            base_url: self.base_url.clone(),
            request_timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

fn parse_theme(value: &str) -> Result<ThemeKind, String> {
    ThemeKind::parse(value)
        .ok_or_else(|| format!("unknown theme {value:?} (expected dark, light or high-contrast)"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Some(path) = cli.log_file.as_deref() {
        init_logging(path)?;
    }

    let config = cli.gateway_config();
    config.validate()?;

    let emails = match cli.emails.as_deref() {
        Some(path) => load_emails(path).map_err(|err| err.to_string())?,
        None => lunch_thread(),
    };
    let gateway = HttpGateway::new(&config).map_err(|err| err.to_string())?;
    tracing::info!(
        base_url = gateway.base_url(),
        emails = emails.len(),
        theme = cli.theme.label(),
        "starting mailpilot"
    );

    runtime::run(RuntimeConfig {
        gateway: Arc::new(gateway),
        emails,
        theme: ThemeSpec::for_kind(cli.theme),
        request_timeout: config.request_timeout,
    })
}

fn init_logging(path: &Path) -> Result<(), String> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| format!("open log file {}: {err}", path.display()))?;
    let filter = EnvFilter::try_from_env("MAILPILOT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| format!("install log subscriber: {err}"))
}
