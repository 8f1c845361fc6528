//! redstat - Redis metrics plugin.
//!
//! Runs `INFO` (and `CONFIG GET` for capacity) against one Redis server and
//! prints the metrics for a monitoring agent. Logs go to stderr so stdout
//! only carries metric lines.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use redstat_core::collector::Collector;
use redstat_core::config::RedisConfig;
use redstat_core::output;

/// Redis metrics plugin.
#[derive(Parser, Debug)]
#[command(name = "redstat", about = "Redis metrics plugin", version)]
struct Args {
    /// Hostname.
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Port.
    #[arg(long, default_value_t = 6379)]
    port: u16,

    /// Password. Ignored when --socket is used.
    #[arg(long, env = "REDIS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Server socket (overrides host and port).
    #[arg(long, value_name = "PATH")]
    socket: Option<PathBuf>,

    /// Metric key prefix.
    #[arg(long, default_value = "redis")]
    metric_key_prefix: String,

    /// Connect/read/write timeout in seconds.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Print every collected metric as a JSON object instead of plugin lines.
    /// Non-finite values (e.g. client capacity with maxclients 0) print as null.
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace). Default is warn level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn to_config(&self) -> RedisConfig {
        let config = RedisConfig::new()
            .with_tcp(self.host.clone(), self.port)
            .with_password(self.password.clone())
            .with_timeout(Duration::from_secs(self.timeout))
            .with_prefix(self.metric_key_prefix.clone());
        match &self.socket {
            Some(path) => config.with_socket(path.clone()),
            None => config,
        }
    }
}

/// Initializes the tracing subscriber on stderr.
/// Default level is WARN. `RUST_LOG` directives take precedence.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.to_config();
    let prefix = config.metric_key_prefix();

    if output::is_meta_request(std::env::var_os(output::META_ENV).as_deref()) {
        output::render_meta(out, prefix)?;
        return Ok(());
    }

    debug!(target_addr = %config.target(), timeout_s = args.timeout, "fetching metrics");
    let mut collector = Collector::connect(&config)?;
    let metrics = collector.fetch_metrics()?;

    if args.json {
        output::render_json(out, &metrics)?;
    } else {
        output::render_values(out, prefix, &metrics, Utc::now().timestamp())?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run(&args, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redstat_core::config::Target;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["redstat"]).unwrap();
        let config = args.to_config();
        assert_eq!(
            config.target(),
            &Target::Tcp {
                host: "localhost".to_string(),
                port: 6379
            }
        );
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.metric_key_prefix(), "redis");
        assert!(!args.json);
    }

    #[test]
    fn socket_overrides_host_and_password() {
        let args = Args::try_parse_from([
            "redstat",
            "--host",
            "db.internal",
            "--password",
            "secret",
            "--socket",
            "/var/run/redis/redis.sock",
        ])
        .unwrap();
        let config = args.to_config();
        assert_eq!(
            config.target(),
            &Target::Unix(PathBuf::from("/var/run/redis/redis.sock"))
        );
        assert_eq!(config.effective_password(), None);
    }

    #[test]
    fn tcp_flags() {
        let args = Args::try_parse_from([
            "redstat",
            "--host",
            "10.0.0.7",
            "--port",
            "6380",
            "--password",
            "secret",
            "--metric-key-prefix",
            "cache",
            "--timeout",
            "2",
        ])
        .unwrap();
        let config = args.to_config();
        assert_eq!(config.target().to_string(), "10.0.0.7:6380");
        assert_eq!(config.effective_password(), Some("secret"));
        assert_eq!(config.metric_key_prefix(), "cache");
        assert_eq!(config.timeout(), Duration::from_secs(2));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(Args::try_parse_from(["redstat", "--timeout", "0"]).is_err());
    }

    #[test]
    fn verbosity_counts() {
        let args = Args::try_parse_from(["redstat", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert!(!args.quiet);
    }
}
