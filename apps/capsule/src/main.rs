//! # Capsule - Catalog Tool
//!
//! The main binary for the capsule content catalog.
//!
//! This application provides:
//! - Record loading from a content directory
//! - Catalog audit (dangling links, unresolved deep links)
//! - Route enumeration for static-page generation
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │            apps/capsule (THE BINARY)          │
//! │                                               │
//! │   ┌─────────────┐        ┌───────────────┐    │
//! │   │    CLI      │        │    Config     │    │
//! │   │   (clap)    │        │ (capsule.toml)│    │
//! │   └──────┬──────┘        └───────┬───────┘    │
//! │          └───────────┬───────────┘            │
//! │                      ▼                        │
//! │              ┌───────────────┐                │
//! │              │ capsule-core  │                │
//! │              │  (THE LOGIC)  │                │
//! │              └───────────────┘                │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Audit the catalog (default command)
//! capsule -C content/capsules
//!
//! # Enumerate routes for the static build
//! capsule routes --json-mode
//!
//! # Inspect one capsule
//! capsule show lake-ritsa
//! capsule graph lake-ritsa-winter
//! ```

use capsule::cli::{self, Cli};
use capsule::config::{AppConfig, LogConfig, LogFormat};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = Cli::parse();

    // Config errors are reported after logging is up, with default settings.
    let (config, config_error) = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_tracing(&config.log, cli.verbose);

    if let Some(e) = config_error {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = cli::execute(cli, &config, &mut out) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install the global subscriber.
///
/// `CAPSULE_LOG_FORMAT=json` and `RUST_LOG` take precedence over the
/// `[log]` table; `--verbose` raises the file filter to debug. Logs go to
/// stderr so command output on stdout stays machine-readable.
fn init_tracing(log: &LogConfig, verbose: bool) {
    let format = std::env::var("CAPSULE_LOG_FORMAT")
        .map(|v| LogFormat::from_env_value(&v))
        .unwrap_or(log.format);

    let fallback = if verbose {
        "capsule=debug,capsule_core=debug"
    } else {
        log.filter.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new(capsule::config::DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Print the startup banner.
fn print_banner() {
    eprintln!(
        r#"
   ┏━╸┏━┓┏━┓┏━┓╻ ╻╻  ┏━╸
   ┃  ┣━┫┣━┛┗━┓┃ ┃┃  ┣╸
   ┗━╸╹ ╹╹  ┗━┛┗━┛┗━╸┗━╸

  Capsule catalog tool v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
