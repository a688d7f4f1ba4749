//! # Capsule CLI Module
//!
//! Read-only commands over a capsule content directory.
//!
//! ## Available Commands
//!
//! - `check` - Report dangling links and unresolved deep links (default)
//! - `list` - List capsules, optionally of one kind
//! - `routes` - Print the route of every capsule
//! - `show` - Print the normalized view of one capsule
//! - `graph` - Print the link neighborhood of one capsule
//! - `render` - Print a body with deep links rewritten

mod commands;

use crate::config::AppConfig;
use capsule_core::{Catalog, CapsuleError, CapsuleKind, DuplicatePolicy};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Capsule - travel catalog content tool
///
/// Loads capsule records, resolves their links and audits the result.
/// Nothing is ever written back to the content directory.
#[derive(Parser, Debug)]
#[command(name = "capsule")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the config file [default: ./capsule.toml if present]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory of capsule records (overrides `content_dir`)
    #[arg(short = 'C', long, global = true)]
    pub content: Option<PathBuf>,

    /// Reject duplicate slugs instead of overwriting
    #[arg(long, global = true)]
    pub strict: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report dangling links and unresolved deep links
    Check,

    /// List capsules
    List {
        /// Only capsules of this kind
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
    },

    /// Print the route of every capsule
    Routes,

    /// Show the normalized view of a capsule
    Show {
        /// Capsule slug
        slug: String,
    },

    /// Show the link neighborhood of a capsule
    Graph {
        /// Capsule slug
        slug: String,
    },

    /// Print a capsule body with deep links rewritten
    Render {
        /// Capsule slug
        slug: String,
    },
}

/// Capsule kinds selectable on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Tour,
    Place,
    Guide,
}

impl From<KindArg> for CapsuleKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Tour => Self::Tour,
            KindArg::Place => Self::Place,
            KindArg::Guide => Self::Guide,
        }
    }
}

// =============================================================================
// SETTINGS
// =============================================================================

/// Effective settings for one run: file values with CLI overrides applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub content_dir: PathBuf,
    pub policy: DuplicatePolicy,
    pub json_mode: bool,
}

impl Settings {
    /// Merge `config` with the flags in `cli`. Flags win.
    #[must_use]
    pub fn resolve(cli: &Cli, config: &AppConfig) -> Self {
        let policy = if cli.strict {
            DuplicatePolicy::Reject
        } else {
            config.duplicate_policy()
        };

        Self {
            content_dir: cli
                .content
                .clone()
                .unwrap_or_else(|| config.content_dir.clone()),
            policy,
            json_mode: cli.json_mode,
        }
    }

    /// Load the catalog these settings point at.
    pub fn load_catalog(&self) -> Result<Catalog, CapsuleError> {
        tracing::debug!(
            dir = %self.content_dir.display(),
            policy = ?self.policy,
            "loading catalog"
        );
        Catalog::load_dir(&self.content_dir, self.policy)
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments, writing results to `out`.
pub fn execute(cli: Cli, config: &AppConfig, out: &mut impl Write) -> Result<(), CapsuleError> {
    let settings = Settings::resolve(&cli, config);
    let catalog = settings.load_catalog()?;
    let json_mode = settings.json_mode;

    match cli.command {
        Some(Commands::List { kind }) => cmd_list(&catalog, kind.map(Into::into), json_mode, out),
        Some(Commands::Routes) => cmd_routes(&catalog, json_mode, out),
        Some(Commands::Show { slug }) => cmd_show(&catalog, &slug, json_mode, out),
        Some(Commands::Graph { slug }) => cmd_graph(&catalog, &slug, json_mode, out),
        Some(Commands::Render { slug }) => cmd_render(&catalog, &slug, json_mode, out),
        Some(Commands::Check) | None => cmd_check(&catalog, json_mode, out),
    }
}
