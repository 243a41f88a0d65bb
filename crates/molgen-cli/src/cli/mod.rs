//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use molgen_core::domain::ModuleCategory;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "moleculer-gen",
    bin_name = "moleculer-gen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Moleculer microservices project generator",
    long_about = "moleculer-gen creates Moleculer.js projects with a ready-to-run \
                  docker-compose infrastructure, and adds services to them.",
    after_help = "EXAMPLES:\n\
        \x20 moleculer-gen init\n\
        \x20 moleculer-gen init --config-file shop.json --dry-run\n\
        \x20 moleculer-gen add-service --project ./my-shop\n\
        \x20 moleculer-gen list --category plugin",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new project.
    #[command(
        about = "Generate a new Moleculer project",
        after_help = "EXAMPLES:\n\
            \x20 moleculer-gen init                         # interactive\n\
            \x20 moleculer-gen init --config-file shop.json\n\
            \x20 moleculer-gen init --config-file shop.json --output ~/code --dry-run"
    )]
    Init(InitArgs),

    /// Add a service to an existing project.
    #[command(
        visible_alias = "add",
        about = "Add a service to a generated project",
        after_help = "EXAMPLES:\n\
            \x20 moleculer-gen add-service                  # from the project root\n\
            \x20 moleculer-gen add-service --project ./my-shop --config-file users.json"
    )]
    AddService(AddServiceArgs),

    /// List the available modules.
    #[command(
        visible_alias = "ls",
        about = "List available modules",
        after_help = "EXAMPLES:\n\
            \x20 moleculer-gen list\n\
            \x20 moleculer-gen list --category database\n\
            \x20 moleculer-gen list --format json"
    )]
    List(ListArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 moleculer-gen completions bash > ~/.local/share/bash-completion/completions/moleculer-gen\n\
            \x20 moleculer-gen completions zsh  > ~/.zfunc/_moleculer-gen"
    )]
    Completions(CompletionsArgs),

    /// Manage the moleculer-gen configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 moleculer-gen config init\n\
            \x20 moleculer-gen config get templates.path\n\
            \x20 moleculer-gen config list"
    )]
    Config(ConfigCommands),
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `moleculer-gen init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Read the project configuration from a JSON file instead of prompting.
    #[arg(
        long = "config-file",
        value_name = "FILE",
        help = "Project configuration (JSON) instead of prompts"
    )]
    pub config_file: Option<PathBuf>,

    /// Report what would be generated without touching the filesystem.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Parent directory of the new project.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        default_value = ".",
        help = "Directory in which the project directory is created"
    )]
    pub output: PathBuf,
}

// ── add-service ───────────────────────────────────────────────────────────────

/// Arguments for `moleculer-gen add-service`.
#[derive(Debug, Args)]
pub struct AddServiceArgs {
    /// Read the service answers from a JSON file instead of prompting.
    #[arg(
        long = "config-file",
        value_name = "FILE",
        help = "Service configuration (JSON) instead of prompts"
    )]
    pub config_file: Option<PathBuf>,

    /// Report what would be generated without touching the filesystem.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Root of the generated project.
    #[arg(
        short = 'p',
        long = "project",
        value_name = "DIR",
        default_value = ".",
        help = "Project root (default: current directory)"
    )]
    pub project: PathBuf,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `moleculer-gen list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show one category.
    #[arg(
        long = "category",
        value_enum,
        help = "Filter by module category"
    )]
    pub category: Option<CategoryArg>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Module category as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Database,
    Transporter,
    Plugin,
    BackendService,
}

impl From<CategoryArg> for ModuleCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Database => Self::Database,
            CategoryArg::Transporter => Self::Transporter,
            CategoryArg::Plugin => Self::Plugin,
            CategoryArg::BackendService => Self::BackendService,
        }
    }
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One key per line.
    List,
    /// JSON array.
    Json,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `moleculer-gen completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `moleculer-gen config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `templates.path`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the configuration file.
    Path,
    /// Write a default configuration file.
    Init {
        /// Overwrite an existing config file.
        #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
        force: bool,
    },
}

// ── tests ─────────────────────────────────────────────────────────────────────
