//! Clap derive structures for the `aura` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept
//! free of crate-internal imports so `build.rs` can include it.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// aura -- your issues and pull requests from every tracker, in one list
#[derive(Debug, Parser)]
#[command(
    name = "aura",
    version,
    about = "Your issues and pull requests from every tracker, in one list",
    long_about = "Aggregates work assigned to you across GitHub, Azure DevOps, Jira and FogBugz.\n\n\
        GitHub and Azure DevOps sign in through their own CLIs (gh, az);\n\
        Jira and FogBugz use credentials stored with `aura config`.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Output format [default: table, or `defaults.output` from config]
    #[arg(long, short = 'o', env = "AURA_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides `defaults.timeout`)
    #[arg(long, env = "AURA_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one URL per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Every provider aura aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    Github,
    Azure,
    Jira,
    Fogbugz,
}

/// Providers that use stored credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CredentialProvider {
    Jira,
    Fogbugz,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List issues assigned to you across connected providers
    #[command(alias = "i")]
    Issues(ListArgs),

    /// List open pull requests you are involved in
    #[command(alias = "pr", alias = "pulls")]
    Prs(ListArgs),

    /// Inspect provider authentication
    Auth(AuthArgs),

    /// Manage configuration and stored credentials
    #[command(alias = "cfg")]
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Lists ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only query these providers (repeatable or comma-separated)
    #[arg(long, short = 'P', value_enum, value_delimiter = ',')]
    pub provider: Vec<ProviderArg>,

    /// Show at most this many items
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Show which providers are connected and as whom
    Status,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the configuration with secrets masked
    Show,

    /// Print the config file path
    Path,

    /// Store Jira credentials (email + API token)
    SetJira(SetJiraArgs),

    /// Store FogBugz credentials (email + password)
    #[command(name = "set-fogbugz")]
    SetFogBugz(SetFogBugzArgs),

    /// Remove a provider's stored credentials
    Delete {
        #[arg(value_enum)]
        provider: CredentialProvider,
    },
}

#[derive(Debug, Args)]
pub struct SetJiraArgs {
    /// Site URL, e.g. https://acme.atlassian.net (prompted if omitted)
    #[arg(long)]
    pub url: Option<String>,

    /// Account email (prompted if omitted)
    #[arg(long)]
    pub email: Option<String>,

    /// API token (prompted if omitted)
    #[arg(long, env = "AURA_JIRA_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    #[command(flatten)]
    pub store: StoreOpts,
}

#[derive(Debug, Args)]
pub struct SetFogBugzArgs {
    /// Instance URL, e.g. https://acme.fogbugz.com (prompted if omitted)
    #[arg(long)]
    pub url: Option<String>,

    /// Account email (prompted if omitted)
    #[arg(long)]
    pub email: Option<String>,

    /// Password (prompted if omitted)
    #[arg(long, env = "AURA_FOGBUGZ_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(flatten)]
    pub store: StoreOpts,
}

#[derive(Debug, Args)]
pub struct StoreOpts {
    /// Write the secret to the config file instead of the system keyring
    #[arg(long)]
    pub plaintext: bool,

    /// Skip the connection check after saving
    #[arg(long)]
    pub no_verify: bool,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}
