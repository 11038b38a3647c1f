//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "modcraft",
    bin_name = "modcraft",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Compose feature modules onto Go service scaffolds",
    long_about = "Modcraft generates Go services (Fx + Viper) and adds feature \
                  modules to them, wiring each one into go.mod, the DI root and \
                  config/config.yml.",
    after_help = "EXAMPLES:\n\
        \x20 modcraft new orders --with http:gin --with db:gorm\n\
        \x20 modcraft add grpc:server --set server.grpc.addr=:9000\n\
        \x20 modcraft list\n\
        \x20 modcraft completions bash > /usr/share/bash-completion/completions/modcraft",
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
        visible_alias = "n",
        about = "Generate a new project",
        after_help = "EXAMPLES:\n\
            \x20 modcraft new orders\n\
            \x20 modcraft new orders --module github.com/acme/orders --with http:chi\n\
            \x20 modcraft new orders --with db:gorm --set gorm.driver=postgres --no-hooks"
    )]
    New(NewArgs),

    /// Add modules to an existing project.
    #[command(
        visible_alias = "a",
        about = "Add modules to an existing project",
        after_help = "EXAMPLES:\n\
            \x20 modcraft add http:gin\n\
            \x20 modcraft add db:gorm --set gorm.dsn=postgres://localhost/app\n\
            \x20 modcraft add feature:makefile feature:dockerfile --dir ../orders --dry-run"
    )]
    Add(AddArgs),

    /// List available modules.
    #[command(
        visible_alias = "ls",
        about = "List available modules",
        after_help = "EXAMPLES:\n\
            \x20 modcraft list\n\
            \x20 modcraft list --tag http\n\
            \x20 modcraft list --format json"
    )]
    List(ListArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 modcraft completions bash > ~/.local/share/bash-completion/completions/modcraft\n\
            \x20 modcraft completions zsh  > ~/.zfunc/_modcraft\n\
            \x20 modcraft completions fish > ~/.config/fish/completions/modcraft.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the modcraft configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 modcraft config get project.module_prefix\n\
            \x20 modcraft config list\n\
            \x20 modcraft config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `modcraft new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name or path.  A plain name creates `./name`; a path like
    /// `../foo` places the project one level up.
    #[arg(value_name = "NAME", help = "Project name or path")]
    pub name: String,

    /// Go module path written to go.mod.
    #[arg(
        short = 'm',
        long = "module",
        value_name = "PATH",
        help = "Go module path (default: <project.module_prefix>/<name>)"
    )]
    pub module: Option<String>,

    /// Extra modules on top of platform:base.
    #[arg(
        short = 'w',
        long = "with",
        value_name = "MODULE",
        value_delimiter = ',',
        help = "Additional module to apply (repeatable)"
    )]
    pub with: Vec<String>,

    /// Generation values.
    #[arg(
        short = 's',
        long = "set",
        value_name = "KEY=VALUE",
        help = "Set a generation value, e.g. gorm.driver=postgres (repeatable)"
    )]
    pub set: Vec<String>,

    /// Parent directory for the project.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Directory to create the project in (default: current directory)"
    )]
    pub output: Option<PathBuf>,

    /// Skip git init / go mod tidy.
    #[arg(long = "no-hooks", help = "Skip post-generation hooks")]
    pub no_hooks: bool,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Preview the resolved module order without writing any files.
    #[arg(long = "dry-run", help = "Show what would be applied without applying")]
    pub dry_run: bool,
}

// ── add ───────────────────────────────────────────────────────────────────────

/// Arguments for `modcraft add`.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Modules to add; requirements are pulled in automatically.
    #[arg(
        value_name = "MODULE",
        required = true,
        num_args = 1..,
        help = "Module names, e.g. http:gin"
    )]
    pub modules: Vec<String>,

    /// Generation values.
    #[arg(
        short = 's',
        long = "set",
        value_name = "KEY=VALUE",
        help = "Set a generation value (repeatable)"
    )]
    pub set: Vec<String>,

    /// Project directory.
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIR",
        default_value = ".",
        help = "Project directory"
    )]
    pub dir: PathBuf,

    /// Preview the resolved module order without writing any files.
    #[arg(long = "dry-run", help = "Show what would be applied without applying")]
    pub dry_run: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `modcraft list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only modules carrying this tag.
    #[arg(short = 't', long = "tag", value_name = "TAG", help = "Filter by tag")]
    pub tag: Option<String>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `modcraft completions`.
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

/// Subcommands for `modcraft config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `hooks.enabled`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_new_command() {
        let cli = Cli::parse_from([
            "modcraft", "new", "orders", "--with", "http:gin,db:gorm", "-w", "feature:makefile",
            "--set", "gorm.driver=postgres",
        ]);
        let Commands::New(args) = cli.command else {
            panic!("expected New command");
        };
        assert_eq!(args.name, "orders");
        assert_eq!(args.with, ["http:gin", "db:gorm", "feature:makefile"]);
        assert_eq!(args.set, ["gorm.driver=postgres"]);
        assert!(!args.no_hooks);
    }

    #[test]
    fn add_requires_a_module() {
        assert!(Cli::try_parse_from(["modcraft", "add"]).is_err());
        let cli = Cli::parse_from(["modcraft", "add", "http:gin", "grpc:server"]);
        let Commands::Add(args) = cli.command else {
            panic!("expected Add command");
        };
        assert_eq!(args.modules, ["http:gin", "grpc:server"]);
        assert_eq!(args.dir, PathBuf::from("."));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        // clap should reject --quiet --verbose together
        let result = Cli::try_parse_from(["modcraft", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
