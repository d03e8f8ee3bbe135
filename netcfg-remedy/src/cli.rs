use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use netcfg_remedy::driver::BUILTIN_DRIVERS;

fn driver_help() -> String {
    format!("Built-in driver pack name ({})", BUILTIN_DRIVERS.join(", "))
}

#[derive(Parser, Debug)]
#[command(name = "netcfg-remedy")]
#[command(about = "Generate and project remediation plans for device configurations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Compute the commands that bring a running config to a target config.
    Remediate(RemediateArgs),
    /// Show the config a device would hold after remediation is applied.
    Predict(PredictArgs),
    /// Compute the commands that undo a previously applied change.
    Rollback(RollbackArgs),
    /// Show the parsed structure of a single config file.
    Inspect(InspectArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
pub struct DriverArgs {
    #[arg(long, default_value = "generic", conflicts_with = "driver_file", help = driver_help())]
    pub driver: String,
    /// Load the driver pack from a TOML file instead.
    #[arg(long)]
    pub driver_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct RemediateArgs {
    pub running: PathBuf,
    pub target: PathBuf,
    #[command(flatten)]
    pub driver: DriverArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Prefix every line with +/-/space instead of paste-ready output.
    #[arg(long)]
    pub marked: bool,
    /// Print counts only.
    #[arg(long)]
    pub summary: bool,
    /// Only emit remediation lines carrying this tag.
    #[arg(long)]
    pub tag: Option<String>,
    /// Write the remediation to a file as well as stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Fail when the differ reports diagnostics.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct PredictArgs {
    pub running: PathBuf,
    pub target: PathBuf,
    #[command(flatten)]
    pub driver: DriverArgs,
    /// Close rule-known sections with their explicit exit command.
    #[arg(long)]
    pub with_exits: bool,
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct RollbackArgs {
    /// Config as it stands after the change was applied.
    pub applied: PathBuf,
    /// Config to return to.
    pub original: PathBuf,
    #[command(flatten)]
    pub driver: DriverArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    #[arg(long)]
    pub marked: bool,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    pub file: PathBuf,
    #[command(flatten)]
    pub driver: DriverArgs,
    #[arg(long, default_value_t = 3)]
    pub depth: usize,
    /// Only show subtrees carrying this tag.
    #[arg(long)]
    pub tag: Option<String>,
}
