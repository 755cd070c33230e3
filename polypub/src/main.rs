mod commands;
mod formatting;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use polypub_core::options::Access;
use tracing::Level;

#[derive(Parser)]
#[command(name = "polypub")]
#[command(about = "Build and publish workspace packages in dependency order")]
pub struct Cli {
    /// Workspace root containing the root package.json.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Dist-tag to publish under.
    #[arg(long, required_unless_present = "list")]
    pub tag: Option<String>,

    /// Print the resolved publish order and exit.
    #[arg(long, action)]
    pub list: bool,

    /// Print the list as JSON.
    #[arg(long, action, requires = "list")]
    pub json: bool,

    /// Only act on these packages and their internal dependencies.
    #[arg(long, value_name = "NAME")]
    pub only: Vec<String>,

    /// Never act on these packages.
    #[arg(long, value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Fail if an excluded package is required by an --only package.
    #[arg(long, action)]
    pub strict_exclude: bool,

    /// Publish for real (asks for confirmation).
    #[arg(long, action)]
    pub publish: bool,

    /// Publish for real without asking.
    #[arg(short = 'y', long, action)]
    pub yes: bool,

    /// Force a dry run even with --publish or --yes.
    #[arg(long, action)]
    pub dry_run: bool,

    #[arg(long, action)]
    pub skip_build: bool,

    #[arg(long, action)]
    pub tolerate_republish: bool,

    /// Skip the clean working tree check.
    #[arg(long, action)]
    pub allow_dirty: bool,

    /// Let the publish command run lifecycle scripts.
    #[arg(long, action)]
    pub run_scripts: bool,

    #[arg(long)]
    pub registry: Option<String>,

    #[arg(long, value_enum)]
    pub access: Option<AccessArg>,

    /// One-time password for the registry.
    #[arg(long)]
    pub otp: Option<String>,

    /// Package manager executable (default from polypub.toml, else npm).
    #[arg(long)]
    pub client: Option<String>,

    /// Write a JSON results report to this path.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[arg(short, long, action)]
    pub quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy)]
pub enum AccessArg {
    Public,
    Restricted,
}

impl From<AccessArg> for Access {
    fn from(arg: AccessArg) -> Self {
        match arg {
            AccessArg::Public => Access::Public,
            AccessArg::Restricted => Access::Restricted,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let code = match commands::run(cli) {
        Ok(code) => code,
        Err(e) => {
            formatting::print_error(&format!("{:#}", e));
            1
        }
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
