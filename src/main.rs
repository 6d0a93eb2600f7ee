use anyhow::Result;
use bottles::commands::{self, DiscoveryOptions};
use bottles::config::{LINKS_FILE, PACKAGE_MANIFEST_FILE, PathConventions};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// bottles - discover deployable packages for a host application
///
/// Reads the application's .links file (and optionally a packages directory
/// and a directory of zip packages) and reports what it finds.
///
/// Examples:
///   bottles discover --trace       # Packages linked from the current directory
///   bottles check 1.2 1.5          # Does 1.5 satisfy a 1.2 minimum?
#[derive(Parser, Debug)]
#[command(author, version = env!("BOTTLES_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Application directory holding the link file (also via BOTTLES_APP_DIR)
    #[arg(
        long = "app-dir",
        short = 'a',
        env = "BOTTLES_APP_DIR",
        value_name = "PATH",
        default_value = ".",
        global = true
    )]
    pub app_dir: PathBuf,

    /// Name of the link file
    #[arg(
        long = "links-file",
        env = "BOTTLES_LINKS_FILE",
        value_name = "NAME",
        default_value = LINKS_FILE,
        global = true
    )]
    pub links_file: String,

    /// Name of the manifest file inside each package folder
    #[arg(
        long = "manifest-file",
        value_name = "NAME",
        default_value = PACKAGE_MANIFEST_FILE,
        global = true
    )]
    pub manifest_file: String,

    /// Content subfolder inside each package folder
    #[arg(
        long = "content-folder",
        value_name = "NAME",
        default_value = "content",
        global = true
    )]
    pub content_folder: String,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Discover packages and print them
    Discover(DiscoverArgs),

    /// Check whether an available version satisfies a minimum version
    Check(CheckArgs),

    /// Verify package requirements against available components
    Verify(VerifyArgs),

    /// List the folders declared in the link file
    Links,
}

#[derive(clap::Args, Debug)]
pub struct SourceArgs {
    /// Directory whose subfolders are packages
    #[arg(long = "packages-dir", value_name = "PATH")]
    pub packages_dir: Option<PathBuf>,

    /// Directory holding .zip packages
    #[arg(long = "archives-dir", value_name = "PATH")]
    pub archives_dir: Option<PathBuf>,

    /// Where zip packages are exploded (defaults to <archives-dir>/exploded)
    #[arg(long = "exploded-dir", value_name = "PATH", requires = "archives_dir")]
    pub exploded_dir: Option<PathBuf>,

    /// Stop at the first loader that fails instead of recording and continuing
    #[arg(long)]
    pub fail_fast: bool,
}

#[derive(clap::Args, Debug)]
pub struct DiscoverArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Print packages and trace as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the discovery trace to stderr
    #[arg(long)]
    pub trace: bool,
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Minimum required version (major.minor)
    #[arg(value_name = "MINIMUM")]
    pub minimum: String,

    /// Available version (major.minor)
    #[arg(value_name = "ACTUAL")]
    pub actual: String,
}

#[derive(clap::Args, Debug)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Available component as Name=major.minor (repeatable)
    #[arg(long = "available", value_name = "NAME=VERSION")]
    pub available: Vec<String>,
}

impl Cli {
    fn options(&self, sources: Option<&SourceArgs>) -> DiscoveryOptions {
        let mut options = DiscoveryOptions::new(self.app_dir.clone());
        options.content_folder = self.content_folder.clone();
        options.conventions = PathConventions::default()
            .with_link_file(self.links_file.clone())
            .with_manifest_file(self.manifest_file.clone());
        if let Some(sources) = sources {
            options.packages_dir = sources.packages_dir.clone();
            options.archives_dir = sources.archives_dir.clone();
            options.exploded_dir = sources.exploded_dir.clone();
            options.fail_fast = sources.fail_fast;
        }
        options
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = bottles::runtime::RealRuntime;

    let ok = match &cli.command {
        Commands::Discover(args) => {
            let options = cli.options(Some(&args.sources));
            commands::discover(runtime, &options, args.json, args.trace)?
        }
        Commands::Check(args) => commands::check(&args.minimum, &args.actual)?,
        Commands::Verify(args) => {
            let options = cli.options(Some(&args.sources));
            commands::verify(runtime, &options, &args.available)?
        }
        Commands::Links => {
            commands::links(runtime, &cli.options(None))?;
            true
        }
    };
    Ok(exit_code(ok))
}
