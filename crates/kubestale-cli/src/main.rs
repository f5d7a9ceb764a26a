//! kubestale CLI - detect stale Kubernetes resources
//!
//! Exits with the number of live resources missing from the target manifests.

use clap::{Parser, ValueEnum};
use kubestale_core::ExitCodeMode;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod check;
mod display;
mod error;
mod exit_codes;

use check::{CheckOptions, OutputFormat};

#[derive(Parser)]
#[command(name = "kubestale")]
#[command(author = "kubestale Contributors")]
#[command(version)]
#[command(about = "Utility to detect k8s configuration drift", long_about = None)]
struct Cli {
    /// Target state manifests (YAML, multi-document); `-` reads stdin
    #[arg(short = 'f', long = "filename", value_name = "PATH")]
    filename: PathBuf,

    /// Kubernetes API server URL
    #[arg(long, env = "KUBESTALE_URL", value_name = "URL")]
    url: Option<String>,

    /// Blacklist rule file, one regular expression per line (repeatable)
    #[arg(long = "blacklist", value_name = "PATH")]
    blacklist: Vec<PathBuf>,

    /// Config file (default: <config dir>/kubestale/config.yaml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Exit with the stale count, or 1 when anything is stale
    #[arg(long = "exit-code", value_enum)]
    exit_code: Option<ExitCodeArg>,

    /// Enable debug output
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExitCodeArg {
    Count,
    Binary,
}

impl From<ExitCodeArg> for ExitCodeMode {
    fn from(arg: ExitCodeArg) -> Self {
        match arg {
            ExitCodeArg::Count => ExitCodeMode::Count,
            ExitCodeArg::Binary => ExitCodeMode::Binary,
        }
    }
}

impl From<Cli> for CheckOptions {
    fn from(cli: Cli) -> Self {
        Self {
            filename: cli.filename,
            url: cli.url,
            blacklist_files: cli.blacklist,
            config: cli.config,
            output: cli.output,
            exit_code: cli.exit_code.map(ExitCodeMode::from),
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(exit_codes::USAGE_ERROR);
        }
        // --help and --version
        Err(e) => e.exit(),
    };
    init_tracing(cli.debug);

    let code = match check::run(cli.into()).await {
        Ok(code) => code,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "kubestale",
            "-f",
            "-",
            "--url",
            "http://localhost:9000",
            "--blacklist",
            "a.txt",
            "--blacklist",
            "b.txt",
            "--output",
            "json",
            "--exit-code",
            "binary",
        ])
        .unwrap();
        let options = CheckOptions::from(cli);

        assert_eq!(options.filename, PathBuf::from("-"));
        assert_eq!(options.url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(
            options.blacklist_files,
            vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]
        );
        assert_eq!(options.output, OutputFormat::Json);
        assert_eq!(options.exit_code, Some(ExitCodeMode::Binary));
    }

    #[test]
    fn test_filename_is_required() {
        let err = Cli::try_parse_from(["kubestale"]).err().unwrap();
        assert!(err.use_stderr());
    }
}
