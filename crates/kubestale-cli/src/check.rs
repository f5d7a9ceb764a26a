//! Drift check - compare target manifests with the live cluster

use kubestale_core::{
    Blacklist, Config, DriftAnalyzer, ExitCodeMode, config::DEFAULT_URL, read_target_path,
    target::STDIN_PATH,
};
use kubestale_kube::{HttpClusterApi, LiveStateEnumerator};
use std::path::{Path, PathBuf};

use crate::display::{self, JsonReport};
use crate::error::Result;

/// Report format on stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Everything a check needs, as given on the command line
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub filename: PathBuf,
    pub url: Option<String>,
    pub blacklist_files: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub output: OutputFormat,
    pub exit_code: Option<ExitCodeMode>,
}

/// Options after layering the config file under the command line
#[derive(Debug, Clone, PartialEq)]
struct Settings {
    url: String,
    rule_files: Vec<PathBuf>,
    inline_rules: Vec<String>,
    exit_code: ExitCodeMode,
}

impl Settings {
    fn resolve(options: &CheckOptions, config: Config) -> Self {
        let mut rule_files = config.blacklist_files;
        rule_files.extend(options.blacklist_files.iter().cloned());

        Self {
            url: options
                .url
                .clone()
                .or(config.url)
                .unwrap_or_else(|| DEFAULT_URL.to_string()),
            rule_files,
            inline_rules: config.blacklist,
            exit_code: options.exit_code.or(config.exit_code).unwrap_or_default(),
        }
    }
}

/// Run a check and return the process exit code
pub async fn run(options: CheckOptions) -> Result<i32> {
    let config = match &options.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let settings = Settings::resolve(&options, config);

    for file in &settings.rule_files {
        display::step(format!("Reading blacklist file {}...", file.display()));
    }
    let blacklist = build_blacklist(&settings)?;
    tracing::debug!("{} blacklist rules", blacklist.len());

    display::step(format!(
        "Retrieving target state from {}...",
        describe_input(&options.filename)
    ));
    let target = read_target_path(&options.filename)?;
    tracing::debug!("{} target resources", target.len());

    display::step(format!("Retrieving live state from {}...", settings.url));
    let api = HttpClusterApi::new(&settings.url)?;
    let live = LiveStateEnumerator::new(&api).enumerate().await?;
    let snapshot_at = chrono::Utc::now();

    let report = DriftAnalyzer::new(&blacklist).analyze(&target, &live);

    match options.output {
        OutputFormat::Text => print!("{}", report),
        OutputFormat::Json => println!(
            "{}",
            JsonReport::new(api.base_url(), snapshot_at, &report).to_json()?
        ),
    }
    display::summary(&report);

    Ok(report.exit_code(settings.exit_code))
}

/// Built-in rules, then rule files, then inline patterns from the config
fn build_blacklist(settings: &Settings) -> Result<Blacklist> {
    let mut builder = Blacklist::builder();
    for file in &settings.rule_files {
        builder = builder.rule_file(file)?;
    }
    Ok(builder.patterns(settings.inline_rules.iter().cloned()).build()?)
}

fn describe_input(path: &Path) -> String {
    if path == Path::new(STDIN_PATH) {
        "stdin".to_string()
    } else {
        path.display().to_string()
    }
}
