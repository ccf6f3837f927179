use std::{error::Error, fs, path::PathBuf};
use clap::Args;
use stubserver::{
    config::{loader::{load_registry, path_from_cwd}, settings::Settings},
    stub::catalogue::catalogue,
};
use tracing::info;

/// Validate an endpoints directory and write its catalogue to a file.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Directory of endpoint JSON files [env: JSON_FOLDER_PATH]
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Output filename for the catalogue JSON
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,
}

pub async fn run(args: BuildArgs) -> Result<(), Box<dyn Error>> {
    let dir = path_from_cwd(&args.dir.unwrap_or_else(|| Settings::from_env().endpoints_dir));
    let out = path_from_cwd(&args.output);
    info!(dir = %dir.display(), out = %out.display(), "starting build");

    // 1) Load and validate
    let registry = load_registry(&dir)?;

    // 2) Serialize + write
    let json = serde_json::to_string_pretty(&catalogue(&registry))?;
    fs::write(&out, json)?;

    info!(endpoints = registry.len(), "build succeeded");
    Ok(())
}
