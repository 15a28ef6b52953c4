use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::process;

use gitlab_ci_semver_labels::cli::orchestration;
use gitlab_ci_semver_labels::cli::Args;
use gitlab_ci_semver_labels::config::{self, FileConfig, Settings};
use gitlab_ci_semver_labels::gitlab::ProcessEnv;
use gitlab_ci_semver_labels::logging;

fn main() {
    logging::init(&ProcessEnv);

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Help and version go to stdout and are not failures.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    let file = match load_file_config() {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    let settings = Settings::resolve(&args.global, args.bump_args(), file, &ProcessEnv);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Err(e) = orchestration::run_workflow(&settings, args.mode(), &ProcessEnv, &mut out) {
        eprintln!("Error: {}", e);
        process::exit(2);
    }
}

fn load_file_config() -> Result<FileConfig> {
    match config::find_config_file(Path::new(".")) {
        Some(path) => config::load_config(&path)
            .with_context(|| format!("loading {}", path.display())),
        None => Ok(FileConfig::default()),
    }
}
