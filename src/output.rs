use crate::error::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_DOTENV_VAR: &str = "VERSION";

/// Emits the decided version.
///
/// When `dotenv_file` is given it is created (or truncated) and receives
/// exactly one `<dotenv_var>=<version>` line. The version itself is always
/// written to `out` followed by a newline.
///
/// # Arguments
/// * `out` - Usually standard output
/// * `version` - The version to emit
/// * `dotenv_file` - Optional dotenv file for downstream CI jobs
/// * `dotenv_var` - Variable name used in the dotenv file
pub fn emit<W: Write>(
    out: &mut W,
    version: &str,
    dotenv_file: Option<&Path>,
    dotenv_var: &str,
) -> Result<()> {
    if let Some(path) = dotenv_file {
        let mut file = File::create(path)?;
        writeln!(file, "{}={}", dotenv_var, version)?;
        file.flush()?;
        debug!(path = %path.display(), "written to file");
    }

    writeln!(out, "{}", version)?;
    Ok(())
}
