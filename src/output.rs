//! Writing the enriched catalog to a file or stdout.
//!
//! File output is staged in a temporary file next to the destination and
//! renamed into place, so a failed write never leaves a truncated catalog.
use crate::catalog::Catalog;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Write `catalog` to `output_path`, or print it when no path is given.
pub fn save_or_display(catalog: &Catalog, output_path: Option<&Path>) -> Result<()> {
    let yaml = catalog.to_yaml_string()?;
    match output_path {
        Some(path) => {
            write_atomic(path, yaml.as_bytes())?;
            println!("Updated integrations saved to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(yaml.as_bytes())
                .context("write catalog to stdout")?;
            stdout.flush().context("flush stdout")?;
        }
    }
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("catalog");
    let tmp_path = parent.join(format!(".{file_name}.tmp"));
    fs::write(&tmp_path, bytes).with_context(|| format!("write {}", tmp_path.display()))?;
    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err).with_context(|| format!("publish {}", path.display()));
    }
    Ok(())
}
