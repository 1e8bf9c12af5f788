use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

pub const USAGE: &str =
    "Usage: kuvera_parser <capital_gains_report.html> <cleartax_template.xlsx> <output.xlsx>";

/// Paths for one conversion run, taken from the three positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub report_path: PathBuf,
    pub template_path: PathBuf,
    pub output_path: PathBuf,
}

impl Config {
    pub fn from_args(args: &[String]) -> Result<Self> {
        let [report, template, output] = args else {
            bail!("expected 3 arguments, got {}\n{}", args.len(), USAGE);
        };

        let cfg = Config {
            report_path: PathBuf::from(report),
            template_path: PathBuf::from(template),
            output_path: PathBuf::from(output),
        };

        if resolve(&cfg.output_path) == resolve(&cfg.template_path) {
            bail!(
                "Output path {} is the template itself; choose a different output file",
                cfg.output_path.display()
            );
        }

        Ok(cfg)
    }
}

/// Absolute form of `path` with `.`/`..` and symlinks resolved. A file that
/// does not exist yet is resolved through its parent directory.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return path.to_path_buf();
    };
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    fs::canonicalize(parent)
        .map(|dir| dir.join(name))
        .unwrap_or_else(|_| path.to_path_buf())
}
