use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::bail;

use super::ui::constants::{DEFAULT_SUBDIR, PROMPT_CUSTOM_PATH, PROMPT_LOCATION};
use super::ui::prompt::Console;
use crate::cli::Args;

/// Replaces a leading `~` component with `home`.
pub(crate) fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    let (Some(home), Ok(rest)) = (home, path.strip_prefix("~")) else {
        return path.to_path_buf();
    };
    if rest.as_os_str().is_empty() {
        home.to_path_buf()
    } else {
        home.join(rest)
    }
}

/// Picks the download directory from the flags, or asks the operator.
pub(crate) fn resolve_destination<R: BufRead, W: Write>(
    args: &Args,
    console: &mut Console<R, W>,
    cwd: &Path,
    home: Option<&Path>,
) -> anyhow::Result<PathBuf> {
    if let Some(dir) = args.download_dir.as_deref() {
        return Ok(expand_home(dir, home));
    }
    let default_dir = cwd.join(DEFAULT_SUBDIR);
    if args.cwd {
        return Ok(default_dir);
    }

    let out = console.out();
    writeln!(out, "Where should comics be saved?")?;
    writeln!(out, "  1. Current directory ({})", default_dir.display())?;
    writeln!(out, "  2. Custom location")?;
    loop {
        let Some(choice) = console.ask(PROMPT_LOCATION)? else {
            bail!("input closed before a download location was chosen");
        };
        match choice.trim() {
            "1" => return Ok(default_dir),
            "2" => loop {
                let Some(path) = console.ask(PROMPT_CUSTOM_PATH)? else {
                    bail!("input closed before a download location was chosen");
                };
                let path = path.trim();
                if path.is_empty() {
                    writeln!(console.out(), "Please enter a path.")?;
                    continue;
                }
                return Ok(expand_home(Path::new(path), home));
            },
            _ => writeln!(console.out(), "Please enter 1 or 2.")?,
        }
    }
}
