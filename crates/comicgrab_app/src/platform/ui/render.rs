use std::io::{self, Write};
use std::path::Path;

use comicgrab_core::{AppViewModel, Notice, Summary};

use super::constants::RULE_WIDTH;

fn rule(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

/// Numbered listing with a downloaded marker per row.
pub fn render_listing(out: &mut impl Write, view: &AppViewModel) -> io::Result<()> {
    writeln!(out)?;
    rule(out)?;
    for row in &view.rows {
        let marker = if row.downloaded { "✓" } else { "○" };
        writeln!(out, "{:3}. [{}] {}", row.number, marker, row.title)?;
    }
    rule(out)?;
    writeln!(out, "Total: {} comics", view.rows.len())
}

pub fn render_notices(out: &mut impl Write, notices: &[Notice]) -> io::Result<()> {
    for notice in notices {
        match notice {
            Notice::NoResults => writeln!(out, "No comics found.")?,
            Notice::Found { count } => writeln!(out, "Found {count} comics.")?,
            Notice::RejectedToken(token) => writeln!(out, "{token}")?,
            Notice::NoValidSelections => {
                writeln!(out, "No valid selections. Please try again.")?
            }
            Notice::Goodbye => writeln!(out, "Goodbye!")?,
        }
    }
    Ok(())
}

pub fn render_pending(out: &mut impl Write, titles: &[String]) -> io::Result<()> {
    writeln!(out, "\nYou selected {} comics:", titles.len())?;
    for title in titles {
        writeln!(out, "  - {title}")?;
    }
    Ok(())
}

pub fn render_summary(
    out: &mut impl Write,
    summary: &Summary,
    destination: &Path,
) -> io::Result<()> {
    writeln!(out)?;
    rule(out)?;
    writeln!(out, "Download Summary")?;
    writeln!(out, "  Attempted:  {}", summary.attempted)?;
    writeln!(out, "  Successful: {}", summary.succeeded)?;
    writeln!(out, "  Failed:     {}", summary.failed)?;
    writeln!(out, "  Location:   {}", destination.display())?;
    rule(out)
}
