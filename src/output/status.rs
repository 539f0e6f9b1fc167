//! Human-readable run summaries on stdout

use std::io::{self, Write};
use std::path::Path;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::concat::ExportReport;

/// Prints one-line summaries after a run.
pub struct StatusPrinter<W: WriteColor> {
    out: W,
}

impl StatusPrinter<StandardStream> {
    pub fn stdout(use_color: bool) -> Self {
        let choice = if use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::new(StandardStream::stdout(choice))
    }
}

impl<W: WriteColor> StatusPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// `Exported N files -> OUT`, plus a count of read failures if any.
    pub fn exported(&mut self, report: &ExportReport, output: &Path) -> io::Result<()> {
        self.out
            .set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(self.out, "Exported")?;
        self.out.reset()?;
        writeln!(
            self.out,
            " {} files -> {}",
            report.file_count(),
            output.display()
        )?;

        let failures = report.read_failures().count();
        if failures > 0 {
            self.out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
            write!(self.out, "Skipped")?;
            self.out.reset()?;
            writeln!(self.out, " {} unreadable files", failures)?;
        }
        Ok(())
    }

    /// `Tree written to OUT (D directories, F files)`.
    pub fn tree_written(&mut self, output: &Path, dirs: usize, files: usize) -> io::Result<()> {
        self.out
            .set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(self.out, "Tree written")?;
        self.out.reset()?;
        writeln!(
            self.out,
            " to {} ({} directories, {} files)",
            output.display(),
            dirs,
            files
        )
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
