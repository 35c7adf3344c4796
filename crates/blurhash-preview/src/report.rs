//! The text report: one `<file> - <data uri>` line per rendered image.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};

/// Report entry for one successfully rendered image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub file_name: String,
    pub data_uri: String,
}

impl ReportLine {
    pub fn new(file_name: impl Into<String>, data_uri: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            data_uri: data_uri.into(),
        }
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} - {}", self.file_name, self.data_uri)
    }
}

/// Ordered, append-only set of report lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    lines: Vec<ReportLine>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: ReportLine) {
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    /// All lines concatenated, each terminated by `\n`.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Replace `path` with the rendered report.
    ///
    /// The content goes to a sibling temporary file first and is renamed
    /// over `path`, so readers never see a partial report.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let wrap = |source: io::Error| Error::ReportWrite {
            path: path.to_path_buf(),
            source,
        };

        let mut tmp_name = path
            .file_name()
            .ok_or_else(|| wrap(io::Error::new(io::ErrorKind::InvalidInput, "no file name")))?
            .to_os_string();
        tmp_name.push(".tmp");
        let tmp = path.with_file_name(tmp_name);

        fs::write(&tmp, self.render()).map_err(wrap)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(wrap(e));
        }
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.lines.iter().try_for_each(|line| write!(f, "{line}"))
    }
}

impl Extend<ReportLine> for Report {
    fn extend<I: IntoIterator<Item = ReportLine>>(&mut self, iter: I) {
        self.lines.extend(iter);
    }
}

impl FromIterator<ReportLine> for Report {
    fn from_iter<I: IntoIterator<Item = ReportLine>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}
