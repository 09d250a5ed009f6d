//! Plain-text export files
//!
//! For every source two files are written into the output directory,
//! named after the source's sanitized export stem:
//!
//! - `<stem>.urls.txt`: one URL per line, in resolution order
//! - `<stem>.titles.tsv`: `url<TAB>title` per line, only when titles exist
//!
//! Distinct sources can share a stem (`a/b.xml` and `a_b.xml`, or the same
//! root given twice). Later sources then get `-2`, `-3`, ... appended to the
//! stem so no export file is overwritten.

use crate::output::aggregate::{AggregateReport, SourceReport};
use crate::output::traits::{OutputError, OutputHandler, OutputResult};
use crate::source::export_stem;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Writes URL lists and title tables per source
#[derive(Debug)]
pub struct TextExporter {
    directory: PathBuf,
    /// Stems already written during this export
    claimed: Mutex<HashSet<String>>,
}

impl TextExporter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            claimed: Mutex::new(HashSet::new()),
        }
    }

    /// URL list path of the first source exported under this root's stem
    pub fn urls_path(&self, source: &SourceReport) -> PathBuf {
        self.urls_file(&export_stem(source.root().as_str()))
    }

    /// Title table path of the first source exported under this root's stem
    pub fn titles_path(&self, source: &SourceReport) -> PathBuf {
        self.titles_file(&export_stem(source.root().as_str()))
    }

    fn urls_file(&self, stem: &str) -> PathBuf {
        self.directory.join(format!("{}.urls.txt", stem))
    }

    fn titles_file(&self, stem: &str) -> PathBuf {
        self.directory.join(format!("{}.titles.tsv", stem))
    }

    /// Reserves a stem for `source`, suffixing it if an earlier source took it
    fn claim_stem(&self, source: &SourceReport) -> String {
        let base = export_stem(source.root().as_str());
        let mut claimed = self.claimed.lock().unwrap_or_else(PoisonError::into_inner);

        let mut stem = base.clone();
        let mut n = 1;
        while claimed.contains(&stem) {
            n += 1;
            stem = format!("{}-{}", base, n);
        }
        if n > 1 {
            tracing::warn!(
                "Export name {} is already used, writing {} to {} instead",
                base,
                source.root(),
                stem
            );
        }

        claimed.insert(stem.clone());
        stem
    }

    fn ensure_directory(&self) -> OutputResult<()> {
        fs::create_dir_all(&self.directory).map_err(|source| OutputError::CreateDir {
            path: self.directory.clone(),
            source,
        })
    }
}

impl OutputHandler for TextExporter {
    fn write_source(&self, source: &SourceReport) -> OutputResult<Vec<PathBuf>> {
        self.ensure_directory()?;
        let stem = self.claim_stem(source);
        let mut written = Vec::new();

        let urls_path = self.urls_file(&stem);
        write_lines(&urls_path, source.result.urls.iter().map(String::as_str))?;
        written.push(urls_path);

        if let Some(titles) = &source.titles {
            let titles_path = self.titles_file(&stem);
            let rows = titles
                .iter()
                .map(|o| format!("{}\t{}", flatten_field(&o.url), flatten_field(&o.title.to_string())));
            write_lines(&titles_path, rows)?;
            written.push(titles_path);
        }

        tracing::info!(
            "Exported {} URLs for {}",
            source.result.urls.len(),
            source.root()
        );
        Ok(written)
    }

    fn finalize(&self, _report: &AggregateReport) -> OutputResult<Vec<PathBuf>> {
        Ok(Vec::new())
    }
}

fn write_lines<I, S>(path: &Path, lines: I) -> OutputResult<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let to_error = |source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(to_error)?;
    let mut out = BufWriter::new(file);
    for line in lines {
        out.write_all(line.as_ref().as_bytes()).map_err(to_error)?;
        out.write_all(b"\n").map_err(to_error)?;
    }
    out.flush().map_err(to_error)
}

/// Replaces tabs and line breaks so a value fits in one TSV cell
fn flatten_field(value: &str) -> String {
    value
        .chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect()
}
