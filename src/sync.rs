// Asset synchronization: pull the project's asset listing, make sure every
// thumbnail is present in the working directory and write the enriched
// listing to `<project>-assets.json`.
//
// The routine is fail-fast. The first listing or download error aborts the
// run and the snapshot is left untouched; thumbnails written so far stay.

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use log::{debug, info};
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};
use tempfile::NamedTempFile;

#[cfg(test)]
use mockall::automock;

use crate::asset::{thumbnail_file_name, Asset};
use crate::error::{CloudLabelError, Result};

/// Remote side of a sync. `ApiClient` is the HTTP implementation.
#[cfg_attr(test, automock)]
pub trait AssetSource {
    /// Full asset listing for a project, in service order.
    fn list_assets(&self, project: &str) -> Result<Vec<Asset>>;

    /// Raw bytes behind a thumbnail URL.
    fn fetch_thumbnail(&self, url: &str) -> Result<Vec<u8>>;
}

/// Outcome of a successful sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub assets: usize,
    pub downloaded: usize,
    pub cached: usize,
    pub without_thumbnail: usize,
    pub snapshot: PathBuf,
}

pub fn snapshot_file_name(project: &str) -> String {
    format!("{}-assets.json", project)
}

/// Synchronize `project` into `dir`.
///
/// A thumbnail already on disk is never fetched again, unless an earlier
/// asset of the same run downloaded a file under the same name, in which case
/// the later asset's download replaces it.
pub fn sync<S: AssetSource + ?Sized>(
    source: &S,
    project: &str,
    dir: &Path,
    progress: &ProgressBar,
) -> Result<SyncReport> {
    let mut assets = source.list_assets(project)?;
    info!("Fetched {} assets for project {}", assets.len(), project);

    progress.set_length(assets.len() as u64);
    let mut downloaded_this_run: HashSet<String> = HashSet::new();
    let mut report = SyncReport {
        assets: assets.len(),
        downloaded: 0,
        cached: 0,
        without_thumbnail: 0,
        snapshot: dir.join(snapshot_file_name(project)),
    };

    for asset in assets.iter_mut() {
        if let Some(url) = asset.thumbnail_url() {
            let file_name = thumbnail_file_name(url)?;
            let target = dir.join(&file_name);

            if target.is_file() && !downloaded_this_run.contains(&file_name) {
                debug!("Asset {:?}: {} already cached", asset.id(), file_name);
                report.cached += 1;
            } else {
                debug!("Downloading {} -> {}", url, target.display());
                let body = source.fetch_thumbnail(url)?;
                replace_file(dir, &target, &body)?;
                downloaded_this_run.insert(file_name.clone());
                report.downloaded += 1;
            }

            asset.set_thumbnail_path(&file_name);
        } else {
            report.without_thumbnail += 1;
        }
        progress.inc(1);
    }
    progress.finish();

    let json = render_snapshot(&assets)?;
    replace_file(dir, &report.snapshot, &json)?;
    info!(
        "Wrote {} ({} downloaded, {} cached)",
        report.snapshot.display(),
        report.downloaded,
        report.cached
    );
    Ok(report)
}

/// Pretty JSON with four-space indentation and non-ASCII characters escaped
/// as `\uXXXX`. Keys come out sorted because asset maps are ordered.
pub fn render_snapshot(assets: &[Asset]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, AsciiPrettyFormatter::new());
    assets.serialize(&mut ser)?;
    Ok(buf)
}

/// `PrettyFormatter` layout with ASCII-only string output.
struct AsciiPrettyFormatter<'a> {
    pretty: PrettyFormatter<'a>,
}

impl AsciiPrettyFormatter<'_> {
    fn new() -> Self {
        AsciiPrettyFormatter {
            pretty: PrettyFormatter::with_indent(b"    "),
        }
    }
}

impl Formatter for AsciiPrettyFormatter<'_> {
    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }
}

// Write to a temp file next to `target`, then rename over it.
fn replace_file(dir: &Path, target: &Path, contents: &[u8]) -> Result<()> {
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| CloudLabelError::io(dir, e))?;
    tmp.write_all(contents)
        .map_err(|e| CloudLabelError::io(tmp.path(), e))?;
    tmp.persist(target)
        .map_err(|e| CloudLabelError::io(target, e.error))?;
    Ok(())
}
