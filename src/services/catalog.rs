//! Movie catalog import
//!
//! The catalog offers the titles a user can pick from per genre. Source rows
//! look like `id,title,genres` where `genres` is `|`-separated and a title
//! containing commas is double-quoted. The first line is a header.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{BufRead, Read, Write};
use std::path::Path;

use crate::{error::AppResult, models::Catalog};

/// Splits one data row into its title and genres
///
/// Returns `None` for rows without three fields or with an empty title.
fn parse_row(line: &str) -> Option<(String, Vec<String>)> {
    let (_, rest) = line.split_once(',')?;
    let (title, genres) = rest.rsplit_once(',')?;

    let title = title.trim();
    let title = title
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .map(|t| t.replace("\"\"", "\""))
        .unwrap_or_else(|| title.to_string());
    if title.is_empty() {
        return None;
    }

    let genres = genres
        .split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect();

    Some((title, genres))
}

/// Reads a catalog, skipping the header and malformed rows
pub fn import_catalog<R: BufRead>(reader: R) -> AppResult<Catalog> {
    let mut by_genre: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut skipped = 0usize;

    for line in reader.lines().skip(1) {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_row(&line) {
            Some((title, genres)) => {
                for genre in genres {
                    by_genre.entry(genre).or_default().insert(title.clone());
                }
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, "Skipped malformed catalog rows");
    }
    tracing::info!(genres = by_genre.len(), "Catalog imported");

    Ok(by_genre
        .into_iter()
        .map(|(genre, titles)| (genre, titles.into_iter().collect()))
        .collect())
}

/// Reads a catalog file from disk
pub fn import_catalog_file(path: impl AsRef<Path>) -> AppResult<Catalog> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| {
        tracing::warn!(error = %e, path = %path.display(), "Cannot open catalog");
        e
    })?;
    import_catalog(std::io::BufReader::new(file))
}

/// Writes an imported catalog as a JSON object of genre to titles
pub fn write_catalog_snapshot<W: Write>(catalog: &Catalog, writer: W) -> AppResult<()> {
    serde_json::to_writer_pretty(writer, catalog)?;
    tracing::debug!(genres = catalog.len(), "Catalog snapshot written");
    Ok(())
}

/// Reads a snapshot written by [`write_catalog_snapshot`]
///
/// Titles are re-sorted and deduplicated, so hand-edited snapshots load the
/// same way an imported catalog does.
pub fn read_catalog_snapshot<R: Read>(reader: R) -> AppResult<Catalog> {
    let raw: BTreeMap<String, Vec<String>> = serde_json::from_reader(reader)?;

    Ok(raw
        .into_iter()
        .map(|(genre, titles)| {
            let titles: BTreeSet<String> = titles.into_iter().collect();
            (genre, titles.into_iter().collect())
        })
        .collect())
}
