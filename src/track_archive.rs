use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

/// One externally generated track visualization, described entirely by
/// its file name. Nothing about these files is persisted; every listing
/// re-derives its entries from the archive tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackArchiveEntry {
    pub mmsi: String,
    pub year: i32,
    pub month: u32,
    pub sequence: u32,
    pub filename: String,
}

/// One month's worth of archive material for a vessel within a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackArchiveMonth {
    pub month: u32,
    pub sequence: u32,
    pub filename: String,
}

/// Parse `<mmsi>_<year>_<month>_<sequence>.html` into an entry. Any file
/// that does not match exactly is excluded from listings, silently: the
/// archive tree is produced by an external renderer and stray files in
/// it are normal.
pub fn parse_archive_filename(mmsi: &str, filename: &str) -> Option<TrackArchiveEntry> {
    let stem = filename.strip_suffix(".html")?;
    let rest = stem.strip_prefix(mmsi)?.strip_prefix('_')?;

    let mut segments = rest.split('_');
    let year: i32 = segments.next()?.parse().ok()?;
    let month: u32 = segments.next()?.parse().ok()?;
    let sequence: u32 = segments.next()?.parse().ok()?;
    if segments.next().is_some() {
        return None;
    }

    Some(TrackArchiveEntry {
        mmsi: mmsi.to_string(),
        year,
        month,
        sequence,
        filename: filename.to_string(),
    })
}

/// A path segment taken from a request must stay a single plain name;
/// anything that could climb out of the archive root is refused.
fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && Path::new(segment).components().count() == 1
        && matches!(
            Path::new(segment).components().next(),
            Some(Component::Normal(_))
        )
}

/// Read-only index over the track archive tree
/// `<root>/<mmsi>/<mmsi>_<year>_<month>_<sequence>.html`. Scans are
/// uncached blocking I/O; callers run them on a blocking thread.
#[derive(Clone)]
pub struct TrackArchive {
    root: PathBuf,
}

impl TrackArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn scan(&self, mmsi: &str) -> Vec<TrackArchiveEntry> {
        if !is_safe_segment(mmsi) {
            return Vec::new();
        }

        let dir = self.root.join(mmsi);
        let Ok(entries) = std::fs::read_dir(&dir) else {
            // A vessel with no archive directory simply has no entries.
            return Vec::new();
        };

        entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name();
                parse_archive_filename(mmsi, name.to_str()?)
            })
            .collect()
    }

    /// All archive entries for a vessel, most recent year first, months
    /// in calendar order within a year.
    pub fn entries_for(&self, mmsi: &str) -> Vec<TrackArchiveEntry> {
        let mut entries = self.scan(mmsi);
        entries.sort_by(|a, b| {
            b.year
                .cmp(&a.year)
                .then(a.month.cmp(&b.month))
                .then(a.sequence.cmp(&b.sequence))
        });
        entries
    }

    /// Distinct years with archive material, most recent first.
    pub fn years_for(&self, mmsi: &str) -> Vec<i32> {
        let years: BTreeSet<i32> = self.scan(mmsi).into_iter().map(|e| e.year).collect();
        years.into_iter().rev().collect()
    }

    /// A vessel's archive months within one year, in calendar order.
    pub fn months_for(&self, mmsi: &str, year: i32) -> Vec<TrackArchiveMonth> {
        let mut months: Vec<TrackArchiveMonth> = self
            .scan(mmsi)
            .into_iter()
            .filter(|e| e.year == year)
            .map(|e| TrackArchiveMonth {
                month: e.month,
                sequence: e.sequence,
                filename: e.filename,
            })
            .collect();
        months.sort_by(|a, b| a.month.cmp(&b.month).then(a.sequence.cmp(&b.sequence)));
        months
    }

    /// The raw archive document, verbatim, by vessel and exact file name.
    /// `None` when the file is absent; a path-shaped filename is treated
    /// as absent rather than resolved.
    pub fn read_document(&self, mmsi: &str, filename: &str) -> Result<Option<String>> {
        if !is_safe_segment(mmsi) || !is_safe_segment(filename) || !filename.ends_with(".html") {
            return Ok(None);
        }

        let path = self.root.join(mmsi).join(filename);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive_with(files: &[(&str, &str)]) -> (tempfile::TempDir, TrackArchive) {
        let dir = tempfile::tempdir().unwrap();
        for (mmsi, name) in files {
            let vessel_dir = dir.path().join(mmsi);
            std::fs::create_dir_all(&vessel_dir).unwrap();
            std::fs::write(vessel_dir.join(name), format!("<html>{name}</html>")).unwrap();
        }
        let archive = TrackArchive::new(dir.path());
        (dir, archive)
    }

    #[test]
    fn filenames_parse_into_entries() {
        let entry = parse_archive_filename("357123456", "357123456_2024_03_2.html").unwrap();
        assert_eq!(entry.year, 2024);
        assert_eq!(entry.month, 3);
        assert_eq!(entry.sequence, 2);
        assert_eq!(entry.filename, "357123456_2024_03_2.html");
    }

    #[test]
    fn malformed_filenames_are_rejected() {
        assert!(parse_archive_filename("357123456", "badname.html").is_none());
        assert!(parse_archive_filename("357123456", "357123456_2024_03.html").is_none());
        assert!(parse_archive_filename("357123456", "357123456_2024_03_2_9.html").is_none());
        assert!(parse_archive_filename("357123456", "357123456_2024_xx_2.html").is_none());
        assert!(parse_archive_filename("357123456", "357123456_2024_03_2.htm").is_none());
        // A different vessel's file never parses under this MMSI.
        assert!(parse_archive_filename("357123456", "440004950_2024_03_2.html").is_none());
    }

    #[test]
    fn listings_sort_year_descending_then_month_ascending() {
        let (_dir, archive) = archive_with(&[
            ("357123456", "357123456_2023_11_1.html"),
            ("357123456", "357123456_2024_07_1.html"),
            ("357123456", "357123456_2024_02_1.html"),
            ("357123456", "badname.html"),
        ]);

        let entries = archive.entries_for("357123456");
        let keys: Vec<(i32, u32)> = entries.iter().map(|e| (e.year, e.month)).collect();
        assert_eq!(keys, vec![(2024, 2), (2024, 7), (2023, 11)]);
    }

    #[test]
    fn years_are_distinct_and_descending() {
        let (_dir, archive) = archive_with(&[
            ("357123456", "357123456_2023_11_1.html"),
            ("357123456", "357123456_2023_03_1.html"),
            ("357123456", "357123456_2025_01_1.html"),
        ]);

        assert_eq!(archive.years_for("357123456"), vec![2025, 2023]);
    }

    #[test]
    fn months_cover_one_year_in_calendar_order() {
        let (_dir, archive) = archive_with(&[
            ("357123456", "357123456_2024_09_1.html"),
            ("357123456", "357123456_2024_01_3.html"),
            ("357123456", "357123456_2023_12_1.html"),
        ]);

        let months = archive.months_for("357123456", 2024);
        assert_eq!(months.len(), 2);
        assert_eq!((months[0].month, months[0].sequence), (1, 3));
        assert_eq!((months[1].month, months[1].sequence), (9, 1));
    }

    #[test]
    fn unknown_vessels_list_nothing() {
        let (_dir, archive) = archive_with(&[("357123456", "357123456_2024_01_1.html")]);
        assert!(archive.entries_for("999999999").is_empty());
        assert!(archive.years_for("999999999").is_empty());
    }

    #[test]
    fn documents_come_back_verbatim() {
        let (_dir, archive) = archive_with(&[("357123456", "357123456_2024_03_2.html")]);

        let doc = archive
            .read_document("357123456", "357123456_2024_03_2.html")
            .unwrap();
        assert_eq!(doc.as_deref(), Some("<html>357123456_2024_03_2.html</html>"));

        let missing = archive
            .read_document("357123456", "357123456_2024_04_1.html")
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn traversal_segments_are_treated_as_absent() {
        let (_dir, archive) = archive_with(&[("357123456", "357123456_2024_03_2.html")]);

        assert!(
            archive
                .read_document("../357123456", "357123456_2024_03_2.html")
                .unwrap()
                .is_none()
        );
        assert!(
            archive
                .read_document("357123456", "../357123456_2024_03_2.html")
                .unwrap()
                .is_none()
        );
        assert!(archive.entries_for("..").is_empty());
    }
}
