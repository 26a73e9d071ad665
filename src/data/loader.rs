use std::path::Path;

use calamine::{open_workbook, DataType, Reader, Xlsx};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{split_tags, Dataset, Record};
use super::resolve::resolve_all;

/// Recognized roster schema. Matched case-sensitively; every column is
/// required, column order is irrelevant.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "Name",
    "Handle",
    "Faction",
    "Tags",
    "Bio",
    "Image",
    "GPS",
    "TwFollowers",
    "TwFollowing",
];

/// Load failures that abort the current upload. Per-record problems (bad
/// GPS cells, absent counts) never surface here; they degrade to `None`
/// fields instead.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The byte stream could not be parsed as the expected tabular format.
    #[error("unreadable upload: {0}")]
    Format(String),
    /// A required column of the recognized schema is absent.
    #[error("missing required column '{column}'")]
    Schema { column: String },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a roster from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` – Excel workbook, first worksheet (the upload format)
/// * `.csv`  – header row with the recognized column names
/// * `.json` – records-oriented array of objects
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" => load_xlsx(path),
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => Err(LoadError::Format(format!(
            "unsupported file extension: .{other}"
        ))),
    }
}

/// Resolve coordinates for every record, then build the dataset indices.
fn finish(mut records: Vec<Record>) -> Dataset {
    resolve_all(&mut records);
    Dataset::from_records(records)
}

// ---------------------------------------------------------------------------
// Column lookup
// ---------------------------------------------------------------------------

/// Positions of the nine schema columns within a header row.
struct ColumnIndices {
    name: usize,
    handle: usize,
    faction: usize,
    tags: usize,
    bio: usize,
    image: usize,
    gps: usize,
    tw_followers: usize,
    tw_following: usize,
}

impl ColumnIndices {
    fn locate(headers: &[String]) -> Result<Self, LoadError> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| LoadError::Schema {
                    column: column.to_string(),
                })
        };
        Ok(ColumnIndices {
            name: find("Name")?,
            handle: find("Handle")?,
            faction: find("Faction")?,
            tags: find("Tags")?,
            bio: find("Bio")?,
            image: find("Image")?,
            gps: find("GPS")?,
            tw_followers: find("TwFollowers")?,
            tw_following: find("TwFollowing")?,
        })
    }
}

/// Trimmed cell text, `None` when empty (optional columns).
fn opt_string(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn parse_count(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(i);
    }
    // Spreadsheet exports often stringify integers as floats ("150.0").
    s.parse::<f64>().ok().map(|f| f as i64)
}

// ---------------------------------------------------------------------------
// Excel loader
// ---------------------------------------------------------------------------

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.trim().to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        DataType::Bool(b) => b.to_string(),
        DataType::Empty => String::new(),
        other => other.to_string(),
    }
}

fn cell_to_count(cell: &DataType) -> Option<i64> {
    match cell {
        DataType::Int(i) => Some(*i),
        DataType::Float(f) => Some(*f as i64),
        DataType::String(s) => parse_count(s),
        _ => None,
    }
}

/// Read the first worksheet of an xlsx workbook.
fn load_xlsx(path: &Path) -> Result<Dataset, LoadError> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).map_err(|e| LoadError::Format(format!("opening xlsx: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::Format("workbook has no worksheets".to_string()))?
        .map_err(|e| LoadError::Format(format!("reading worksheet: {e}")))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| LoadError::Format("worksheet is empty".to_string()))?;
    let headers: Vec<String> = header.iter().map(cell_to_string).collect();
    let idx = ColumnIndices::locate(&headers)?;

    let mut records = Vec::new();
    for row in rows {
        let cell = |i: usize| row.get(i).cloned().unwrap_or(DataType::Empty);
        records.push(Record {
            name: cell_to_string(&cell(idx.name)),
            handle: cell_to_string(&cell(idx.handle)),
            faction: cell_to_string(&cell(idx.faction)),
            tags: split_tags(&cell_to_string(&cell(idx.tags))),
            bio: cell_to_string(&cell(idx.bio)),
            image_ref: opt_string(cell_to_string(&cell(idx.image))),
            gps_raw: opt_string(cell_to_string(&cell(idx.gps))),
            twitter_followers: cell_to_count(&cell(idx.tw_followers)),
            twitter_following: cell_to_count(&cell(idx.tw_following)),
            ..Default::default()
        });
    }

    Ok(finish(records))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| LoadError::Format(format!("opening CSV: {e}")))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::Format(format!("reading CSV headers: {e}")))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let idx = ColumnIndices::locate(&headers)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.map_err(|e| LoadError::Format(format!("CSV row {row_no}: {e}")))?;
        let cell = |i: usize| row.get(i).unwrap_or("").trim().to_string();
        records.push(Record {
            name: cell(idx.name),
            handle: cell(idx.handle),
            faction: cell(idx.faction),
            tags: split_tags(&cell(idx.tags)),
            bio: cell(idx.bio),
            image_ref: opt_string(cell(idx.image)),
            gps_raw: opt_string(cell(idx.gps)),
            twitter_followers: parse_count(&cell(idx.tw_followers)),
            twitter_following: parse_count(&cell(idx.tw_following)),
            ..Default::default()
        });
    }

    Ok(finish(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn json_to_string(val: Option<&JsonValue>) -> String {
    match val {
        Some(JsonValue::String(s)) => s.trim().to_string(),
        Some(JsonValue::Number(n)) => n.to_string(),
        Some(JsonValue::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn json_to_count(val: Option<&JsonValue>) -> Option<i64> {
    match val? {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        JsonValue::String(s) => parse_count(s),
        _ => None,
    }
}

/// Records-oriented JSON: `[{"Name": ..., "Faction": ..., ...}, ...]`,
/// the default `df.to_json(orient='records')` shape.
fn load_json(path: &Path) -> Result<Dataset, LoadError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| LoadError::Format(format!("reading JSON file: {e}")))?;
    let root: JsonValue =
        serde_json::from_str(&text).map_err(|e| LoadError::Format(format!("parsing JSON: {e}")))?;

    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::Format("expected top-level JSON array".to_string()))?;

    // CSV/xlsx uploads always carry a header row to validate; an empty JSON
    // array carries nothing, so reject it rather than silently succeeding.
    let first = rows.first().ok_or_else(|| {
        LoadError::Format("empty JSON array: no rows to check the roster columns against".to_string())
    })?;
    let obj = first
        .as_object()
        .ok_or_else(|| LoadError::Format("row 0 is not a JSON object".to_string()))?;
    for column in REQUIRED_COLUMNS {
        if !obj.contains_key(column) {
            return Err(LoadError::Schema {
                column: column.to_string(),
            });
        }
    }

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| LoadError::Format(format!("row {i} is not a JSON object")))?;
        records.push(Record {
            name: json_to_string(obj.get("Name")),
            handle: json_to_string(obj.get("Handle")),
            faction: json_to_string(obj.get("Faction")),
            tags: split_tags(&json_to_string(obj.get("Tags"))),
            bio: json_to_string(obj.get("Bio")),
            image_ref: opt_string(json_to_string(obj.get("Image"))),
            gps_raw: opt_string(json_to_string(obj.get("GPS"))),
            twitter_followers: json_to_count(obj.get("TwFollowers")),
            twitter_following: json_to_count(obj.get("TwFollowing")),
            ..Default::default()
        });
    }

    Ok(finish(records))
}

// ---------------------------------------------------------------------------
// Load cache – memoize the last parse by content fingerprint
// ---------------------------------------------------------------------------

/// Memoizes the most recent successful load, keyed by a sha256 digest of the
/// file bytes. Re-rendering the same upload skips the parse; a new upload
/// (different bytes) or [`LoadCache::invalidate`] drops the entry. Errors
/// are never cached.
#[derive(Default)]
pub struct LoadCache {
    entry: Option<(String, Dataset)>,
}

impl LoadCache {
    /// Load through the cache.
    pub fn load(&mut self, path: &Path) -> Result<Dataset, LoadError> {
        let bytes = std::fs::read(path)
            .map_err(|e| LoadError::Format(format!("reading {}: {e}", path.display())))?;
        let fingerprint = sha256::digest(bytes.as_slice());

        if let Some((cached, dataset)) = &self.entry {
            if *cached == fingerprint {
                log::debug!("load cache hit for {}", path.display());
                return Ok(dataset.clone());
            }
        }

        let dataset = load_file(path)?;
        self.entry = Some((fingerprint, dataset.clone()));
        Ok(dataset)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CSV_HEADER: &str = "Name,Handle,Faction,Tags,Bio,Image,GPS,TwFollowers,TwFollowing";

    fn write_roster_csv(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("roster.csv");
        fs::write(&path, format!("{CSV_HEADER}\n{body}")).unwrap();
        path
    }

    #[test]
    fn csv_round_trip_resolves_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_roster_csv(
            dir.path(),
            concat!(
                "Ada,@ada,Red,\"math, pioneer\",First programmer,,\"51.5, -0.1\",1500,10\n",
                "Bob,@bob,Blue,sailor,At sea,,12.5,90,5\n",
            ),
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);

        let ada = &ds.records[0];
        assert_eq!(ada.name, "Ada");
        assert_eq!(ada.tags, vec!["math", "pioneer"]);
        assert_eq!(ada.latitude, Some(51.5));
        assert_eq!(ada.longitude, Some(-0.1));
        assert_eq!(ada.twitter_followers, Some(1500));
        assert!(ada.image_ref.is_none());

        // "12.5" has no comma: coordinates stay absent, the row stays in.
        let bob = &ds.records[1];
        assert!(bob.latitude.is_none() && bob.longitude.is_none());
        assert_eq!(ds.missing_gps_count(), 1);
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        // No Faction column.
        fs::write(
            &path,
            "Name,Handle,Tags,Bio,Image,GPS,TwFollowers,TwFollowing\nAda,@ada,x,,,,,\n",
        )
        .unwrap();

        match load_file(&path) {
            Err(LoadError::Schema { column }) => assert_eq!(column, "Faction"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_extension_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.parquet");
        fs::write(&path, b"whatever").unwrap();
        assert!(matches!(load_file(&path), Err(LoadError::Format(_))));
    }

    #[test]
    fn garbage_json_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_file(&path), Err(LoadError::Format(_))));
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.json");
        fs::write(
            &path,
            r#"[{
                "Name": "Ada", "Handle": "@ada", "Faction": "Red",
                "Tags": "math, pioneer", "Bio": "", "Image": null,
                "GPS": "51.5, -0.1", "TwFollowers": 1500, "TwFollowing": 10
            }]"#,
        )
        .unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].faction, "Red");
        assert_eq!(ds.records[0].latitude, Some(51.5));
        assert_eq!(ds.records[0].twitter_followers, Some(1500));
    }

    #[test]
    fn empty_json_array_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.json");
        fs::write(&path, "[]").unwrap();
        assert!(matches!(load_file(&path), Err(LoadError::Format(_))));
    }

    #[test]
    fn json_missing_column_is_a_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.json");
        fs::write(&path, r#"[{"Name": "Ada"}]"#).unwrap();
        assert!(matches!(load_file(&path), Err(LoadError::Schema { .. })));
    }

    #[test]
    fn cache_hits_on_identical_bytes_and_misses_after_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_roster_csv(dir.path(), "Ada,@ada,Red,x,,,\"1.0, 2.0\",100,1\n");

        let mut cache = LoadCache::default();
        let first = cache.load(&path).unwrap();
        let second = cache.load(&path).unwrap();
        assert_eq!(first.len(), second.len());

        // New upload with different content invalidates by fingerprint.
        fs::write(
            &path,
            format!("{CSV_HEADER}\nAda,@ada,Red,x,,,\"1.0, 2.0\",100,1\nBob,@bob,Blue,y,,,,5,\n"),
        )
        .unwrap();
        let third = cache.load(&path).unwrap();
        assert_eq!(third.len(), 2);

        cache.invalidate();
        assert_eq!(cache.load(&path).unwrap().len(), 2);
    }

    #[test]
    fn cache_does_not_keep_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        fs::write(&path, "Name\nAda\n").unwrap();

        let mut cache = LoadCache::default();
        assert!(cache.load(&path).is_err());

        fs::write(
            &path,
            format!("{CSV_HEADER}\nAda,@ada,Red,x,,,\"1.0, 2.0\",100,1\n"),
        )
        .unwrap();
        assert_eq!(cache.load(&path).unwrap().len(), 1);
    }

    #[test]
    fn count_parsing_accepts_float_exports() {
        assert_eq!(parse_count("150"), Some(150));
        assert_eq!(parse_count("150.0"), Some(150));
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("many"), None);
    }
}
