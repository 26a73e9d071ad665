use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Record – one row of the uploaded roster
// ---------------------------------------------------------------------------

/// A single roster entry (one row of the source spreadsheet).
#[derive(Debug, Clone, Default)]
pub struct Record {
    pub name: String,
    pub handle: String,
    pub faction: String,
    /// Tags split from the delimited `Tags` cell: trimmed, empties dropped,
    /// order and duplicates preserved so the histogram counts mentions.
    pub tags: Vec<String>,
    pub bio: String,
    /// URL or path of the marker image, if the cell was non-empty.
    pub image_ref: Option<String>,
    /// Raw `GPS` cell, kept for diagnostics. Expected shape `"lat, lon"`.
    pub gps_raw: Option<String>,
    /// Present together with `longitude` or not at all; both finite when set.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub twitter_followers: Option<i64>,
    pub twitter_following: Option<i64>,
}

impl Record {
    /// Whether both coordinates were resolved from the GPS cell.
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Split a raw tag cell into clean tag labels.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// FollowerBucket – fixed intervals over the follower count
// ---------------------------------------------------------------------------

/// Follower-count intervals used by the filter radio group and the heatmap.
///
/// The boundaries mirror the upstream UI verbatim, including the hole
/// between 2000 and 3000 and the uneven edge handling at 1000 and 6000
/// (1000 closes `R200To1000`, 6000 closes `R3000To6000` and opens
/// `R6000To20000`). A count of 2500 matches no finite bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FollowerBucket {
    #[default]
    All,
    Lt200,
    R200To1000,
    R1000To2000,
    R3000To6000,
    R6000To20000,
    Gt20000,
}

impl FollowerBucket {
    /// The six non-`All` buckets, in display order (heatmap columns).
    pub const FINITE: [FollowerBucket; 6] = [
        FollowerBucket::Lt200,
        FollowerBucket::R200To1000,
        FollowerBucket::R1000To2000,
        FollowerBucket::R3000To6000,
        FollowerBucket::R6000To20000,
        FollowerBucket::Gt20000,
    ];

    /// Every selectable bucket, `All` first (filter radio group).
    pub const ALL_OPTIONS: [FollowerBucket; 7] = [
        FollowerBucket::All,
        FollowerBucket::Lt200,
        FollowerBucket::R200To1000,
        FollowerBucket::R1000To2000,
        FollowerBucket::R3000To6000,
        FollowerBucket::R6000To20000,
        FollowerBucket::Gt20000,
    ];

    /// Whether a follower count falls inside this bucket. An absent count
    /// passes only `All`.
    pub fn matches(self, followers: Option<i64>) -> bool {
        if self == FollowerBucket::All {
            return true;
        }
        let Some(n) = followers else {
            return false;
        };
        match self {
            FollowerBucket::All => true,
            FollowerBucket::Lt200 => n < 200,
            FollowerBucket::R200To1000 => (200..=1000).contains(&n),
            FollowerBucket::R1000To2000 => n > 1000 && n <= 2000,
            FollowerBucket::R3000To6000 => (3000..=6000).contains(&n),
            FollowerBucket::R6000To20000 => (6000..=20000).contains(&n),
            FollowerBucket::Gt20000 => n > 20000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FollowerBucket::All => "All",
            FollowerBucket::Lt200 => "< 200",
            FollowerBucket::R200To1000 => "200 – 1000",
            FollowerBucket::R1000To2000 => "1000 – 2000",
            FollowerBucket::R3000To6000 => "3000 – 6000",
            FollowerBucket::R6000To20000 => "6000 – 20000",
            FollowerBucket::Gt20000 => "> 20000",
        }
    }
}

impl fmt::Display for FollowerBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// FilterCriteria – snapshot of the active filter controls
// ---------------------------------------------------------------------------

/// Selected predicate parameters, rebuilt by the UI on every interaction.
/// An empty selection set means "nothing selected" and hides everything;
/// selecting every value is the no-op filter.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub allowed_factions: BTreeSet<String>,
    pub allowed_tags: BTreeSet<String>,
    pub follower_bucket: FollowerBucket,
}

impl FilterCriteria {
    /// Criteria that pass every record of the given dataset.
    pub fn select_all(dataset: &Dataset) -> Self {
        FilterCriteria {
            allowed_factions: dataset.factions.clone(),
            allowed_tags: dataset.tags.clone(),
            follower_bucket: FollowerBucket::All,
        }
    }
}

// ---------------------------------------------------------------------------
// MapMarker – minimal data to plot one record
// ---------------------------------------------------------------------------

/// One plottable point: coordinates, popup label, optional image.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
    pub image_ref: Option<String>,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded roster
// ---------------------------------------------------------------------------

/// The full parsed roster with pre-computed unique-value indices.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All records, in upload order.
    pub records: Vec<Record>,
    /// Sorted set of distinct faction labels (filter checklist source).
    pub factions: BTreeSet<String>,
    /// Sorted set of distinct tag labels across all records.
    pub tags: BTreeSet<String>,
}

impl Dataset {
    /// Build the unique-value indices from loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut factions = BTreeSet::new();
        let mut tags = BTreeSet::new();
        for rec in &records {
            factions.insert(rec.faction.clone());
            for tag in &rec.tags {
                tags.insert(tag.clone());
            }
        }
        Dataset {
            records,
            factions,
            tags,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows whose GPS cell did not resolve to a coordinate pair.
    pub fn missing_gps_count(&self) -> usize {
        self.records.iter().filter(|r| !r.has_coordinates()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_tags_trims_and_drops_empties() {
        assert_eq!(split_tags(" x, y ,, z"), vec!["x", "y", "z"]);
        assert!(split_tags("  ,  ,").is_empty());
        assert_eq!(split_tags("solo"), vec!["solo"]);
    }

    #[test]
    fn bucket_edges_match_upstream_scheme() {
        use FollowerBucket::*;
        assert!(Lt200.matches(Some(199)));
        assert!(!Lt200.matches(Some(200)));
        assert!(R200To1000.matches(Some(200)));
        assert!(R200To1000.matches(Some(1000)));
        assert!(!R1000To2000.matches(Some(1000)));
        assert!(R1000To2000.matches(Some(1001)));
        assert!(R1000To2000.matches(Some(2000)));
        assert!(R3000To6000.matches(Some(3000)));
        assert!(R3000To6000.matches(Some(6000)));
        // 6000 sits in two buckets upstream; reproduced as-is.
        assert!(R6000To20000.matches(Some(6000)));
        assert!(R6000To20000.matches(Some(20000)));
        assert!(Gt20000.matches(Some(20001)));
        assert!(!Gt20000.matches(Some(20000)));
    }

    #[test]
    fn bucket_gap_between_2000_and_3000() {
        // Upstream leaves 2000 < n < 3000 unmatched by every finite bucket.
        for bucket in FollowerBucket::FINITE {
            assert!(!bucket.matches(Some(2500)), "{bucket} matched 2500");
        }
        assert!(FollowerBucket::All.matches(Some(2500)));
    }

    #[test]
    fn bucket_1000_counted_once() {
        assert!(FollowerBucket::R200To1000.matches(Some(1000)));
        assert!(!FollowerBucket::R1000To2000.matches(Some(1000)));
    }

    #[test]
    fn absent_followers_pass_only_all() {
        assert!(FollowerBucket::All.matches(None));
        for bucket in FollowerBucket::FINITE {
            assert!(!bucket.matches(None));
        }
    }

    #[test]
    fn dataset_indices_cover_all_rows() {
        let records = vec![
            Record {
                faction: "Red".into(),
                tags: vec!["a".into(), "b".into()],
                ..Default::default()
            },
            Record {
                faction: "Blue".into(),
                tags: vec!["b".into()],
                ..Default::default()
            },
        ];
        let ds = Dataset::from_records(records);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.factions.iter().collect::<Vec<_>>(), vec!["Blue", "Red"]);
        assert_eq!(ds.tags.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
