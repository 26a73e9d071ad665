use std::collections::BTreeMap;

use super::model::{Dataset, FollowerBucket, MapMarker, Record};

// ---------------------------------------------------------------------------
// Derived views – histograms, contingency table, markers
// ---------------------------------------------------------------------------

/// Tag label → number of mentions across the input records.
pub type TagHistogram = BTreeMap<String, usize>;

/// Faction label → record count. `BTreeMap` keeps labels sorted for charts.
pub type FactionHistogram = BTreeMap<String, usize>;

/// (faction, finite bucket) → record count. Records without a follower
/// count appear in no cell.
pub type FollowerContingency = BTreeMap<(String, FollowerBucket), usize>;

/// Count tag mentions across the records. A tag repeated inside one record
/// counts each mention, so the counts sum to the total number of non-empty,
/// trimmed tag occurrences — not to the number of records.
pub fn tag_histogram<'a>(records: impl IntoIterator<Item = &'a Record>) -> TagHistogram {
    let mut hist = TagHistogram::new();
    for rec in records {
        for tag in &rec.tags {
            *hist.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    hist
}

/// Group histogram labels by their uppercased first character.
///
/// Presentation helper for the tag chart's per-letter pager; the counting in
/// [`tag_histogram`] is the invariant, this only reshapes it for display.
pub fn group_by_initial(hist: &TagHistogram) -> BTreeMap<char, Vec<(String, usize)>> {
    let mut groups: BTreeMap<char, Vec<(String, usize)>> = BTreeMap::new();
    for (label, &count) in hist {
        let Some(first) = label.chars().next() else {
            continue;
        };
        let initial = first.to_uppercase().next().unwrap_or(first);
        groups
            .entry(initial)
            .or_default()
            .push((label.clone(), count));
    }
    groups
}

/// Count records per faction.
pub fn faction_histogram<'a>(records: impl IntoIterator<Item = &'a Record>) -> FactionHistogram {
    let mut hist = FactionHistogram::new();
    for rec in records {
        *hist.entry(rec.faction.clone()).or_insert(0) += 1;
    }
    hist
}

/// Cross-tabulate faction against the six finite follower buckets.
///
/// Independent of GPS state. A record with an absent follower count is
/// skipped outright, never counted as zero; one that falls into the bucket
/// scheme's overlap at 6000 is counted in both overlapping cells, matching
/// the upstream intervals.
pub fn follower_contingency<'a>(
    records: impl IntoIterator<Item = &'a Record>,
) -> FollowerContingency {
    let mut table = FollowerContingency::new();
    for rec in records {
        if rec.twitter_followers.is_none() {
            continue;
        }
        for bucket in FollowerBucket::FINITE {
            if bucket.matches(rec.twitter_followers) {
                *table.entry((rec.faction.clone(), bucket)).or_insert(0) += 1;
            }
        }
    }
    table
}

/// One marker per record with resolved coordinates, in input order.
pub fn build_markers<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<MapMarker> {
    records
        .into_iter()
        .filter_map(|rec| {
            let (lat, lon) = (rec.latitude?, rec.longitude?);
            Some(MapMarker {
                latitude: lat,
                longitude: lon,
                label: format!("Name: {}, Faction: {}", rec.name, rec.faction),
                image_ref: rec.image_ref.clone(),
            })
        })
        .collect()
}

/// Centering hint for the map renderer: arithmetic mean of the marker
/// coordinates, `(0, 0)` when nothing resolved (the renderer then zooms out
/// to the whole world).
pub fn map_center(markers: &[MapMarker]) -> (f64, f64) {
    if markers.is_empty() {
        return (0.0, 0.0);
    }
    let n = markers.len() as f64;
    let lat = markers.iter().map(|m| m.latitude).sum::<f64>() / n;
    let lon = markers.iter().map(|m| m.longitude).sum::<f64>() / n;
    (lat, lon)
}

// ---------------------------------------------------------------------------
// Dataset stats – the "Total rows / Rows without GPS" block
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetStats {
    pub total_rows: usize,
    pub missing_gps: usize,
}

pub fn dataset_stats(dataset: &Dataset) -> DatasetStats {
    DatasetStats {
        total_rows: dataset.len(),
        missing_gps: dataset.missing_gps_count(),
    }
}
