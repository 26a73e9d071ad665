use super::model::{Dataset, FilterCriteria, Record};

// ---------------------------------------------------------------------------
// Filter engine – conjunction of the three filter controls
// ---------------------------------------------------------------------------

/// Whether a record passes the current criteria. Conjunction of:
///
/// * faction: the record's faction is among the selected ones,
/// * tags: the record carries at least one selected tag (OR across tags),
/// * follower bucket: `All` passes everything, a finite bucket requires a
///   present count inside its interval.
///
/// An empty faction or tag selection means nothing is selected, so every
/// record fails. That degrades to an empty view, never an error.
pub fn record_matches(record: &Record, criteria: &FilterCriteria) -> bool {
    if !criteria.allowed_factions.contains(&record.faction) {
        return false;
    }
    if !record
        .tags
        .iter()
        .any(|tag| criteria.allowed_tags.contains(tag))
    {
        return false;
    }
    criteria.follower_bucket.matches(record.twitter_followers)
}

/// Return indices of records that pass all active filters.
///
/// Keeps dataset order; the result is always a subset of `0..dataset.len()`.
pub fn filtered_indices(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| record_matches(rec, criteria))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{split_tags, FollowerBucket};

    fn record(faction: &str, tags: &str, followers: Option<i64>) -> Record {
        Record {
            faction: faction.to_string(),
            tags: split_tags(tags),
            twitter_followers: followers,
            ..Default::default()
        }
    }

    fn sample_dataset() -> Dataset {
        Dataset::from_records(vec![
            record("A", "x, y", Some(150)),
            record("B", "y", Some(5000)),
        ])
    }

    #[test]
    fn select_all_passes_every_record() {
        let ds = sample_dataset();
        let criteria = FilterCriteria::select_all(&ds);
        assert_eq!(filtered_indices(&ds, &criteria), vec![0, 1]);
    }

    #[test]
    fn filtering_never_adds_rows() {
        let ds = sample_dataset();
        let criteria = FilterCriteria::select_all(&ds);
        assert!(filtered_indices(&ds, &criteria).len() <= ds.len());
    }

    #[test]
    fn conjunction_scenario() {
        // Faction A + tag y + bucket All selects exactly the first record.
        let ds = sample_dataset();
        let criteria = FilterCriteria {
            allowed_factions: ["A".to_string()].into(),
            allowed_tags: ["y".to_string()].into(),
            follower_bucket: FollowerBucket::All,
        };
        assert_eq!(filtered_indices(&ds, &criteria), vec![0]);
    }

    #[test]
    fn tag_predicate_is_or_across_tags() {
        let ds = sample_dataset();
        let criteria = FilterCriteria {
            allowed_factions: ds.factions.clone(),
            allowed_tags: ["x".to_string()].into(),
            follower_bucket: FollowerBucket::All,
        };
        // Record 0 has tags {x, y}; selecting only x still keeps it.
        assert_eq!(filtered_indices(&ds, &criteria), vec![0]);
    }

    #[test]
    fn empty_tag_selection_hides_everything() {
        let ds = sample_dataset();
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.allowed_tags.clear();
        assert!(filtered_indices(&ds, &criteria).is_empty());
    }

    #[test]
    fn empty_faction_selection_hides_everything() {
        let ds = sample_dataset();
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.allowed_factions.clear();
        assert!(filtered_indices(&ds, &criteria).is_empty());
    }

    #[test]
    fn bucket_filter_requires_present_count() {
        let ds = Dataset::from_records(vec![
            record("A", "x", Some(150)),
            record("A", "x", None),
        ]);
        let mut criteria = FilterCriteria::select_all(&ds);
        criteria.follower_bucket = FollowerBucket::Lt200;
        assert_eq!(filtered_indices(&ds, &criteria), vec![0]);

        criteria.follower_bucket = FollowerBucket::All;
        assert_eq!(filtered_indices(&ds, &criteria), vec![0, 1]);
    }

    #[test]
    fn order_is_preserved() {
        let ds = Dataset::from_records(vec![
            record("A", "x", Some(1)),
            record("B", "x", Some(2)),
            record("A", "x", Some(3)),
        ]);
        let criteria = FilterCriteria {
            allowed_factions: ["A".to_string()].into(),
            allowed_tags: ["x".to_string()].into(),
            follower_bucket: FollowerBucket::All,
        };
        assert_eq!(filtered_indices(&ds, &criteria), vec![0, 2]);
    }
}
