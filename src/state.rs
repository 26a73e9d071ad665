use crate::color::FactionColors;
use crate::data::filter::filtered_indices;
use crate::data::loader::LoadCache;
use crate::data::model::{Dataset, FilterCriteria, FollowerBucket, Record};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which derived view fills the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTab {
    Map,
    Tags,
    Factions,
    Followers,
}

/// How the map renderer presents markers that carry an image reference:
/// plain icon dots, or labeled thumbnails. Presentation-only; the pipeline
/// attaches the image either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    Icon,
    Thumbnail,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded roster (None until the user opens a file).
    pub dataset: Option<Dataset>,

    /// Current filter-control snapshot.
    pub criteria: FilterCriteria,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Active central-panel tab.
    pub view: ViewTab,

    /// Marker presentation mode for the map tab.
    pub marker_style: MarkerStyle,

    /// When false (the upstream behavior) the tag/faction charts are
    /// computed from the unfiltered roster while the map follows the
    /// filters. The top bar can flip this to chart the filtered view.
    pub charts_follow_filters: bool,

    /// Selected letter page of the tag chart.
    pub tag_page: Option<char>,

    /// Faction → colour, rebuilt per dataset.
    pub faction_colors: FactionColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Memoized loader, keyed by content fingerprint.
    pub load_cache: LoadCache,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            criteria: FilterCriteria::default(),
            visible_indices: Vec::new(),
            view: ViewTab::Map,
            marker_style: MarkerStyle::Icon,
            charts_follow_filters: false,
            tag_page: None,
            faction_colors: FactionColors::default(),
            status_message: None,
            load_cache: LoadCache::default(),
        }
    }
}

impl AppState {
    /// Ingest a newly loaded roster: select everything, rebuild colours.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.criteria = FilterCriteria::select_all(&dataset);
        self.visible_indices = (0..dataset.len()).collect();
        self.faction_colors = FactionColors::new(&dataset.factions);
        self.tag_page = None;

        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.criteria);
        }
    }

    /// Records passing the current filters, in roster order.
    pub fn visible_records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.visible_indices
            .iter()
            .filter_map(move |&i| self.dataset.as_ref().and_then(|ds| ds.records.get(i)))
    }

    /// Input records for the tag/faction charts: the whole roster by
    /// default, the filtered view when `charts_follow_filters` is set.
    pub fn chart_records(&self) -> Box<dyn Iterator<Item = &Record> + '_> {
        match (&self.dataset, self.charts_follow_filters) {
            (Some(ds), false) => Box::new(ds.records.iter()),
            (Some(_), true) => Box::new(self.visible_records()),
            (None, _) => Box::new(std::iter::empty()),
        }
    }

    /// Toggle a single faction in the filter selection.
    pub fn toggle_faction(&mut self, faction: &str) {
        if !self.criteria.allowed_factions.remove(faction) {
            self.criteria.allowed_factions.insert(faction.to_string());
        }
        self.refilter();
    }

    /// Toggle a single tag in the filter selection.
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.criteria.allowed_tags.remove(tag) {
            self.criteria.allowed_tags.insert(tag.to_string());
        }
        self.refilter();
    }

    pub fn select_all_factions(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria.allowed_factions = ds.factions.clone();
            self.refilter();
        }
    }

    pub fn select_no_factions(&mut self) {
        self.criteria.allowed_factions.clear();
        self.refilter();
    }

    pub fn select_all_tags(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria.allowed_tags = ds.tags.clone();
            self.refilter();
        }
    }

    pub fn select_no_tags(&mut self) {
        self.criteria.allowed_tags.clear();
        self.refilter();
    }

    pub fn set_follower_bucket(&mut self, bucket: FollowerBucket) {
        self.criteria.follower_bucket = bucket;
        self.refilter();
    }
}
