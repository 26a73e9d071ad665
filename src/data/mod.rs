/// Data layer: core types, loading, coordinate resolution, filtering and
/// the derived views. UI-free and pure; the egui layer re-runs it on every
/// interaction.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → records (+ LoadCache by content digest)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ resolve   │  "lat, lon" cell → coordinates (best effort, per record)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, unique faction/tag indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  faction ∧ tags ∧ follower bucket → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ aggregate │  histograms, contingency table, map markers, stats
///   └──────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod resolve;
