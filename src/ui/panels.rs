use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::aggregate::dataset_stats;
use crate::data::model::FollowerBucket;
use crate::state::{AppState, MarkerStyle};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: faction and tag checklists plus the
/// follower-bucket radio group.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No roster loaded.");
            return;
        }
    };

    // Clone the label sets so we can mutate state inside the loops.
    let factions: Vec<String> = dataset.factions.iter().cloned().collect();
    let tags: Vec<String> = dataset.tags.iter().cloned().collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Faction checklist ----
            let header = format!(
                "Faction  ({}/{})",
                state.criteria.allowed_factions.len(),
                factions.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("faction_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_factions();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_factions();
                        }
                    });

                    for faction in &factions {
                        let mut checked = state.criteria.allowed_factions.contains(faction);
                        let swatch = state.faction_colors.color_for(faction);
                        let text = RichText::new(faction).color(swatch);
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_faction(faction);
                        }
                    }
                });

            // ---- Tag checklist ----
            let header = format!(
                "Tags  ({}/{})",
                state.criteria.allowed_tags.len(),
                tags.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("tag_filter")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_tags();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_tags();
                        }
                    });

                    for tag in &tags {
                        let mut checked = state.criteria.allowed_tags.contains(tag);
                        if ui.checkbox(&mut checked, tag).changed() {
                            state.toggle_tag(tag);
                        }
                    }
                });

            // ---- Follower bucket ----
            ui.separator();
            ui.strong("Twitter followers");
            let mut bucket = state.criteria.follower_bucket;
            for option in FollowerBucket::ALL_OPTIONS {
                ui.radio_value(&mut bucket, option, option.label());
            }
            if bucket != state.criteria.follower_bucket {
                state.set_follower_bucket(bucket);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let stats = dataset_stats(ds);
            ui.label(format!(
                "{} rows, {} visible, {} without GPS",
                stats.total_rows,
                state.visible_indices.len(),
                stats.missing_gps
            ));
        }

        ui.separator();

        if ui
            .selectable_label(state.charts_follow_filters, "Charts follow filters")
            .clicked()
        {
            state.charts_follow_filters = !state.charts_follow_filters;
        }

        let thumbnails = state.marker_style == MarkerStyle::Thumbnail;
        if ui.selectable_label(thumbnails, "Thumbnails").clicked() {
            state.marker_style = if thumbnails {
                MarkerStyle::Icon
            } else {
                MarkerStyle::Thumbnail
            };
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open roster")
        .add_filter("Supported files", &["xlsx", "csv", "json"])
        .add_filter("Excel", &["xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match state.load_cache.load(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records ({} without GPS) from {}",
                    dataset.len(),
                    dataset.missing_gps_count(),
                    path.display()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                // Keep the previous roster; only surface the message.
                log::error!("Failed to load file: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
