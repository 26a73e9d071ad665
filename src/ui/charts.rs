use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::data::aggregate::{
    faction_histogram, follower_contingency, group_by_initial, tag_histogram,
};
use crate::data::model::FollowerBucket;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Tag chart: bar chart of tag mentions, paged by first letter
// ---------------------------------------------------------------------------

pub fn tag_chart(ui: &mut Ui, state: &mut AppState) {
    let hist = tag_histogram(state.chart_records());
    let groups = group_by_initial(&hist);
    if groups.is_empty() {
        ui.label("No tags in the current view.");
        return;
    }

    // Keep the selected letter page valid across reloads and filter changes.
    let page = state
        .tag_page
        .filter(|c| groups.contains_key(c))
        .or_else(|| groups.keys().next().copied());
    state.tag_page = page;
    let Some(page) = page else {
        return;
    };

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Tags starting with");
        egui::ComboBox::from_id_salt("tag_page")
            .selected_text(page.to_string())
            .show_ui(ui, |ui: &mut Ui| {
                for initial in groups.keys() {
                    if ui
                        .selectable_label(page == *initial, initial.to_string())
                        .clicked()
                    {
                        state.tag_page = Some(*initial);
                    }
                }
            });
    });

    let entries = &groups[&page];
    let labels: Vec<String> = entries.iter().map(|(label, _)| label.clone()).collect();
    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, (label, count))| {
            Bar::new(i as f64, *count as f64)
                .name(label)
                .width(0.6)
        })
        .collect();

    Plot::new("tag_chart")
        .y_axis_label("Mentions")
        .x_axis_formatter(move |mark, _range| index_label(&labels, mark.value))
        .show_grid(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE));
        });
}

// ---------------------------------------------------------------------------
// Faction chart: record count per faction, sorted by label
// ---------------------------------------------------------------------------

pub fn faction_chart(ui: &mut Ui, state: &AppState) {
    let hist = faction_histogram(state.chart_records());
    if hist.is_empty() {
        ui.label("No records in the current view.");
        return;
    }

    let labels: Vec<String> = hist.keys().cloned().collect();
    let bars: Vec<Bar> = hist
        .iter()
        .enumerate()
        .map(|(i, (label, count))| {
            Bar::new(i as f64, *count as f64)
                .name(label)
                .fill(state.faction_colors.color_for(label))
                .width(0.6)
        })
        .collect();

    Plot::new("faction_chart")
        .y_axis_label("Records")
        .x_axis_formatter(move |mark, _range| index_label(&labels, mark.value))
        .show_grid(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Axis tick → category label for bar charts plotted at integer positions.
fn index_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 0.25 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Follower heatmap: faction rows × finite follower buckets
// ---------------------------------------------------------------------------

pub fn follower_heatmap(ui: &mut Ui, state: &AppState) {
    // Unlike the tag/faction charts, the contingency table always follows
    // the filters, matching the upstream view.
    let table = follower_contingency(state.visible_records());
    if table.is_empty() {
        ui.label("No follower counts in the current view.");
        return;
    }

    let factions: Vec<String> = {
        let mut labels: Vec<String> = table.keys().map(|(f, _)| f.clone()).collect();
        labels.sort();
        labels.dedup();
        labels
    };
    let max = table.values().copied().max().unwrap_or(1);

    egui::Grid::new("follower_heatmap")
        .spacing([4.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for bucket in FollowerBucket::FINITE {
                ui.label(RichText::new(bucket.label()).strong());
            }
            ui.end_row();

            for faction in &factions {
                ui.label(
                    RichText::new(faction).color(state.faction_colors.color_for(faction)),
                );
                for bucket in FollowerBucket::FINITE {
                    let count = table
                        .get(&(faction.clone(), bucket))
                        .copied()
                        .unwrap_or(0);
                    heat_cell(ui, count, max);
                }
                ui.end_row();
            }
        });
}

fn heat_cell(ui: &mut Ui, count: usize, max: usize) {
    let (rect, _) =
        ui.allocate_exact_size(egui::vec2(84.0, 28.0), egui::Sense::hover());
    ui.painter()
        .rect_filled(rect, egui::CornerRadius::same(2), heat_color(count, max));
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        count.to_string(),
        egui::FontId::proportional(12.0),
        if count == 0 {
            Color32::DARK_GRAY
        } else {
            Color32::BLACK
        },
    );
}

/// Zero cells stay dim; everything else ramps toward the accent colour.
fn heat_color(count: usize, max: usize) -> Color32 {
    if count == 0 {
        return Color32::from_gray(40);
    }
    let t = count as f32 / max.max(1) as f32;
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
    Color32::from_rgb(lerp(70, 255), lerp(70, 170), lerp(80, 40))
}
