use eframe::egui;

use crate::state::{AppState, ViewTab};
use crate::ui::{charts, map, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RosterAtlasApp {
    pub state: AppState,
}

impl eframe::App for RosterAtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + stats + view toggles ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active view ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                for (tab, label) in [
                    (ViewTab::Map, "Map"),
                    (ViewTab::Tags, "Tags"),
                    (ViewTab::Factions, "Factions"),
                    (ViewTab::Followers, "Followers"),
                ] {
                    if ui.selectable_label(self.state.view == tab, label).clicked() {
                        self.state.view = tab;
                    }
                }
            });
            ui.separator();

            match self.state.view {
                ViewTab::Map => map::map_view(ui, &self.state),
                ViewTab::Tags => charts::tag_chart(ui, &mut self.state),
                ViewTab::Factions => charts::faction_chart(ui, &self.state),
                ViewTab::Followers => charts::follower_heatmap(ui, &self.state),
            }
        });
    }
}
