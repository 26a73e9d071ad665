use std::collections::BTreeMap;

use eframe::egui::{self, Pos2, RichText, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoint, Points, Text};

use crate::data::aggregate::{build_markers, map_center};
use crate::data::model::MapMarker;
use crate::state::{AppState, MarkerStyle};

// ---------------------------------------------------------------------------
// Map view (central panel): markers of the filtered roster
// ---------------------------------------------------------------------------

/// Render the filtered records as a lon/lat scatter, one series per faction.
pub fn map_view(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a roster to view the map  (File → Open…)");
        });
        return;
    }

    // Group resolved coordinates by faction for legend + colour.
    let mut by_faction: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for rec in state.visible_records() {
        if let (Some(lat), Some(lon)) = (rec.latitude, rec.longitude) {
            by_faction
                .entry(rec.faction.as_str())
                .or_default()
                .push([lon, lat]);
        }
    }

    let markers = build_markers(state.visible_records());
    let (center_lat, center_lon) = map_center(&markers);
    let labeled = state.marker_style == MarkerStyle::Thumbnail;

    let mut plot = Plot::new("roster_map")
        .legend(Legend::default())
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .data_aspect(1.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    if markers.is_empty() {
        // Nothing resolved: zoom out to the whole world around (0, 0).
        plot = plot
            .include_x(-180.0)
            .include_x(180.0)
            .include_y(-90.0)
            .include_y(90.0);
    } else {
        plot = plot.include_x(center_lon).include_y(center_lat);
    }

    let response = plot.show(ui, |plot_ui| {
        for (faction, points) in &by_faction {
            let color = state.faction_colors.color_for(faction);
            plot_ui.points(
                Points::new(points.clone())
                    .name(*faction)
                    .color(color)
                    .shape(MarkerShape::Circle)
                    .radius(if labeled { 6.0 } else { 4.0 }),
            );
        }

        if labeled {
            for marker in &markers {
                plot_ui.text(Text::new(
                    PlotPoint::new(marker.longitude, marker.latitude),
                    RichText::new(marker.label.as_str()).size(10.0),
                ));
            }
        }
    });

    // Thumbnail mode: hovering a marker pops up its label and image.
    if labeled {
        if let Some(pointer) = response.response.hover_pos() {
            let screen: Vec<Pos2> = markers
                .iter()
                .map(|m| {
                    response
                        .transform
                        .position_from_point(&PlotPoint::new(m.longitude, m.latitude))
                })
                .collect();
            if let Some(marker) = marker_under_pointer(&markers, &screen, pointer, 12.0) {
                response.response.on_hover_ui_at_pointer(|ui: &mut Ui| {
                    ui.label(marker.label.as_str());
                    if let Some(image) = &marker.image_ref {
                        ui.add(
                            egui::Image::new(image_uri(image))
                                .max_width(140.0)
                                .max_height(140.0),
                        );
                    }
                });
            }
        }
    }
}

/// Marker closest to the pointer, within `tolerance` logical pixels.
/// `screen` holds the markers' screen positions, same order as `markers`.
fn marker_under_pointer<'a>(
    markers: &'a [MapMarker],
    screen: &[Pos2],
    pointer: Pos2,
    tolerance: f32,
) -> Option<&'a MapMarker> {
    markers
        .iter()
        .zip(screen)
        .map(|(m, p)| (m, p.distance(pointer)))
        .filter(|(_, d)| *d <= tolerance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(m, _)| m)
}

/// Image cells may hold a URL or a plain path; bare paths go through the
/// file loader.
fn image_uri(image_ref: &str) -> String {
    if image_ref.starts_with("http://")
        || image_ref.starts_with("https://")
        || image_ref.starts_with("file://")
    {
        image_ref.to_string()
    } else {
        format!("file://{image_ref}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(label: &str, image: Option<&str>) -> MapMarker {
        MapMarker {
            latitude: 0.0,
            longitude: 0.0,
            label: label.to_string(),
            image_ref: image.map(str::to_string),
        }
    }

    #[test]
    fn hover_picks_the_nearest_marker_within_tolerance() {
        let markers = vec![
            marker("Name: a, Faction: A", Some("a.png")),
            marker("Name: b, Faction: B", None),
        ];
        let screen = [Pos2::new(100.0, 100.0), Pos2::new(108.0, 100.0)];
        let hit = marker_under_pointer(&markers, &screen, Pos2::new(106.0, 100.0), 12.0);
        assert_eq!(hit.map(|m| m.label.as_str()), Some("Name: b, Faction: B"));
    }

    #[test]
    fn hover_ignores_markers_beyond_tolerance() {
        let markers = vec![marker("Name: a, Faction: A", Some("a.png"))];
        let screen = [Pos2::new(100.0, 100.0)];
        assert!(marker_under_pointer(&markers, &screen, Pos2::new(200.0, 100.0), 12.0).is_none());
    }

    #[test]
    fn image_uri_passes_urls_and_wraps_paths() {
        assert_eq!(
            image_uri("https://example.com/a.png"),
            "https://example.com/a.png"
        );
        assert_eq!(image_uri("file:///tmp/a.png"), "file:///tmp/a.png");
        assert_eq!(image_uri("/tmp/a.png"), "file:///tmp/a.png");
    }
}
