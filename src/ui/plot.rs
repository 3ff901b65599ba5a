use eframe::egui::{Color32, InputState, RichText, Ui};
use egui_plot::{Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Text};
use glam::{DVec2, DVec3};

use crate::color::diverging;
use crate::data::model::CanonicalField;
use crate::projection::{cube_edges, nearest_within, project_positions, Bounds};
use crate::state::{hover_summary, AppState};

/// Number of colour buckets; each bucket is drawn as one `Points` series.
const COLOR_BINS: usize = 48;

const GRID_COLOR: Color32 = Color32::from_rgb(0xE5, 0xE5, 0xE5);

/// Pointer distance, in screen pixels, within which a point counts as hovered.
const HOVER_RADIUS_PX: f64 = 8.0;

fn plot_point(p: DVec2) -> [f64; 2] {
    p.to_array()
}

/// Consume this frame's wheel delta as a zoom factor, so the enclosing
/// scroll area does not also scroll.
fn take_wheel_zoom(input: &mut InputState) -> Option<f64> {
    let scroll = std::mem::take(&mut input.smooth_scroll_delta).y;
    (scroll != 0.0).then(|| (scroll as f64 * 0.002).exp())
}

// ---------------------------------------------------------------------------
// 3D scatter (central panel)
// ---------------------------------------------------------------------------

/// Render the sampled flight as a rotatable point cloud coloured by the
/// selected measurement. Drag to rotate, scroll to zoom, hover for details.
pub fn scatter_3d(ui: &mut Ui, state: &mut AppState) {
    let (Some(view), Some(scale)) = (&state.view, &state.color_scale) else {
        return;
    };
    let camera = state.camera;

    let positions = || {
        view.sample
            .indices()
            .iter()
            .copied()
            .zip(view.sample.iter())
            .map(|(row, record)| (row, DVec3::from(record.position())))
    };
    let Some(bounds) = Bounds::from_points(positions().map(|(_, p)| p)) else {
        ui.label("Aucune donnée à afficher.");
        return;
    };
    let projected = project_positions(positions(), &bounds, &camera);

    // Bucket projected points by quantised colour.
    let mut bins: Vec<Vec<[f64; 2]>> = vec![Vec::new(); COLOR_BINS];
    for (row, p) in &projected {
        let Some(record) = view.dataset.get(*row) else {
            continue;
        };
        let t = scale.normalize(record.measurement(scale.measurement));
        let bin = (t * (COLOR_BINS - 1) as f64).round() as usize;
        bins[bin.min(COLOR_BINS - 1)].push(plot_point(*p));
    }

    let radius = state.config.point_radius;
    let opacity = scale.opacity;

    let plot = Plot::new("scatter_3d")
        .height(600.0)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .include_x(-0.9)
        .include_x(0.9)
        .include_y(-0.9)
        .include_y(0.9)
        .show(ui, |plot_ui| {
            // ---- Bounding cube ----
            for (a, b) in cube_edges() {
                let pa = plot_point(camera.project(a));
                let pb = plot_point(camera.project(b));
                plot_ui.line(
                    Line::new(PlotPoints::from(vec![pa, pb]))
                        .color(GRID_COLOR)
                        .width(1.0),
                );
            }

            // ---- Axis titles at the far end of each axis ----
            let axes = [
                (DVec3::new(0.62, -0.5, -0.5), CanonicalField::Longitude),
                (DVec3::new(-0.5, 0.62, -0.5), CanonicalField::Latitude),
                (DVec3::new(-0.5, -0.5, 0.62), CanonicalField::Altitude),
            ];
            for (pos, field) in axes {
                let p = camera.project(pos);
                plot_ui.text(Text::new(
                    PlotPoint::new(p.x, p.y),
                    RichText::new(field.label()).color(Color32::from_gray(0x33)),
                ));
            }

            // ---- Points ----
            for (i, pts) in bins.into_iter().enumerate() {
                if pts.is_empty() {
                    continue;
                }
                let t = i as f64 / (COLOR_BINS - 1) as f64;
                plot_ui.points(
                    Points::new(PlotPoints::from(pts))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(radius)
                        .color(diverging(t, opacity)),
                );
            }

            // ---- Hovered point ----
            let pointer = plot_ui.pointer_coordinate()?;
            let px_per_unit = plot_ui.transform().dpos_dvalue_x().abs();
            if px_per_unit <= 0.0 {
                return None;
            }
            let hit = nearest_within(
                &projected,
                DVec2::new(pointer.x, pointer.y),
                HOVER_RADIUS_PX / px_per_unit,
            )?;
            let (row, p) = projected[hit];
            plot_ui.points(
                Points::new(PlotPoints::from(vec![plot_point(p)]))
                    .shape(MarkerShape::Circle)
                    .filled(false)
                    .radius(radius + 3.0)
                    .color(Color32::from_gray(0x33)),
            );
            Some(row)
        });
    let hovered_row = plot.inner;
    let response = plot.response;

    // ---- Camera interaction ----
    if response.dragged() {
        let delta = response.drag_delta();
        state.camera.rotate(DVec2::new(delta.x as f64, delta.y as f64));
    }
    if response.hovered() {
        if let Some(factor) = ui.input_mut(take_wheel_zoom) {
            state.camera.zoom_by(factor);
        }
    }

    if let Some(record) = hovered_row.and_then(|row| view.dataset.get(row)) {
        response.on_hover_text(hover_summary(record, state.measurement));
    }
}
