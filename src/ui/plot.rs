use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::state::ViewerState;

// ---------------------------------------------------------------------------
// Histogram plot (central panel)
// ---------------------------------------------------------------------------

/// Render the title and histogram in the central panel.
pub fn histogram_plot(ui: &mut Ui, state: &ViewerState) {
    if state.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view its histogram  (File → Open…)");
        });
        return;
    }

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(&state.config.title);
    });

    // Side-by-side bars inside each bin when the data is split.
    let n = state.series.len().max(1) as f64;

    Plot::new("histogram_plot")
        .legend(Legend::default())
        .x_axis_label(&state.config.x_label)
        .y_axis_label(&state.config.y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (i, series) in state.series.iter().enumerate() {
                let h = &series.histogram;
                let width = h.bin_width() / n;
                let offset = (i as f64 - (n - 1.0) / 2.0) * width;

                let bars: Vec<Bar> = h
                    .centers()
                    .into_iter()
                    .zip(&h.counts)
                    .map(|(x, &count)| Bar::new(x + offset, count as f64).width(width))
                    .collect();

                let chart = BarChart::new(bars)
                    .name(&series.name)
                    .color(series.color);

                plot_ui.bar_chart(chart);
            }
        });
}
