use eframe::egui;

use crate::config::HistogramConfig;
use crate::state::ViewerState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HistogramApp {
    pub state: ViewerState,
}

impl HistogramApp {
    pub fn new(state: ViewerState) -> Self {
        Self { state }
    }
}

impl eframe::App for HistogramApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: settings ----
        egui::SidePanel::left("settings_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::histogram_plot(ui, &self.state);
        });
    }
}

/// Load the configured input and open the viewer window. Blocks until the
/// window is closed. An unreadable input or absent column fails before any
/// window opens.
pub fn run_viewer(config: HistogramConfig) -> anyhow::Result<()> {
    let state = ViewerState::load(config)?;

    let title = state.config.title.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(HistogramApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer window failed: {e}"))
}
