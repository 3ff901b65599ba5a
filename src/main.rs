use anyhow::Result;
use clap::Parser;
use dadal_viewer::app::DadalApp;
use dadal_viewer::config::Args;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Args::parse().resolve()?;
    log::info!("Starting with {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Plateforme D.Æᵖ.D.A.L.")
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Plateforme D.Æᵖ.D.A.L.",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render png/jpg/etc.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            let app = DadalApp::new(config);
            if let Some(logo) = &app.state.logo {
                cc.egui_ctx.include_bytes(logo.uri(), logo.bytes.clone());
            }
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}
