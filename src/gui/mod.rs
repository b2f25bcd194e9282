//! Desktop front end on eframe/egui.
//!
//! `models` holds the window state and the pure helpers behind it (widget
//! defaults, input collection, presets, the equivalent command line),
//! `processing` runs actions on a worker thread, `components` renders the
//! widgets and windows and `logging` feeds tracing events to the Log window.
pub mod app;
pub mod components;
pub mod logging;
pub mod models;
pub mod processing;

use std::path::Path;
use std::sync::Arc;

use eframe::{
    NativeOptions,
    egui::{IconData, ViewportBuilder},
};
use tracing::warn;

use crate::app::Application;
use crate::error::{Error, Result};

pub use models::HydraGui;

fn load_icon(path: &Path) -> Option<IconData> {
    let image = image::open(path)
        .inspect_err(|e| warn!("Could not load icon {:?}: {}", path, e))
        .ok()?
        .to_rgba8();
    let (width, height) = image.dimensions();
    Some(IconData {
        rgba: image.into_raw(),
        width,
        height,
    })
}

/// Open the window and block until it is closed.
pub fn run(app: Arc<dyn Application>) -> Result<()> {
    let program = app.program();
    let title = format!("{} {}", program.name, program.version);

    let mut viewport = ViewportBuilder::default()
        .with_title(&title)
        .with_inner_size([640.0, 480.0])
        .with_min_inner_size([400.0, 300.0]);
    if let Some(icon) = program.icon_file.as_deref().map(Path::new).and_then(load_icon) {
        viewport = viewport.with_icon(icon);
    }

    let options = NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(HydraGui::new(app)))),
    )
    .map_err(Error::external)
}
