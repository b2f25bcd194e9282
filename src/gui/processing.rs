use std::process::Command;
use std::sync::mpsc::{self, TryRecvError};
use std::time::Instant;

use eframe::egui;
use tracing::{debug, error, info, trace, warn};

use super::models::{Dialog, HydraGui, WidgetValue, WorkerEvent};
use crate::app::invoke;
use crate::core::error_log;
use crate::core::files::join_record;
use crate::core::progress::{ProgressThrottle, Timing};
use crate::error::{Error, Result};
use crate::widgets::{BrowseMode, Widget, WidgetKind};

impl HydraGui {
    /// Run the action for the current widget values on a background thread.
    pub fn submit(&mut self, ctx: &egui::Context) {
        if self.is_running {
            debug!("Action already running, ignoring submit");
            return;
        }

        let inputs = self.collect_inputs();
        debug!("Submitting inputs: {:?}", inputs);

        self.is_running = true;
        self.run_start_time = Some(Instant::now());
        self.last_run_duration = None;
        self.status_message.clear();

        let app = self.app.clone();
        let ctx = ctx.clone();
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            trace!("Worker thread started");
            let mut throttle = ProgressThrottle::new();
            let progress_tx = tx.clone();
            let progress_ctx = ctx.clone();
            let mut sink = |text: &str, timing: Option<Timing>| {
                if let Some(line) = throttle.update(text, timing) {
                    let _ = progress_tx.send(WorkerEvent::Progress(line));
                    progress_ctx.request_repaint();
                }
            };

            let result = invoke(app.as_ref(), inputs, &mut sink);
            if let Err(e) = &result {
                error!("Action failed: {}", e);
                // A log failure is reported by `record` itself.
                let _ = error_log::record(app.program(), e);
            }
            let _ = tx.send(WorkerEvent::Finished(result));
            ctx.request_repaint();
        });

        self.worker = Some(rx);
        info!("Action started in background thread");
    }

    /// Apply events from the worker; called every frame.
    pub fn poll_worker(&mut self) {
        let Some(rx) = &self.worker else {
            return;
        };

        let mut finished = None;
        loop {
            match rx.try_recv() {
                Ok(WorkerEvent::Progress(line)) => self.status_message = line,
                Ok(WorkerEvent::Finished(result)) => {
                    finished = Some(result);
                    break;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    let err = Error::action("The action stopped unexpectedly");
                    error!("{}", err);
                    let _ = error_log::record(&self.program, &err);
                    finished = Some(Err(err));
                    break;
                }
            }
        }

        if let Some(result) = finished {
            if let Some(start) = self.run_start_time.take() {
                let duration = start.elapsed();
                self.last_run_duration = Some(duration);
                info!("Action finished in {:.2?}", duration);
            }
            self.dialog = Some(match result {
                Ok(message) => Dialog::success(message),
                Err(e) => Dialog::error(e.to_string()),
            });
            self.status_message.clear();
            self.is_running = false;
            self.worker = None;
        }
    }

    /// Show the native dialog for a browse widget and store the choice.
    pub fn browse(&mut self, widget: &Widget) {
        if let Some(choice) = browse_dialog(widget) {
            info!("Selected for {}: {}", widget.name, choice);
            self.values
                .insert(widget.name.clone(), WidgetValue::Text(choice));
        }
    }

    /// Open the configuration file with the platform's default handler.
    pub fn open_config_file(&self) {
        let Some(path) = self.conf.path().map(|p| p.to_path_buf()).or_else(|| {
            self.program.config.as_ref().map(Into::into)
        }) else {
            warn!("{} has no configuration file", self.program.name);
            return;
        };

        match open_with_default_handler(&path.to_string_lossy()) {
            Ok(()) => info!("Opened {:?}", path),
            Err(e) => error!("Could not open {:?}: {}", path, e),
        }
    }
}

fn browse_dialog(widget: &Widget) -> Option<String> {
    let WidgetKind::Browse {
        mode,
        filters,
        initial_dir,
        initial_file,
    } = &widget.kind
    else {
        return None;
    };

    let mut dialog = rfd::FileDialog::new().set_title(&widget.label);
    if let Some(dir) = initial_dir.clone().or_else(dirs::home_dir) {
        dialog = dialog.set_directory(dir);
    }
    if let Some(file) = initial_file {
        dialog = dialog.set_file_name(file);
    }
    for filter in filters {
        dialog = dialog.add_filter(&filter.name, &filter.extensions);
    }

    let path_string = |p: std::path::PathBuf| p.to_string_lossy().into_owned();
    match mode {
        BrowseMode::OpenFile => dialog.pick_file().map(path_string),
        BrowseMode::OpenFiles => dialog.pick_files().map(|files| {
            let names: Vec<String> = files.into_iter().map(path_string).collect();
            join_record(&names)
        }),
        BrowseMode::SaveFile => dialog.save_file().map(path_string),
        BrowseMode::Folder => dialog.pick_folder().map(path_string),
    }
}

fn open_with_default_handler(path: &str) -> Result<()> {
    let mut command = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", "", path]);
        c
    } else if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(path);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(path);
        c
    };
    let mut child = command.spawn()?;
    // Reap the opener so it does not linger as a zombie.
    std::thread::spawn(move || {
        if let Err(e) = child.wait() {
            warn!("Opener did not exit cleanly: {}", e);
        }
    });
    Ok(())
}
