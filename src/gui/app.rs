use eframe::egui;

use super::components::*;
use super::models::HydraGui;

impl eframe::App for HydraGui {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker();
        if self.is_running {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            MenuComponent::render(ui, ctx, self);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            StatusComponent::render(ui, self);
        });

        let mut event = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(format!("{} {}", self.program.name, self.program.version));
            ui.label(
                egui::RichText::new(&self.program.purpose).color(egui::Color32::from_gray(150)),
            );
            ui.separator();

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.add_enabled_ui(!self.is_running, |ui| {
                        event = FormComponent::render(ui, self);
                    });
                });
        });

        match event {
            Some(WidgetEvent::Submit) => self.submit(ctx),
            Some(WidgetEvent::Browse(widget)) => self.browse(&widget),
            None => {}
        }

        HelpWindow::render(ctx, self);
        AboutWindow::render(ctx, self);
        LogWindow::render(ctx, self);
        DialogComponent::render(ctx, self);
    }
}
