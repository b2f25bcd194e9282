use eframe::egui::{
    self, Align, Color32, ComboBox, Frame, Layout, RichText, ScrollArea, TextEdit, Ui,
};
use egui_extras::{Column, TableBuilder};
use tracing::{Level, error, info};

use super::logging::{LogEntry, drain_into};
use super::models::{HydraGui, WidgetValue};
use crate::types::OptionKind;
use crate::widgets::{Element, HelpBlock, Tab, Widget, WidgetKind};

const LABEL_WIDTH: f32 = 140.0;

/// What a rendered widget asks the window to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    Submit,
    Browse(Widget),
}

pub struct WidgetComponent;

impl WidgetComponent {
    pub fn render(ui: &mut Ui, widget: &Widget, value: Option<&mut WidgetValue>) -> Option<WidgetEvent> {
        let mut event = None;
        match (&widget.kind, value) {
            (WidgetKind::Button, _) => {
                if ui.button(RichText::new(&widget.label).size(16.0)).clicked() {
                    event = Some(WidgetEvent::Submit);
                }
            }
            (WidgetKind::Checkbox, Some(WidgetValue::Checked(checked))) => {
                ui.checkbox(checked, &widget.label);
            }
            (WidgetKind::Entry, Some(WidgetValue::Text(text))) => {
                labelled(ui, &widget.label, |ui| {
                    ui.add(TextEdit::singleline(text).desired_width(f32::INFINITY));
                });
            }
            (WidgetKind::Browse { .. }, Some(WidgetValue::Text(text))) => {
                labelled(ui, &widget.label, |ui| {
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("Browse").clicked() {
                            event = Some(WidgetEvent::Browse(widget.clone()));
                        }
                        ui.add(TextEdit::singleline(text).desired_width(f32::INFINITY));
                    });
                });
            }
            (WidgetKind::Combobox { values }, Some(WidgetValue::Text(selected))) => {
                labelled(ui, &widget.label, |ui| {
                    ComboBox::from_id_salt(&widget.name)
                        .selected_text(selected.as_str())
                        .show_ui(ui, |ui| {
                            for v in values {
                                ui.selectable_value(selected, v.clone(), v);
                            }
                        });
                });
            }
            (WidgetKind::Listbox { values }, Some(WidgetValue::Selected(selected))) => {
                ui.label(&widget.label);
                Frame::group(ui.style()).show(ui, |ui| {
                    ScrollArea::vertical()
                        .id_salt(&widget.name)
                        .max_height(120.0)
                        .show(ui, |ui| {
                            for (i, v) in values.iter().enumerate() {
                                let is_selected = selected.contains(&i);
                                if ui.selectable_label(is_selected, v).clicked() {
                                    if is_selected {
                                        selected.remove(&i);
                                    } else {
                                        selected.insert(i);
                                    }
                                }
                            }
                        });
                });
            }
            (WidgetKind::Text { rows }, Some(WidgetValue::Text(text))) => {
                ui.label(&widget.label);
                ui.add(
                    TextEdit::multiline(text)
                        .desired_rows(*rows)
                        .desired_width(f32::INFINITY),
                );
            }
            (_, _) => {
                ui.label(RichText::new(&widget.label).color(Color32::from_gray(120)));
            }
        }
        event
    }
}

fn labelled(ui: &mut Ui, label: &str, add_contents: impl FnOnce(&mut Ui)) {
    ui.horizontal(|ui| {
        ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new(label));
        add_contents(ui);
    });
}

pub struct FormComponent;

impl FormComponent {
    /// Render every element; returns the first event raised.
    pub fn render(ui: &mut Ui, app: &mut HydraGui) -> Option<WidgetEvent> {
        let HydraGui { layout, values, .. } = app;
        let mut event = None;
        for element in layout.iter() {
            let raised = match element {
                Element::Widget(widget) => {
                    WidgetComponent::render(ui, widget, values.get_mut(&widget.name))
                }
                Element::Notebook { name, tabs } => NotebookComponent::render(ui, name, tabs, values),
            };
            event = event.or(raised);
            ui.add_space(4.0);
        }
        event
    }
}

pub struct NotebookComponent;

impl NotebookComponent {
    pub fn render(
        ui: &mut Ui,
        name: &str,
        tabs: &[Tab],
        values: &mut std::collections::BTreeMap<String, WidgetValue>,
    ) -> Option<WidgetEvent> {
        let mut current = match values.get(name) {
            Some(WidgetValue::Tab(i)) => *i,
            _ => 0,
        };
        ui.horizontal(|ui| {
            for (i, tab) in tabs.iter().enumerate() {
                ui.selectable_value(&mut current, i, tab.title.as_str());
            }
        });
        values.insert(name.to_string(), WidgetValue::Tab(current));

        let mut event = None;
        if let Some(tab) = tabs.get(current) {
            Frame::group(ui.style()).show(ui, |ui| {
                for widget in &tab.widgets {
                    let raised = WidgetComponent::render(ui, widget, values.get_mut(&widget.name));
                    event = event.take().or(raised);
                }
            });
        }
        event
    }
}

pub struct MenuComponent;

impl MenuComponent {
    pub fn render(ui: &mut Ui, ctx: &egui::Context, app: &mut HydraGui) {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Save Preset").clicked() {
                    if let Err(e) = app.save_preset() {
                        error!("Failed to save preset: {}", e);
                    }
                    ui.close_menu();
                }
                if ui.button("Load Preset").clicked() {
                    if let Err(e) = app.load_preset() {
                        error!("Failed to load preset: {}", e);
                    }
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Exit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });
            ui.menu_button("Edit", |ui| {
                if ui.button("Reset").clicked() {
                    app.reset();
                    info!("Widgets reset to defaults");
                    ui.close_menu();
                }
                if ui.button("Copy CLI Command").clicked() {
                    let command = app.generate_cli_command();
                    ctx.copy_text(command.clone());
                    app.log_messages.push(LogEntry::new(
                        Level::INFO,
                        format!("CLI Command: {}", command),
                        "cli".to_string(),
                    ));
                    ui.close_menu();
                }
            });
            ui.menu_button("Settings", |ui| {
                if ui.button("Open Config File").clicked() {
                    app.open_config_file();
                    ui.close_menu();
                }
            });
            ui.menu_button("View", |ui| {
                if ui.button("Log").clicked() {
                    app.show_log = true;
                    ui.close_menu();
                }
            });
            ui.menu_button("Help", |ui| {
                if ui.button("Help").clicked() {
                    app.show_help = true;
                    ui.close_menu();
                }
                if ui.button("About").clicked() {
                    app.show_about = true;
                    ui.close_menu();
                }
            });
        });
    }
}

pub struct StatusComponent;

impl StatusComponent {
    pub fn render(ui: &mut Ui, app: &HydraGui) {
        ui.horizontal(|ui| {
            let (text, color) = if app.is_running {
                let text = if app.status_message.is_empty() {
                    match app.run_start_time {
                        Some(start) => format!("Running: {:.1?}", start.elapsed()),
                        None => "Running...".to_string(),
                    }
                } else {
                    app.status_message.clone()
                };
                (text, Color32::from_rgb(255, 165, 0))
            } else if let Some(duration) = app.last_run_duration {
                (format!("Last run: {:.2?}", duration), Color32::from_rgb(100, 200, 100))
            } else {
                ("Ready".to_string(), Color32::from_rgb(100, 200, 100))
            };
            ui.label(RichText::new(text).color(color).monospace());
        });
    }
}

pub struct HelpWindow;

impl HelpWindow {
    pub fn render(ctx: &egui::Context, app: &mut HydraGui) {
        let mut open = app.show_help;
        egui::Window::new("Help")
            .open(&mut open)
            .default_width(560.0)
            .show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| {
                    ui.heading(&app.program.name);
                    ui.label(&app.program.purpose);
                    ui.add_space(8.0);

                    for block in app.app.help() {
                        match block {
                            HelpBlock::Heading(text) => {
                                ui.heading(text);
                            }
                            HelpBlock::Subheading(text) => {
                                ui.strong(text);
                            }
                            HelpBlock::Text(text) => {
                                ui.label(text);
                            }
                        }
                    }

                    ui.add_space(8.0);
                    ui.strong("Options");
                    TableBuilder::new(ui)
                        .striped(true)
                        .column(Column::auto())
                        .column(Column::auto())
                        .column(Column::remainder())
                        .header(20.0, |mut header| {
                            header.col(|ui| {
                                ui.strong("Option");
                            });
                            header.col(|ui| {
                                ui.strong("Kind");
                            });
                            header.col(|ui| {
                                ui.strong("Description");
                            });
                        })
                        .body(|mut body| {
                            for decl in app.options.iter() {
                                body.row(18.0, |mut row| {
                                    row.col(|ui| {
                                        let flag = match decl.short {
                                            Some(c) => format!("-{}, --{}", c, decl.long),
                                            None => format!("--{}", decl.long),
                                        };
                                        ui.monospace(flag);
                                    });
                                    row.col(|ui| {
                                        ui.label(match decl.kind {
                                            OptionKind::Boolean => "flag",
                                            OptionKind::Value => "value",
                                            OptionKind::Multiple => "values",
                                        });
                                    });
                                    row.col(|ui| {
                                        ui.label(decl.description.replace('\n', " "));
                                    });
                                });
                            }
                        });
                });
            });
        app.show_help = open;
    }
}

pub struct AboutWindow;

impl AboutWindow {
    pub fn render(ctx: &egui::Context, app: &mut HydraGui) {
        let mut open = app.show_about;
        let program = &app.program;
        egui::Window::new("About")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading(format!("{} {}", program.name, program.version));
                ui.label(RichText::new(&program.date).color(Color32::from_gray(150)));
                ui.add_space(6.0);
                ui.label(&program.purpose);
                if let Some(url) = &program.url {
                    ui.hyperlink(url);
                }
                ui.add_space(6.0);
                ui.label(&program.copyright);
                if let Some(license) = &program.license {
                    ui.add_space(6.0);
                    for paragraph in license.split("\n\n") {
                        ui.label(paragraph);
                    }
                }
            });
        app.show_about = open;
    }
}

fn format_log_entry(entry: &LogEntry) -> RichText {
    if entry.target == "cli" {
        return RichText::new(&entry.message)
            .color(Color32::from_rgb(100, 255, 100))
            .monospace()
            .strong();
    }

    let color = match entry.level {
        Level::ERROR => Color32::from_rgb(255, 100, 100),
        Level::WARN => Color32::from_rgb(255, 200, 100),
        Level::INFO => Color32::from_rgb(100, 200, 255),
        Level::DEBUG => Color32::from_rgb(150, 150, 150),
        Level::TRACE => Color32::from_rgb(100, 100, 100),
    };
    RichText::new(format!("[{}] {}: {}", entry.timestamp, entry.level, entry.message))
        .color(color)
        .monospace()
}

pub struct LogWindow;

impl LogWindow {
    pub fn render(ctx: &egui::Context, app: &mut HydraGui) {
        if drain_into(&mut app.log_messages) {
            ctx.request_repaint();
        }
        if !app.show_log {
            return;
        }

        let mut open = app.show_log;
        egui::Window::new("Log")
            .open(&mut open)
            .default_size([640.0, 320.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut app.min_log_level, Level::ERROR, "ERROR");
                    ui.selectable_value(&mut app.min_log_level, Level::WARN, "WARN");
                    ui.selectable_value(&mut app.min_log_level, Level::INFO, "INFO");
                    ui.selectable_value(&mut app.min_log_level, Level::DEBUG, "DEBUG");
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("Clear").clicked() {
                            app.log_messages.clear();
                        }
                    });
                });
                ui.separator();
                ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        // More verbose levels compare greater.
                        for entry in app
                            .log_messages
                            .iter()
                            .filter(|e| e.level <= app.min_log_level || e.target == "cli")
                        {
                            ui.label(format_log_entry(entry));
                        }
                    });
            });
        app.show_log = open;
    }
}

pub struct DialogComponent;

impl DialogComponent {
    pub fn render(ctx: &egui::Context, app: &mut HydraGui) {
        let Some(dialog) = &app.dialog else {
            return;
        };

        let mut dismissed = false;
        let response = egui::Modal::new(egui::Id::new("hydra_dialog")).show(ctx, |ui| {
            ui.set_max_width(420.0);
            let color = if dialog.is_error {
                Color32::from_rgb(255, 100, 100)
            } else {
                Color32::from_rgb(100, 200, 100)
            };
            ui.heading(RichText::new(&dialog.title).color(color));
            ui.add_space(6.0);
            ui.label(&dialog.message);
            ui.add_space(8.0);
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });

        if dismissed || response.should_close() {
            app.dialog = None;
            if app.close_on_dismiss {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }
}
