use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{Level, error, info, warn};

use crate::app::{Application, load_configuration};
use crate::core::config::Configuration;
use crate::core::error_log;
use crate::core::files::split_record;
use crate::core::inputs::InputMap;
use crate::core::options::OptionSet;
use crate::error::{Error, Result};
use crate::gui::logging::{LogEntry, init_gui_logging};
use crate::types::{InputValue, OptionKind, ProgramInfo};
use crate::widgets::{Element, Widget, WidgetKind};

/// Current state of one widget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WidgetValue {
    Checked(bool),
    /// Selected notebook tab.
    Tab(usize),
    /// Entry, browse, multi-line text and combobox contents.
    Text(String),
    /// Listbox selection.
    Selected(BTreeSet<usize>),
}

/// Messages from the worker thread running an action.
#[derive(Debug)]
pub enum WorkerEvent {
    Progress(String),
    Finished(Result<String>),
}

/// A modal message box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub message: String,
    pub is_error: bool,
}

impl Dialog {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            title: "Success".to_string(),
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "ERROR".to_string(),
            message: message.into(),
            is_error: true,
        }
    }
}

pub struct HydraGui {
    pub app: Arc<dyn Application>,
    pub program: ProgramInfo,
    pub conf: Configuration,
    pub options: OptionSet,
    pub layout: Vec<Element>,
    pub values: BTreeMap<String, WidgetValue>,

    // Status
    pub status_message: String,
    pub is_running: bool,
    pub run_start_time: Option<Instant>,
    pub last_run_duration: Option<Duration>,
    pub worker: Option<Receiver<WorkerEvent>>,

    // Windows
    pub dialog: Option<Dialog>,
    /// Close the window once the current dialog is dismissed.
    pub close_on_dismiss: bool,
    pub show_help: bool,
    pub show_about: bool,
    pub show_log: bool,

    pub log_messages: Vec<LogEntry>,
    pub min_log_level: Level,
}

impl HydraGui {
    pub fn new(app: Arc<dyn Application>) -> Self {
        init_gui_logging();
        let program = app.program().clone();
        let mut gui = Self {
            program,
            conf: Configuration::empty(),
            options: OptionSet::default(),
            layout: Vec::new(),
            values: BTreeMap::new(),
            status_message: String::new(),
            is_running: false,
            run_start_time: None,
            last_run_duration: None,
            worker: None,
            dialog: None,
            close_on_dismiss: false,
            show_help: false,
            show_about: false,
            show_log: false,
            log_messages: Vec::new(),
            min_log_level: Level::INFO,
            app,
        };

        if let Err(e) = gui.load() {
            error!("Startup failed: {}", e);
            let _ = error_log::record(&gui.program, &e);
            gui.close_on_dismiss = true;
            gui.dialog = Some(Dialog::error(e.to_string()));
        }
        gui
    }

    fn load(&mut self) -> Result<()> {
        self.conf = load_configuration(self.app.as_ref())?;
        self.options = self.app.option_set()?;
        self.layout = self.app.layout(&self.conf)?;
        self.reset();
        info!("{} {} ready", self.program.name, self.program.version);
        Ok(())
    }

    /// Restore every widget to its default.
    pub fn reset(&mut self) {
        self.values = default_values(&self.layout, &self.conf);
        self.status_message.clear();
    }

    pub fn collect_inputs(&self) -> InputMap {
        collect_inputs(&self.layout, &self.values, &self.conf)
    }

    pub fn generate_cli_command(&self) -> String {
        let program = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| self.program.name.to_lowercase());
        cli_command(&program, &self.layout, &self.values, &self.options)
    }

    pub fn save_preset(&self) -> Result<()> {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Preset files", &["preset"])
            .set_file_name(format!("{}.preset", self.program.name.to_lowercase()))
            .save_file()
        else {
            return Err(Error::external("No save location selected"));
        };
        fs::write(&path, preset_text(&self.program, &self.values)?)?;
        info!("Preset saved to: {:?}", path);
        Ok(())
    }

    pub fn load_preset(&mut self) -> Result<()> {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Preset files", &["preset"])
            .pick_file()
        else {
            return Err(Error::external("No preset file selected"));
        };
        self.apply_preset_file(&path)?;
        info!("Preset loaded from: {:?}", path);
        Ok(())
    }

    pub fn apply_preset_file(&mut self, path: &Path) -> Result<()> {
        let preset = parse_preset(&fs::read_to_string(path)?)?;
        apply_preset(&mut self.values, preset);
        Ok(())
    }
}

fn is_truthy(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Initial value of `widget`: its explicit default, else the configuration
/// value of the same name, else empty.
pub fn default_value(widget: &Widget, conf: &Configuration) -> WidgetValue {
    let initial = widget
        .default
        .as_deref()
        .or_else(|| conf.get(&widget.name));
    match &widget.kind {
        WidgetKind::Checkbox => WidgetValue::Checked(initial.is_some_and(is_truthy)),
        WidgetKind::Combobox { values } => WidgetValue::Text(
            initial
                .map(str::to_string)
                .or_else(|| values.first().cloned())
                .unwrap_or_default(),
        ),
        WidgetKind::Listbox { values } => {
            let wanted = initial.map(split_record).unwrap_or_default();
            WidgetValue::Selected(
                values
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| wanted.contains(*v))
                    .map(|(i, _)| i)
                    .collect(),
            )
        }
        _ => WidgetValue::Text(initial.unwrap_or_default().to_string()),
    }
}

pub fn default_values(layout: &[Element], conf: &Configuration) -> BTreeMap<String, WidgetValue> {
    let mut values = BTreeMap::new();
    for element in layout {
        if let Element::Notebook { name, tabs } = element {
            let tab = conf
                .get(name)
                .and_then(|title| tabs.iter().position(|t| t.title == title))
                .unwrap_or(0);
            values.insert(name.clone(), WidgetValue::Tab(tab));
        }
        for widget in element.widgets() {
            if widget.holds_value() {
                values.insert(widget.name.clone(), default_value(widget, conf));
            }
        }
    }
    values
}

fn input_value(widget: &Widget, value: &WidgetValue) -> Option<InputValue> {
    match (&widget.kind, value) {
        (WidgetKind::Button, _) => None,
        (WidgetKind::Listbox { values }, WidgetValue::Selected(selected)) => Some(
            InputValue::Multiple(selected.iter().filter_map(|&i| values.get(i).cloned()).collect()),
        ),
        (_, WidgetValue::Checked(b)) => Some(InputValue::Flag(*b)),
        (_, WidgetValue::Text(s)) => Some(InputValue::Value(s.clone())),
        _ => None,
    }
}

fn tab_title(element: &Element, values: &BTreeMap<String, WidgetValue>) -> Option<(String, String)> {
    let Element::Notebook { name, tabs } = element else {
        return None;
    };
    let index = match values.get(name) {
        Some(WidgetValue::Tab(i)) => *i,
        _ => 0,
    };
    tabs.get(index).map(|t| (name.clone(), t.title.clone()))
}

/// Inputs for a submit: the configuration overlaid with every widget value.
pub fn collect_inputs(
    layout: &[Element],
    values: &BTreeMap<String, WidgetValue>,
    conf: &Configuration,
) -> InputMap {
    let mut inputs = InputMap::from_config(conf);
    for element in layout {
        if let Some((name, title)) = tab_title(element, values) {
            inputs.set(name, title);
        }
        for widget in element.widgets() {
            if let Some(value) = values.get(&widget.name).and_then(|v| input_value(widget, v)) {
                inputs.set(widget.name.clone(), value);
            }
        }
    }
    inputs
}

fn quote(s: &str) -> String {
    shlex::try_quote(s)
        .map(|q| q.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

/// The command line equivalent of the current widget values. Widgets that
/// do not correspond to a declared option are left out.
pub fn cli_command(
    program: &str,
    layout: &[Element],
    values: &BTreeMap<String, WidgetValue>,
    options: &OptionSet,
) -> String {
    let mut cmd = quote(program);
    let mut push = |name: &str, value: InputValue| {
        let Some(kind) = options.kind(name) else {
            return;
        };
        match (kind, value) {
            (OptionKind::Boolean, InputValue::Flag(true)) => {
                cmd.push_str(&format!(" --{}", name));
            }
            (OptionKind::Boolean, _) => {}
            (_, InputValue::Value(v)) if !v.is_empty() => {
                cmd.push_str(&format!(" --{} {}", name, quote(&v)));
            }
            (_, InputValue::Multiple(list)) if !list.is_empty() => {
                let quoted: Vec<String> = list.iter().map(|v| quote(v)).collect();
                cmd.push_str(&format!(" --{} {}", name, quoted.join(" ")));
            }
            _ => {}
        }
    };

    for element in layout {
        if let Some((name, title)) = tab_title(element, values) {
            push(&name, InputValue::Value(title));
        }
        for widget in element.widgets() {
            if let Some(value) = values.get(&widget.name).and_then(|v| input_value(widget, v)) {
                push(&widget.name, value);
            }
        }
    }
    cmd
}

/// Preset file contents: a comment header followed by pretty JSON.
pub fn preset_text(program: &ProgramInfo, values: &BTreeMap<String, WidgetValue>) -> Result<String> {
    let mut text = String::new();
    text.push_str("// ==========================================\n");
    text.push_str(&format!("// {} Preset\n", program.name));
    text.push_str("// ==========================================\n");
    text.push_str(&format!("// Version: {}\n", program.version));
    text.push_str(&format!("// Generated: {}\n", chrono::Local::now().to_rfc3339()));
    text.push_str("// ==========================================\n\n");
    text.push_str(&serde_json::to_string_pretty(values)?);
    text.push('\n');
    Ok(text)
}

pub fn parse_preset(text: &str) -> Result<BTreeMap<String, WidgetValue>> {
    let start = text
        .find('{')
        .ok_or_else(|| Error::external("Invalid preset file: no JSON content found"))?;
    Ok(serde_json::from_str(&text[start..])?)
}

/// Overwrite `values` with preset entries whose widget exists and whose
/// value has the same shape.
pub fn apply_preset(values: &mut BTreeMap<String, WidgetValue>, preset: BTreeMap<String, WidgetValue>) {
    for (name, value) in preset {
        match values.get_mut(&name) {
            Some(current) if std::mem::discriminant(current) == std::mem::discriminant(&value) => {
                *current = value;
            }
            Some(_) => warn!("Preset value for {} has the wrong type, skipped", name),
            None => warn!("Preset names unknown widget {}, skipped", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OptionDecl;
    use crate::widgets::Tab;

    fn layout() -> Vec<Element> {
        vec![
            Widget::entry("greeting", "Greeting").into(),
            Widget::entry("name", "Name").with_default("World").into(),
            Widget::checkbox("loud", "Loud").into(),
            Widget::combobox("color", "Color", &["red", "green"]).into(),
            Widget::listbox("files", "Files", &["a.txt", "b.txt", "c.txt"]).into(),
            Element::notebook(
                "action",
                vec![
                    Tab::new("Action 1", vec![Widget::entry("one", "One")]),
                    Tab::new("Action 2", vec![Widget::entry("two", "Two")]),
                ],
            ),
            Widget::button("submit", "Submit").into(),
        ]
    }

    fn conf() -> Configuration {
        Configuration::parse(
            "[defaults]\ngreeting = Hi\nloud = yes\nfiles = a.txt,c.txt\naction = Action 2\nextra = 1\n",
            "test.ini",
        )
        .unwrap()
    }

    #[test]
    fn defaults_prefer_explicit_then_config() {
        let values = default_values(&layout(), &conf());
        assert_eq!(values["greeting"], WidgetValue::Text("Hi".into()));
        assert_eq!(values["name"], WidgetValue::Text("World".into()));
        assert_eq!(values["loud"], WidgetValue::Checked(true));
        assert_eq!(values["color"], WidgetValue::Text("red".into()));
        assert_eq!(values["files"], WidgetValue::Selected([0, 2].into()));
        assert_eq!(values["action"], WidgetValue::Tab(1));
        assert_eq!(values["one"], WidgetValue::Text(String::new()));
        assert!(!values.contains_key("submit"));
    }

    #[test]
    fn inputs_overlay_widgets_on_config() {
        let mut values = default_values(&layout(), &conf());
        values.insert("greeting".into(), WidgetValue::Text("Hello".into()));
        values.insert("files".into(), WidgetValue::Selected([1].into()));

        let inputs = collect_inputs(&layout(), &values, &conf());
        assert_eq!(inputs.value("greeting"), "Hello");
        assert_eq!(inputs.value("name"), "World");
        assert!(inputs.flag("loud"));
        assert_eq!(inputs.values("files"), ["b.txt"]);
        assert_eq!(inputs.value("action"), "Action 2");
        assert_eq!(inputs.value("extra"), "1");
        assert!(!inputs.contains("submit"));
    }

    #[test]
    fn cli_command_covers_declared_options() {
        let options = OptionSet::with_reserved(vec![
            OptionDecl::value("greeting", 'g', ""),
            OptionDecl::value("name", 'n', ""),
            OptionDecl::boolean("loud", None, ""),
            OptionDecl::multiple("files", None, ""),
        ])
        .unwrap();
        let mut values = default_values(&layout(), &conf());
        values.insert("name".into(), WidgetValue::Text("Big World".into()));

        let cmd = cli_command("hello", &layout(), &values, &options);
        assert_eq!(
            cmd,
            "hello --greeting Hi --name 'Big World' --loud --files a.txt c.txt"
        );
    }

    #[test]
    fn presets_restore_matching_widgets() {
        let program = ProgramInfo {
            name: "Hello".into(),
            version: "1.0".into(),
            ..Default::default()
        };
        let mut saved = default_values(&layout(), &conf());
        saved.insert("greeting".into(), WidgetValue::Text("Howdy".into()));
        saved.insert("loud".into(), WidgetValue::Checked(false));
        let text = preset_text(&program, &saved).unwrap();
        assert!(text.starts_with("// ====="));

        let mut preset = parse_preset(&text).unwrap();
        preset.insert("unknown".into(), WidgetValue::Text("x".into()));
        preset.insert("name".into(), WidgetValue::Checked(true));

        let mut values = default_values(&layout(), &Configuration::empty());
        apply_preset(&mut values, preset);
        assert_eq!(values["greeting"], WidgetValue::Text("Howdy".into()));
        assert_eq!(values["loud"], WidgetValue::Checked(false));
        assert_eq!(values["files"], WidgetValue::Selected([0, 2].into()));
        assert_eq!(values["action"], WidgetValue::Tab(1));
        assert_eq!(values["name"], WidgetValue::Text("World".into()));
        assert!(!values.contains_key("unknown"));
    }

    #[test]
    fn preset_without_json_is_rejected() {
        assert!(parse_preset("// nothing here").is_err());
    }

    struct Quiet {
        program: ProgramInfo,
    }

    struct Nothing;

    impl crate::core::action::Action for Nothing {
        fn validate(&self, _inputs: &InputMap) -> Result<()> {
            Ok(())
        }

        fn action(
            &mut self,
            _inputs: &InputMap,
            _progress: &mut dyn crate::core::progress::ProgressSink,
        ) -> Result<String> {
            Ok("done".into())
        }
    }

    impl Application for Quiet {
        fn program(&self) -> &ProgramInfo {
            &self.program
        }

        fn options(&self) -> Vec<OptionDecl> {
            vec![OptionDecl::value("name", 'n', "A name")]
        }

        fn action_for(&self, _inputs: &InputMap) -> Result<Box<dyn crate::core::action::Action>> {
            Ok(Box::new(Nothing))
        }
    }

    fn quiet(config: Option<&Path>, error_log: &Path) -> Arc<dyn Application> {
        Arc::new(Quiet {
            program: ProgramInfo {
                name: "Quiet".into(),
                version: "1.0".into(),
                config: config.map(|p| p.display().to_string()),
                error_log: Some(error_log.display().to_string()),
                ..Default::default()
            },
        })
    }

    #[test]
    fn startup_failure_is_logged_and_closes() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("missing.ini");
        let log = dir.path().join("quiet.err");

        let gui = HydraGui::new(quiet(Some(&config), &log));
        let dialog = gui.dialog.as_ref().unwrap();
        assert!(dialog.is_error);
        assert!(gui.close_on_dismiss);

        let report = fs::read_to_string(&log).unwrap();
        assert!(report.contains(&format!("{} not found.", config.display())));
    }

    #[test]
    fn lost_worker_is_reported_and_logged() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("quiet.err");

        let mut gui = HydraGui::new(quiet(None, &log));
        assert!(gui.dialog.is_none());
        assert!(!log.exists());

        let (tx, rx) = std::sync::mpsc::channel::<WorkerEvent>();
        drop(tx);
        gui.worker = Some(rx);
        gui.is_running = true;
        gui.poll_worker();

        assert!(!gui.is_running);
        assert!(gui.worker.is_none());
        let dialog = gui.dialog.as_ref().unwrap();
        assert_eq!(dialog.message, "The action stopped unexpectedly");
        let report = fs::read_to_string(&log).unwrap();
        assert!(report.contains("The action stopped unexpectedly"));
    }
}
