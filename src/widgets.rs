//! Typed widget declarations for the desktop front end.
//!
//! Declarations are plain data and always compiled, so an application can
//! describe its window without enabling the `gui` feature.
use std::path::PathBuf;

use crate::core::options::{OptionSet, is_reserved};
use crate::types::OptionKind;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BrowseMode {
    /// Pick one existing file.
    OpenFile,
    /// Pick several files; stored as one comma separated record.
    OpenFiles,
    SaveFile,
    Folder,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum WidgetKind {
    Entry,
    Browse {
        mode: BrowseMode,
        filters: Vec<FileFilter>,
        initial_dir: Option<PathBuf>,
        initial_file: Option<String>,
    },
    Combobox {
        values: Vec<String>,
    },
    Listbox {
        values: Vec<String>,
    },
    Text {
        rows: usize,
    },
    Checkbox,
    /// Submits the form.
    Button,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Widget {
    pub name: String,
    pub label: String,
    pub kind: WidgetKind,
    pub default: Option<String>,
}

impl Widget {
    pub fn new(name: &str, label: &str, kind: WidgetKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            default: None,
        }
    }

    pub fn entry(name: &str, label: &str) -> Self {
        Self::new(name, label, WidgetKind::Entry)
    }

    pub fn browse(name: &str, label: &str, mode: BrowseMode) -> Self {
        Self::new(
            name,
            label,
            WidgetKind::Browse {
                mode,
                filters: Vec::new(),
                initial_dir: None,
                initial_file: None,
            },
        )
    }

    pub fn combobox(name: &str, label: &str, values: &[&str]) -> Self {
        let values = values.iter().map(|v| v.to_string()).collect();
        Self::new(name, label, WidgetKind::Combobox { values })
    }

    pub fn listbox(name: &str, label: &str, values: &[&str]) -> Self {
        let values = values.iter().map(|v| v.to_string()).collect();
        Self::new(name, label, WidgetKind::Listbox { values })
    }

    pub fn text(name: &str, label: &str, rows: usize) -> Self {
        Self::new(name, label, WidgetKind::Text { rows })
    }

    pub fn checkbox(name: &str, label: &str) -> Self {
        Self::new(name, label, WidgetKind::Checkbox)
    }

    pub fn button(name: &str, label: &str) -> Self {
        Self::new(name, label, WidgetKind::Button)
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Add a file type filter to a browse widget; ignored for other kinds.
    pub fn with_filter(mut self, name: &str, extensions: &[&str]) -> Self {
        if let WidgetKind::Browse { filters, .. } = &mut self.kind {
            filters.push(FileFilter {
                name: name.to_string(),
                extensions: extensions.iter().map(|e| e.to_string()).collect(),
            });
        }
        self
    }

    pub fn with_initial_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        if let WidgetKind::Browse { initial_dir, .. } = &mut self.kind {
            *initial_dir = Some(dir.into());
        }
        self
    }

    pub fn with_initial_file(mut self, file: &str) -> Self {
        if let WidgetKind::Browse { initial_file, .. } = &mut self.kind {
            *initial_file = Some(file.to_string());
        }
        self
    }

    /// Whether the widget contributes a value to the inputs.
    pub fn holds_value(&self) -> bool {
        !matches!(self.kind, WidgetKind::Button)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Tab {
    pub title: String,
    pub widgets: Vec<Widget>,
}

impl Tab {
    pub fn new(title: &str, widgets: Vec<Widget>) -> Self {
        Self {
            title: title.to_string(),
            widgets,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Element {
    Widget(Widget),
    /// Tabbed pages; the input named `name` holds the selected tab title.
    Notebook { name: String, tabs: Vec<Tab> },
}

impl From<Widget> for Element {
    fn from(w: Widget) -> Self {
        Element::Widget(w)
    }
}

impl Element {
    pub fn notebook(name: &str, tabs: Vec<Tab>) -> Self {
        Element::Notebook {
            name: name.to_string(),
            tabs,
        }
    }

    /// All widgets, including those inside notebook tabs.
    pub fn widgets(&self) -> Vec<&Widget> {
        match self {
            Element::Widget(w) => vec![w],
            Element::Notebook { tabs, .. } => tabs.iter().flat_map(|t| t.widgets.iter()).collect(),
        }
    }
}

/// Help window content.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum HelpBlock {
    Heading(String),
    Subheading(String),
    Text(String),
}

/// One widget per non-reserved option plus a Submit button.
pub fn default_layout(options: &OptionSet) -> Vec<Element> {
    let mut elements: Vec<Element> = options
        .iter()
        .filter(|d| !is_reserved(&d.long))
        .map(|d| {
            let label = if d.description.is_empty() {
                d.long.as_str()
            } else {
                d.description.as_str()
            };
            let widget = match d.kind {
                OptionKind::Boolean => Widget::checkbox(&d.long, label),
                OptionKind::Value | OptionKind::Multiple => Widget::entry(&d.long, label),
            };
            Element::from(widget)
        })
        .collect();
    elements.push(Widget::button("submit", "Submit").into());
    elements
}
