//! Three actions behind one notebook; the selected tab picks the action.
//!
//! ```text
//! cargo run --example tabs -- --action action2 --value2 x
//! ```

use hydra::{
    Action, Application, Configuration, Element, Error, InputMap, OptionDecl, ProgramInfo,
    ProgressSink, Tab, Widget,
};

struct Numbered {
    number: u8,
}

impl Action for Numbered {
    fn validate(&self, inputs: &InputMap) -> hydra::Result<()> {
        if inputs.value(&format!("value{}", self.number)).is_empty() {
            return Err(Error::Validation(format!("Value {} required", self.number)));
        }
        Ok(())
    }

    fn action(&mut self, _inputs: &InputMap, _progress: &mut dyn ProgressSink) -> hydra::Result<String> {
        Ok(format!("Action {} Completed Successfully", self.number))
    }
}

struct Tabs {
    program: ProgramInfo,
}

impl Application for Tabs {
    fn program(&self) -> &ProgramInfo {
        &self.program
    }

    fn options(&self) -> Vec<OptionDecl> {
        vec![
            OptionDecl::value("action", 'a', "One of: action1, action2 or action3"),
            OptionDecl::value("value1", '1', "Value #1"),
            OptionDecl::value("value2", '2', "Value #2"),
            OptionDecl::value("value3", '3', "Value #3"),
        ]
    }

    /// Accepts the CLI spelling (`action2`) and the tab title (`Action 2`).
    fn action_for(&self, inputs: &InputMap) -> hydra::Result<Box<dyn Action>> {
        let action: String = inputs
            .value("action")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        match action.to_lowercase().as_str() {
            "action1" => Ok(Box::new(Numbered { number: 1 })),
            "action2" => Ok(Box::new(Numbered { number: 2 })),
            "action3" => Ok(Box::new(Numbered { number: 3 })),
            _ => Err(Error::action("action required")),
        }
    }

    fn layout(&self, _conf: &Configuration) -> hydra::Result<Vec<Element>> {
        let tab = |n: u8| {
            Tab::new(
                &format!("Action {}", n),
                vec![
                    Widget::entry(&format!("value{}", n), &format!("Value {}", n)),
                    Widget::button(&format!("submit{}", n), &format!("Action {}", n)),
                ],
            )
        };
        Ok(vec![Element::notebook("action", vec![tab(1), tab(2), tab(3)])])
    }
}

fn main() {
    hydra::run(Tabs {
        program: ProgramInfo {
            name: "Hydra Tabs".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            date: "10/18/2026".into(),
            purpose: "Demonstrates a notebook selecting between actions.".into(),
            url: Some("https://github.com/rweathers/hydra".into()),
            copyright: "Copyright (c) 2026 Ryan Weathers, All Rights Reserved.".into(),
            usage: "tabs [-options] --action action# --value# value".into(),
            ..Default::default()
        },
    })
}
