//! Greets someone, showing validation and progress reporting.
//!
//! ```text
//! cargo run --example hello -- --greeting Hello --name World
//! cargo run --example hello -- gui
//! ```
use std::thread;
use std::time::Duration;

use hydra::{
    Action, Application, HelpBlock, InputMap, OptionDecl, Problems, ProgramInfo, ProgressSink,
    Timing, now_ms,
};

const GPL: &str = "This program is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.";

struct Greet;

impl Action for Greet {
    fn validate(&self, inputs: &InputMap) -> hydra::Result<()> {
        let mut problems = Problems::new();
        problems.require(inputs, "greeting", "Greeting required");
        problems.require(inputs, "name", "Name required");
        problems.into_result()
    }

    fn action(&mut self, inputs: &InputMap, progress: &mut dyn ProgressSink) -> hydra::Result<String> {
        progress.progress("Starting...", None);
        let started = now_ms();
        let total = 10;
        for i in 1..=total {
            thread::sleep(Duration::from_millis(200));
            progress.progress(&format!("Record: {}", i), Some(Timing::new(started, i, total)));
        }
        Ok(format!("{} {}!", inputs.value("greeting"), inputs.value("name")))
    }
}

struct Hello {
    program: ProgramInfo,
}

impl Application for Hello {
    fn program(&self) -> &ProgramInfo {
        &self.program
    }

    fn options(&self) -> Vec<OptionDecl> {
        vec![
            OptionDecl::value("greeting", 'g', "A greeting"),
            OptionDecl::value("name", 'n', "A name"),
        ]
    }

    fn action_for(&self, _inputs: &InputMap) -> hydra::Result<Box<dyn Action>> {
        Ok(Box::new(Greet))
    }

    fn help(&self) -> Vec<HelpBlock> {
        vec![
            HelpBlock::Heading("Greeting".into()),
            HelpBlock::Text("Enter a greeting and a name, then press Submit.".into()),
        ]
    }
}

fn main() {
    hydra::run(Hello {
        program: ProgramInfo {
            name: "Hydra Hello".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            date: "10/18/2026".into(),
            purpose: "Demonstrates validation and progress.".into(),
            url: Some("https://github.com/rweathers/hydra".into()),
            copyright: "Copyright (c) 2026 Ryan Weathers, All Rights Reserved.".into(),
            license: Some(GPL.into()),
            usage: "hello [-options] --greeting Greeting --name Name".into(),
            config: None,
            error_log: Some("{path}hello.err".into()),
            icon_file: None,
        },
    })
}
