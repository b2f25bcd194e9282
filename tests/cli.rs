use std::fs;
use std::path::Path;

use hydra::{
    Action, Application, CliDriver, Configuration, InputMap, OptionDecl, Outcome, Problems,
    ProgramInfo, ProgressSink, Timing, now_ms,
};

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
        for i in 1..=3 {
            progress.progress(&format!("Record: {}", i), Some(Timing::new(started, i, 3)));
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

    fn validate_config(&self, conf: &Configuration) -> hydra::Result<()> {
        if conf.get("example").unwrap_or_default().is_empty() {
            return Err(conf.invalid("'example' is required"));
        }
        Ok(())
    }

    fn action_for(&self, _inputs: &InputMap) -> hydra::Result<Box<dyn Action>> {
        Ok(Box::new(Greet))
    }
}

fn hello(config: Option<&Path>, error_log: Option<&Path>) -> Hello {
    Hello {
        program: ProgramInfo {
            name: "Hello".into(),
            version: "1.0".into(),
            date: "01/01/2024".into(),
            purpose: "Says hello.".into(),
            copyright: "Copyright (c) 2024".into(),
            usage: "hello --greeting G --name N".into(),
            config: config.map(|p| p.display().to_string()),
            error_log: error_log.map(|p| p.display().to_string()),
            ..Default::default()
        },
    }
}

fn run(app: &Hello, args: &[&str], interactive: bool) -> (Outcome, String) {
    let mut driver = CliDriver::new(app, Vec::new(), interactive);
    let outcome = driver.run(args);
    let output = String::from_utf8(driver.into_inner()).unwrap();
    (outcome, output)
}

#[test]
fn greets_and_reports_progress() {
    let app = hello(None, None);
    let (outcome, output) = run(&app, &["--greeting", "Hello", "--name", "World"], false);

    assert_eq!(outcome, Outcome::Completed("Hello World!".into()));
    assert!(output.starts_with('\n'));
    assert!(output.contains("Starting..."));
    // The final record is always shown with its timing suffix.
    assert!(output.contains("Record: 3 | Time: "));
    assert!(output.contains("| Progress: 100%"));
    let cleared = format!("{}\r", " ".repeat(79));
    assert!(output.ends_with(&format!("{}Hello World!\n\n", cleared)));
}

#[test]
fn short_and_inline_forms_work() {
    let app = hello(None, None);
    let (outcome, _) = run(&app, &["-g", "Hi", "--name=Ada"], false);
    assert_eq!(outcome, Outcome::Completed("Hi Ada!".into()));
}

#[test]
fn quiet_prints_nothing() {
    let app = hello(None, None);
    let (outcome, output) = run(&app, &["-q", "-g", "Hello", "-n", "World"], false);
    assert_eq!(outcome, Outcome::Completed("Hello World!".into()));
    assert_eq!(output, "");
}

#[test]
fn validation_failures_are_listed() {
    let app = hello(None, None);
    let (outcome, output) = run(&app, &[], false);

    assert_eq!(outcome, Outcome::Failed("Greeting required\nName required".into()));
    assert!(output.starts_with("\nERROR: Greeting required\nName required"));
    assert!(!output.contains("Validation("));
}

#[test]
fn verbose_adds_diagnostic() {
    let app = hello(None, None);
    let (outcome, output) = run(&app, &["-v", "--name", "World"], false);

    assert_eq!(outcome, Outcome::Failed("Greeting required".into()));
    assert!(output.contains("ERROR: Greeting required"));
    assert!(output.contains("Validation(\"Greeting required\")"));
}

#[test]
fn bare_interactive_launch_shows_help() {
    let app = hello(None, None);
    let (outcome, output) = run(&app, &[], true);

    assert_eq!(outcome, Outcome::Help);
    assert!(output.starts_with("\nHello 1.0\nSays hello.\nUsage: hello --greeting G --name N\n"));
    assert!(output.contains("    -g VALUE, --greeting VALUE"));
}

#[test]
fn help_version_and_license_flags() {
    let app = hello(None, None);

    let (outcome, _) = run(&app, &["--help"], false);
    assert_eq!(outcome, Outcome::Help);

    let (outcome, output) = run(&app, &["-V"], false);
    assert_eq!(outcome, Outcome::Version);
    assert_eq!(output, "\nHello 1.0 01/01/2024\n\n");

    let (outcome, output) = run(&app, &["--license"], false);
    assert_eq!(outcome, Outcome::License);
    assert!(output.contains("Copyright (c) 2024"));
}

#[test]
fn unknown_flag_fails() {
    let app = hello(None, None);
    let (outcome, output) = run(&app, &["--bogus"], false);
    assert_eq!(outcome, Outcome::Failed("Unknown argument: bogus".into()));
    assert!(output.contains("ERROR: Unknown argument: bogus"));
}

#[test]
fn config_supplies_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("hello.ini");
    fs::write(&config, "[hello]\nexample = yes\ngreeting = Howdy\n").unwrap();

    let app = hello(Some(&config), None);
    let (outcome, _) = run(&app, &["-q", "--name", "Partner"], false);
    assert_eq!(outcome, Outcome::Completed("Howdy Partner!".into()));
}

#[test]
fn missing_and_invalid_config_fail() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("hello.ini");

    let app = hello(Some(&config), None);
    let (outcome, _) = run(&app, &["-q"], false);
    assert_eq!(outcome, Outcome::Failed(format!("{} not found.", config.display())));

    fs::write(&config, "[hello]\ngreeting = Howdy\n").unwrap();
    let (outcome, _) = run(&app, &["-q"], false);
    assert_eq!(
        outcome,
        Outcome::Failed(format!(
            "The following errors occurred when parsing {}\n\n'example' is required",
            config.display()
        ))
    );
}

#[test]
fn failures_are_written_to_the_error_log() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("hello.err");

    let app = hello(None, Some(&log));
    let (outcome, _) = run(&app, &["--greeting", "Hi"], false);
    assert_eq!(outcome, Outcome::Failed("Name required".into()));

    let report = fs::read_to_string(&log).unwrap();
    assert!(report.starts_with("Hello 1.0 - "));
    assert!(report.contains("\n\nName required\n\n"));
    assert!(report.contains("Validation(\"Name required\")"));
}

#[test]
fn unwritable_error_log_is_reported_too() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("missing").join("hello.err");

    let app = hello(None, Some(&log));
    let (outcome, output) = run(&app, &["--greeting", "Hi"], false);
    assert_eq!(outcome, Outcome::Failed("Name required".into()));
    assert!(output.contains("ERROR: Name required"));
    assert!(output.contains("ERROR: I/O error"));
}
