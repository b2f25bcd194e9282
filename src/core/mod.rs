//! Core building blocks shared by both front ends: option declarations,
//! argument parsing, configuration, the action lifecycle, progress
//! formatting, file helpers and error reporting.
pub mod action;
pub mod config;
pub mod error_log;
pub mod files;
pub mod inputs;
pub mod options;
pub mod parser;
pub mod progress;
