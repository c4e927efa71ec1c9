//! Shared code for the n8nctl binaries.
//!
//! Each binary parses its own arguments with clap and hands them to a
//! `run` function in [`commands`]; [`app`] owns tracing setup, configuration
//! loading and interrupt handling, [`output`] the tables and status lines.

pub mod app;
pub mod commands;
pub mod output;
