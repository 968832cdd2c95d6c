// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Library half of the `vigil` binary: argument types, record loading and
//! the subcommand runners.

pub mod args;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;

pub use args::{Cli, Command};
pub use commands::{Output, run};
pub use error::CliError;
