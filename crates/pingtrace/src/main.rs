#![warn(clippy::all, clippy::pedantic, clippy::nursery, rust_2018_idioms)]
#![allow(
    clippy::module_name_repetitions,
    clippy::option_if_let_else,
    clippy::missing_const_for_fn,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]
#![forbid(unsafe_code)]

use clap::Parser;
use config::Args;
use std::process::ExitCode;

mod app;
mod config;
mod report;

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let trace_identifier = rand::random::<u16>();
    app::run_pingtrace(&args, trace_identifier)
}
