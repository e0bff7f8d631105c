use std::ffi::OsString;

use clap::{CommandFactory, FromArgMatches};

use crate::app;
use crate::args::LoadArgs;
use crate::error::AppResult;
use crate::logger;

/// Parse flags, set up logging and the runtime, and execute the run.
///
/// # Errors
///
/// Returns any validation, I/O, or runtime error raised while resolving
/// flags or executing the load.
pub fn run() -> AppResult<()> {
    let args = match parse_args()? {
        Some(args) => args,
        None => return Ok(()),
    };

    logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(app::run_load(&args))
}

fn parse_args() -> AppResult<Option<LoadArgs>> {
    let mut cmd = LoadArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = LoadArgs::from_arg_matches(&matches)?;

    Ok(Some(args))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--")
}
