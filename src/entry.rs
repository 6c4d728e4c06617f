use std::ffi::OsString;
use std::path::Path;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::app;
use crate::args::ViewerArgs;
use crate::error::{AppError, AppResult, ValidationError};
use crate::token;

/// Default config filenames checked when no CLI args are provided.
const DEFAULT_CONFIG_FILES: [&str; 2] = ["matinee.toml", "matinee.json"];

enum RunPlan {
    InspectToken(ViewerArgs),
    ShowSettings(ViewerArgs),
    Join(ViewerArgs),
}

pub(crate) fn run() -> AppResult<()> {
    let (args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };

    crate::logger::init_logging(args.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| {
            AppError::validation(ValidationError::RuntimeBuildFailed { source: err })
        })?;

    runtime.block_on(run_async(args, &matches))
}

fn parse_args() -> AppResult<Option<(ViewerArgs, ArgMatches)>> {
    let mut cmd = ViewerArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = ViewerArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !has_default_config()
}

fn has_default_config() -> bool {
    DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(args: ViewerArgs, matches: &ArgMatches) -> AppResult<()> {
    let plan = build_plan(args, matches)?;
    execute_plan(plan).await
}

fn build_plan(mut args: ViewerArgs, matches: &ArgMatches) -> AppResult<RunPlan> {
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(&mut args, matches, &config)?;
    }

    if args.inspect_token {
        return Ok(RunPlan::InspectToken(args));
    }
    if args.show_settings {
        return Ok(RunPlan::ShowSettings(args));
    }

    if args.server.is_none() {
        tracing::error!("Missing server URL (set --server or provide in config).");
        return Err(AppError::validation(ValidationError::MissingServer));
    }
    if args.token.is_none() {
        tracing::error!("Missing access token (set --token or provide in config).");
        return Err(AppError::validation(ValidationError::MissingToken));
    }

    Ok(RunPlan::Join(args))
}

async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    match plan {
        RunPlan::InspectToken(args) => inspect_token(&args),
        RunPlan::ShowSettings(args) => app::show_settings(&args).await,
        RunPlan::Join(args) => app::run_room(&args).await,
    }
}

fn inspect_token(args: &ViewerArgs) -> AppResult<()> {
    let raw = args
        .token
        .as_deref()
        .ok_or_else(|| AppError::validation(ValidationError::MissingToken))?;
    let grants = token::decode_token(raw)?;
    let can_join = grants
        .video
        .as_ref()
        .map(|grant| grant.room_join)
        .unwrap_or(false);
    println!("room: {}", grants.room().unwrap_or("(none)"));
    println!("roomJoin: {}", can_join);
    println!("identity: {}", grants.identity().unwrap_or("(none)"));
    println!("name: {}", grants.display_name().unwrap_or("(none)"));
    Ok(())
}
