use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::ViewerArgs;
use crate::args::parsers::parse_duration_arg;
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::ConfigFile;

/// Fills CLI args from a loaded config file. CLI flags always win; config
/// values only land where the user left the default.
///
/// # Errors
///
/// Returns an error when a config value fails validation.
pub fn apply_config(
    args: &mut ViewerArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if args.server.is_none() {
        args.server.clone_from(&config.server);
    }
    if args.token.is_none() {
        args.token.clone_from(&config.token);
    }
    if args.name.is_none() {
        args.name.clone_from(&config.name);
    }
    if args.room.is_none() {
        args.room.clone_from(&config.room);
    }

    if uses_default(matches, "skip_step")
        && let Some(step) = config.skip_step
    {
        if step == 0 || step > 3_600 {
            return Err(AppError::config(ConfigError::InvalidSkipStep {
                source: ValidationError::SkipStepOutOfRange,
            }));
        }
        args.skip_step = step;
    }

    if args.reconnect_initial.is_none()
        && let Some(value) = config.reconnect_initial.as_deref()
    {
        args.reconnect_initial = Some(parse_backoff_duration(value)?);
    }
    if args.reconnect_cap.is_none()
        && let Some(value) = config.reconnect_cap.as_deref()
    {
        args.reconnect_cap = Some(parse_backoff_duration(value)?);
    }

    if config.no_ui.unwrap_or(false) {
        args.no_ui = true;
    }
    if config.no_color.unwrap_or(false) {
        args.no_color = true;
    }

    Ok(())
}

fn uses_default(matches: &ArgMatches, id: &str) -> bool {
    matches!(matches.value_source(id), Some(ValueSource::DefaultValue))
}

fn parse_backoff_duration(value: &str) -> AppResult<std::time::Duration> {
    parse_duration_arg(value).map_err(|err| match err {
        AppError::Validation(source) => {
            AppError::config(ConfigError::InvalidBackoff { source })
        }
        other => other,
    })
}
