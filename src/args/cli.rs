use clap::Parser;
use std::time::Duration;

use super::parsers::{parse_duration_arg, parse_skip_step};

/// Default seconds skipped by the `/back` and `/fwd` transport keys.
const DEFAULT_SKIP_STEP_SECS: u64 = 15;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Terminal client for shared screening rooms - live playback timeline, chat relay, push-to-talk gating, and VCR-style transport controls."
)]
pub struct ViewerArgs {
    /// Room server base URL (http(s):// or ws(s)://)
    #[arg(long, short, env = "MATINEE_SERVER")]
    pub server: Option<String>,

    /// Room access token (JWT issued by the room server)
    #[arg(long, short, env = "MATINEE_TOKEN")]
    pub token: Option<String>,

    /// Display name shown to other participants
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Room identifier (defaults to the room granted by the token)
    #[arg(long)]
    pub room: Option<String>,

    /// Path to a config file (.toml or .json)
    #[arg(long, short)]
    pub config: Option<String>,

    /// Seconds skipped by the back/forward transport keys
    #[arg(long = "skip-step", value_parser = parse_skip_step, default_value_t = DEFAULT_SKIP_STEP_SECS)]
    pub skip_step: u64,

    /// Initial reconnect delay for the state feed and chat relay (supports ms/s/m/h)
    #[arg(long = "reconnect-initial", value_parser = parse_duration_arg)]
    pub reconnect_initial: Option<Duration>,

    /// Reconnect delay cap (supports ms/s/m/h)
    #[arg(long = "reconnect-cap", value_parser = parse_duration_arg)]
    pub reconnect_cap: Option<Duration>,

    /// Fetch and print the room server settings, then exit
    #[arg(long = "show-settings")]
    pub show_settings: bool,

    /// Decode and print the access token grants, then exit
    #[arg(long = "inspect-token")]
    pub inspect_token: bool,

    /// Disable the full-screen UI; log state updates to stdout instead
    #[arg(long = "no-ui")]
    pub no_ui: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Verbose logging (debug level)
    #[arg(long, short)]
    pub verbose: bool,
}
