use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub server: Option<String>,
    pub token: Option<String>,
    #[serde(alias = "display_name")]
    pub name: Option<String>,
    pub room: Option<String>,
    pub skip_step: Option<u64>,
    pub reconnect_initial: Option<String>,
    pub reconnect_cap: Option<String>,
    pub no_ui: Option<bool>,
    pub no_color: Option<bool>,
}
