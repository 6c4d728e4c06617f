mod room;
mod settings;

pub(crate) use room::run_room;
pub(crate) use settings::show_settings;
