pub mod settings_item;
pub mod status_indicator;
pub mod submit_button;
pub mod toast;
