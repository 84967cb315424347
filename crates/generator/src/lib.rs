// Gatefold release page generation
pub mod notes;
pub mod page;

pub use notes::render_liner_notes;
pub use page::{PageOptions, html_escape, player_config_json, render_page};
