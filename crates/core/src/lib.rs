pub mod config;
pub mod error;
pub mod player;
pub mod types;

pub use config::{parse_release_toml, parse_release_toml_str};
pub use error::{Error, Result};
pub use player::{
    ClickOutcome, MediaEvent, PlayRejected, PlaybackHandle, Player, PlayerView, PlayTicket,
    RestoreTicket,
};
pub use types::*;
