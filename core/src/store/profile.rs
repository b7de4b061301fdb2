use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Auto,
    Light,
    Dark,
}

/// Player settings that outlive a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProfile {
    pub player_label: String,
    pub theme: Theme,
    pub sound: bool,
    pub last_mode: Mode,
    pub last_size: BoardSize,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            player_label: "Player".to_owned(),
            theme: Theme::default(),
            sound: true,
            last_mode: Mode::default(),
            last_size: BoardSize::default(),
        }
    }
}
