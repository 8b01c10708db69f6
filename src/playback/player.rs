use crate::utils::timefmt::clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown {kind} {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: u8,
}

/// Numeric wire enums: serialized as their discriminant.
macro_rules! wire_enum {
    ($name:ident, $kind:literal { $($variant:ident = $value:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub enum $name {
            $($variant),+
        }

        impl TryFrom<u8> for $name {
            type Error = UnknownVariant;

            fn try_from(v: u8) -> Result<Self, Self::Error> {
                match v {
                    $($value => Ok($name::$variant),)+
                    _ => Err(UnknownVariant { kind: $kind, value: v }),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(v: $name) -> u8 {
                match v {
                    $($name::$variant => $value,)+
                }
            }
        }
    };
}

wire_enum!(StateMode, "state" { Playing = 0, Paused = 1, Stopped = 2 });
wire_enum!(RepeatMode, "repeat mode" { None = 1, All = 2, One = 4 });
wire_enum!(RatingSystem, "rating system" { None = 0, Like = 1, LikeDislike = 2, Scale = 3 });

impl RepeatMode {
    /// Next mode in None -> All -> One order, skipping modes missing from `available`
    /// (a bitmask of `RepeatMode` values).
    pub fn next_available(self, available: u8) -> Self {
        const ORDER: [RepeatMode; 3] = [RepeatMode::None, RepeatMode::All, RepeatMode::One];
        let at = ORDER.iter().position(|m| *m == self).unwrap_or(0);
        (1..=ORDER.len())
            .map(|step| ORDER[(at + step) % ORDER.len()])
            .find(|m| *m == RepeatMode::None || available & u8::from(*m) != 0)
            .unwrap_or(RepeatMode::None)
    }
}

/// "Now playing" state as reported by the media integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub cover: String,
    pub state: StateMode,
    /// seconds
    pub position: u64,
    /// seconds
    pub duration: u64,
    /// 0-100
    pub volume: u8,
    /// 0 = none, 1 = dislike, 5 = like
    pub rating: u8,
    pub repeat: RepeatMode,
    pub shuffle: bool,
    pub rating_system: RatingSystem,
    pub available_repeat: u8,
    pub can_set_state: bool,
    pub can_skip_previous: bool,
    pub can_skip_next: bool,
    pub can_set_position: bool,
    pub can_set_volume: bool,
    pub can_set_rating: bool,
    pub can_set_repeat: bool,
    pub can_set_shuffle: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub active_at: i64,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            title: String::new(),
            artist: String::new(),
            album: String::new(),
            cover: String::new(),
            state: StateMode::Stopped,
            position: 0,
            duration: 0,
            volume: 100,
            rating: 0,
            repeat: RepeatMode::None,
            shuffle: false,
            rating_system: RatingSystem::None,
            available_repeat: u8::from(RepeatMode::None),
            can_set_state: false,
            can_skip_previous: false,
            can_skip_next: false,
            can_set_position: false,
            can_set_volume: false,
            can_set_rating: false,
            can_set_repeat: false,
            can_set_shuffle: false,
            created_at: 0,
            updated_at: 0,
            active_at: 0,
        }
    }
}

impl Player {
    pub fn is_playing(&self) -> bool {
        self.state == StateMode::Playing
    }

    pub fn progress_label(&self) -> String {
        format!("{} / {}", clock(self.position.min(self.duration)), clock(self.duration))
    }

    /// Mode a repeat toggle would switch to, given what the player supports.
    pub fn next_repeat(&self) -> RepeatMode {
        self.repeat.next_available(self.available_repeat)
    }

    /// Fraction of the track played, 0 when the duration is unknown.
    pub fn progress(&self) -> f32 {
        if self.duration == 0 {
            return 0.0;
        }
        (self.position as f32 / self.duration as f32).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_player_is_stopped() {
        let p = Player::default();
        assert_eq!(p.state, StateMode::Stopped);
        assert_eq!(p.volume, 100);
        assert!(!p.is_playing());
        assert_eq!(p.progress(), 0.0);
    }

    #[test]
    fn test_player_json_uses_numeric_enums() {
        let p = Player {
            title: "Song".to_string(),
            state: StateMode::Paused,
            repeat: RepeatMode::One,
            rating_system: RatingSystem::LikeDislike,
            ..Default::default()
        };
        let v: serde_json::Value = serde_json::to_value(&p).unwrap();
        assert_eq!(v["state"], 1);
        assert_eq!(v["repeat"], 4);
        assert_eq!(v["ratingSystem"], 2);
        assert_eq!(v["canSkipNext"], false);
    }

    #[test]
    fn test_partial_player_json_fills_defaults() {
        let p: Player = serde_json::from_str(r#"{"title":"x","state":0,"position":61,"duration":200}"#).unwrap();
        assert!(p.is_playing());
        assert_eq!(p.volume, 100);
        assert_eq!(p.progress_label(), "1:01 / 3:20");
    }

    #[test]
    fn test_unknown_enum_value_rejected() {
        assert!(serde_json::from_str::<Player>(r#"{"repeat":3}"#).is_err());
        assert_eq!(RepeatMode::try_from(3), Err(UnknownVariant { kind: "repeat mode", value: 3 }));
        assert_eq!(StateMode::try_from(9).unwrap_err().to_string(), "unknown state 9");
    }

    #[test]
    fn test_next_repeat_uses_available_modes() {
        let mut p = Player { repeat: RepeatMode::All, ..Default::default() };
        assert_eq!(p.next_repeat(), RepeatMode::None);
        p.available_repeat = u8::from(RepeatMode::All) | u8::from(RepeatMode::One);
        assert_eq!(p.next_repeat(), RepeatMode::One);
    }

    #[test]
    fn test_repeat_next_available() {
        let all = u8::from(RepeatMode::All) | u8::from(RepeatMode::One);
        assert_eq!(RepeatMode::None.next_available(all), RepeatMode::All);
        assert_eq!(RepeatMode::All.next_available(all), RepeatMode::One);
        assert_eq!(RepeatMode::One.next_available(all), RepeatMode::None);
        assert_eq!(RepeatMode::None.next_available(u8::from(RepeatMode::One)), RepeatMode::One);
        assert_eq!(RepeatMode::None.next_available(0), RepeatMode::None);
    }
}
