//! Anime ranking record extracted from a single listing row

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Numeral written in place of an unknown episode count.
///
/// Older exports and the downstream cleaning step both recognise this value,
/// so it is kept as the persisted representation of [`EpisodeCount::Unknown`].
pub const UNKNOWN_EPISODES_LEGACY_VALUE: i64 = -500;

/// Column names of the persisted dataset, in output order
pub const DATASET_COLUMNS: [&str; 9] = [
    "anime",
    "score",
    "popularity",
    "season_start",
    "year_start",
    "season_end",
    "year_end",
    "num_episodes",
    "anime_type",
];

/// Episode count of a listing entry.
///
/// The listing shows `(?)` for series whose length is not announced yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EpisodeCount {
    Known(u32),
    Unknown,
}

impl EpisodeCount {
    /// Value used in persisted tables (`-500` for unknown)
    pub fn legacy_value(self) -> i64 {
        match self {
            Self::Known(n) => i64::from(n),
            Self::Unknown => UNKNOWN_EPISODES_LEGACY_VALUE,
        }
    }

    /// Inverse of [`legacy_value`](Self::legacy_value). Negative values other
    /// than the sentinel are rejected.
    pub fn from_legacy_value(value: i64) -> Option<Self> {
        if value == UNKNOWN_EPISODES_LEGACY_VALUE {
            return Some(Self::Unknown);
        }
        u32::try_from(value).ok().map(Self::Known)
    }

    pub fn known(self) -> Option<u32> {
        match self {
            Self::Known(n) => Some(n),
            Self::Unknown => None,
        }
    }

    pub fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for EpisodeCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(n) => write!(f, "{n}"),
            Self::Unknown => f.write_str("?"),
        }
    }
}

impl Serialize for EpisodeCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.legacy_value())
    }
}

impl<'de> Deserialize<'de> for EpisodeCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Self::from_legacy_value(value).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid episode count: {value}"))
        })
    }
}

/// One extracted catalog entry.
///
/// Field order matches [`DATASET_COLUMNS`]; the CSV writer relies on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Title text, absent when the row has no title anchor
    #[serde(rename = "anime")]
    pub name: Option<String>,

    /// Raw score text (may be a placeholder such as `N/A`)
    pub score: Option<String>,

    /// Member count
    pub popularity: i64,

    /// Month token the airing started in (e.g. `Apr`)
    pub season_start: String,
    pub year_start: i32,

    /// Month token the airing ended in
    pub season_end: String,
    pub year_end: i32,

    pub num_episodes: EpisodeCount,

    /// Content type such as `TV`, `Movie`, `OVA`
    #[serde(rename = "anime_type")]
    pub category: String,
}

impl ItemRecord {
    /// Score parsed as a number, when it is one
    pub fn numeric_score(&self) -> Option<f64> {
        self.score
            .as_deref()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }
}
