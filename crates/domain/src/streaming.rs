//! Streaming apps the media player can be switched to.

use serde::{Deserialize, Serialize};

/// Well-known apps and the source id the media player lists them under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamingApp {
    #[default]
    Netflix,
    DisneyPlus,
    Youtube,
    /// Listed by the player but selection is unreliable on some firmware.
    Crunchyroll,
    /// The player exposes several names for Prime; this one works most often.
    PrimeVideo,
}

impl StreamingApp {
    /// Source id to pass to `select_source`.
    #[must_use]
    pub fn source_id(self) -> &'static str {
        match self {
            Self::Netflix => "com.netflix.ninja",
            Self::DisneyPlus => "com.disney.disneyplus",
            Self::Youtube => "YouTube (FireTV)",
            Self::Crunchyroll => "com.crunchyroll.crunchyroid",
            Self::PrimeVideo => "Amazon Video",
        }
    }
}
