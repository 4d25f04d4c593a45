use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SectionName {
    Personality,
    Welcome,
    Leave,
    Level,
    YtChannels,
    Streams,
}

impl SectionName {
    pub fn all() -> &'static [SectionName] {
        &[
            SectionName::Personality,
            SectionName::Welcome,
            SectionName::Leave,
            SectionName::Level,
            SectionName::YtChannels,
            SectionName::Streams,
        ]
    }

    /// Text shown to the user once a submit of this section has settled.
    pub fn acknowledgment(&self) -> &'static str {
        match self {
            SectionName::Personality => "Personality updated",
            SectionName::Welcome => "Welcome updated",
            SectionName::Leave => "Leave message updated",
            SectionName::Level => "Level updated",
            SectionName::YtChannels => "YouTube channel added",
            SectionName::Streams => "Bot will join live chat",
        }
    }
}

/// Welcome and leave messages share one shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub xp_per_message: u32,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YtChannelFlags {
    #[serde(default)]
    pub live: bool,
    #[serde(default)]
    pub videos: bool,
    #[serde(default)]
    pub shorts: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamJoin {
    #[serde(default)]
    pub force_join: bool,
}

/// One independently submittable unit of bot configuration.
///
/// Serializes externally tagged, so a section on its own is already the
/// `{ "<name>": <fields> }` document the update endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSection {
    Personality(String),
    Welcome(MessageSection),
    Leave(MessageSection),
    Level(LevelSection),
    YtChannels(BTreeMap<String, YtChannelFlags>),
    Streams(BTreeMap<String, StreamJoin>),
}

impl ConfigSection {
    pub fn name(&self) -> SectionName {
        match self {
            ConfigSection::Personality(_) => SectionName::Personality,
            ConfigSection::Welcome(_) => SectionName::Welcome,
            ConfigSection::Leave(_) => SectionName::Leave,
            ConfigSection::Level(_) => SectionName::Level,
            ConfigSection::YtChannels(_) => SectionName::YtChannels,
            ConfigSection::Streams(_) => SectionName::Streams,
        }
    }

    pub fn yt_channel(channel_id: impl Into<String>, flags: YtChannelFlags) -> Self {
        ConfigSection::YtChannels(BTreeMap::from([(channel_id.into(), flags)]))
    }

    pub fn stream_join(video_id: impl Into<String>) -> Self {
        ConfigSection::Streams(BTreeMap::from([(
            video_id.into(),
            StreamJoin { force_join: true },
        )]))
    }
}
