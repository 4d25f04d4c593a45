use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::section::{LevelSection, MessageSection, YtChannelFlags};

/// Personality the server reports before anyone has set one.
pub const DEFAULT_PERSONALITY: &str = "cattrix";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamMeta {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub force_join: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotStatus {
    #[serde(default)]
    pub online: bool,
}

/// Snapshot returned by the state endpoint. Replaced wholesale on every fetch.
///
/// Only `personality` and the keys of `streams` are relied on. The other
/// sections are read when they have the expected shape and are `None`
/// otherwise, so a section written by another client can never make the
/// whole snapshot unreadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteState {
    #[serde(default = "default_personality")]
    pub personality: String,
    #[serde(default, deserialize_with = "stream_map")]
    pub streams: BTreeMap<String, StreamMeta>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub welcome: Option<MessageSection>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub leave: Option<MessageSection>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub level: Option<LevelSection>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub yt_channels: Option<BTreeMap<String, YtChannelFlags>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub bot: Option<BotStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A value of the wrong shape (including `null`) reads as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Every key is kept; an entry that is not a metadata object reads as empty.
fn stream_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, StreamMeta>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Value>> = lenient(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(id, meta)| (id, StreamMeta::deserialize(meta).unwrap_or_default()))
        .collect())
}

fn default_personality() -> String {
    DEFAULT_PERSONALITY.to_string()
}

impl Default for RemoteState {
    fn default() -> Self {
        Self {
            personality: default_personality(),
            streams: BTreeMap::new(),
            welcome: None,
            leave: None,
            level: None,
            yt_channels: None,
            bot: None,
            extra: Map::new(),
        }
    }
}

impl RemoteState {
    pub fn stream_ids(&self) -> impl Iterator<Item = &str> {
        self.streams.keys().map(String::as_str)
    }

    pub fn is_bot_online(&self) -> bool {
        self.bot.is_some_and(|b| b.online)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_document_uses_server_defaults() {
        let state: RemoteState = serde_json::from_value(json!({})).unwrap();
        assert_eq!(state, RemoteState::default());
        assert_eq!(state.personality, "cattrix");
        assert_eq!(state.stream_ids().count(), 0);
    }

    #[test]
    fn reads_both_stream_shapes() {
        let state: RemoteState = serde_json::from_value(json!({
            "personality": "Friendly",
            "streams": {
                "abc123": { "enabled": true },
                "def456": { "force_join": true, "title": "late night" }
            },
            "bot": { "online": true }
        }))
        .unwrap();

        assert_eq!(state.stream_ids().collect::<Vec<_>>(), ["abc123", "def456"]);
        assert_eq!(state.streams["abc123"].enabled, Some(true));
        assert_eq!(state.streams["def456"].force_join, Some(true));
        assert_eq!(state.streams["def456"].extra["title"], "late night");
        assert!(state.is_bot_online());
    }

    #[test]
    fn odd_sections_do_not_hide_streams() {
        for xp in [json!(2.5), json!(-3), json!(null)] {
            let state: RemoteState = serde_json::from_value(json!({
                "personality": "Friendly",
                "streams": { "abc123": { "force_join": true } },
                "level": { "enabled": true, "channel_id": "1", "xp_per_message": xp, "message": "gg" },
                "welcome": null,
                "bot": "online"
            }))
            .unwrap();

            assert_eq!(state.personality, "Friendly");
            assert_eq!(state.stream_ids().collect::<Vec<_>>(), ["abc123"]);
            assert_eq!(state.level, None);
            assert_eq!(state.welcome, None);
            assert!(!state.is_bot_online());
        }
    }

    #[test]
    fn odd_stream_entries_keep_their_key() {
        let state: RemoteState = serde_json::from_value(json!({
            "streams": { "abc123": true, "def456": { "force_join": "yes" } }
        }))
        .unwrap();

        assert_eq!(state.stream_ids().collect::<Vec<_>>(), ["abc123", "def456"]);
        assert_eq!(state.streams["abc123"], StreamMeta::default());
        assert_eq!(state.streams["def456"].force_join, None);

        let empty: RemoteState = serde_json::from_value(json!({ "streams": null })).unwrap();
        assert_eq!(empty.stream_ids().count(), 0);
    }

    #[test]
    fn keeps_unknown_keys() {
        let state: RemoteState = serde_json::from_value(json!({
            "personality": "calm",
            "streams": {},
            "moderation": { "auto_purge": false }
        }))
        .unwrap();

        assert_eq!(state.extra["moderation"]["auto_purge"], false);
        assert!(!state.is_bot_online());
    }
}
