use serde::{Deserialize, Serialize};

use crate::section::{ConfigSection, SectionName};

/// Partial update sent to the configuration API.
///
/// Holds exactly one section; every other key of the server document is left
/// untouched. Parsing a document with zero or several top-level keys fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdatePayload(ConfigSection);

impl UpdatePayload {
    pub fn new(section: ConfigSection) -> Self {
        Self(section)
    }

    pub fn name(&self) -> SectionName {
        self.0.name()
    }

    pub fn section(&self) -> &ConfigSection {
        &self.0
    }

    pub fn into_section(self) -> ConfigSection {
        self.0
    }
}

impl From<ConfigSection> for UpdatePayload {
    fn from(section: ConfigSection) -> Self {
        Self(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::LevelSection;

    #[test]
    fn exactly_one_top_level_key() {
        let payload = UpdatePayload::from(ConfigSection::Level(LevelSection {
            enabled: true,
            channel_id: "42".into(),
            xp_per_message: 25,
            message: "{user} reached level {level}".into(),
            image: None,
        }));

        let value = serde_json::to_value(&payload).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["level"]["xp_per_message"], 25);
        assert_eq!(payload.name(), SectionName::Level);
    }

    #[test]
    fn parses_back_into_the_same_section() {
        let payload = UpdatePayload::new(ConfigSection::stream_join("abc123"));
        let body = serde_json::to_string(&payload).unwrap();
        let parsed: UpdatePayload = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn rejects_empty_document() {
        assert!(serde_json::from_str::<UpdatePayload>("{}").is_err());
    }

    #[test]
    fn rejects_multiple_sections() {
        let body = r#"{"personality":"calm","streams":{"abc":{"force_join":true}}}"#;
        assert!(serde_json::from_str::<UpdatePayload>(body).is_err());
    }
}
