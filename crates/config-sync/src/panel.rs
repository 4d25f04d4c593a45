use hypr_bot_config::SectionName;

use crate::form::{FormValues, inputs};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Number,
    Checkbox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: InputKind,
}

const fn text(id: &'static str, label: &'static str) -> InputSpec {
    InputSpec {
        id,
        label,
        kind: InputKind::Text,
    }
}

const fn number(id: &'static str, label: &'static str) -> InputSpec {
    InputSpec {
        id,
        label,
        kind: InputKind::Number,
    }
}

const fn checkbox(id: &'static str, label: &'static str) -> InputSpec {
    InputSpec {
        id,
        label,
        kind: InputKind::Checkbox,
    }
}

const PERSONALITY_INPUTS: &[InputSpec] = &[text(inputs::PERSONALITY, "Personality")];

const WELCOME_INPUTS: &[InputSpec] = &[
    checkbox(inputs::WELCOME_ENABLED, "Enabled"),
    text(inputs::WELCOME_CHANNEL, "Channel ID"),
    text(inputs::WELCOME_MESSAGE, "Welcome message"),
    text(inputs::WELCOME_IMAGE, "Image URL (optional)"),
];

const LEAVE_INPUTS: &[InputSpec] = &[
    checkbox(inputs::LEAVE_ENABLED, "Enabled"),
    text(inputs::LEAVE_CHANNEL, "Channel ID"),
    text(inputs::LEAVE_MESSAGE, "Leave message"),
    text(inputs::LEAVE_IMAGE, "Image URL (optional)"),
];

const LEVEL_INPUTS: &[InputSpec] = &[
    checkbox(inputs::LEVEL_ENABLED, "Enabled"),
    text(inputs::LEVEL_CHANNEL, "Channel ID"),
    number(inputs::LEVEL_XP, "XP per message"),
    text(inputs::LEVEL_MESSAGE, "Level-up message"),
    text(inputs::LEVEL_IMAGE, "Image URL (optional)"),
];

const YOUTUBE_INPUTS: &[InputSpec] = &[
    text(inputs::YT_ID, "Channel ID"),
    checkbox(inputs::YT_LIVE, "Live"),
    checkbox(inputs::YT_VIDEOS, "Videos"),
    checkbox(inputs::YT_SHORTS, "Shorts"),
];

const LIVE_INPUTS: &[InputSpec] = &[text(inputs::LIVE_ID, "YouTube LIVE video ID")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Panel {
    Personality,
    Welcome,
    Leave,
    Levels,
    #[strum(serialize = "youtube")]
    YouTube,
    Live,
}

impl Panel {
    pub fn all() -> &'static [Panel] {
        &[
            Panel::Personality,
            Panel::Welcome,
            Panel::Leave,
            Panel::Levels,
            Panel::YouTube,
            Panel::Live,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Panel::Personality => "Personality",
            Panel::Welcome => "Welcome",
            Panel::Leave => "Leave",
            Panel::Levels => "Level System",
            Panel::YouTube => "YouTube Channels",
            Panel::Live => "YouTube Live Interaction",
        }
    }

    pub fn section(&self) -> SectionName {
        match self {
            Panel::Personality => SectionName::Personality,
            Panel::Welcome => SectionName::Welcome,
            Panel::Leave => SectionName::Leave,
            Panel::Levels => SectionName::Level,
            Panel::YouTube => SectionName::YtChannels,
            Panel::Live => SectionName::Streams,
        }
    }

    pub fn inputs(&self) -> &'static [InputSpec] {
        match self {
            Panel::Personality => PERSONALITY_INPUTS,
            Panel::Welcome => WELCOME_INPUTS,
            Panel::Leave => LEAVE_INPUTS,
            Panel::Levels => LEVEL_INPUTS,
            Panel::YouTube => YOUTUBE_INPUTS,
            Panel::Live => LIVE_INPUTS,
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            Panel::YouTube => "Add",
            Panel::Live => "Join Live Chat",
            _ => "Save",
        }
    }

    pub fn next(&self) -> Panel {
        let all = Self::all();
        let idx = self.index();
        all[(idx + 1) % all.len()]
    }

    pub fn prev(&self) -> Panel {
        let all = Self::all();
        let idx = self.index();
        all[(idx + all.len() - 1) % all.len()]
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|p| p == self).unwrap_or(0)
    }

    /// A form holding every input of this panel at its blank state:
    /// empty text, unchecked boxes, except `*_enabled` which starts checked.
    pub fn blank_form(&self) -> FormValues {
        let mut form = FormValues::new();
        for spec in self.inputs() {
            match spec.kind {
                InputKind::Text | InputKind::Number => form.set_value(spec.id, ""),
                InputKind::Checkbox => form.set_checked(spec.id, spec.id.ends_with("_enabled")),
            }
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::form::{FormError, FormInputs, build_section};

    #[test]
    fn cycles_through_panels() {
        assert_eq!(Panel::Personality.next(), Panel::Welcome);
        assert_eq!(Panel::Live.next(), Panel::Personality);
        assert_eq!(Panel::Personality.prev(), Panel::Live);
        for panel in Panel::all() {
            assert_eq!(panel.next().prev(), *panel);
        }
    }

    #[test]
    fn parses_panel_names() {
        assert_eq!(Panel::from_str("youtube").unwrap(), Panel::YouTube);
        assert_eq!(Panel::from_str("levels").unwrap(), Panel::Levels);
        assert_eq!(Panel::YouTube.to_string(), "youtube");
    }

    #[test]
    fn blank_forms_satisfy_extractors_except_keys() {
        for panel in Panel::all() {
            let form = panel.blank_form();
            for spec in panel.inputs() {
                match spec.kind {
                    InputKind::Checkbox => assert!(form.checked(spec.id).is_some()),
                    _ => assert_eq!(form.value(spec.id), Some("")),
                }
            }

            match build_section(panel.section(), &form) {
                Ok(section) => assert_eq!(section.name(), panel.section()),
                Err(FormError::EmptyKey(_)) => {
                    assert!(matches!(panel, Panel::YouTube | Panel::Live))
                }
                Err(e) => panic!("{panel}: {e}"),
            }
        }
    }
}
