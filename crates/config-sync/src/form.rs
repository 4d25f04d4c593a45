//! Extraction of configuration sections from named form inputs.
//!
//! All raw input is text (or a checkbox state). Extractors pass text through
//! verbatim and only coerce fields the API expects as numbers.

use std::collections::HashMap;

use hypr_bot_config::{
    ConfigSection, LevelSection, MessageSection, SectionName, YtChannelFlags,
};

pub mod inputs {
    pub const PERSONALITY: &str = "personality";

    pub const WELCOME_ENABLED: &str = "welcome_enabled";
    pub const WELCOME_CHANNEL: &str = "welcome_channel";
    pub const WELCOME_MESSAGE: &str = "welcome_msg";
    pub const WELCOME_IMAGE: &str = "welcome_img";

    pub const LEAVE_ENABLED: &str = "leave_enabled";
    pub const LEAVE_CHANNEL: &str = "leave_channel";
    pub const LEAVE_MESSAGE: &str = "leave_msg";
    pub const LEAVE_IMAGE: &str = "leave_img";

    pub const LEVEL_ENABLED: &str = "level_enabled";
    pub const LEVEL_CHANNEL: &str = "level_channel";
    pub const LEVEL_XP: &str = "level_xp";
    pub const LEVEL_MESSAGE: &str = "level_msg";
    pub const LEVEL_IMAGE: &str = "level_img";

    pub const YT_ID: &str = "yt_id";
    pub const YT_LIVE: &str = "yt_live";
    pub const YT_VIDEOS: &str = "yt_video";
    pub const YT_SHORTS: &str = "yt_shorts";

    pub const LIVE_ID: &str = "live_id";
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("missing form input `{0}`")]
    MissingInput(&'static str),
    #[error("`{input}` must be a whole number, got {value:?}")]
    InvalidNumber { input: &'static str, value: String },
    #[error("`{0}` must not be empty")]
    EmptyKey(&'static str),
}

/// Read access to a set of named inputs.
///
/// `value` is `None` when no input with that id exists, which is different
/// from an input holding the empty string. `checked` is `None` when no
/// checkbox with that id exists.
pub trait FormInputs {
    fn value(&self, id: &str) -> Option<&str>;
    fn checked(&self, id: &str) -> Option<bool>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: HashMap<String, String>,
    checks: HashMap<String, bool>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_value(id, value);
        self
    }

    pub fn with_checked(mut self, id: impl Into<String>, checked: bool) -> Self {
        self.set_checked(id, checked);
        self
    }

    pub fn set_value(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.values.insert(id.into(), value.into());
    }

    pub fn set_checked(&mut self, id: impl Into<String>, checked: bool) {
        self.checks.insert(id.into(), checked);
    }

    pub fn value_mut(&mut self, id: &str) -> Option<&mut String> {
        self.values.get_mut(id)
    }

    pub fn toggle(&mut self, id: &str) {
        let entry = self.checks.entry(id.to_string()).or_insert(false);
        *entry = !*entry;
    }
}

impl FormInputs for FormValues {
    fn value(&self, id: &str) -> Option<&str> {
        self.values.get(id).map(String::as_str)
    }

    fn checked(&self, id: &str) -> Option<bool> {
        self.checks.get(id).copied()
    }
}

pub type Extractor = fn(&dyn FormInputs) -> Result<ConfigSection, FormError>;

/// The one mapping from section name to its extractor.
pub fn extractor(name: SectionName) -> Extractor {
    match name {
        SectionName::Personality => build_personality_section,
        SectionName::Welcome => build_welcome_section,
        SectionName::Leave => build_leave_section,
        SectionName::Level => build_level_section,
        SectionName::YtChannels => build_youtube_channel_entry,
        SectionName::Streams => build_stream_join_entry,
    }
}

pub fn build_section(name: SectionName, form: &dyn FormInputs) -> Result<ConfigSection, FormError> {
    extractor(name)(form)
}

struct MessageInputs {
    enabled: &'static str,
    channel: &'static str,
    message: &'static str,
    image: &'static str,
}

const WELCOME: MessageInputs = MessageInputs {
    enabled: inputs::WELCOME_ENABLED,
    channel: inputs::WELCOME_CHANNEL,
    message: inputs::WELCOME_MESSAGE,
    image: inputs::WELCOME_IMAGE,
};

const LEAVE: MessageInputs = MessageInputs {
    enabled: inputs::LEAVE_ENABLED,
    channel: inputs::LEAVE_CHANNEL,
    message: inputs::LEAVE_MESSAGE,
    image: inputs::LEAVE_IMAGE,
};

const LEVEL: MessageInputs = MessageInputs {
    enabled: inputs::LEVEL_ENABLED,
    channel: inputs::LEVEL_CHANNEL,
    message: inputs::LEVEL_MESSAGE,
    image: inputs::LEVEL_IMAGE,
};

pub fn build_personality_section(form: &dyn FormInputs) -> Result<ConfigSection, FormError> {
    Ok(ConfigSection::Personality(required(
        form,
        inputs::PERSONALITY,
    )?))
}

pub fn build_welcome_section(form: &dyn FormInputs) -> Result<ConfigSection, FormError> {
    read_message_section(form, &WELCOME).map(ConfigSection::Welcome)
}

pub fn build_leave_section(form: &dyn FormInputs) -> Result<ConfigSection, FormError> {
    read_message_section(form, &LEAVE).map(ConfigSection::Leave)
}

pub fn build_level_section(form: &dyn FormInputs) -> Result<ConfigSection, FormError> {
    let base = read_message_section(form, &LEVEL)?;
    let xp_raw = required(form, inputs::LEVEL_XP)?;

    Ok(ConfigSection::Level(LevelSection {
        enabled: base.enabled,
        channel_id: base.channel_id,
        xp_per_message: coerce_whole_number(inputs::LEVEL_XP, &xp_raw)?,
        message: base.message,
        image: base.image,
    }))
}

pub fn build_youtube_channel_entry(form: &dyn FormInputs) -> Result<ConfigSection, FormError> {
    let channel_id = required_key(form, inputs::YT_ID)?;
    let flags = YtChannelFlags {
        live: form.checked(inputs::YT_LIVE).unwrap_or(false),
        videos: form.checked(inputs::YT_VIDEOS).unwrap_or(false),
        shorts: form.checked(inputs::YT_SHORTS).unwrap_or(false),
    };
    Ok(ConfigSection::yt_channel(channel_id, flags))
}

pub fn build_stream_join_entry(form: &dyn FormInputs) -> Result<ConfigSection, FormError> {
    Ok(ConfigSection::stream_join(required_key(
        form,
        inputs::LIVE_ID,
    )?))
}

fn read_message_section(
    form: &dyn FormInputs,
    ids: &MessageInputs,
) -> Result<MessageSection, FormError> {
    Ok(MessageSection {
        // Forms without an explicit toggle always enable the feature.
        enabled: form.checked(ids.enabled).unwrap_or(true),
        channel_id: required(form, ids.channel)?,
        message: required(form, ids.message)?,
        image: form
            .value(ids.image)
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string),
    })
}

fn required(form: &dyn FormInputs, id: &'static str) -> Result<String, FormError> {
    form.value(id)
        .map(str::to_string)
        .ok_or(FormError::MissingInput(id))
}

fn required_key(form: &dyn FormInputs, id: &'static str) -> Result<String, FormError> {
    let value = required(form, id)?;
    if value.trim().is_empty() {
        return Err(FormError::EmptyKey(id));
    }
    Ok(value)
}

/// Empty input counts as zero. Integral decimals such as `"25.0"` are accepted.
///
/// `xp_per_message` is a count, so negatives and fractions are refused here
/// rather than sent. Documents written by other clients may still hold such
/// values; `RemoteState` reads those as an absent `level` section.
fn coerce_whole_number(input: &'static str, raw: &str) -> Result<u32, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    if let Ok(n) = trimmed.parse::<u32>() {
        return Ok(n);
    }

    let invalid = || FormError::InvalidNumber {
        input,
        value: raw.to_string(),
    };
    let float: f64 = trimmed.parse().map_err(|_| invalid())?;
    if float.is_finite() && float.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&float) {
        Ok(float as u32)
    } else {
        Err(invalid())
    }
}
