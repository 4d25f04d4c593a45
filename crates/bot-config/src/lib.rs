mod payload;
mod section;
mod state;

pub use payload::UpdatePayload;
pub use section::{
    ConfigSection, LevelSection, MessageSection, SectionName, StreamJoin, YtChannelFlags,
};
pub use state::{BotStatus, DEFAULT_PERSONALITY, RemoteState, StreamMeta};
