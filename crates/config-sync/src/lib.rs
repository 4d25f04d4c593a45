mod client;
mod controller;
mod error;
pub mod form;
mod panel;
mod retry;
mod view;

pub use client::{
    ConfigSyncClient, ConfigSyncClientBuilder, PERSONALITY_PATH, STATE_PATH, STREAM_PATH,
    UPDATE_PATH,
};
pub use controller::{
    ActionError, ActionOutcome, InFlight, InFlightGuard, Notice, Notifier, RefreshOutcome,
    RefreshSequencer, RefreshTicket, SubmitRoute, SyncController,
};
pub use error::Error;
pub use form::{FormError, FormInputs, FormValues, build_section};
pub use panel::{InputKind, InputSpec, Panel};
pub use retry::{RetryConfig, with_retry};
pub use view::{BufferedView, ListBuffer, ListView, StateView, TextBuffer, TextView, refresh_view};

pub use hypr_bot_config::{
    BotStatus, ConfigSection, LevelSection, MessageSection, RemoteState, SectionName, StreamJoin,
    StreamMeta, UpdatePayload, YtChannelFlags,
};
