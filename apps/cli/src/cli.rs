use clap::{Args, Parser, Subcommand};
use hypr_config_sync::form::inputs;
use hypr_config_sync::{FormValues, SectionName, SubmitRoute};

#[derive(Parser, Debug)]
#[command(name = "cattrix", version, about = "Configure the CatTrix Discord bot")]
pub struct Cli {
    /// Bot web server, e.g. http://127.0.0.1:5000. Overrides CATTRIX_API_BASE.
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Bearer token sent with every request. Overrides CATTRIX_API_TOKEN.
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Request timeout in milliseconds. Overrides CATTRIX_TIMEOUT_MS.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Fetch and print the bot state after a successful submit.
    #[arg(long, global = true)]
    pub refresh: bool,

    /// How many times to retry a request that never reached the server.
    #[arg(long, global = true, default_value_t = 0)]
    pub retries: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Set the bot personality.
    Personality {
        text: String,
        /// Use the dedicated /api/personality endpoint.
        #[arg(long)]
        legacy: bool,
    },
    /// Configure the member welcome message.
    Welcome(MessageArgs),
    /// Configure the member leave message.
    Leave(MessageArgs),
    /// Configure the level system.
    Level(LevelArgs),
    /// Add or update a watched YouTube channel.
    Youtube(YoutubeArgs),
    /// Ask the bot to join a YouTube live chat.
    Stream {
        video_id: String,
        /// Use the dedicated /api/stream endpoint.
        #[arg(long)]
        legacy: bool,
    },
    /// Print the bot's current configuration.
    State {
        /// Print the raw snapshot as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the configuration panels and their inputs.
    Panels,
    /// Interactive configuration dashboard.
    Dashboard,
}

#[derive(Args, Debug)]
pub struct MessageArgs {
    #[arg(long)]
    pub channel: String,
    #[arg(long)]
    pub message: String,
    #[arg(long)]
    pub image: Option<String>,
    #[arg(long)]
    pub disable: bool,
}

#[derive(Args, Debug)]
pub struct LevelArgs {
    #[arg(long)]
    pub channel: String,
    /// XP granted per message.
    #[arg(long)]
    pub xp: String,
    #[arg(long)]
    pub message: String,
    #[arg(long)]
    pub image: Option<String>,
    #[arg(long)]
    pub disable: bool,
}

#[derive(Args, Debug)]
pub struct YoutubeArgs {
    pub channel_id: String,
    #[arg(long)]
    pub live: bool,
    #[arg(long)]
    pub videos: bool,
    #[arg(long)]
    pub shorts: bool,
}

/// A one-shot submit, expressed as the same named inputs the dashboard fills.
#[derive(Debug)]
pub struct Submission {
    pub section: SectionName,
    pub form: FormValues,
    pub route: SubmitRoute,
}

impl Command {
    pub fn submission(&self) -> Option<Submission> {
        let (section, form, legacy) = match self {
            Command::Personality { text, legacy } => (
                SectionName::Personality,
                FormValues::new().with_value(inputs::PERSONALITY, text),
                *legacy,
            ),
            Command::Welcome(args) => (
                SectionName::Welcome,
                message_form(
                    args,
                    [
                        inputs::WELCOME_ENABLED,
                        inputs::WELCOME_CHANNEL,
                        inputs::WELCOME_MESSAGE,
                        inputs::WELCOME_IMAGE,
                    ],
                ),
                false,
            ),
            Command::Leave(args) => (
                SectionName::Leave,
                message_form(
                    args,
                    [
                        inputs::LEAVE_ENABLED,
                        inputs::LEAVE_CHANNEL,
                        inputs::LEAVE_MESSAGE,
                        inputs::LEAVE_IMAGE,
                    ],
                ),
                false,
            ),
            Command::Level(args) => (
                SectionName::Level,
                FormValues::new()
                    .with_checked(inputs::LEVEL_ENABLED, !args.disable)
                    .with_value(inputs::LEVEL_CHANNEL, &args.channel)
                    .with_value(inputs::LEVEL_XP, &args.xp)
                    .with_value(inputs::LEVEL_MESSAGE, &args.message)
                    .with_value(inputs::LEVEL_IMAGE, args.image.as_deref().unwrap_or_default()),
                false,
            ),
            Command::Youtube(args) => (
                SectionName::YtChannels,
                FormValues::new()
                    .with_value(inputs::YT_ID, &args.channel_id)
                    .with_checked(inputs::YT_LIVE, args.live)
                    .with_checked(inputs::YT_VIDEOS, args.videos)
                    .with_checked(inputs::YT_SHORTS, args.shorts),
                false,
            ),
            Command::Stream { video_id, legacy } => (
                SectionName::Streams,
                FormValues::new().with_value(inputs::LIVE_ID, video_id),
                *legacy,
            ),
            Command::State { .. } | Command::Panels | Command::Dashboard => return None,
        };

        Some(Submission {
            section,
            form,
            route: if legacy {
                SubmitRoute::Legacy
            } else {
                SubmitRoute::Update
            },
        })
    }
}

fn message_form(args: &MessageArgs, [enabled, channel, message, image]: [&str; 4]) -> FormValues {
    FormValues::new()
        .with_checked(enabled, !args.disable)
        .with_value(channel, &args.channel)
        .with_value(message, &args.message)
        .with_value(image, args.image.as_deref().unwrap_or_default())
}
