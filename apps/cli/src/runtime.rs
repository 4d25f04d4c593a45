use hypr_config_sync::{Notice, Notifier, RefreshOutcome};
use tokio::sync::mpsc;

pub enum SyncEvent {
    Notice(Notice),
    Refreshed(RefreshOutcome),
}

/// Forwards controller notices into the dashboard's event loop.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<SyncEvent>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::UnboundedSender<SyncEvent>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        let _ = self.tx.send(SyncEvent::Notice(notice));
    }
}

/// Prints notices for one-shot commands.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Acknowledged { message, .. } => println!("{message}"),
            Notice::Busy { section } => eprintln!("{section} is already being saved"),
            Notice::Failed { message, .. } => eprintln!("error: {message}"),
        }
    }
}
