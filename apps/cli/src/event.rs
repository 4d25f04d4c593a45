use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;

use crate::runtime::SyncEvent;

pub enum AppEvent {
    Sync(SyncEvent),
    Key(KeyEvent),
    Paste(String),
    Resize,
    Tick,
}

/// Terminal input, ticks and network completions, merged into one queue.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    _task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(mut sync_rx: mpsc::UnboundedReceiver<SyncEvent>, tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut terminal_events = EventStream::new();
            let mut tick = tokio::time::interval(tick_rate);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                let event = tokio::select! {
                    Some(sync_event) = sync_rx.recv() => AppEvent::Sync(sync_event),
                    Some(Ok(raw)) = terminal_events.next() => match translate(raw) {
                        Some(event) => event,
                        None => continue,
                    },
                    _ = tick.tick() => AppEvent::Tick,
                };

                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, _task: task }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

fn translate(event: CrosstermEvent) -> Option<AppEvent> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        CrosstermEvent::Paste(text) => Some(AppEvent::Paste(text)),
        CrosstermEvent::Resize(_, _) => Some(AppEvent::Resize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    use super::*;

    #[test]
    fn only_key_presses_are_forwarded() {
        let press = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert!(matches!(
            translate(CrosstermEvent::Key(press)),
            Some(AppEvent::Key(_))
        ));

        let release = KeyEvent {
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
            ..press
        };
        assert!(translate(CrosstermEvent::Key(release)).is_none());
        assert!(translate(CrosstermEvent::FocusLost).is_none());
    }

    #[test]
    fn paste_is_kept_whole() {
        match translate(CrosstermEvent::Paste("UC123".into())) {
            Some(AppEvent::Paste(text)) => assert_eq!(text, "UC123"),
            _ => panic!("expected paste"),
        }
    }
}
