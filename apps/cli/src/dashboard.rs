use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use hypr_config_sync::{ConfigSyncClient, Panel, RetryConfig, SubmitRoute, SyncController};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use crate::app::{Action, App};
use crate::event::{AppEvent, EventHandler};
use crate::runtime::{ChannelNotifier, SyncEvent};
use crate::ui;

const TICK_RATE: Duration = Duration::from_millis(250);

pub async fn run(client: ConfigSyncClient, retry: RetryConfig) -> anyhow::Result<ExitCode> {
    let (sync_tx, sync_rx) = mpsc::unbounded_channel();
    let controller = SyncController::new(client, Arc::new(ChannelNotifier::new(sync_tx.clone())))
        .with_retry_config(retry);

    let mut terminal = ratatui::init();
    crossterm::execute!(std::io::stdout(), EnableBracketedPaste)?;

    let result = event_loop(&mut terminal, &controller, sync_tx, sync_rx).await;

    controller.cancel_all();
    let _ = crossterm::execute!(std::io::stdout(), DisableBracketedPaste);
    ratatui::restore();

    result.map(|()| ExitCode::SUCCESS)
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    controller: &SyncController,
    sync_tx: mpsc::UnboundedSender<SyncEvent>,
    sync_rx: mpsc::UnboundedReceiver<SyncEvent>,
) -> anyhow::Result<()> {
    let mut app = App::new();
    let mut events = EventHandler::new(sync_rx, TICK_RATE);

    spawn_refresh(&mut app, controller, &sync_tx);

    while !app.should_quit {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        let Some(event) = events.next().await else {
            break;
        };

        match event {
            AppEvent::Key(key) => match app.handle_key(key) {
                Some(Action::Quit) => app.should_quit = true,
                Some(Action::Refresh) => spawn_refresh(&mut app, controller, &sync_tx),
                Some(Action::Submit(panel)) => spawn_submit(&mut app, panel, controller, &sync_tx),
                None => {}
            },
            AppEvent::Paste(text) => app.handle_paste(&text),
            AppEvent::Sync(SyncEvent::Notice(notice)) => app.handle_notice(notice),
            AppEvent::Sync(SyncEvent::Refreshed(outcome)) => {
                app.finish_refresh(outcome, |ticket, state, app| {
                    controller.apply_refresh(ticket, state, app)
                });
            }
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
        }
    }

    Ok(())
}

fn spawn_refresh(app: &mut App, controller: &SyncController, tx: &mpsc::UnboundedSender<SyncEvent>) {
    app.begin_refresh();

    let controller = controller.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let _ = tx.send(SyncEvent::Refreshed(controller.refresh().await));
    });
}

/// Submits the panel's current form on its own task; a successful submit is
/// followed by a refresh so the stream list reflects the server.
fn spawn_submit(
    app: &mut App,
    panel: Panel,
    controller: &SyncController,
    tx: &mpsc::UnboundedSender<SyncEvent>,
) {
    let section = panel.section();
    app.mark_submitting(section);
    tracing::debug!(%panel, %section, "panel_submit");

    let form = app.form(panel).clone();
    let controller = controller.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = controller
            .submit_form(section, &form, SubmitRoute::Update)
            .await;
        if outcome.is_submitted() {
            let _ = tx.send(SyncEvent::Refreshed(controller.refresh().await));
        }
    });
}
