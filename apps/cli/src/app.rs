use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use hypr_config_sync::{
    FormInputs, FormValues, InputKind, InputSpec, ListBuffer, ListView, Notice, Panel,
    RefreshOutcome, RefreshTicket, RemoteState, SectionName, StateView, TextBuffer, TextView,
};

const STATUS_TTL: Duration = Duration::from_secs(6);

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Submit(Panel),
    Refresh,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
    pub at: Instant,
}

pub struct App {
    pub should_quit: bool,
    pub panel: Panel,
    /// Index into the active panel's inputs; one past the end is the submit button.
    pub focus: usize,
    forms: HashMap<Panel, FormValues>,
    submitting: HashSet<SectionName>,
    pub streams: ListBuffer,
    pub personality: TextBuffer,
    pub bot_online: Option<bool>,
    refreshes_pending: usize,
    pub last_refresh: Option<Instant>,
    pub status: Option<Status>,
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            panel: Panel::Personality,
            focus: 0,
            forms: Panel::all()
                .iter()
                .map(|panel| (*panel, panel.blank_form()))
                .collect(),
            submitting: HashSet::new(),
            streams: ListBuffer::default(),
            personality: TextBuffer::default(),
            bot_online: None,
            refreshes_pending: 0,
            last_refresh: None,
            status: None,
        }
    }

    pub fn form(&self, panel: Panel) -> &FormValues {
        &self.forms[&panel]
    }

    fn form_mut(&mut self) -> &mut FormValues {
        let panel = self.panel;
        self.forms.entry(panel).or_insert_with(|| panel.blank_form())
    }

    pub fn focused_input(&self) -> Option<&'static InputSpec> {
        self.panel.inputs().get(self.focus)
    }

    fn text_focused(&self) -> bool {
        self.focused_input()
            .is_some_and(|spec| spec.kind != InputKind::Checkbox)
    }

    fn focus_slots(&self) -> usize {
        self.panel.inputs().len() + 1
    }

    fn select_panel(&mut self, panel: Panel) {
        if self.panel != panel {
            self.panel = panel;
            self.focus = 0;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return Some(Action::Quit),
            KeyCode::Char('c') if ctrl => return Some(Action::Quit),
            KeyCode::Char('r') if ctrl => return Some(Action::Refresh),
            KeyCode::Tab => self.focus = (self.focus + 1) % self.focus_slots(),
            KeyCode::BackTab => {
                self.focus = (self.focus + self.focus_slots() - 1) % self.focus_slots()
            }
            KeyCode::Down => self.focus = (self.focus + 1).min(self.focus_slots() - 1),
            KeyCode::Up => self.focus = self.focus.saturating_sub(1),
            KeyCode::Left => self.select_panel(self.panel.prev()),
            KeyCode::Right => self.select_panel(self.panel.next()),
            KeyCode::Enter => return Some(Action::Submit(self.panel)),
            KeyCode::Backspace if self.text_focused() => {
                if let Some(spec) = self.focused_input() {
                    if let Some(value) = self.form_mut().value_mut(spec.id) {
                        value.pop();
                    }
                }
            }
            KeyCode::Char(' ') if !self.text_focused() => match self.focused_input() {
                Some(spec) => self.form_mut().toggle(spec.id),
                None => return Some(Action::Submit(self.panel)),
            },
            KeyCode::Char(c) if self.text_focused() && !ctrl => self.insert_text(&c.to_string()),
            KeyCode::Char('r') => return Some(Action::Refresh),
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                if let Some(panel) = Panel::all().get(idx) {
                    self.select_panel(*panel);
                }
            }
            _ => {}
        }
        None
    }

    pub fn handle_paste(&mut self, text: &str) {
        if self.text_focused() {
            self.insert_text(text.trim_end_matches(['\r', '\n']));
        }
    }

    fn insert_text(&mut self, text: &str) {
        let Some(spec) = self.focused_input() else {
            return;
        };
        let form = self.form_mut();
        match form.value_mut(spec.id) {
            Some(value) => value.push_str(text),
            None => form.set_value(spec.id, text),
        }
    }

    pub fn input_text(&self, spec: &InputSpec) -> &str {
        self.form(self.panel).value(spec.id).unwrap_or_default()
    }

    pub fn input_checked(&self, spec: &InputSpec) -> bool {
        self.form(self.panel).checked(spec.id).unwrap_or(false)
    }

    pub fn mark_submitting(&mut self, section: SectionName) {
        self.submitting.insert(section);
    }

    pub fn is_busy(&self, section: SectionName) -> bool {
        self.submitting.contains(&section)
    }

    pub fn handle_notice(&mut self, notice: Notice) {
        match &notice {
            Notice::Acknowledged { section, .. }
            | Notice::Failed {
                section: Some(section),
                ..
            } => {
                self.submitting.remove(section);
            }
            Notice::Busy { .. } | Notice::Failed { section: None, .. } => {}
        }

        let (kind, text) = match notice {
            Notice::Acknowledged { message, .. } => (StatusKind::Success, message.to_string()),
            Notice::Busy { section } => (
                StatusKind::Info,
                format!("{section} is still being saved"),
            ),
            Notice::Failed {
                message,
                recoverable,
                ..
            } => {
                let text = if recoverable {
                    format!("{message} (press Enter to retry)")
                } else {
                    message
                };
                (StatusKind::Error, text)
            }
        };
        self.set_status(kind, text);
    }

    pub fn begin_refresh(&mut self) {
        self.refreshes_pending += 1;
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshes_pending > 0
    }

    /// Settles one refresh. A fetched state goes through `apply`, which decides
    /// whether it is still the latest; the header is only updated when it is.
    pub fn finish_refresh<F>(&mut self, outcome: RefreshOutcome, apply: F) -> bool
    where
        F: FnOnce(RefreshTicket, &RemoteState, &mut Self) -> bool,
    {
        self.refreshes_pending = self.refreshes_pending.saturating_sub(1);

        let RefreshOutcome::Fetched(ticket, state) = outcome else {
            return false;
        };
        if !apply(ticket, &state, self) {
            return false;
        }

        self.bot_online = state.bot.map(|bot| bot.online);
        self.last_refresh = Some(Instant::now());
        true
    }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(Status {
            kind,
            text: text.into(),
            at: Instant::now(),
        });
    }

    pub fn on_tick(&mut self) {
        let expired = self.status.as_ref().is_some_and(|status| {
            status.kind != StatusKind::Error && status.at.elapsed() > STATUS_TTL
        });
        if expired {
            self.status = None;
        }
    }
}

impl StateView for App {
    fn stream_list(&mut self) -> &mut dyn ListView {
        &mut self.streams
    }

    fn personality_text(&mut self) -> Option<&mut dyn TextView> {
        Some(&mut self.personality)
    }
}

#[cfg(test)]
mod tests {
    use hypr_config_sync::form::inputs;
    use hypr_config_sync::{ConfigSection, RefreshSequencer, SectionName, build_section};

    use super::*;

    fn press(app: &mut App, code: KeyCode) -> Option<Action> {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_fills_the_focused_input() {
        let mut app = App::new();
        type_text(&mut app, "Friendly");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('y'));

        assert_eq!(
            app.form(Panel::Personality).value(inputs::PERSONALITY),
            Some("Friendly")
        );
        assert_eq!(
            press(&mut app, KeyCode::Enter),
            Some(Action::Submit(Panel::Personality))
        );
    }

    #[test]
    fn digits_and_r_are_text_inside_inputs() {
        let mut app = App::new();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.panel, Panel::Personality);

        type_text(&mut app, "r2");
        assert_eq!(app.form(Panel::Personality).value(inputs::PERSONALITY), Some("3r2"));
    }

    #[test]
    fn digits_switch_panels_from_the_submit_button() {
        let mut app = App::new();
        press(&mut app, KeyCode::Tab);
        assert!(app.focused_input().is_none());

        press(&mut app, KeyCode::Char('5'));
        assert_eq!(app.panel, Panel::YouTube);
        assert_eq!(app.focus, 0);
    }

    #[test]
    fn refresh_keys() {
        let mut app = App::new();
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(Action::Refresh)
        );

        press(&mut app, KeyCode::BackTab);
        assert!(app.focused_input().is_none());
        assert_eq!(press(&mut app, KeyCode::Char('r')), Some(Action::Refresh));
    }

    #[test]
    fn space_toggles_checkboxes() {
        let mut app = App::new();
        press(&mut app, KeyCode::Right);
        assert_eq!(app.panel, Panel::Welcome);

        assert_eq!(app.focused_input().map(|s| s.id), Some(inputs::WELCOME_ENABLED));
        assert_eq!(app.form(Panel::Welcome).checked(inputs::WELCOME_ENABLED), Some(true));
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.form(Panel::Welcome).checked(inputs::WELCOME_ENABLED), Some(false));
    }

    #[test]
    fn panels_keep_their_own_forms() {
        let mut app = App::new();
        app.select_panel(Panel::Live);
        type_text(&mut app, "abc123");
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Right);

        let section = build_section(SectionName::Streams, app.form(Panel::Live)).unwrap();
        assert_eq!(section, ConfigSection::stream_join("abc123"));
    }

    #[test]
    fn paste_drops_trailing_newline() {
        let mut app = App::new();
        app.select_panel(Panel::YouTube);
        app.handle_paste("UC123\n");
        assert_eq!(app.form(Panel::YouTube).value(inputs::YT_ID), Some("UC123"));
    }

    #[test]
    fn failures_stay_until_replaced() {
        let mut app = App::new();
        app.handle_notice(Notice::Failed {
            section: None,
            message: "Could not reach the bot server. Try again.".into(),
            recoverable: true,
        });
        let status = app.status.clone().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.ends_with("(press Enter to retry)"));

        app.on_tick();
        assert!(app.status.is_some());

        app.mark_submitting(SectionName::Level);
        assert!(app.is_busy(SectionName::Level));
        app.handle_notice(Notice::Acknowledged {
            section: SectionName::Level,
            message: "Level updated",
        });
        assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Success));
        assert!(!app.is_busy(SectionName::Level));
    }

    fn fetched(ticket: RefreshTicket, state: serde_json::Value) -> RefreshOutcome {
        RefreshOutcome::Fetched(ticket, serde_json::from_value(state).unwrap())
    }

    #[test]
    fn out_of_order_refresh_keeps_newer_header() {
        let mut app = App::new();
        let sequencer = RefreshSequencer::default();

        app.begin_refresh();
        let older = sequencer.issue();
        app.begin_refresh();
        let newer = sequencer.issue();

        let newer_state = serde_json::json!({
            "streams": { "new": {} },
            "bot": { "online": true }
        });
        assert!(app.finish_refresh(fetched(newer, newer_state), |ticket, state, app| {
            sequencer.apply(ticket, state, app)
        }));
        assert!(app.is_refreshing());

        let older_state = serde_json::json!({
            "streams": { "old": {} },
            "bot": { "online": false }
        });
        assert!(!app.finish_refresh(fetched(older, older_state), |ticket, state, app| {
            sequencer.apply(ticket, state, app)
        }));

        assert_eq!(app.bot_online, Some(true));
        assert_eq!(app.streams.items(), ["new"]);
        assert!(!app.is_refreshing());
    }

    #[test]
    fn overlapping_refreshes_stay_pending_until_the_last() {
        let mut app = App::new();
        app.begin_refresh();
        app.begin_refresh();

        assert!(!app.finish_refresh(RefreshOutcome::Cancelled, |_, _, _| true));
        assert!(app.is_refreshing());
        assert!(!app.finish_refresh(RefreshOutcome::Cancelled, |_, _, _| true));
        assert!(!app.is_refreshing());

        // A refresh started by a submit was never counted.
        assert!(!app.finish_refresh(RefreshOutcome::Cancelled, |_, _, _| true));
        assert!(!app.is_refreshing());
    }
}
