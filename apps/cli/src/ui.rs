use hypr_config_sync::{InputKind, Panel};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, StatusKind};

pub fn draw(frame: &mut Frame, app: &App) {
    let [header_area, body_area, status_area, help_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(8),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [panels_area, form_area, streams_area] = Layout::horizontal([
        Constraint::Length(28),
        Constraint::Min(30),
        Constraint::Length(30),
    ])
    .areas(body_area);

    draw_header(frame, app, header_area);
    draw_panels(frame, app, panels_area);
    draw_form(frame, app, form_area);
    draw_streams(frame, app, streams_area);
    draw_status(frame, app, status_area);
    draw_help(frame, help_area);
}

fn dim() -> Style {
    Style::new().fg(Color::DarkGray)
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let (bot_label, bot_style) = match app.bot_online {
        Some(true) => ("online", Style::new().fg(Color::Green)),
        Some(false) => ("offline", Style::new().fg(Color::Red)),
        None => ("unknown", dim()),
    };

    let personality = match app.personality.text() {
        "" => "-",
        text => text,
    };

    let title = Line::from(vec![
        Span::styled(" CatTrix ", Style::new().add_modifier(Modifier::BOLD)),
        Span::raw(" bot "),
        Span::styled(bot_label, bot_style),
        Span::raw("  personality "),
        Span::styled(personality, Style::new().fg(Color::Cyan)),
    ]);

    let sync = if app.is_refreshing() {
        Span::styled("refreshing... ", Style::new().fg(Color::Yellow))
    } else if let Some(at) = app.last_refresh {
        Span::styled(format!("synced {}s ago ", at.elapsed().as_secs()), dim())
    } else {
        Span::styled("not synced ", dim())
    };

    let block = Block::new()
        .borders(Borders::ALL)
        .border_style(dim())
        .title(title)
        .title(Line::from(sync).alignment(Alignment::Right));

    frame.render_widget(block, area);
}

fn draw_panels(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = Panel::all()
        .iter()
        .enumerate()
        .map(|(idx, panel)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", idx + 1), dim()),
                Span::raw(panel.title()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::new()
                .borders(Borders::ALL)
                .border_style(dim())
                .title(" Panels "),
        )
        .highlight_style(
            Style::new()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default().with_selected(Some(app.panel.index()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_form(frame: &mut Frame, app: &App, area: Rect) {
    let focused = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = Vec::new();

    for (idx, spec) in app.panel.inputs().iter().enumerate() {
        let has_focus = app.focus == idx;
        let label_style = if has_focus { focused } else { Style::new() };

        let field = match spec.kind {
            InputKind::Checkbox => {
                let mark = if app.input_checked(spec) { "[x]" } else { "[ ]" };
                Span::raw(mark)
            }
            InputKind::Text | InputKind::Number => {
                let mut text = app.input_text(spec).to_string();
                if has_focus {
                    text.push('▏');
                }
                Span::styled(text, Style::new().fg(Color::White).bg(Color::DarkGray))
            }
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{:<22}", spec.label), label_style),
            field,
        ]));
        lines.push(Line::default());
    }

    let submit_focused = app.focused_input().is_none();
    let busy = app.is_busy(app.panel.section());
    let submit_label = if busy {
        format!(" {}... ", app.panel.submit_label())
    } else {
        format!(" {} ", app.panel.submit_label())
    };
    let submit_style = if submit_focused {
        Style::new().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::new().fg(Color::Black).bg(Color::Gray)
    };
    lines.push(Line::from(Span::styled(submit_label, submit_style)));

    let block = Block::new()
        .borders(Borders::ALL)
        .border_style(dim())
        .title(format!(" {} ", app.panel.title()))
        .padding(Padding::new(2, 2, 1, 0));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_streams(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = if app.streams.is_empty() {
        vec![ListItem::new(Span::styled(
            "No live chats",
            dim().add_modifier(Modifier::ITALIC),
        ))]
    } else {
        app.streams
            .items()
            .iter()
            .map(|id| ListItem::new(id.as_str()))
            .collect()
    };

    let list = List::new(items).block(
        Block::new()
            .borders(Borders::ALL)
            .border_style(dim())
            .title(" Live chats "),
    );

    frame.render_widget(list, area);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let line = match &app.status {
        Some(status) => {
            let style = match status.kind {
                StatusKind::Info => Style::new().fg(Color::Yellow),
                StatusKind::Success => Style::new().fg(Color::Green),
                StatusKind::Error => Style::new().fg(Color::Red),
            };
            Line::from(Span::styled(format!(" {}", status.text), style))
        }
        None => Line::default(),
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let keys = [
        ("[tab]", " focus  "),
        ("[←/→ 1-6]", " panel  "),
        ("[space]", " toggle  "),
        ("[enter]", " submit  "),
        ("[^r]", " refresh  "),
        ("[esc]", " quit"),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (key, action) in keys {
        spans.push(Span::styled(key, dim()));
        spans.push(Span::raw(action));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use hypr_config_sync::{ListView, StateView};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 24)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn renders_panels_and_streams() {
        let mut app = App::new();
        let list = app.stream_list();
        list.clear();
        list.push_item("abc123");

        let screen = render(&app);
        assert!(screen.contains("Level System"));
        assert!(screen.contains("abc123"));
        assert!(screen.contains("Save"));
    }

    #[test]
    fn renders_status() {
        let mut app = App::new();
        app.set_status(StatusKind::Success, "Level updated");
        assert!(render(&app).contains("Level updated"));
    }
}
