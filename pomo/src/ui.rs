use crate::app::{App, AppMode};
use crate::config::Theme;
use crate::session::CYCLE_LENGTH;
use pomo_ipc::{Phase, SessionKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(area);

    draw_header(f, chunks[0], app);
    draw_timer(f, chunks[1], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(34), Constraint::Percentage(66)])
        .split(chunks[2]);
    draw_stats(f, middle[0], app);
    draw_goals(f, middle[1], app);

    draw_status_bar(f, chunks[3], app);

    match app.mode {
        AppMode::AddingGoal => draw_input_overlay(f, "New Goal", &app.input_buffer, app),
        AppMode::ShowHelp => draw_help_overlay(f, app),
        AppMode::Normal => {}
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let text = Line::from(vec![
        Span::raw(icons.header_left.clone()),
        Span::styled(
            "POMO",
            Style::default().fg(theme.cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(icons.header_right.clone()),
    ]);
    f.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.black)),
        ),
        area,
    );
}

fn draw_timer(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let snapshot = &app.snapshot;
    let accent = if app.flash_active() {
        theme.yellow
    } else {
        kind_color(theme, snapshot.kind)
    };

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", kind_title(snapshot.kind)),
            Style::default().fg(theme.gray),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent));
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner_area);

    let (badge_icon, badge_text, badge_color) = match snapshot.phase {
        Phase::Running => (&icons.play, "RUNNING", accent),
        Phase::Paused => (&icons.pause, "PAUSED", theme.yellow),
        Phase::Idle => (&icons.stop, "READY", theme.gray),
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{} ", badge_icon), Style::default().fg(badge_color)),
            Span::styled(
                badge_text,
                Style::default().fg(badge_color).add_modifier(Modifier::BOLD),
            ),
        ]))
        .alignment(Alignment::Center),
        rows[0],
    );
    f.render_widget(
        Paragraph::new(format_clock(snapshot.remaining_secs))
            .style(
                Style::default()
                    .fg(theme.foreground)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center),
        rows[1],
    );
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(accent).bg(theme.black))
            .percent((snapshot.progress * 100.0) as u16),
        rows[2],
    );
}

fn draw_stats(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let snapshot = &app.snapshot;
    let block = Block::default()
        .title(Span::styled(" Stats ", Style::default().fg(theme.gray)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.green));
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let filled = cycle_slot(snapshot.session_count);
    let dots = format!(
        "{}{}",
        icons.cycle_filled.repeat(filled),
        icons.cycle_empty.repeat(CYCLE_LENGTH as usize - filled)
    );
    let lines = vec![
        Line::from(vec![
            Span::styled(" Cycle     ", Style::default().fg(theme.gray)),
            Span::styled(dots, Style::default().fg(theme.blue)),
        ]),
        Line::from(vec![
            Span::styled(" Completed ", Style::default().fg(theme.gray)),
            Span::styled(
                snapshot.completed_sessions.to_string(),
                Style::default().fg(theme.blue),
            ),
        ]),
        Line::from(vec![
            Span::styled(" Focused   ", Style::default().fg(theme.gray)),
            Span::styled(
                format_focus(snapshot.total_time_spent_secs),
                Style::default().fg(theme.blue),
            ),
        ]),
    ];
    f.render_widget(Paragraph::new(lines), inner_area);
}

fn draw_goals(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let block = Block::default()
        .title(Span::styled(" Goals ", Style::default().fg(theme.gray)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.green));
    let inner_area = block.inner(area);
    f.render_widget(block, area);
    if app.goals.is_empty() {
        f.render_widget(
            Paragraph::new("No goals. Press 'a' to add one.")
                .style(Style::default().fg(theme.gray))
                .alignment(Alignment::Center),
            inner_area,
        );
        return;
    }
    let constraints: Vec<Constraint> = app.goals.iter().map(|_| Constraint::Length(1)).collect();
    let goal_chunks = Layout::default().constraints(constraints).split(inner_area);
    for (i, goal) in app.goals.iter().enumerate() {
        if let Some(item_area) = goal_chunks.get(i) {
            let mut left = vec![if i == app.selected_goal {
                Span::styled(icons.select.clone(), Style::default().fg(theme.selection))
            } else {
                Span::raw(" ")
            }];
            left.push(Span::raw(format!(
                " {} ",
                if goal.done { &icons.done } else { &icons.pending }
            )));
            left.push(Span::styled(
                goal.text.clone(),
                if goal.done {
                    Style::default()
                        .fg(theme.gray)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(theme.foreground)
                },
            ));
            let right = Span::styled(
                format!(" {} ", goal.created_at.format("%H:%M")),
                Style::default().fg(theme.gray),
            );
            if i == app.selected_goal {
                f.render_widget(
                    Block::default().style(Style::default().bg(theme.black)),
                    *item_area,
                );
            }
            f.render_widget(Paragraph::new(Line::from(left)), *item_area);
            f.render_widget(
                Paragraph::new(Line::from(right)).alignment(Alignment::Right),
                *item_area,
            );
        }
    }
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.config.theme;
    let icons = &app.config.icons;
    let (mode_text, mode_color) = match app.mode {
        AppMode::Normal => ("NORMAL", theme.green),
        AppMode::AddingGoal => ("INSERT", theme.yellow),
        AppMode::ShowHelp => ("HELP", theme.magenta),
    };
    let segments: &[&str] = if app.mode == AppMode::Normal {
        &[
            "space:start/pause",
            "s:skip",
            "r:reset",
            "R:new cycle",
            "a:goal",
            "x:done",
            "d:del",
            "?:help",
            "q:quit",
        ]
    } else {
        &["enter:confirm", "esc:cancel"]
    };
    let separator = format!(" {} ", icons.separator);
    let help = segments.join(separator.as_str());
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" {} ", mode_text),
                Style::default()
                    .bg(mode_color)
                    .fg(theme.background)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::raw(help),
        ]))
        .block(Block::default().style(Style::default().bg(theme.black).fg(theme.gray))),
        area,
    );
}

fn draw_input_overlay(f: &mut Frame, title: &str, input: &str, app: &App) {
    let area = centered_rect(60, 20, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.config.theme.yellow))
        .border_type(BorderType::Double)
        .style(Style::default().bg(app.config.theme.background));
    let inner_area = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{} ", app.config.icons.select),
                Style::default().fg(app.config.theme.foreground),
            ),
            Span::styled(input, Style::default().fg(app.config.theme.foreground)),
            Span::styled(
                &app.config.icons.input_cursor,
                Style::default()
                    .fg(app.config.theme.foreground)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
        ])),
        inner_area,
    );
}

fn draw_help_overlay(f: &mut Frame, app: &App) {
    let theme = &app.config.theme;
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);
    let shortcuts = [
        ("space", "Start or pause the timer"),
        ("s", "Skip to the next session"),
        ("r", "Reset the current session"),
        ("R", "Start a fresh cycle"),
        ("c", "Clear all statistics"),
        ("a", "Add a goal"),
        ("x", "Toggle the selected goal"),
        ("d", "Delete the selected goal"),
        ("j/k", "Move the goal selection"),
        ("?", "Toggle this help"),
        ("q", "Quit"),
    ];
    let items: Vec<ListItem> = shortcuts
        .iter()
        .map(|(key, action)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:<6}", key), Style::default().fg(theme.blue)),
                Span::raw(*action),
            ]))
        })
        .collect();
    f.render_widget(
        List::new(items).block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(theme.magenta))
                .style(Style::default().bg(theme.background)),
        ),
        area,
    );
}

fn kind_color(theme: &Theme, kind: SessionKind) -> Color {
    match kind {
        SessionKind::Work => theme.red,
        SessionKind::ShortBreak => theme.green,
        SessionKind::LongBreak => theme.magenta,
    }
}

fn kind_title(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::Work => "Work",
        SessionKind::ShortBreak => "Short Break",
        SessionKind::LongBreak => "Long Break",
    }
}

fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn format_focus(secs: u64) -> String {
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    if hours > 0 {
        format!("{}h {:02}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Work sessions already banked in the current cycle, 0..=CYCLE_LENGTH.
/// The fourth stays lit through the long break instead of wrapping to zero.
fn cycle_slot(session_count: u32) -> usize {
    if session_count == 0 {
        0
    } else {
        (((session_count - 1) % CYCLE_LENGTH) + 1) as usize
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
