use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Clear, Gauge, Paragraph, Tabs, Widget, Wrap},
};

use super::app::{Notice, NoticeKind, Tab};
use super::forms::{AuthMode, LoginField, LoginForm, MeasurementField, MeasurementForm, TrainingField, TrainingForm};
use crate::stats::DashboardSummary;

const ACCENT: Color = Color::LightMagenta;

fn field_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn field_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let cursor = if focused { "▏" } else { "" };
    Line::from(vec![
        Span::styled(format!("{:<12}", label), Style::default().fg(Color::Gray)),
        Span::styled(format!("{}{}", value, cursor), field_style(focused)),
    ])
}

/// Render the sign-in / sign-up form
pub fn render_login(area: Rect, buf: &mut Buffer, form: &LoginForm) {
    let title = match form.mode {
        AuthMode::SignIn => " 💎 StrongFlow · Sign in ",
        AuthMode::SignUp => " 💎 StrongFlow · Create account ",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(ACCENT));

    let inner = block.inner(area);
    block.render(area, buf);

    let submit = match form.mode {
        AuthMode::SignIn => "[Enter] Sign in",
        AuthMode::SignUp => "[Enter] Create account",
    };
    let switch = match form.mode {
        AuthMode::SignIn => "[Ctrl+T] New here? Sign up",
        AuthMode::SignUp => "[Ctrl+T] Have an account? Sign in",
    };

    let lines = vec![
        Line::from(""),
        field_line("Email", form.email.display(), form.focus == LoginField::Email),
        Line::from(""),
        field_line("Password", form.password.display(), form.focus == LoginField::Password),
        Line::from(""),
        Line::from(Span::styled(submit, Style::default().fg(Color::Green))),
        Line::from(Span::styled(switch, Style::default().fg(Color::DarkGray))),
        Line::from(Span::styled("[Esc] Quit", Style::default().fg(Color::DarkGray))),
    ];

    Paragraph::new(lines).render(inner, buf);
}

/// Render the navigation bar
pub fn render_tabs(area: Rect, buf: &mut Buffer, active: Tab) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(idx, tab)| Line::from(format!("{} {}", idx + 1, tab.title())))
        .collect();

    Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" 💎 StrongFlow ")
                .border_style(Style::default().fg(Color::Gray)),
        )
        .select(active.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .render(area, buf);
}

fn stat_card(area: Rect, buf: &mut Buffer, title: &str, value: String, caption: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    block.render(area, buf);

    let lines = vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(caption.to_string(), Style::default().fg(ACCENT))),
    ];

    Paragraph::new(lines).render(inner, buf);
}

/// Render the dashboard: greeting, three statistics and the load trend
pub fn render_dashboard(area: Rect, buf: &mut Buffer, summary: &DashboardSummary) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(6), Constraint::Min(6)])
        .split(area);

    let greeting = Paragraph::new(vec![Line::from(vec![
        Span::styled(
            format!("Hi, {}! ✨ ", summary.display_name),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Your only competition is who you were yesterday",
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ),
    ])])
    .block(Block::default().borders(Borders::ALL));
    greeting.render(rows[0], buf);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(rows[1]);

    render_weight_card(cards[0], buf, summary);
    stat_card(
        cards[1],
        buf,
        "Last squat",
        format!("{} kg", summary.last_squat),
        "🦄 Top effort",
    );
    stat_card(
        cards[2],
        buf,
        "Glutes",
        format!("{} cm", summary.last_glutes),
        "🍑 Progress",
    );

    render_load_chart(rows[2], buf, summary);
}

fn render_weight_card(area: Rect, buf: &mut Buffer, summary: &DashboardSummary) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Current weight ")
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    block.render(area, buf);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    Paragraph::new(Span::styled(
        format!("{} kg", summary.current_weight),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ))
    .render(parts[0], buf);

    Gauge::default()
        .gauge_style(Style::default().fg(ACCENT).bg(Color::DarkGray))
        .ratio((summary.progress_percent / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.1}%", summary.progress_percent))
        .render(parts[1], buf);

    Paragraph::new(Span::styled(
        format!("Target: {} kg", summary.target_weight),
        Style::default().fg(ACCENT),
    ))
    .render(parts[2], buf);
}

/// Render the weight trend of the latest logs as bars
pub fn render_load_chart(area: Rect, buf: &mut Buffer, summary: &DashboardSummary) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" 📈 Load history ")
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    block.render(area, buf);

    if summary.chart.is_empty() {
        Paragraph::new("No training logged yet... let's go! 🔥")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .render(inner, buf);
        return;
    }

    let data: Vec<(&str, u64)> = summary
        .chart
        .iter()
        .map(|point| (point.label, point.weight.max(0.0).round() as u64))
        .collect();

    BarChart::default()
        .data(data.as_slice())
        .bar_width(5)
        .bar_gap(1)
        .bar_style(Style::default().fg(ACCENT))
        .value_style(Style::default().fg(Color::Black).bg(ACCENT))
        .render(inner, buf);
}

/// Render the training entry form
pub fn render_training_form(area: Rect, buf: &mut Buffer, form: &TrainingForm) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" 🏋 New session ")
        .border_style(Style::default().fg(ACCENT));

    let inner = block.inner(area);
    block.render(area, buf);

    let exercise_focused = form.focus == TrainingField::Exercise;
    let exercise = if exercise_focused {
        format!("◀ {} ▶", form.exercise)
    } else {
        form.exercise.to_string()
    };

    let lines = vec![
        Line::from(""),
        field_line("Exercise", exercise, exercise_focused),
        field_line("Weight (kg)", form.weight.display(), form.focus == TrainingField::Weight),
        field_line("Reps", form.reps.display(), form.focus == TrainingField::Reps),
        Line::from(""),
        Line::from(Span::styled("[Enter] Save training", Style::default().fg(Color::Green))),
        Line::from(Span::styled(
            "[↑/↓] Field  [←/→] Exercise  [Esc] Back",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    Paragraph::new(lines).render(inner, buf);
}

/// Render the measurement entry form
pub fn render_measurement_form(area: Rect, buf: &mut Buffer, form: &MeasurementForm) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" 📏 Track curves ")
        .border_style(Style::default().fg(ACCENT));

    let inner = block.inner(area);
    block.render(area, buf);

    let lines = vec![
        Line::from(""),
        field_line("Glutes (cm)", form.glutes.display(), form.focus == MeasurementField::Glutes),
        field_line("Thigh (cm)", form.thigh.display(), form.focus == MeasurementField::Thigh),
        Line::from(""),
        Line::from(Span::styled("[Enter] Record progress", Style::default().fg(Color::Green))),
        Line::from(Span::styled(
            "[↑/↓] Field  [Esc] Back",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    Paragraph::new(lines).render(inner, buf);
}

/// Render the nutrition placeholder
pub fn render_nutrition(area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" 🍎 Nutrition ")
        .border_style(Style::default().fg(Color::Gray));

    Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Nutrition Pro",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from("Module in development. Stay hydrated! 💧"),
    ])
    .alignment(Alignment::Center)
    .block(block)
    .render(area, buf);
}

fn notice_style(kind: NoticeKind) -> Style {
    match kind {
        NoticeKind::Info => Style::default().fg(Color::Cyan),
        NoticeKind::Success => Style::default().fg(Color::Green),
        NoticeKind::Error => Style::default().fg(Color::Red),
    }
}

/// Render a blocking alert in the middle of `area`
pub fn render_alert(area: Rect, buf: &mut Buffer, notice: &Notice) {
    Clear.render(area, buf);

    let title = match notice.kind {
        NoticeKind::Error => " ⚠ Error ",
        NoticeKind::Success => " ✓ Done ",
        NoticeKind::Info => " ℹ Notice ",
    };

    Paragraph::new(vec![
        Line::from(Span::styled(notice.message.clone(), notice_style(notice.kind))),
        Line::from(""),
        Line::from(Span::styled("[Enter] OK", Style::default().fg(Color::DarkGray))),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(notice_style(notice.kind))
            .style(Style::default().bg(Color::Black)),
    )
    .render(area, buf);
}

/// Render help overlay
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    Clear.render(area, buf);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" ❓ Help ")
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(area);
    block.render(area, buf);

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Navigation:", Style::default().fg(Color::Cyan))),
        Line::from("  Tab / Shift+Tab - Next / previous view"),
        Line::from("  1-4 / ←/→       - Jump to view from home"),
        Line::from("  Esc             - Back to home from a form"),
        Line::from(""),
        Line::from(Span::styled("Forms:", Style::default().fg(Color::Cyan))),
        Line::from("  ↑/↓             - Move between fields"),
        Line::from("  ←/→             - Change exercise"),
        Line::from("  Enter           - Save"),
        Line::from(""),
        Line::from(Span::styled("Other:", Style::default().fg(Color::Cyan))),
        Line::from("  r               - Refresh data"),
        Line::from("  o               - Sign out"),
        Line::from("  ?               - Toggle this help"),
        Line::from("  q               - Quit"),
    ];

    Paragraph::new(help_text).render(inner, buf);
}

/// Render status bar at bottom
pub fn render_status_bar(area: Rect, buf: &mut Buffer, email: Option<&str>, notice: Option<&Notice>) {
    let mut spans = Vec::new();

    if let Some(email) = email {
        spans.push(Span::styled(
            format!(" 👤 {} ", email),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        ));
    }

    match notice {
        Some(notice) if !notice.blocking => {
            spans.push(Span::styled(
                format!(" {} ", notice.message),
                notice_style(notice.kind).bg(Color::DarkGray),
            ));
        }
        _ => {}
    }

    spans.push(Span::styled(
        " Press ? for help ",
        Style::default().fg(Color::Gray).bg(Color::DarkGray),
    ));

    Paragraph::new(Line::from(spans)).render(area, buf);
}
