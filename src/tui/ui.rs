use super::app::TuiApp;
use super::state::FocusTarget;
use crate::picker::StatusKind;
use fluent::fluent_args;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wall-clock format for the selected range line
const RANGE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Main rendering function
pub fn render(app: &TuiApp, f: &mut Frame) {
    let size = f.area();

    // Regions are rebuilt on every frame
    *app.state.click_regions.borrow_mut() = Default::default();

    // Main layout: content area + hint bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Picker panel
            Constraint::Length(1), // Hint bar
        ])
        .split(size);

    render_panel(app, f, main_chunks[0]);
    render_hint_bar(app, f, main_chunks[1]);

    // The open list is drawn last so it overlays the controls below it
    if let Some(open) = app.state.open_control() {
        render_listbox(app, f, open, size);
    }
}

/// Render the full-screen picker panel
fn render_panel(app: &TuiApp, f: &mut Frame, area: Rect) {
    let t = |key: &str| app.state.t(key);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", t("app-title")))
        .title_style(Style::default().add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Intro
            Constraint::Length(1), // Type label
            Constraint::Length(3), // Type trigger
            Constraint::Length(1), // Format label
            Constraint::Length(3), // Format trigger
            Constraint::Length(1), // Format help
            Constraint::Length(1), // Period label
            Constraint::Length(3), // Period trigger
            Constraint::Length(1), // Period help
            Constraint::Length(1), // Selected range
            Constraint::Length(1), // Spacer
            Constraint::Length(3), // Action button
            Constraint::Length(1), // Status (live line)
            Constraint::Length(1), // Tips
            Constraint::Min(0),
        ])
        .split(inner);

    let intro = Paragraph::new(t("app-intro"))
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true });
    f.render_widget(intro, chunks[0]);

    render_field(app, f, FocusTarget::DocumentType, chunks[1], chunks[2]);
    render_field(app, f, FocusTarget::Format, chunks[3], chunks[4]);
    render_help_line(f, t("field-format-help"), chunks[5]);
    render_field(app, f, FocusTarget::Period, chunks[6], chunks[7]);

    let count_args = fluent_args! {
        "count" => app.state.periods().len(),
    };
    render_help_line(
        f,
        app.state.t_with_args("field-period-help", Some(&count_args)),
        chunks[8],
    );

    if let Some(period) = app.state.selected_period() {
        let start = period.start().format(RANGE_FORMAT).to_string();
        let end = period.end().format(RANGE_FORMAT).to_string();
        let args = fluent_args! {
            "start" => start.as_str(),
            "end" => end.as_str(),
        };
        render_help_line(
            f,
            app.state.t_with_args("field-period-range", Some(&args)),
            chunks[9],
        );
    }

    render_action_button(app, f, chunks[11]);
    render_status_line(app, f, chunks[12]);
    render_help_line(f, t("app-tips"), chunks[13]);
}

fn render_help_line(f: &mut Frame, text: String, area: Rect) {
    let paragraph = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    f.render_widget(paragraph, area);
}

/// Label plus collapsed trigger for one combobox
fn render_field(app: &TuiApp, f: &mut Frame, target: FocusTarget, label_area: Rect, area: Rect) {
    let Some(combo) = app.state.combo(target) else {
        return;
    };
    let focused = app.state.focus == target;
    let selected = app.state.selected_value(target);

    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    f.render_widget(
        Paragraph::new(app.state.t(target.label_key())).style(label_style),
        label_area,
    );

    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default().borders(Borders::ALL).border_style(border_style);
    let inner = block.inner(area);

    // ▾ collapsed, ▴ expanded (listbox popup)
    let glyph = if combo.trigger_semantics().expanded { "▴" } else { "▾" };
    let text_width = (inner.width as usize).saturating_sub(glyph.width() + 1);
    let text = truncate_to_width(combo.display_label(selected), text_width);
    let padding = text_width.saturating_sub(text.width());

    let text_style = if combo.has_selection(selected) {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let line = Line::from(vec![
        Span::styled(text, text_style),
        Span::raw(" ".repeat(padding + 1)),
        Span::styled(glyph, border_style),
    ]);
    f.render_widget(Paragraph::new(line).block(block), area);

    app.state
        .click_regions
        .borrow_mut()
        .triggers
        .push((target, area));
}

fn render_action_button(app: &TuiApp, f: &mut Frame, area: Rect) {
    let selection = &app.state.selection;
    let label = if selection.is_busy() {
        app.state.t("action-busy")
    } else {
        app.state.t("action-download")
    };

    let enabled = selection.can_download();
    let focused = app.state.focus == FocusTarget::Action;
    let style = match (enabled, focused) {
        (true, true) => Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        (true, false) => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        (false, _) => Style::default().fg(Color::DarkGray),
    };
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let width = (label.width() as u16 + 6).min(area.width);
    let button_area = Rect {
        x: area.x,
        y: area.y,
        width,
        height: area.height,
    };

    let button = Paragraph::new(Span::styled(label, style))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(border_style));
    f.render_widget(button, button_area);

    app.state.click_regions.borrow_mut().button = Some(button_area);
}

/// Outcome of the last attempt; redrawn whenever the status changes
fn render_status_line(app: &TuiApp, f: &mut Frame, area: Rect) {
    let status = app.state.selection.status();
    let style = match status.kind {
        StatusKind::None => return,
        StatusKind::Error => Style::default().fg(Color::Red),
        StatusKind::Success => Style::default().fg(Color::Green),
    };
    f.render_widget(
        Paragraph::new(Span::styled(status.text.clone(), style)),
        area,
    );
}

fn render_hint_bar(app: &TuiApp, f: &mut Frame, area: Rect) {
    let key = if app.state.open_control().is_some() {
        "hint-open"
    } else if app.state.focus == FocusTarget::Action {
        "hint-action"
    } else {
        "hint-closed"
    };
    let line = Line::from(Span::styled(
        app.state.t(key),
        Style::default().fg(Color::Cyan),
    ));
    f.render_widget(Paragraph::new(line), area);
}

/// Render the open option list under (or above) its trigger
fn render_listbox(app: &TuiApp, f: &mut Frame, target: FocusTarget, screen: Rect) {
    let Some(combo) = app.state.combo(target) else {
        return;
    };
    let trigger = {
        let regions = app.state.click_regions.borrow();
        regions
            .triggers
            .iter()
            .find(|(t, _)| *t == target)
            .map(|(_, rect)| *rect)
    };
    let Some(trigger) = trigger else {
        return;
    };

    let wanted = combo.options().len().max(1) as u16 + 2;
    let below = screen.bottom().saturating_sub(trigger.bottom());
    let above = trigger.y.saturating_sub(screen.y);
    let (y, height) = if below >= wanted.min(6) || below >= above {
        (trigger.bottom(), wanted.min(below))
    } else {
        let height = wanted.min(above);
        (trigger.y - height, height)
    };
    if height < 3 {
        return;
    }

    let list_area = Rect {
        x: trigger.x,
        y,
        width: trigger.width,
        height,
    };
    let rows = height as usize - 2;
    let window = combo.visible_window(rows);
    let highlighted = combo.highlighted();
    let selected = app.state.selected_value(target);
    let label_width = (list_area.width as usize).saturating_sub(6);

    let mut lines = Vec::new();
    for idx in window.clone() {
        let option = &combo.options()[idx];
        let is_highlighted = highlighted == Some(idx);
        let is_selected = combo.option_semantics(idx, selected).selected;

        let prefix = if is_highlighted { "▶ " } else { "  " };
        let marker = if is_selected { "✓ " } else { "  " };
        let style = if is_highlighted {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        lines.push(Line::from(vec![
            Span::styled(prefix, style),
            Span::styled(marker, Style::default().fg(Color::Green)),
            Span::styled(truncate_to_width(&option.label, label_width), style),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .style(Style::default().bg(Color::Black)),
    );

    // Clear area and render list
    f.render_widget(Clear, list_area);
    f.render_widget(paragraph, list_area);

    // Track clickable regions for option rows
    let option_rects = window
        .enumerate()
        .map(|(row, idx)| {
            (
                idx,
                Rect {
                    x: list_area.x + 1,
                    y: list_area.y + 1 + row as u16,
                    width: list_area.width.saturating_sub(2),
                    height: 1,
                },
            )
        })
        .collect();

    let mut regions = app.state.click_regions.borrow_mut();
    regions.listbox = Some(list_area);
    regions.options = option_rects;
}

/// Cut `text` to at most `max_width` display columns, marking the cut with …
fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut result = String::new();
    let mut width = 0;
    for c in text.chars() {
        let char_width = c.width().unwrap_or(0);
        if width + char_width + 1 > max_width {
            break;
        }
        result.push(c);
        width += char_width;
    }
    result.push('…');
    result
}
