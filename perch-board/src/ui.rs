//! Floor-plan rendering

use std::time::Instant;

use ratatui::{prelude::*, widgets::*};
use shared::models::{FLOOR_ZONES, SEATS_PER_ZONE};
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use crate::app::{App, Phase};
use crate::layout::{self, BoardChunks};

pub fn ui(f: &mut Frame, app: &App, now: Instant) {
    let chunks = layout::split_frame(f.area());

    render_header(f, app, now, &chunks);
    render_floor(f, app, &chunks);
    render_logs(f, &chunks);
    render_footer(f, app, now, &chunks);

    if app.editor.is_some() {
        render_editor(f, app);
    }
}

fn render_header(f: &mut Frame, app: &App, now: Instant, chunks: &BoardChunks) {
    let connection = if app.connected {
        Span::styled(" ● LIVE ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ○ LOCAL ", Style::default().fg(Color::DarkGray))
    };

    let share = if app.copied_active(now) {
        Span::styled(
            " ✓ Link Copied ",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(" [s] Share Layout ", Style::default().fg(Color::Yellow))
    };

    let state = if app.phase == Phase::Loading {
        Span::styled(
            " LOADING... ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        share
    };

    let title = Paragraph::new(vec![Line::from(vec![
        Span::styled(
            " STAFF AREA ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                " {} SEATS / OPEN PLAN ",
                FLOOR_ZONES.len() as u32 * SEATS_PER_ZONE
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(" | "),
        connection,
        Span::raw(" | "),
        state,
    ])])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(title, chunks.header);
}

fn render_floor(f: &mut Frame, app: &App, chunks: &BoardChunks) {
    // Walkway marker between the two sections
    let walkway = layout::walkway_rect(chunks.floor);
    let marker = Paragraph::new("WALKWAY")
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM))
        .alignment(Alignment::Center);
    let marker_area = Rect {
        y: walkway.y + walkway.height / 2,
        height: 1.min(walkway.height),
        ..walkway
    };
    f.render_widget(marker, marker_area);

    for zone in &FLOOR_ZONES {
        let zone_area = layout::zone_rect(chunks.floor, zone);
        let section = if zone.col == 0 { "A" } else { "B" };
        let block = Block::default()
            .title(format!(" ZONE {}{} ", section, zone.row))
            .borders(Borders::ALL)
            .border_style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::DIM),
            );
        f.render_widget(block, zone_area);

        for seat_index in 0..SEATS_PER_ZONE {
            if let Some(seat_area) = layout::seat_rect(chunks.floor, zone.id, seat_index) {
                render_seat(f, app, zone.id, seat_index, seat_area);
            }
        }
    }
}

fn render_seat(f: &mut Frame, app: &App, zone_id: u32, seat_index: u32, area: Rect) {
    let record = app.seats.get_or_vacant(zone_id, seat_index);
    let occupied = record.is_occupied();
    let selected = app.cursor == (zone_id, seat_index);

    let border_style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else if occupied {
        Style::default().fg(Color::Blue)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let content = if occupied {
        Span::styled(
            record.occupant_name.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("·", Style::default().fg(Color::DarkGray))
    };

    let seat = Paragraph::new(Line::from(content))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(Line::from(Span::styled(
                    record.id.clone(),
                    Style::default().fg(Color::DarkGray),
                )))
                .borders(Borders::ALL)
                .border_style(border_style),
        );
    f.render_widget(seat, area);
}

fn render_logs(f: &mut Frame, chunks: &BoardChunks) {
    let logs = TuiLoggerWidget::default()
        .block(
            Block::default()
                .title(" Activity ")
                .borders(Borders::ALL)
                .border_style(
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::DIM),
                ),
        )
        .output_separator('|')
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false)
        .output_file(false)
        .output_line(false)
        .style(Style::default().fg(Color::White));
    f.render_widget(logs, chunks.logs);
}

fn render_footer(f: &mut Frame, app: &App, now: Instant, chunks: &BoardChunks) {
    let footer = if let Some(notice) = app.notice_text(now) {
        Paragraph::new(notice.to_string()).style(Style::default().fg(Color::Red))
    } else {
        Paragraph::new(format!(
            " click seat · ←→ move · ↑↓ zone · enter edit · s share · q quit   {}",
            app.share_link
        ))
        .style(Style::default().fg(Color::DarkGray))
    };
    f.render_widget(footer, chunks.footer);
}

fn render_editor(f: &mut Frame, app: &App) {
    let Some(editor) = &app.editor else {
        return;
    };

    let area = centered_rect(f.area(), 50, 5);
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" Seat {} ", editor.record.id))
        .title_bottom(Line::from(" Enter save · Esc cancel ").right_aligned())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let label = Paragraph::new("Occupant name (empty = vacate):")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(label, rows[0]);

    let width = rows[1].width.max(3) - 3;
    let scroll = editor.input.visual_scroll(width as usize);
    let input = Paragraph::new(editor.input.value())
        .style(Style::default().fg(Color::Yellow))
        .scroll((0, scroll as u16));
    f.render_widget(input, rows[1]);

    f.set_cursor_position((
        rows[1].x + ((editor.input.visual_cursor().max(scroll) - scroll) as u16),
        rows[1].y,
    ));
}

/// A centered popup rectangle of the given size
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
