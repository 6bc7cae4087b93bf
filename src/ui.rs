use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, Widget, Wrap},
};
use snaphunt::util::{format_time, progress_percent};
use unicode_width::UnicodeWidthStr;

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const LOW_TIME_SECS: u32 = 10;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Welcome => render_welcome(self, area, buf),
            AppState::Playing => render_game(self, area, buf),
            AppState::Capture => render_capture(self, area, buf),
            AppState::Leaderboard => render_leaderboard(self, area, buf),
        }
    }
}

fn render_welcome(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_italic = Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(Span::styled(
        "snaphunt",
        bold_style.fg(Color::Magenta),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    Paragraph::new(format!(
        "Photograph {} objects before the clock runs out",
        app.objects_per_game
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        "(enter) start hunt   (l) leaderboard   (esc) quit",
        dim_italic,
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);
}

fn render_game(app: &App, area: Rect, buf: &mut Buffer) {
    let hunt = &app.hunt;
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_italic = Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC);

    let object_lines = hunt.objects.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(object_lines),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    // score on the left, remaining time on the right
    let score_text = format!("Score: {}", hunt.score);
    let time_text = format!("Time left: {}", format_time(hunt.time_left));
    let padding = (chunks[0].width as usize)
        .saturating_sub(score_text.width() + time_text.width());
    let time_style = if hunt.time_left <= LOW_TIME_SECS {
        bold_style.fg(Color::Red)
    } else {
        bold_style
    };
    Paragraph::new(Line::from(vec![
        Span::styled(score_text, bold_style.fg(Color::Green)),
        Span::raw(" ".repeat(padding)),
        Span::styled(time_text, time_style),
    ]))
    .render(chunks[0], buf);

    let lines: Vec<Line> = hunt
        .objects
        .iter()
        .map(|obj| {
            if obj.found {
                Line::from(Span::styled(
                    format!("  ✓ {}  +{}", obj.name, obj.points),
                    Style::default().fg(Color::Green).add_modifier(Modifier::DIM),
                ))
            } else {
                Line::from(vec![
                    Span::styled(format!("  · {}", obj.name), bold_style),
                    Span::styled(format!("  {} pts", obj.points), dim_italic),
                ])
            }
        })
        .collect();
    Paragraph::new(lines).render(chunks[2], buf);

    Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(progress_percent(&hunt.objects) / 100.0)
        .label(format!(
            "{}/{} found",
            hunt.found_count(),
            hunt.objects.len()
        ))
        .render(chunks[4], buf);

    if let Some(alert) = &app.alert {
        Paragraph::new(Span::styled(
            alert.as_str(),
            Style::default().fg(Color::Yellow),
        ))
        .render(chunks[5], buf);
    }

    Paragraph::new(Span::styled(
        "(c) capture photo   (esc) quit",
        dim_italic,
    ))
    .render(chunks[6], buf);
}

fn render_capture(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_italic = Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(Span::styled("Path to the captured photo:", bold_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Line::from(vec![
        Span::raw(app.capture_input.as_str()),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        "(enter) classify   (esc) back to game",
        dim_italic,
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);
}

fn render_leaderboard(app: &App, area: Rect, buf: &mut Buffer) {
    let dim_italic = Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(2)
        .vertical_margin(1)
        .constraints([Constraint::Min(4), Constraint::Length(1)])
        .split(area);

    if app.leaderboard.is_empty() {
        Paragraph::new("No scores yet. Finish a hunt to get on the board!")
            .block(Block::default().borders(Borders::ALL).title("Leaderboard"))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);
    } else {
        let header = Row::new(vec![
            Cell::from("#"),
            Cell::from("Player"),
            Cell::from("Score"),
            Cell::from("Objects"),
            Cell::from("Time"),
            Cell::from("Done"),
            Cell::from("Date"),
        ])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = app
            .leaderboard
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let done = if record.completed {
                    Cell::from("✓").style(Style::default().fg(Color::Green))
                } else {
                    Cell::from("✗").style(Style::default().fg(Color::Red))
                };
                Row::new(vec![
                    Cell::from(format!("{}", i + 1)),
                    Cell::from(record.player_name.clone()),
                    Cell::from(format!("{}", record.score)),
                    Cell::from(format!(
                        "{}/{}",
                        record.objects_found, record.total_objects
                    )),
                    Cell::from(record.time_used.clone()),
                    done,
                    Cell::from(record.date.clone()),
                ])
            })
            .collect();

        Table::new(
            rows,
            &[
                Constraint::Length(3),
                Constraint::Length(12),
                Constraint::Length(7),
                Constraint::Length(9),
                Constraint::Length(7),
                Constraint::Length(6),
                Constraint::Length(12),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Leaderboard"))
        .render(chunks[0], buf);
    }

    Paragraph::new(Span::styled(
        "(n) new hunt   (x) clear scores   (esc) quit",
        dim_italic,
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);
}
