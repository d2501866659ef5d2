//! Frame layout and widgets

use super::markup;
use crate::dataset::DistrictRecord;
use crate::session::{Message, Role};
use chrono::Local;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Terminals narrower than this get no sidebar
const SIDEBAR_MIN_WIDTH: u16 = 90;
const SIDEBAR_WIDTH: u16 = 36;

const ACCENT: Color = Color::LightMagenta;
const MUTED: Color = Color::DarkGray;

/// Everything one frame needs, borrowed from the controller and dataset
pub struct ShellView<'a> {
    pub log: &'a [Message],
    pub draft: &'a str,
    pub busy: bool,
    pub deficits: &'a [&'a DistrictRecord],
    pub chart: &'a [DistrictRecord],
    /// Animation counter for the typing indicator
    pub tick: usize,
}

pub fn draw(frame: &mut Frame, view: &ShellView<'_>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(frame.area());

    draw_header(frame, rows[0]);

    if rows[1].width >= SIDEBAR_MIN_WIDTH {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(rows[1]);
        draw_sidebar(frame, columns[0], view);
        draw_chat(frame, columns[1], view);
    } else {
        draw_chat(frame, rows[1], view);
    }
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(MUTED));
    frame.render_widget(block, area);

    let inner = area.inner(Margin {
        vertical: 0,
        horizontal: 1,
    });
    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(14)])
        .split(Rect { height: 2, ..inner });

    let title = Line::from(vec![
        Span::styled("JOMRUMAH", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            "BOT",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
    ]);
    let hints = Line::from(vec![
        key_hint("Enter"),
        Span::raw(" hantar  "),
        key_hint("F1-F4"),
        Span::raw(" soalan pantas  "),
        key_hint("Ctrl+R"),
        Span::raw(" sembang baru  "),
        key_hint("Esc"),
        Span::raw(" keluar"),
    ]);
    frame.render_widget(Paragraph::new(vec![title, hints]), parts[0]);

    let badge = Paragraph::new(Line::styled(
        "⚡ LIVE DATA",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(badge, parts[1]);
}

fn key_hint(key: &'static str) -> Span<'static> {
    Span::styled(key, Style::default().fg(Color::Yellow))
}

fn section(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MUTED))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
        ))
}

fn ratio_color(ratio: f64) -> Color {
    if ratio < 0.5 {
        Color::LightRed
    } else if ratio < 1.0 {
        Color::Yellow
    } else {
        Color::LightGreen
    }
}

fn draw_sidebar(frame: &mut Frame, area: Rect, view: &ShellView<'_>) {
    #[allow(clippy::cast_possible_truncation)]
    let card_height = (view.deficits.len() * 2) as u16 + 2;
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(card_height),
            Constraint::Min(4),
            Constraint::Length(5),
        ])
        .split(area);

    draw_deficit_cards(frame, parts[0], view.deficits);
    draw_chart(frame, parts[1], view.chart);

    let credit = Paragraph::new(Line::styled(
        "Data dikuasai oleh NAPIC (National Property Information Centre). \
         Analisis AI dijana secara real-time.",
        Style::default().fg(MUTED),
    ))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(MUTED)));
    frame.render_widget(credit, parts[2]);
}

fn draw_deficit_cards(frame: &mut Frame, area: Rect, deficits: &[&DistrictRecord]) {
    let mut lines = Vec::with_capacity(deficits.len() * 2);
    for record in deficits {
        lines.push(Line::from(vec![
            Span::styled("📍 ", Style::default().fg(ACCENT)),
            Span::styled(record.district, Style::default().add_modifier(Modifier::BOLD)),
        ]));
        lines.push(Line::from(vec![
            Span::raw("   "),
            Span::styled(
                format!("{:.2}", record.sufficiency_ratio),
                Style::default()
                    .fg(ratio_color(record.sufficiency_ratio))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  kurang {} unit", record.gap()),
                Style::default().fg(MUTED),
            ),
        ]));
    }
    frame.render_widget(
        Paragraph::new(lines).block(section("Defisit Tertinggi 2024")),
        area,
    );
}

fn draw_chart(frame: &mut Frame, area: Rect, records: &[DistrictRecord]) {
    let bars: Vec<Bar<'_>> = records
        .iter()
        .map(|r| {
            let percent = r.sufficiency_percent();
            Bar::default()
                .value(percent)
                .text_value(format!("{percent}%"))
                .label(Line::from(r.district))
                .style(Style::default().fg(ratio_color(r.sufficiency_ratio)))
        })
        .collect();

    let chart = BarChart::default()
        .block(section("Analitik Visual"))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(120)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn draw_chat(frame: &mut Frame, area: Rect, view: &ShellView<'_>) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    draw_messages(frame, parts[0], view);
    draw_input(frame, parts[1], view);
}

/// All chat lines, oldest first
fn transcript_lines(view: &ShellView<'_>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in view.log {
        let (label, color) = match message.role() {
            Role::User => ("Anda", Color::LightGreen),
            Role::Assistant => ("JOMRUMAHBOT", ACCENT),
        };
        let stamp = message.created_at().with_timezone(&Local).format("%H:%M");
        lines.push(Line::from(vec![
            Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {stamp}"), Style::default().fg(MUTED)),
        ]));

        let body_style = match message.role() {
            Role::User => Style::default().fg(Color::White),
            Role::Assistant => Style::default().fg(Color::Gray),
        };
        // User text is shown as typed; only replies carry markdown
        let body = match message.role() {
            Role::User => message
                .content()
                .lines()
                .map(|line| Line::styled(line.to_string(), body_style))
                .collect(),
            Role::Assistant => markup::render(message.content(), body_style),
        };
        for line in body {
            let mut spans = vec![Span::raw("  ")];
            spans.extend(line.spans);
            lines.push(Line::from(spans));
        }
        lines.push(Line::default());
    }

    if view.busy {
        let dots = ".".repeat(view.tick % 3 + 1);
        lines.push(Line::styled(
            format!("JOMRUMAHBOT sedang menaip{dots}"),
            Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
        ));
    }
    lines
}

fn draw_messages(frame: &mut Frame, area: Rect, view: &ShellView<'_>) {
    let block = section("Sembang");
    let inner = block.inner(area);
    let paragraph = Paragraph::new(transcript_lines(view)).wrap(Wrap { trim: false });

    // Measured with the same word wrapping the render uses, so the newest
    // line always lands on the bottom row
    let overflow = paragraph
        .line_count(inner.width)
        .saturating_sub(usize::from(inner.height));
    let scroll = u16::try_from(overflow).unwrap_or(u16::MAX);

    frame.render_widget(paragraph.block(block).scroll((scroll, 0)), area);
}

/// Tail of `text` that fits in `width` display columns
fn visible_tail(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut tail: Vec<char> = Vec::new();
    for c in text.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        tail.push(c);
    }
    tail.into_iter().rev().collect()
}

fn draw_input(frame: &mut Frame, area: Rect, view: &ShellView<'_>) {
    let title = if view.busy {
        "Menunggu jawapan"
    } else {
        "Tanya JOMRUMAHBOT"
    };
    let block = section(title);
    let inner = block.inner(area);

    let room = usize::from(inner.width.saturating_sub(1));
    let shown = visible_tail(view.draft, room);
    let offset = u16::try_from(shown.width()).unwrap_or(inner.width);
    frame.render_widget(Paragraph::new(shown).block(block), area);

    frame.set_cursor_position(Position::new(inner.x + offset, inner.y));
}
