//! UI widgets for the visualizer

pub mod bubbles;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::state::{FeedSummary, VisualizerState};
use super::App;
use crate::feed::FeedStatus;

/// Key bindings shown in the footer
const KEY_HELP: &str = "s=start x=stop l=latest q=quit";

/// Draw the main UI layout
pub fn draw(frame: &mut Frame, app: &App) {
    render(frame, &app.state, &app.feed_summary());
}

/// Draw from plain state, without a live feed
pub fn render(frame: &mut Frame, state: &VisualizerState, feed: &FeedSummary) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Header: status + latest tx
            Constraint::Min(0),     // Bubbles
            Constraint::Length(3),  // Footer
        ])
        .split(frame.area());

    draw_header(frame, state, feed, chunks[0]);
    bubbles::draw(frame, state, chunks[1]);
    draw_footer(frame, state, feed, chunks[2]);
}

fn draw_header(frame: &mut Frame, state: &VisualizerState, feed: &FeedSummary, area: Rect) {
    let status_color = match feed.status {
        FeedStatus::Connected => Color::Green,
        FeedStatus::Connecting => Color::Yellow,
    };

    let latest = match state.latest() {
        Some(record) => format!(" tx: {}", record.id),
        None => " tx: -".to_string(),
    };

    let lines = vec![
        Line::styled(format!(" {}", feed.status.label()), Style::default().fg(status_color)),
        Line::raw(latest),
    ];

    let header = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Mempool Bubbles "));

    frame.render_widget(header, area);
}

fn draw_footer(frame: &mut Frame, state: &VisualizerState, feed: &FeedSummary, area: Rect) {
    let counters = format!(
        "rx {} | accepted {} | evicted {} | bubbles {}/{}",
        feed.frames_received,
        state.accepted(),
        state.evictions(),
        state.scene().len(),
        state.buffer().capacity()
    );

    let footer_text = match feed.status_message.as_deref() {
        Some(status) if !status.is_empty() => format!(" {} | {} | {}", counters, KEY_HELP, status),
        _ => format!(" {} | {}", counters, KEY_HELP),
    };

    let footer = Paragraph::new(footer_text).block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}
