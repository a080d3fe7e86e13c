//! Bubble canvas widget

use ratatui::{
    layout::Rect,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Circle},
        Block, Borders,
    },
    Frame,
};

use crate::scene::screen_position;
use crate::visualizer::VisualizerState;

/// Draw every bubble at its current simulated position
pub fn draw(frame: &mut Frame, state: &VisualizerState, area: Rect) {
    let view = state.view();
    let center = view.center();
    let height = view.height;
    let title = format!(" {} transactions ", state.scene().len());

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .marker(Marker::Braille)
        .x_bounds([0.0, view.width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for bubble in state.scene().bubbles() {
                let (x, y) = screen_position(bubble, center);
                // Canvas y grows upwards
                ctx.draw(&Circle {
                    x,
                    y: height - y,
                    radius: bubble.radius,
                    color: bubble.color,
                });
            }
        });

    frame.render_widget(canvas, area);
}
