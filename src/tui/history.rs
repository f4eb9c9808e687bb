//! Price history view - line chart of displayed prices.

use crate::types::SessionSnapshot;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use super::Theme;

/// Render the price history chart.
pub fn render(frame: &mut Frame, area: Rect, snapshot: &SessionSnapshot, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("📈 Monocoin Price History")
        .border_style(theme.border());

    let history = &snapshot.price_history;
    let (Some(first), Some(last)) = (history.first(), history.last()) else {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("Waiting for the first price...", theme.muted())),
        ];
        frame.render_widget(Paragraph::new(text).block(block).alignment(Alignment::Center), area);
        return;
    };

    let points: Vec<(f64, f64)> = history
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.price))
        .collect();

    let (min, max) = price_bounds(history.iter().map(|p| p.price));
    let x_max = (points.len().saturating_sub(1)).max(1) as f64;

    let datasets = vec![Dataset::default()
        .name("Monocoin Price")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(theme.coin))
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(Span::styled("Time", theme.muted()))
                .style(theme.muted())
                .bounds([0.0, x_max])
                .labels(vec![
                    Span::raw(first.time_label()),
                    Span::raw(last.time_label()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Price", theme.muted()))
                .style(theme.muted())
                .bounds([min, max])
                .labels(vec![
                    Span::raw(format!("{:.0}", min)),
                    Span::raw(format!("{:.0}", (min + max) / 2.0)),
                    Span::raw(format!("{:.0}", max)),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Y-axis bounds with a little headroom so a flat series is still visible.
fn price_bounds(prices: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = prices.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p), hi.max(p))
    });
    let pad = ((max - min) * 0.1).max(1.0);
    (min - pad, max + pad)
}
