//! Logs view - recent tracing output.

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use std::sync::Arc;

use super::{LogBuffer, Theme};

/// Render the logs view.
pub fn render(frame: &mut Frame, area: Rect, log_buffer: &Arc<LogBuffer>, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("📝 Logs (Live)")
        .border_style(theme.border());

    let lines = log_buffer.recent(area.height.saturating_sub(2) as usize);
    if lines.is_empty() {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled("No logs yet.", theme.muted())),
        ];
        frame.render_widget(Paragraph::new(text).block(block).alignment(Alignment::Center), area);
        return;
    }

    let items: Vec<ListItem> = lines
        .iter()
        .rev()
        .map(|line| {
            let style = if line.contains("ERROR") {
                theme.error()
            } else if line.contains("WARN") {
                theme.warning()
            } else if line.contains("INFO") {
                theme.success()
            } else if line.contains("DEBUG") {
                theme.muted()
            } else {
                theme.info()
            };

            ListItem::new(Line::from(Span::styled(line.clone(), style)))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
