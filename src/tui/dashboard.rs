//! Dashboard view - balances, trade and forecast forms, event log.

use crate::types::{ForecastDirection, SessionSnapshot};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use std::time::Duration;

use super::{Focus, Forms, Theme};

/// Render the dashboard view.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    snapshot: &SessionSnapshot,
    forms: &Forms,
    settle_delay: Duration,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Balances & forecast
            Constraint::Length(7), // Forms & actions
            Constraint::Min(0),    // Event log
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    render_balances(frame, top[0], snapshot, theme);
    render_active_forecast(frame, top[1], snapshot, settle_delay, theme);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(chunks[1]);

    render_trade_form(frame, middle[0], forms, theme);
    render_forecast_form(frame, middle[1], forms, theme);
    render_event_actions(frame, middle[2], theme);

    render_event_log(frame, chunks[2], snapshot, theme);
}

fn render_balances(frame: &mut Frame, area: Rect, snapshot: &SessionSnapshot, theme: &Theme) {
    let lines = vec![
        Line::from(vec![
            Span::styled("Current Price: ", theme.muted()),
            Span::styled(format!("${}", snapshot.displayed_price), theme.title()),
        ]),
        Line::from(vec![
            Span::styled("Cash: ", theme.muted()),
            Span::raw(format!("${}", snapshot.cash_balance)),
        ]),
        Line::from(vec![
            Span::styled("Crypto: ", theme.muted()),
            Span::raw(format!("{:.2} MonoCoins", snapshot.asset_balance)),
        ]),
        Line::from(vec![
            Span::styled("Price Modifier: ", theme.muted()),
            Span::styled(
                format!("{:+}%", snapshot.price_modifier),
                theme.signed(f64::from(snapshot.price_modifier)),
            ),
        ]),
    ];

    let block = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("💰 MonoCoin Dashboard")
            .border_style(theme.border()),
    );

    frame.render_widget(block, area);
}

fn render_active_forecast(
    frame: &mut Frame,
    area: Rect,
    snapshot: &SessionSnapshot,
    settle_delay: Duration,
    theme: &Theme,
) {
    let lines = match &snapshot.active_forecast {
        Some(forecast) => {
            let settles_at = forecast.placed_at + settle_delay.as_millis() as i64;
            let remaining = (settles_at - chrono::Utc::now().timestamp_millis()).max(0) / 1000;
            let direction_style = match forecast.direction {
                ForecastDirection::Rise => theme.success(),
                ForecastDirection::Fall => theme.error(),
            };
            vec![
                Line::from(vec![
                    Span::styled("Direction: ", theme.muted()),
                    Span::styled(forecast.direction.to_string(), direction_style),
                ]),
                Line::from(vec![
                    Span::styled("Stake: ", theme.muted()),
                    Span::raw(format!("{} MonoCoins", forecast.amount)),
                ]),
                Line::from(vec![
                    Span::styled("Reference: ", theme.muted()),
                    Span::raw(format!("${}", forecast.reference_price)),
                ]),
                Line::from(vec![
                    Span::styled("Settles in: ", theme.muted()),
                    Span::styled(format!("~{}s", remaining), theme.warning()),
                ]),
            ]
        }
        None => vec![Line::from(Span::styled("No active forecast.", theme.muted()))],
    };

    let block = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("🔮 Active Forecast")
            .border_style(theme.border()),
    );

    frame.render_widget(block, area);
}

fn input_line<'a>(label: &'a str, value: &'a str, focused: bool, theme: &Theme) -> Line<'a> {
    let style = if focused { theme.focused() } else { theme.info() };
    Line::from(vec![
        Span::styled(label, theme.muted()),
        Span::styled(format!(" {:<10} ", value), style),
    ])
}

fn render_trade_form(frame: &mut Frame, area: Rect, forms: &Forms, theme: &Theme) {
    let lines = vec![
        input_line(
            "Amount:",
            &forms.trade_amount,
            forms.focus == Focus::TradeAmount,
            theme,
        ),
        Line::from(""),
        Line::from(vec![
            Span::styled("[b]", theme.info()),
            Span::raw(" Buy  "),
            Span::styled("[s]", theme.info()),
            Span::raw(" Sell"),
        ]),
        Line::from(vec![
            Span::styled("[a]", theme.success()),
            Span::raw(" Add Funds  "),
            Span::styled("[w]", theme.error()),
            Span::raw(" Withdraw"),
        ]),
    ];

    let block = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Trade MonoCoin")
            .border_style(theme.border()),
    );

    frame.render_widget(block, area);
}

fn render_forecast_form(frame: &mut Frame, area: Rect, forms: &Forms, theme: &Theme) {
    let lines = vec![
        input_line(
            "Bet:",
            &forms.forecast_amount,
            forms.focus == Focus::ForecastAmount,
            theme,
        ),
        Line::from(vec![
            Span::styled("Direction: ", theme.muted()),
            Span::styled(forms.direction.to_string(), theme.header()),
            Span::styled("  [d] toggle", theme.muted()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("[f]", theme.info()),
            Span::raw(" Place Forecast  "),
            Span::styled("[Tab]", theme.muted()),
            Span::raw(" focus"),
        ]),
    ];

    let block = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Forecast Price Movement")
            .border_style(theme.border()),
    );

    frame.render_widget(block, area);
}

fn render_event_actions(frame: &mut Frame, area: Rect, theme: &Theme) {
    let lines = vec![
        Line::from(vec![
            Span::styled("[r]", theme.warning()),
            Span::raw(" Roll Dice"),
        ]),
        Line::from(vec![
            Span::styled("[g]", theme.info()),
            Span::raw(" Apply New Regulation"),
        ]),
        Line::from(vec![
            Span::styled("[h]", theme.error()),
            Span::raw(" Hacker Attack"),
        ]),
        Line::from(vec![
            Span::styled("[u]", theme.success()),
            Span::raw(" Tech Upgrade"),
        ]),
    ];

    let block = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Events")
            .border_style(theme.border()),
    );

    frame.render_widget(block, area);
}

fn render_event_log(frame: &mut Frame, area: Rect, snapshot: &SessionSnapshot, theme: &Theme) {
    // Newest rows that fit, keeping chronological order
    let visible = area.height.saturating_sub(3) as usize;
    let start = snapshot.events.len().saturating_sub(visible);

    let rows: Vec<Row> = snapshot.events[start..]
        .iter()
        .map(|event| {
            Row::new(vec![
                Cell::from(event.id.to_string()),
                Cell::from(event.description.clone()),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(6), Constraint::Min(10)])
        .header(Row::new(vec!["#", "Description"]).style(theme.header()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("📋 Event Log")
                .border_style(theme.border()),
        );

    frame.render_widget(table, area);
}
