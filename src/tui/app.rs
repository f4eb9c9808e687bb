//! Main TUI application logic.

use super::{dashboard, events, history, logs, Forms, LogBuffer, Route, Theme};
use crate::services::{SessionError, TradingDesk};
use crate::types::ForecastSettlement;
use crossterm::{
    event::{KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use std::{io, sync::Arc, time::Duration};
use tokio::sync::broadcast;
use tracing::{info, warn};

/// User intents dispatched from the dashboard into the desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Buy,
    Sell,
    AddFunds,
    WithdrawFunds,
    PlaceForecast,
    RollDice,
    ApplyRegulation,
    HackerAttack,
    TechUpgrade,
}

impl Intent {
    /// Dashboard key binding.
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char('b') => Some(Self::Buy),
            KeyCode::Char('s') => Some(Self::Sell),
            KeyCode::Char('a') => Some(Self::AddFunds),
            KeyCode::Char('w') => Some(Self::WithdrawFunds),
            KeyCode::Char('f') => Some(Self::PlaceForecast),
            KeyCode::Char('r') => Some(Self::RollDice),
            KeyCode::Char('g') => Some(Self::ApplyRegulation),
            KeyCode::Char('h') => Some(Self::HackerAttack),
            KeyCode::Char('u') => Some(Self::TechUpgrade),
            _ => None,
        }
    }

    /// Alert text shown when the intent is rejected.
    fn rejection(&self, err: &SessionError) -> String {
        let headline = match (self, err) {
            (_, SessionError::InvalidAmount(_)) => "Enter a valid amount.",
            (Self::Buy, _) => "Not enough cash to complete the purchase.",
            (Self::Sell, _) => "Not enough Monocoins to complete the sale.",
            (Self::WithdrawFunds, _) => "Not enough cash to complete the withdrawal.",
            (Self::PlaceForecast, _) => "Invalid forecast amount.",
            _ => "Action rejected.",
        };
        format!("{}\n\n{}", headline, err)
    }
}

/// Main TUI application.
pub struct App {
    /// Current route/view.
    current_route: Route,
    desk: Arc<TradingDesk>,
    log_buffer: Arc<LogBuffer>,
    theme: Theme,
    forms: Forms,
    /// Blocking alert; input is ignored until acknowledged.
    alert: Option<String>,
    /// Last settlement or action result for the status bar.
    notice: Option<String>,
    settlements: broadcast::Receiver<ForecastSettlement>,
    should_quit: bool,
}

impl App {
    /// Create a new TUI application.
    pub fn new(desk: Arc<TradingDesk>, log_buffer: Arc<LogBuffer>) -> Self {
        let settlements = desk.subscribe_settlements();
        Self {
            current_route: Route::Dashboard,
            desk,
            log_buffer,
            theme: Theme::default(),
            forms: Forms::default(),
            alert: None,
            notice: None,
            settlements,
            should_quit: false,
        }
    }

    pub fn route(&self) -> Route {
        self.current_route
    }

    pub fn forms(&self) -> &Forms {
        &self.forms
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Handle an event.
    pub fn handle_event(&mut self, event: events::Event) {
        match event {
            events::Event::Key(key) => self.handle_key(key),
            events::Event::Tick => self.drain_settlements(),
            events::Event::Resize(_, _) => {
                // Terminal will handle resize automatically
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if events::is_quit(&key) {
            self.should_quit = true;
            return;
        }

        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alert = None;
            }
            return;
        }

        // Route navigation
        for route in Route::all() {
            if key.code == KeyCode::F(route.key()) {
                self.current_route = route;
                return;
            }
        }

        if self.current_route != Route::Dashboard {
            return;
        }

        match key.code {
            KeyCode::Tab => self.forms.toggle_focus(),
            KeyCode::Backspace => self.forms.backspace(),
            KeyCode::Char('d') => self.forms.toggle_direction(),
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => self.forms.push_char(c),
            code if events::is_key(&key, code) => {
                if let Some(intent) = Intent::from_key(code) {
                    self.dispatch(intent);
                }
            }
            _ => {}
        }
    }

    /// Run an intent against the desk, raising an alert on rejection.
    pub fn dispatch(&mut self, intent: Intent) {
        let result = self.execute(intent);
        match result {
            Ok(notice) => self.notice = Some(notice),
            Err(err) => {
                warn!("{:?} rejected: {}", intent, err);
                self.alert = Some(intent.rejection(&err));
            }
        }
    }

    fn execute(&self, intent: Intent) -> Result<String, SessionError> {
        let desk = &self.desk;
        let notice = match intent {
            Intent::Buy => {
                let receipt = desk.buy(self.forms.trade_amount()?)?;
                format!("Bought {} for ${:.2}", receipt.amount, receipt.total)
            }
            Intent::Sell => {
                let receipt = desk.sell(self.forms.trade_amount()?)?;
                format!("Sold {} for ${:.2}", receipt.amount, receipt.total)
            }
            Intent::AddFunds => {
                let cash = desk.add_funds(self.forms.trade_amount()?)?;
                format!("Cash is now ${:.2}", cash)
            }
            Intent::WithdrawFunds => {
                let cash = desk.withdraw_funds(self.forms.trade_amount()?)?;
                format!("Cash is now ${:.2}", cash)
            }
            Intent::PlaceForecast => {
                let forecast =
                    desk.place_forecast(self.forms.forecast_amount()?, self.forms.direction)?;
                format!(
                    "Forecast placed: {} from {} (settles in {}s)",
                    forecast.direction,
                    forecast.reference_price,
                    desk.settle_delay().as_secs()
                )
            }
            Intent::RollDice => desk.roll_dice().description(),
            Intent::ApplyRegulation => desk.apply_regulation().description(),
            Intent::HackerAttack => desk.hacker_attack().description(),
            Intent::TechUpgrade => desk.tech_upgrade().description(),
        };
        Ok(notice)
    }

    fn drain_settlements(&mut self) {
        while let Ok(settlement) = self.settlements.try_recv() {
            let text = if settlement.correct {
                format!(
                    "Forecast correct at {}: +{} Monocoins",
                    settlement.settlement_price, settlement.asset_change
                )
            } else {
                format!(
                    "Forecast incorrect at {}: lost {} Monocoins",
                    settlement.settlement_price, settlement.forecast.amount
                )
            };
            self.notice = Some(text);
        }
    }

    /// Check if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Render the TUI.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.size();
        let snapshot = self.desk.snapshot();

        // Create main layout: tabs at top, content below, status bar at bottom
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Status bar
            ])
            .split(area);

        self.render_tabs(frame, chunks[0]);

        match self.current_route {
            Route::Dashboard => dashboard::render(
                frame,
                chunks[1],
                &snapshot,
                &self.forms,
                self.desk.settle_delay(),
                &self.theme,
            ),
            Route::PriceHistory => history::render(frame, chunks[1], &snapshot, &self.theme),
            Route::Logs => logs::render(frame, chunks[1], &self.log_buffer, &self.theme),
        }

        self.render_status_bar(frame, chunks[2]);

        if let Some(alert) = &self.alert {
            self.render_alert(frame, area, alert);
        }
    }

    /// Render the tabs.
    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let routes = Route::all();
        let titles: Vec<Line> = routes
            .iter()
            .map(|r| {
                Line::from(vec![
                    Span::styled(format!("[F{}] ", r.key()), self.theme.muted()),
                    Span::raw(r.name()),
                ])
            })
            .collect();

        let selected = routes
            .iter()
            .position(|r| *r == self.current_route)
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title("MonoCoin"))
            .select(selected)
            .style(self.theme.tab_inactive())
            .highlight_style(self.theme.tab_active());

        frame.render_widget(tabs, area);
    }

    /// Render status bar.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let text = match &self.notice {
            Some(notice) => Line::from(vec![
                Span::styled("» ", self.theme.title()),
                Span::raw(notice.clone()),
            ]),
            None => Line::from(vec![
                Span::styled("q", self.theme.muted()),
                Span::raw(" or "),
                Span::styled("Ctrl+C", self.theme.muted()),
                Span::raw(" to quit | "),
                Span::styled("F1-F3", self.theme.muted()),
                Span::raw(" to switch views"),
            ]),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border());

        frame.render_widget(block, area);

        let inner = Rect {
            x: area.x + 2,
            y: area.y + 1,
            width: area.width.saturating_sub(4),
            height: 1,
        };

        frame.render_widget(text, inner);
    }

    /// Render the blocking alert popup.
    fn render_alert(&self, frame: &mut Frame, area: Rect, message: &str) {
        let popup = centered_rect(50, 30, area);
        let mut lines: Vec<Line> = message.lines().map(|l| Line::from(l.to_string())).collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Enter to acknowledge",
            self.theme.muted(),
        )));

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("⚠ Alert")
                    .border_style(self.theme.alert_border()),
            );

        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }
}

/// A rectangle of `percent_x` by `percent_y` centered in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Run the TUI application.
pub async fn run_tui(desk: Arc<TradingDesk>, log_buffer: Arc<LogBuffer>) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(desk, log_buffer);
    let mut event_handler = events::EventHandler::new(Duration::from_millis(250));
    info!("Trading desk UI started");

    // Main loop
    let result = loop {
        if let Err(e) = terminal.draw(|f| app.render(f)) {
            break Err(e);
        }

        if let Some(event) = event_handler.next().await {
            app.handle_event(event);
        }

        if app.should_quit() {
            break Ok(());
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{DeskSettings, FeedError, PriceFeed, SeededRandom};
    use async_trait::async_trait;
    use crossterm::event::KeyModifiers;

    struct OfflineFeed;

    #[async_trait]
    impl PriceFeed for OfflineFeed {
        async fn fetch_price(&self) -> Result<f64, FeedError> {
            Err(FeedError::Unavailable("offline".into()))
        }
    }

    fn test_app() -> App {
        let desk = TradingDesk::start(
            Arc::new(OfflineFeed),
            DeskSettings::default(),
            Box::new(SeededRandom::from_seed(3)),
        );
        App::new(Arc::new(desk), Arc::new(LogBuffer::new(16)))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(events::Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn test_buy_through_keys() {
        let mut app = test_app();
        type_text(&mut app, "01");
        assert_eq!(app.forms().trade_amount, "1");

        press(&mut app, KeyCode::Char('b'));
        let snapshot = app.desk.snapshot();
        assert_eq!(snapshot.asset_balance, 1.0);
        assert_eq!(snapshot.cash_balance, 100.0);
        assert!(app.alert().is_none());
    }

    #[tokio::test]
    async fn test_rejection_raises_blocking_alert() {
        let mut app = test_app();
        type_text(&mut app, "3");
        press(&mut app, KeyCode::Char('b'));

        let alert = app.alert().unwrap();
        assert!(alert.starts_with("Not enough cash to complete the purchase."));
        assert_eq!(app.desk.snapshot().cash_balance, 200.0);

        // Other keys are swallowed until acknowledged
        press(&mut app, KeyCode::Char('u'));
        assert_eq!(app.desk.snapshot().price_modifier, 0);

        press(&mut app, KeyCode::Enter);
        assert!(app.alert().is_none());
        press(&mut app, KeyCode::Char('u'));
        assert_eq!(app.desk.snapshot().price_modifier, 10);
    }

    #[tokio::test]
    async fn test_forecast_form() {
        let mut app = test_app();
        type_text(&mut app, "2");
        press(&mut app, KeyCode::Char('b'));

        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "1");
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('f'));

        let snapshot = app.desk.snapshot();
        let forecast = snapshot.active_forecast.unwrap();
        assert_eq!(forecast.amount, 1.0);
        assert_eq!(forecast.direction, crate::types::ForecastDirection::Fall);
        assert_eq!(snapshot.asset_balance, 1.0);
    }

    #[tokio::test]
    async fn test_navigation_does_not_touch_state() {
        let mut app = test_app();
        press(&mut app, KeyCode::F(2));
        assert_eq!(app.route(), Route::PriceHistory);

        // Intent keys are inert outside the dashboard
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.desk.snapshot().price_modifier, 0);

        press(&mut app, KeyCode::F(1));
        assert_eq!(app.route(), Route::Dashboard);
    }

    #[tokio::test]
    async fn test_quit() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_intent_key_bindings() {
        assert_eq!(Intent::from_key(KeyCode::Char('r')), Some(Intent::RollDice));
        assert_eq!(Intent::from_key(KeyCode::Char('g')), Some(Intent::ApplyRegulation));
        assert_eq!(Intent::from_key(KeyCode::Char('z')), None);
    }
}
