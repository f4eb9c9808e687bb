//! MonoCoin palette: gold coin accent on a slate frame.

use ratatui::style::{Color, Modifier, Style};

const COIN_GOLD: Color = Color::Rgb(242, 183, 5);
const SLATE: Color = Color::Rgb(96, 110, 130);
const GAIN_GREEN: Color = Color::Rgb(38, 166, 91);
const LOSS_RED: Color = Color::Rgb(214, 69, 65);
const AMBER: Color = Color::Rgb(230, 126, 34);
const SKY: Color = Color::Rgb(93, 173, 226);

#[derive(Debug, Clone)]
pub struct Theme {
    /// Coin accent: price, chart line, active tab, focused input.
    pub coin: Color,
    pub frame: Color,
    pub gain: Color,
    pub loss: Color,
    pub caution: Color,
    pub action: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            coin: COIN_GOLD,
            frame: SLATE,
            gain: GAIN_GREEN,
            loss: LOSS_RED,
            caution: AMBER,
            action: SKY,
        }
    }
}

impl Theme {
    pub fn title(&self) -> Style {
        Style::default().fg(self.coin).add_modifier(Modifier::BOLD)
    }

    /// Table headers and the forecast direction.
    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.action)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.gain)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.caution)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.loss)
    }

    /// Action key hints.
    pub fn info(&self) -> Style {
        Style::default().fg(self.action)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.frame).add_modifier(Modifier::DIM)
    }

    pub fn focused(&self) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(self.coin)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.frame)
    }

    pub fn alert_border(&self) -> Style {
        Style::default()
            .fg(self.loss)
            .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK)
    }

    pub fn tab_active(&self) -> Style {
        self.focused()
    }

    pub fn tab_inactive(&self) -> Style {
        Style::default().fg(self.frame)
    }

    /// Modifier colour: gain at or above zero, loss below.
    pub fn signed(&self, value: f64) -> Style {
        if value < 0.0 {
            self.error()
        } else {
            self.success()
        }
    }
}
