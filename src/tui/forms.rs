//! Dashboard input fields.

use crate::services::{parse_amount, strip_leading_zeros, SessionError};
use crate::types::ForecastDirection;

/// Which amount field receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    TradeAmount,
    ForecastAmount,
}

/// Trade and forecast form state.
#[derive(Debug, Clone, Default)]
pub struct Forms {
    pub trade_amount: String,
    pub forecast_amount: String,
    pub direction: ForecastDirection,
    pub focus: Focus,
}

impl Forms {
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::TradeAmount => Focus::ForecastAmount,
            Focus::ForecastAmount => Focus::TradeAmount,
        };
    }

    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.toggled();
    }

    /// Type into the focused field. Accepts digits and a single decimal
    /// point; leading zeros are stripped as typed.
    pub fn push_char(&mut self, c: char) {
        let field = self.focused_mut();
        let accepted = c.is_ascii_digit() || (c == '.' && !field.contains('.'));
        if !accepted {
            return;
        }
        field.push(c);
        let stripped = strip_leading_zeros(field).to_string();
        *field = stripped;
    }

    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }

    pub fn trade_amount(&self) -> Result<f64, SessionError> {
        parse_amount(&self.trade_amount)
    }

    pub fn forecast_amount(&self) -> Result<f64, SessionError> {
        parse_amount(&self.forecast_amount)
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Focus::TradeAmount => &mut self.trade_amount,
            Focus::ForecastAmount => &mut self.forecast_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_strips_leading_zeros() {
        let mut forms = Forms::default();
        for c in "0012".chars() {
            forms.push_char(c);
        }
        assert_eq!(forms.trade_amount, "12");
    }

    #[test]
    fn test_lone_zero_kept_then_replaced() {
        let mut forms = Forms::default();
        forms.push_char('0');
        assert_eq!(forms.trade_amount, "0");
        forms.push_char('5');
        assert_eq!(forms.trade_amount, "5");
    }

    #[test]
    fn test_single_decimal_point() {
        let mut forms = Forms::default();
        for c in "1.5.2x".chars() {
            forms.push_char(c);
        }
        assert_eq!(forms.trade_amount, "1.52");
        assert_eq!(forms.trade_amount(), Ok(1.52));
    }

    #[test]
    fn test_focus_routes_input() {
        let mut forms = Forms::default();
        forms.toggle_focus();
        forms.push_char('7');
        forms.toggle_direction();

        assert_eq!(forms.trade_amount, "");
        assert_eq!(forms.forecast_amount, "7");
        assert_eq!(forms.direction, ForecastDirection::Fall);
    }

    #[test]
    fn test_backspace_and_empty_parse() {
        let mut forms = Forms::default();
        forms.push_char('3');
        forms.backspace();
        assert!(forms.trade_amount().is_err());
    }
}
