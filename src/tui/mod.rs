//! Terminal trading desk: dashboard, price history chart and logs.

mod app;
mod dashboard;
pub mod events;
mod forms;
mod history;
mod logs;
mod state;
mod theme;

pub use app::{run_tui, App, Intent};
pub use forms::{Focus, Forms};
pub use state::{LogBuffer, LogMakeWriter};
pub use theme::Theme;

/// Route/View enum for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    PriceHistory,
    Logs,
}

impl Route {
    /// Get all available routes.
    pub fn all() -> Vec<Self> {
        vec![Self::Dashboard, Self::PriceHistory, Self::Logs]
    }

    /// Get the route name.
    pub fn name(&self) -> &str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::PriceHistory => "Price History",
            Self::Logs => "Logs",
        }
    }

    /// Function key (F1..F3) that opens the route.
    pub fn key(&self) -> u8 {
        match self {
            Self::Dashboard => 1,
            Self::PriceHistory => 2,
            Self::Logs => 3,
        }
    }
}
