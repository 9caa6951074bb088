use serde_json::Value;

use crate::api::Api;
use crate::error::ApiError;

pub const MONITOR_ROUTE: &str = "/monitor";

/// Which list the side menu shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Menu,
    Download,
}

pub struct AppMenu {
    api: Api,
    pub open: bool,
    pub panel: Panel,
    pub title: String,
    pub monitor: bool,
}

impl AppMenu {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            open: true,
            panel: Panel::Menu,
            title: String::new(),
            monitor: false,
        }
    }

    /// Collapsing or expanding always lands on the menu panel.
    pub fn toggle_drawer(&mut self) {
        self.open = !self.open;
        self.panel = Panel::Menu;
    }

    pub fn toggle_panel(&mut self) {
        self.panel = match self.panel {
            Panel::Menu => Panel::Download,
            Panel::Download => Panel::Menu,
        };
    }

    /// The footer (monitor + logout) only sits under the menu panel.
    pub fn shows_footer(&self) -> bool {
        self.panel == Panel::Menu
    }

    /// Route to navigate to, or `None` while the monitor is already active.
    pub fn open_monitor(&mut self) -> Option<&'static str> {
        if self.monitor {
            return None;
        }
        self.title = "Monitor".to_string();
        self.monitor = true;
        Some(MONITOR_ROUTE)
    }

    pub async fn refresh_downloads(&self) -> Result<Value, ApiError> {
        self.api.status().download().await
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        self.api.auth().logout()
    }
}
