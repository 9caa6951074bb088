use std::sync::Mutex;

pub const HOME_ROUTE: &str = "/";

/// Full navigation, replacing the current location.
pub trait Navigator: Send + Sync {
    fn replace(&self, route: &str);
}

pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn replace(&self, route: &str) {
        log::debug!("navigate → {}", route);
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn replace(&self, route: &str) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(route.to_string());
        }
    }
}
