//! Console stand-in for page navigation.

use std::sync::Mutex;

use taskdesk_core::ports::{Navigator, Route};

/// Remembers which screen the user was last sent to; the prompt shows it.
pub struct ConsoleNavigator {
    current: Mutex<Route>,
}

impl ConsoleNavigator {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Route::Login),
        }
    }

    pub fn current(&self) -> Route {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn prompt(&self) -> &'static str {
        match self.current() {
            Route::Login => "login> ",
            Route::Dashboard => "tasks> ",
        }
    }
}

impl Default for ConsoleNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: Route) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if *current != route {
            tracing::debug!(from = ?*current, to = ?route, "Navigate");
        }
        *current = route;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_follows_navigation() {
        let navigator = ConsoleNavigator::new();
        assert_eq!(navigator.prompt(), "login> ");

        navigator.navigate(Route::Dashboard);
        assert_eq!(navigator.current(), Route::Dashboard);
        assert_eq!(navigator.prompt(), "tasks> ");
    }
}
