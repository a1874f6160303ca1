//! Intent dispatcher - Picks one response strategy per message

use crate::domain::entities::Intent;
use crate::infrastructure::config::RoutesConfig;

/// A keyword route: matches when the text contains any keyword
#[derive(Debug, Clone)]
pub struct Route {
    pub intent: Intent,
    pub keywords: Vec<String>,
}

impl Route {
    pub fn new(intent: Intent, keywords: Vec<String>) -> Self {
        Self { intent, keywords }
    }

    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| !k.is_empty() && text.contains(k.as_str()))
    }
}

/// Ordered list of routes; the first match wins, no match means `Conversation`
#[derive(Debug, Clone)]
pub struct IntentDispatcher {
    routes: Vec<Route>,
}

impl IntentDispatcher {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Routes in the fixed order schedule, news, document
    pub fn from_config(config: &RoutesConfig) -> Self {
        Self::new(vec![
            Route::new(Intent::Schedule, config.schedule.keywords.clone()),
            Route::new(Intent::News, config.news.keywords.clone()),
            Route::new(Intent::Document, config.document.keywords.clone()),
        ])
    }

    pub fn dispatch(&self, text: &str) -> Intent {
        self.routes
            .iter()
            .find(|route| route.matches(text))
            .map(|route| route.intent)
            .unwrap_or(Intent::Conversation)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

impl Default for IntentDispatcher {
    fn default() -> Self {
        Self::from_config(&RoutesConfig::default())
    }
}
