use serde::{Deserialize, Serialize};

/// Which response strategy answers a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Fixed link to the class/exam timetable
    Schedule,
    /// Text scraped from the news page
    News,
    /// Text extracted from the local PDF
    Document,
    /// Language-model completion (fallback)
    Conversation,
}

impl Intent {
    pub fn as_str(&self) -> &str {
        match self {
            Intent::Schedule => "schedule",
            Intent::News => "news",
            Intent::Document => "document",
            Intent::Conversation => "conversation",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
