//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;
use crate::infrastructure::llm::LLMConfig;

pub const DEFAULT_PORT: u16 = 5000;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub server: ServerConfig,
    pub line: LineConfig,
    pub llm: LLMConfig,
    pub routes: RoutesConfig,
    pub sheets: SheetsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// LINE channel credentials
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LineConfig {
    pub channel_access_token: Option<String>,
    pub channel_secret: Option<String>,
}

/// Keyword routes, checked in the order schedule, news, document
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RoutesConfig {
    pub schedule: ScheduleRoute,
    pub news: NewsRoute,
    pub document: DocumentRoute,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ScheduleRoute {
    pub keywords: Vec<String>,
    pub reply: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct NewsRoute {
    pub keywords: Vec<String>,
    pub url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DocumentRoute {
    pub keywords: Vec<String>,
    pub path: PathBuf,
    /// Fail the whole request when the PDF can't be read
    pub strict: bool,
}

/// Interaction log target
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SheetsConfig {
    pub credentials_file: Option<PathBuf>,
    pub spreadsheet_name: Option<String>,
    /// Skips the Drive name lookup when set
    pub spreadsheet_id: Option<String>,
}

fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for ScheduleRoute {
    fn default() -> Self {
        Self {
            keywords: keywords(&["เวลาเรียน", "ตารางเรียน", "ตารางสอบ", "schedule"]),
            reply: "คุณสามารถดูตารางเวลาได้ที่: https://regist.pn.psu.ac.th/".to_string(),
        }
    }
}

impl Default for NewsRoute {
    fn default() -> Self {
        Self {
            keywords: keywords(&["ข่าว", "ประกาศ", "news"]),
            url: "https://www.pn.psu.ac.th/".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for DocumentRoute {
    fn default() -> Self {
        Self {
            keywords: keywords(&["ไฟล์", "เอกสาร", "file"]),
            path: PathBuf::from("documents/regist.pdf"),
            strict: false,
        }
    }
}

impl LineConfig {
    pub fn channel_secret(&self) -> Option<&str> {
        self.channel_secret.as_deref().filter(|s| !s.is_empty())
    }

    pub fn channel_access_token(&self) -> Option<&str> {
        self.channel_access_token.as_deref().filter(|s| !s.is_empty())
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Defaults overlaid with environment variables
    pub fn load_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with variables from `var`
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_vars(var)?;
        Ok(config)
    }

    /// Overlay environment variables onto this config
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Overlay variables from any lookup (the process env in production)
    pub fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(token) = var("LINE_CHANNEL_ACCESS_TOKEN") {
            self.line.channel_access_token = Some(token);
        }
        if let Some(secret) = var("LINE_CHANNEL_SECRET") {
            self.line.channel_secret = Some(secret);
        }
        if let Some(path) = var("GOOGLE_CREDENTIALS_FILE") {
            self.sheets.credentials_file = Some(PathBuf::from(path));
        }
        if let Some(name) = var("SPREADSHEET_NAME") {
            self.sheets.spreadsheet_name = Some(name);
        }
        if let Some(id) = var("SPREADSHEET_ID") {
            self.sheets.spreadsheet_id = Some(id);
        }
        if let Some(url) = var("NEWS_URL") {
            self.routes.news.url = url;
        }
        if let Some(path) = var("DOCUMENT_PATH") {
            self.routes.document.path = PathBuf::from(path);
        }
        if let Some(host) = var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT={}", port)))?;
        }

        self.llm.apply_vars(&var);
        Ok(())
    }

    /// Check the settings the server cannot start without
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.line.channel_secret().is_none() {
            return Err(ConfigError::MissingField("LINE_CHANNEL_SECRET".to_string()));
        }
        if self.routes.news.url.is_empty() {
            return Err(ConfigError::InvalidValue("routes.news.url is empty".to_string()));
        }
        let all_keywords = self.routes.schedule.keywords.iter()
            .chain(&self.routes.news.keywords)
            .chain(&self.routes.document.keywords);
        for keyword in all_keywords {
            if keyword.is_empty() {
                return Err(ConfigError::InvalidValue("empty route keyword".to_string()));
            }
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.routes.schedule.keywords[0], "เวลาเรียน");
        assert!(!config.routes.document.strict);
        assert!(config.line.channel_secret().is_none());
    }

    #[test]
    fn test_env_overlay() {
        let mut config = Config::default();
        config.apply_vars(vars(&[
            ("LINE_CHANNEL_ACCESS_TOKEN", "token"),
            ("LINE_CHANNEL_SECRET", "secret"),
            ("GEMINI_API_KEY", "gem-key"),
            ("GOOGLE_CREDENTIALS_FILE", "/etc/bot/sa.json"),
            ("SPREADSHEET_NAME", "BotLog"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.line.channel_access_token(), Some("token"));
        assert_eq!(config.line.channel_secret(), Some("secret"));
        assert_eq!(config.llm.api_key(), Some("gem-key"));
        assert_eq!(config.sheets.credentials_file, Some(PathBuf::from("/etc/bot/sa.json")));
        assert_eq!(config.sheets.spreadsheet_name.as_deref(), Some("BotLog"));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_from_vars_starts_from_defaults() {
        let config = Config::from_vars(vars(&[
            ("LINE_CHANNEL_SECRET", "secret"),
            ("NEWS_URL", "https://example.ac.th/news"),
        ]))
        .unwrap();

        assert_eq!(config.line.channel_secret(), Some("secret"));
        assert_eq!(config.routes.news.url, "https://example.ac.th/news");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.routes.schedule.reply, Config::default().routes.schedule.reply);
        assert!(config.validate().is_ok());

        assert!(matches!(
            Config::from_vars(vars(&[("PORT", "")])),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_bad_port_rejected() {
        let mut config = Config::default();
        let result = config.apply_vars(vars(&[("PORT", "fifty")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_validate_requires_secret() {
        let mut config = Config::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingField(_))));

        config.line.channel_secret = Some("secret".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "server:\n  port: 9000\nroutes:\n  document:\n    strict: true\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.routes.document.strict);
        assert_eq!(config.routes.news.timeout_secs, 30);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, serde_yaml::to_string(&Config::default()).unwrap()).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.routes.schedule.reply, Config::default().routes.schedule.reply);
    }
}
