use log::{warn, LevelFilter};
use serde::Deserialize;

pub const VERSION: &str = "0.1.0";
pub const KERNEL_VERSION: &str = "6.6.6-cyberdeck";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub role: String,
    pub location: String,
    pub bio: Vec<String>,
    pub links: Vec<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            name: "Netrunner".into(),
            role: "Software Engineer".into(),
            location: "Night City".into(),
            bio: vec![
                "Builds systems that survive contact with production.".into(),
                "Prefers strong types, small binaries and loud logs.".into(),
            ],
            links: vec!["https://github.com/".into()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TerminalConfig {
    pub user: String,
    pub hostname: String,
    pub os_name: String,
    pub kernel: String,
    pub profile: Profile,
    /// Seed for cosmetic numbers (memory, CPU, load). `None` lets the host pick one.
    pub seed: Option<u64>,
    pub log_level: String,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        TerminalConfig {
            user: "guest".into(),
            hostname: "cyberdeck".into(),
            os_name: format!("CyberDeck OS {} x86_64", VERSION),
            kernel: KERNEL_VERSION.into(),
            profile: Profile::default(),
            seed: None,
            log_level: "info".into(),
        }
    }
}

impl TerminalConfig {
    pub fn log_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    /// Parses host-supplied JSON. Empty input and parse failures yield the defaults.
    pub fn from_json(json: &str) -> Self {
        if json.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str(json) {
            Ok(config) => config,
            Err(e) => {
                warn!("config: invalid terminal config, using defaults: {}", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = TerminalConfig::from_json(r#"{"hostname":"deck","profile":{"name":"V"}}"#);
        assert_eq!(config.hostname, "deck");
        assert_eq!(config.user, "guest");
        assert_eq!(config.profile.name, "V");
        assert_eq!(config.profile.role, "Software Engineer");
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let config = TerminalConfig::from_json("[1, 2");
        assert_eq!(config.hostname, "cyberdeck");
        assert_eq!(config.seed, None);
        assert_eq!(config.log_filter(), LevelFilter::Info);
    }

    #[test]
    fn test_log_level() {
        let config = TerminalConfig::from_json(r#"{"logLevel":"debug"}"#);
        assert_eq!(config.log_filter(), LevelFilter::Debug);
        let config = TerminalConfig::from_json(r#"{"logLevel":"loud"}"#);
        assert_eq!(config.log_filter(), LevelFilter::Info);
    }
}
