use std::net::IpAddr;
use std::path::Path;

use anyhow::Context;
use safeshelter_core::prelude::{NominatimConfig, OsrmConfig, SupabaseConfig};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub supabase: SupabaseConfig,
    pub routing: OsrmConfig,
    pub geocoding: NominatimConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub concurrency_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::from([0, 0, 0, 0]),
            port: 5000,
            request_timeout_secs: 30,
            concurrency_limit: 64,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_url: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "deepseek/deepseek-r1:free".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Config {
    /// Reads the TOML file if given, then applies environment overrides
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                Self::from_toml(&text)
                    .with_context(|| format!("parsing config file {}", path.display()))?
            }
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// `SUPABASE_URL`, `SUPABASE_KEY`, `OPENROUTER_API_KEY` and `PORT`
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(url) = var("SUPABASE_URL") {
            self.supabase.url = url;
        }
        if let Some(key) = var("SUPABASE_KEY") {
            self.supabase.key = key;
        }
        if let Some(key) = var("OPENROUTER_API_KEY") {
            self.chat.api_key = key;
        }
        if let Some(port) = var("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT value '{port}' is not a valid port"))?;
        }
        Ok(())
    }

    pub fn log(&self) {
        tracing::info!(
            bind = %self.server.bind,
            port = self.server.port,
            database = %display_or_unset(&self.supabase.url),
            routing = %self.routing.base_url,
            geocoding = %self.geocoding.base_url,
            chat_key = if self.chat.api_key.is_empty() { "unset" } else { "set" },
            "Configuration loaded"
        );
    }
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() { "<unset>" } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_public_services() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.routing.timeout_secs, 15);
        assert_eq!(config.geocoding.timeout_secs, 10);
        assert_eq!(config.supabase.fire_station_table, "brannstasjoner_agder");
        assert_eq!(config.chat.model, "deepseek/deepseek-r1:free");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 8080

            [routing]
            base_url = "http://localhost:5001"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.routing.base_url, "http://localhost:5001");
        assert_eq!(config.routing.timeout_secs, 15);
        assert_eq!(config.supabase.shelter_table, "tilfluktsrom");
    }

    #[test]
    fn environment_overrides_file() {
        let mut config = Config::from_toml("[supabase]\nurl = \"http://file\"\n").unwrap();
        config
            .apply_env(|name| match name {
                "SUPABASE_URL" => Some("http://env".to_string()),
                "SUPABASE_KEY" => Some("secret".to_string()),
                "PORT" => Some("6000".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.supabase.url, "http://env");
        assert_eq!(config.supabase.key, "secret");
        assert_eq!(config.server.port, 6000);
        assert!(config.chat.api_key.is_empty());
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_env(|name| (name == "PORT").then(|| "http".to_string()));
        assert!(result.is_err());
    }
}
