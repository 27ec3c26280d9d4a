use serde::Deserialize;
use std::env;

use crate::chat::UserId;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiceConfig {
    /// Fixed seed for the shared roller; seeded from the clock when unset.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    /// Identity the relay posts replies under. Messages from it are ignored.
    #[serde(default = "UserId::new")]
    pub bot_user_id: UserId,
}

fn default_command_prefix() -> String {
    "!6d6".to_string()
}

impl Default for DiceConfig {
    fn default() -> Self {
        Self { seed: None, command_prefix: default_command_prefix(), bot_user_id: UserId::new() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub dice: DiceConfig,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = env::var("RUN_ENV").unwrap_or_else(|_| "local".into());

        let builder = ::config::Config::builder()
            .add_source(config::File::with_name("config/default.toml"))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::File::with_name("config/local.toml").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_applies_dice_defaults() {
        let config: Config = ::config::Config::builder()
            .add_source(config::File::from_str(
                "[server]\naddr = \"127.0.0.1:3000\"\n[logging]\nlevel = \"info\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.addr, "127.0.0.1:3000");
        assert_eq!(config.dice.seed, None);
        assert_eq!(config.dice.command_prefix, "!6d6");
    }

    #[test]
    fn test_deserialize_dice_overrides() {
        let config: Config = ::config::Config::builder()
            .add_source(config::File::from_str(
                "[server]\naddr = \"0.0.0.0:0\"\n[logging]\nlevel = \"debug\"\n[dice]\nseed = 42\ncommand_prefix = \"!roll\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.dice.seed, Some(42));
        assert_eq!(config.dice.command_prefix, "!roll");
    }
}
