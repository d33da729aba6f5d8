use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// File looked up in the working directory.
pub const CONFIG_FILE: &str = "squad.toml";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// SQLite file holding all schedules
    pub database_path: String,
    /// Default tracing filter when `SQUAD_LOG` is unset
    pub log_level: String,
    /// Days after today covered by `list` without explicit bounds
    pub list_window_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "squad.db".to_string(),
            log_level: "warn".to_string(),
            list_window_days: 30,
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("SQUAD_").ignore(&["log"]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            assert_eq!(Config::new()?, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                database_path = "team.db"
                list_window_days = 14
                "#,
            )?;
            jail.set_env("SQUAD_LIST_WINDOW_DAYS", "7");

            let config = Config::new()?;
            assert_eq!(config.database_path, "team.db");
            assert_eq!(config.list_window_days, 7);
            assert_eq!(config.log_level, "warn");
            Ok(())
        });
    }

    #[test]
    fn test_log_filter_env_is_not_a_setting() {
        Jail::expect_with(|jail| {
            jail.set_env("SQUAD_LOG", "debug");
            assert_eq!(Config::new()?.log_level, "warn");
            Ok(())
        });
    }
}
