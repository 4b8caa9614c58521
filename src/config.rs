use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime configuration.
///
/// Layered from built-in defaults, an optional `config.toml`, `SQLITE_ADMIN_*`
/// environment variables and finally a bare `PORT`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub loglevel: String,
    /// Secret for the private cookie jar; at least 64 bytes. A random key is
    /// generated per process when unset.
    pub cookie_secret: Option<String>,
    pub secure_cookie: bool,
    pub session_max_age_hours: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            loglevel: "info".to_string(),
            cookie_secret: None,
            secure_cookie: false,
            session_max_age_hours: 12,
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("SQLITE_ADMIN_"))
            .merge(Env::raw().only(&["PORT"]))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_sources() {
        Jail::expect_with(|_jail| {
            let cfg = Config::load()?;
            assert_eq!(cfg.port, 8080);
            assert_eq!(cfg.data_dir, PathBuf::from("./data"));
            assert!(cfg.cookie_secret.is_none());
            assert_eq!(cfg.listen_addr(), "0.0.0.0:8080");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_toml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                port = 9000
                data_dir = "/srv/dbs"
                loglevel = "debug"
                "#,
            )?;
            jail.set_env("SQLITE_ADMIN_LOGLEVEL", "warn");

            let cfg = Config::load()?;
            assert_eq!(cfg.port, 9000);
            assert_eq!(cfg.data_dir, PathBuf::from("/srv/dbs"));
            assert_eq!(cfg.loglevel, "warn");
            Ok(())
        });
    }

    #[test]
    fn bare_port_is_honored() {
        Jail::expect_with(|jail| {
            jail.set_env("PORT", "3000");
            let cfg = Config::load()?;
            assert_eq!(cfg.port, 3000);
            Ok(())
        });
    }
}
