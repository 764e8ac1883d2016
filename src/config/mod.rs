mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{LogSettings, ServerSettings, Settings};

/// Default location of the configuration file, without extension.
pub const DEFAULT_CONFIG_PATH: &str = "config/default";

/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "PEERHUB_CONFIG";

/// Loads the configuration from `PEERHUB_CONFIG`, or the default file when
/// that variable is unset.
pub fn load_config() -> Result<Settings, ConfigError> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config_from(&path)
}

/// Loads the configuration file at `path`, then applies `PEERHUB__*`
/// environment overrides (e.g. `PEERHUB__SERVER__PORT=9000`).
///
/// The file and its `[server]` section are required.
pub fn load_config_from(path: &str) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name(path).required(true))
        .add_source(
            Environment::with_prefix("PEERHUB")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;
    let default = Settings::default();

    let server = partial
        .server
        .ok_or_else(|| ConfigError::NotFound("server".to_string()))?;

    Ok(Settings {
        server: ServerSettings {
            host: server.host.unwrap_or(default.server.host),
            port: server.port.unwrap_or(default.server.port),
        },
        log: LogSettings {
            level: partial
                .log
                .and_then(|l| l.level)
                .unwrap_or(default.log.level),
        },
    })
}
