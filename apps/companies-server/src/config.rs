use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use anyhow::{Context, Result};
use companies::{CompaniesConfig, PolicyConfig};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use gatekit::auth::{AuthConfig, JwtTokenVerifier};
use gatekit::telemetry::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Environment prefix for configuration overrides, e.g.
/// `APP__SERVER__BIND_ADDR=0.0.0.0:8080`.
pub const ENV_PREFIX: &str = "APP__";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,

    /// Buffered events per SSE subscriber before it starts lagging
    #[serde(default = "default_events_capacity")]
    pub events_capacity: usize,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 8087))
}

fn default_events_capacity() -> usize {
    256
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            events_capacity: default_events_capacity(),
        }
    }
}

/// Effective configuration of the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub companies: CompaniesConfig,
}

impl AppConfig {
    /// Layers built-in defaults, the optional YAML file and `APP__*`
    /// environment variables, later layers winning.
    ///
    /// # Errors
    /// Fails if the file cannot be read or any layer does not fit the schema.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.exists() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to load configuration")
    }

    /// Applies command-line overrides on top of the loaded layers.
    pub fn apply_cli_overrides(&mut self, port: Option<u16>, verbose: u8) {
        if let Some(port) = port {
            self.server.bind_addr.set_port(port);
        }
        let level = match verbose {
            0 => return,
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        level.clone_into(&mut self.logging.level);
    }

    /// Checks every section the server needs at startup, including that the
    /// verification key loads and both policy tables are complete.
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<()> {
        JwtTokenVerifier::from_config(&self.auth).context("invalid auth section")?;
        self.companies
            .validate()
            .context("invalid companies section")?;
        self.policy.evaluator().context("invalid policy section")?;
        Ok(())
    }

    /// Renders the configuration as YAML.
    ///
    /// # Errors
    /// Fails if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).context("failed to render configuration")
    }
}
