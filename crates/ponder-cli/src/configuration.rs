use crate::error::{to_env_var, ConfigError};
use config::{Config, Environment};
use ponder::agent::{AgentConfig, DEFAULT_MAX_ITERATIONS, DEFAULT_MODEL};
use ponder::providers::configs::{OpenAiProviderConfig, OPENAI_HOST};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_host")]
    pub host: String,
    pub api_key: String,
}

impl ProviderSettings {
    pub fn into_config(self) -> OpenAiProviderConfig {
        OpenAiProviderConfig::new(self.host, self.api_key)
    }
}

#[derive(Debug, Deserialize)]
pub struct AgentSettings {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default)]
    pub parallel_tool_calls: bool,
}

impl AgentSettings {
    pub fn into_config(self) -> AgentConfig {
        AgentConfig {
            model: self.model,
            max_iterations: self.max_iterations,
            parallel_tool_calls: self.parallel_tool_calls,
        }
    }
}

/// Values given on the command line; they win over everything else
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub host: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub max_iterations: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub provider: ProviderSettings,
    pub agent: AgentSettings,
}

impl Settings {
    /// Load defaults, then `OPENAI_API_KEY`, then `PONDER_*` variables, then overrides
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("provider.host", default_host())?
            .set_default("agent.model", default_model())?
            .set_default("agent.max_iterations", default_max_iterations() as i64)?
            .set_default("agent.parallel_tool_calls", false)?;

        if let Ok(api_key) = env::var("OPENAI_API_KEY") {
            builder = builder.set_default("provider.api_key", api_key)?;
        }

        let config = builder
            .add_source(
                Environment::with_prefix("PONDER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("provider.host", overrides.host.clone())?
            .set_override_option("provider.api_key", overrides.api_key.clone())?
            .set_override_option("agent.model", overrides.model.clone())?
            .set_override_option(
                "agent.max_iterations",
                overrides.max_iterations.map(|n| n as i64),
            )?
            .build()?;

        let result: Result<Self, config::ConfigError> = config.try_deserialize();

        match result {
            Ok(settings) => Ok(settings),
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);

                let error_str = err.to_string();
                if let Some(rest) = error_str.split("missing field `").nth(1) {
                    // Extract field name from error message "missing field `api_key`"
                    let field = rest.split('`').next().unwrap_or_default();
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else if let config::ConfigError::NotFound(field) = &err {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else {
                    Err(ConfigError::Other(err))
                }
            }
        }
    }
}

fn default_host() -> String {
    OPENAI_HOST.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}
