use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {env_var}")]
    MissingEnvVar { env_var: String },
    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

// Convert a configuration path like "provider.api_key" to its environment variable
pub fn to_env_var(field_path: &str) -> String {
    // Handle nested fields by converting dots to double underscores
    // If the field is in the provider object, we need to prefix it appropriately
    let normalized_path = if field_path == "api_key" {
        "provider.api_key".to_string()
    } else if field_path == "model" || field_path == "max_iterations" {
        format!("agent.{}", field_path)
    } else {
        field_path.to_string()
    };

    format!(
        "PONDER_{}",
        normalized_path.replace('.', "__").to_uppercase()
    )
}
