use std::env;

use itemstore_core::storage::ReadErrorPolicy;

/// Repository configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Table the repository is bound to (default: "itemstore")
    pub table_name: String,
    /// AWS region (default: "us-east-1")
    pub region: String,
    /// Custom endpoint URL, for local DynamoDB
    pub endpoint_url: Option<String>,
    /// What reads and queries do on store failure (default: return empty)
    pub read_error_policy: ReadErrorPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TABLE_NAME` - Table name (default: "itemstore")
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    /// - `AWS_ENDPOINT_URL` - Use local DynamoDB (e.g., http://localhost:8000)
    /// - `READ_ERROR_POLICY` - `empty` or `propagate` (default: `empty`)
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            table_name: var("TABLE_NAME").unwrap_or_else(|| "itemstore".to_string()),
            region: var("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            endpoint_url: var("AWS_ENDPOINT_URL").filter(|url| !url.is_empty()),
            read_error_policy: var("READ_ERROR_POLICY")
                .and_then(|v| parse_policy(&v))
                .unwrap_or_default(),
        }
    }

    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({})", url),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }
}

/// Unknown values fall back to the default policy with a warning.
fn parse_policy(value: &str) -> Option<ReadErrorPolicy> {
    match value.parse() {
        Ok(policy) => Some(policy),
        Err(err) => {
            tracing::warn!(%err, "READ_ERROR_POLICY ignored, using the default policy");
            None
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = config_from(&[]);

        assert_eq!(config.table_name, "itemstore");
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.endpoint_url, None);
        assert_eq!(config.read_error_policy, ReadErrorPolicy::ReturnEmpty);
    }

    #[test]
    fn test_values_from_environment() {
        let config = config_from(&[
            ("TABLE_NAME", "payments"),
            ("AWS_REGION", "sa-east-1"),
            ("AWS_ENDPOINT_URL", "http://localhost:8000"),
            ("READ_ERROR_POLICY", "propagate"),
        ]);

        assert_eq!(config.table_name, "payments");
        assert_eq!(config.region, "sa-east-1");
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.read_error_policy, ReadErrorPolicy::Propagate);
    }

    #[test]
    fn test_unknown_policy_falls_back_to_default() {
        let config = config_from(&[("READ_ERROR_POLICY", "ignore")]);
        assert_eq!(config.read_error_policy, ReadErrorPolicy::ReturnEmpty);
    }

    #[test]
    fn test_target_display() {
        let local = config_from(&[("AWS_ENDPOINT_URL", "http://localhost:8000")]);
        assert_eq!(local.target_display(), "Local DynamoDB (http://localhost:8000)");

        let remote = config_from(&[("AWS_REGION", "eu-west-1")]);
        assert_eq!(remote.target_display(), "AWS DynamoDB (region: eu-west-1)");
    }
}
