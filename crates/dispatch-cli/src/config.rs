//! CLI configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Default tracing directive. `RUST_LOG` directives take precedence.
    pub log_directive: String,
    pub pretty: bool,
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_directive: "dispatch=info".to_string(),
            pretty: true,
            seed: 42,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_directive: lookup("DISPATCH_LOG")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.log_directive),
            pretty: lookup("DISPATCH_PRETTY")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(defaults.pretty),
            seed: lookup("DISPATCH_SEED")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.seed),
        }
    }

    /// Filter directives in increasing precedence: configured default first,
    /// then `rust_log`. A later directive for the same target replaces an
    /// earlier one.
    pub fn log_directives(&self, rust_log: Option<&str>) -> Vec<String> {
        [Some(self.log_directive.as_str()), rust_log]
            .into_iter()
            .flatten()
            .flat_map(|spec| spec.split(','))
            .map(str::trim)
            .filter(|directive| !directive.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
