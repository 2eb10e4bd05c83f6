use regex::{Captures, Regex};
use std::env;
use std::sync::OnceLock;
use tracing::{debug, warn};

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{(\w+)\}|\$(\w+)").expect("placeholder pattern is valid"))
}

/// Result of substituting `${VAR}` / `$VAR` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substituted {
    pub content: String,
    /// Variables that were not set; their placeholders are kept verbatim
    pub missing: Vec<String>,
}

/// Substitute environment variables in the format ${VAR_NAME} or $VAR_NAME
pub fn substitute_env_vars(content: &str) -> Substituted {
    substitute_with(content, |name| env::var(name).ok())
}

/// Substitute placeholders using `lookup` to resolve variable names
pub fn substitute_with<F>(content: &str, lookup: F) -> Substituted
where
    F: Fn(&str) -> Option<String>,
{
    let mut missing = Vec::new();

    let replaced = placeholder_regex().replace_all(content, |caps: &Captures| {
        let whole = &caps[0];
        let Some(name) = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()) else {
            return whole.to_string();
        };

        match lookup(name) {
            Some(value) => {
                debug!("Substituting environment variable: {}", name);
                value
            }
            None => {
                warn!("Environment variable '{}' not set", name);
                if !missing.iter().any(|m| m == name) {
                    missing.push(name.to_string());
                }
                whole.to_string()
            }
        }
    });

    Substituted {
        content: replaced.into_owned(),
        missing,
    }
}

/// Names of placeholders still present in `content`
pub fn unresolved_env_vars(content: &str) -> Vec<String> {
    placeholder_regex()
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}
