use std::collections::HashMap;
use std::env;
use std::fmt::Debug;
use std::str::FromStr;
use tracing::error;

/// Gets an environment variable or returns a default value if not found or cannot be parsed
///
/// # Arguments
///
/// * `env_var` - The name of the environment variable
/// * `default` - The default value to use if the environment variable is not found or cannot be parsed
///
/// # Returns
///
/// The parsed value of the environment variable or the default value
pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|_| {
            error!("Failed to parse {}: {}, using default", env_var, val);
            default
        }),
        Err(_) => default,
    }
}

/// Gets an environment variable and parses it, returning None if not found or invalid
pub fn get_env_or_none<T: FromStr>(env_var: &str) -> Option<T>
where
    <T as FromStr>::Err: Debug,
{
    env::var(env_var).ok().and_then(|val| val.parse::<T>().ok())
}

/// Reads a boolean flag, accepting `1/0`, `true/false`, `yes/no` and `on/off`
pub fn get_env_flag(env_var: &str, default: bool) -> bool {
    match env::var(env_var) {
        Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            other => {
                error!("Failed to parse {} as a flag: {}, using default", env_var, other);
                default
            }
        },
        Err(_) => default,
    }
}

/// Parses a header list written as `Name: value; Other-Name: value`
///
/// Entries without a colon or with an empty name are skipped.
pub fn parse_header_list(raw: &str) -> HashMap<String, String> {
    raw.split(';')
        .filter_map(|entry| {
            let (name, value) = entry.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}
