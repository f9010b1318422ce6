use bon::Builder;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_TABLE_NAME: &str = "kilometer-trips";
pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;

#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Config {
    #[builder(into, default = DEFAULT_TABLE_NAME.to_string())]
    pub table_name: String,

    /// Upper bound accepted for the `limit` query parameter.
    #[builder(default = DEFAULT_MAX_PAGE_SIZE)]
    pub max_page_size: usize,

    /// Report failures with their kind's status (400, 503 or 500) instead of
    /// answering every failure with a 500.
    #[builder(default)]
    pub kinded_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`; unset or malformed values keep their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let table_name = lookup("TABLE_NAME")
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string());

        let max_page_size = parse_setting(&lookup, "MAX_PAGE_SIZE", DEFAULT_MAX_PAGE_SIZE)
            .max(1);

        let kinded_errors = parse_setting(&lookup, "KINDED_ERRORS", false);

        Self::builder()
            .table_name(table_name)
            .max_page_size(max_page_size)
            .kinded_errors(kinded_errors)
            .build()
    }
}

fn parse_setting<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    match lookup(name) {
        Some(raw) => raw.trim().to_ascii_lowercase().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using {:?}", name, raw, default);
            default
        }),
        None => default,
    }
}
