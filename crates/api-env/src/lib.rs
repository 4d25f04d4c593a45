use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

pub const ENV_PREFIX: &str = "CATTRIX_";

const DEFAULT_WEB_HOST: &str = "127.0.0.1";
const DEFAULT_WEB_PORT: u16 = 5000;

pub fn filter_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

pub fn parse_optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match filter_empty(deserializer)? {
        Some(s) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// `CATTRIX_*` variables.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CattrixEnv {
    #[serde(default, deserialize_with = "filter_empty")]
    pub api_base: Option<String>,
    #[serde(default, deserialize_with = "filter_empty")]
    pub api_token: Option<String>,
    #[serde(default, deserialize_with = "parse_optional")]
    pub timeout_ms: Option<u64>,
    #[serde(default, deserialize_with = "filter_empty")]
    pub log_file: Option<String>,
}

/// The bot server's own bind address, shared through the same `.env`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct WebEnv {
    #[serde(default, deserialize_with = "filter_empty")]
    pub web_host: Option<String>,
    #[serde(default, deserialize_with = "parse_optional")]
    pub web_port: Option<u16>,
}

#[derive(Clone, Debug, Default)]
pub struct Env {
    pub cattrix: CattrixEnv,
    pub web: WebEnv,
}

impl Env {
    pub fn from_env() -> Result<Self, envy::Error> {
        Ok(Self {
            cattrix: envy::prefixed(ENV_PREFIX).from_env()?,
            web: envy::from_env()?,
        })
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();
        Ok(Self {
            cattrix: envy::prefixed(ENV_PREFIX).from_iter(vars.iter().cloned())?,
            web: envy::from_iter(vars)?,
        })
    }

    /// `CATTRIX_API_BASE` when set, otherwise the address the bot server binds to.
    /// A wildcard bind address is reached through loopback.
    pub fn api_base(&self) -> String {
        if let Some(base) = &self.cattrix.api_base {
            return base.trim().to_string();
        }

        let host = match self.web.web_host.as_deref().map(str::trim) {
            None | Some("0.0.0.0") | Some("::") | Some("[::]") => DEFAULT_WEB_HOST,
            Some(host) => host,
        };
        let port = self.web.web_port.unwrap_or(DEFAULT_WEB_PORT);

        if host.contains(':') && !host.starts_with('[') {
            format!("http://[{host}]:{port}")
        } else {
            format!("http://{host}:{port}")
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.cattrix.timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> Env {
        Env::from_vars(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
        .unwrap()
    }

    #[test]
    fn defaults_to_local_bot_server() {
        let env = env(&[]);
        assert_eq!(env.api_base(), "http://127.0.0.1:5000");
        assert_eq!(env.timeout(), None);
        assert!(env.cattrix.api_token.is_none());
    }

    #[test]
    fn explicit_base_wins() {
        let env = env(&[
            ("CATTRIX_API_BASE", "https://bot.example.com"),
            ("WEB_HOST", "10.0.0.2"),
            ("WEB_PORT", "8080"),
        ]);
        assert_eq!(env.api_base(), "https://bot.example.com");
    }

    #[test]
    fn derives_base_from_bind_address() {
        assert_eq!(
            env(&[("WEB_HOST", "0.0.0.0"), ("WEB_PORT", "8080")]).api_base(),
            "http://127.0.0.1:8080"
        );
        assert_eq!(
            env(&[("WEB_HOST", "bot.lan")]).api_base(),
            "http://bot.lan:5000"
        );
        assert_eq!(env(&[("WEB_HOST", "::1")]).api_base(), "http://[::1]:5000");
    }

    #[test]
    fn empty_values_are_unset() {
        let env = env(&[
            ("CATTRIX_API_BASE", ""),
            ("CATTRIX_API_TOKEN", "  "),
            ("CATTRIX_TIMEOUT_MS", ""),
            ("WEB_PORT", ""),
        ]);
        assert_eq!(env.api_base(), "http://127.0.0.1:5000");
        assert!(env.cattrix.api_token.is_none());
        assert!(env.timeout().is_none());
    }

    #[test]
    fn parses_timeout() {
        let env = env(&[("CATTRIX_TIMEOUT_MS", "2500")]);
        assert_eq!(env.timeout(), Some(Duration::from_millis(2500)));
    }

    #[test]
    fn rejects_bad_port() {
        let result = Env::from_vars([("WEB_PORT".to_string(), "http".to_string())]);
        assert!(result.is_err());
    }
}
