use std::{fmt::Debug, path::PathBuf, str::FromStr};

use anyhow::Context;
use getset::{CopyGetters, Getters};
use serde::Deserialize;
use url::Url;

use crate::api::{UserToken, DEFAULT_GAME_VERSION};

/// Settings read from a TOML file.  Every key may be omitted.
#[derive(Clone, Default, PartialEq, Eq, Debug, Deserialize, Getters, CopyGetters)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[getset(get = "pub")]
    base_url: Option<Url>,
    #[getset(get = "pub")]
    token: Option<UserToken>,
    #[getset(get_copy = "pub")]
    version: Option<u32>,
}

impl Config {
    pub fn load<P: Into<PathBuf> + Debug>(path: P) -> anyhow::Result<Self> {
        let path = path.into();
        (|| -> anyhow::Result<Self> { fs_err::read_to_string(&path)?.parse() })()
            .with_context(|| format!("While trying to parse {path:?} as a config file"))
    }

    pub fn game_version(&self) -> u32 {
        self.version.unwrap_or(DEFAULT_GAME_VERSION)
    }
}

impl FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{UserToken, DEFAULT_GAME_VERSION};

    use super::Config;

    #[test]
    fn parse_full_config() {
        let config: Config = r#"
            base_url = "http://localhost:8080/api/v0/"
            token = "abcdef"
            version = 23000
        "#
        .parse()
        .unwrap();
        assert_eq!(
            config.base_url().as_ref().map(|x| x.as_str()),
            Some("http://localhost:8080/api/v0/")
        );
        assert_eq!(config.token(), &Some(UserToken::from("abcdef".to_owned())));
        assert_eq!(config.game_version(), 23000);
    }

    #[test]
    fn parse_empty_config() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.game_version(), DEFAULT_GAME_VERSION);
    }

    #[test]
    fn reject_bad_config() {
        assert!("tokn = \"x\"".parse::<Config>().is_err());
        assert!("base_url = \"not a url\"".parse::<Config>().is_err());
        assert!("version = \"24000\"".parse::<Config>().is_err());
        assert!(Config::load("/nonexistent/maimai-lxns.toml").is_err());
    }
}
