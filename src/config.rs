use std::env;
use std::fmt;
use std::net::SocketAddr;

use reqwest::Url;

use crate::error::{invalid_config_error, Error};

pub const DEFAULT_API_BASE: &str = "https://api.mapbox.com";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

/// Process-wide settings, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub listen_addr: SocketAddr,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("listen_addr", &self.listen_addr)
            .finish()
    }
}

impl Config {
    pub fn new(api_key: impl Into<String>, api_base: impl Into<String>) -> Result<Self, Error> {
        let api_base = api_base.into();
        check_api_base(&api_base)?;

        Ok(Self {
            api_key: api_key.into(),
            api_base,
            listen_addr: parse_addr(DEFAULT_LISTEN_ADDR)?,
        })
    }

    /// Reads `MAPBOX_API_KEY` (required), `MAPBOX_API_BASE` and
    /// `ROUTEFINDER_ADDR` from the environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| env::var(name))
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let api_key = lookup("MAPBOX_API_KEY")?;
        if api_key.trim().is_empty() {
            return Err(invalid_config_error("MAPBOX_API_KEY is empty"));
        }

        let api_base = lookup("MAPBOX_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.into());
        check_api_base(&api_base)?;

        let listen_addr = match lookup("ROUTEFINDER_ADDR") {
            Ok(addr) => parse_addr(&addr)?,
            Err(_) => parse_addr(DEFAULT_LISTEN_ADDR)?,
        };

        Ok(Self {
            api_key,
            api_base,
            listen_addr,
        })
    }
}

fn check_api_base(api_base: &str) -> Result<(), Error> {
    let url = Url::parse(api_base)
        .map_err(|err| invalid_config_error(&format!("MAPBOX_API_BASE {:?}: {}", api_base, err)))?;

    if url.cannot_be_a_base() {
        return Err(invalid_config_error(&format!(
            "MAPBOX_API_BASE {:?} cannot be a base url",
            api_base
        )));
    }

    Ok(())
}

fn parse_addr(addr: &str) -> Result<SocketAddr, Error> {
    addr.parse()
        .map_err(|_| invalid_config_error(&format!("bad listen address {:?}", addr)))
}

#[test]
fn from_lookup_applies_defaults() {
    let config = Config::from_lookup(|name| match name {
        "MAPBOX_API_KEY" => Ok("pk.test".into()),
        _ => Err(env::VarError::NotPresent),
    })
    .unwrap();

    assert_eq!(config.api_key, "pk.test");
    assert_eq!(config.api_base, DEFAULT_API_BASE);
    assert_eq!(config.listen_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
}

#[test]
fn from_lookup_requires_api_key() {
    let err = Config::from_lookup(|_| Err(env::VarError::NotPresent)).unwrap_err();

    assert_eq!(err.code, 1);
}

#[test]
fn from_lookup_rejects_bad_listen_address() {
    let err = Config::from_lookup(|name| match name {
        "MAPBOX_API_KEY" => Ok("pk.test".into()),
        "ROUTEFINDER_ADDR" => Ok("not an address".into()),
        _ => Err(env::VarError::NotPresent),
    })
    .unwrap_err();

    assert_eq!(err.code, 2);
}

#[test]
fn debug_output_redacts_api_key() {
    let config = Config::new("pk.secret", DEFAULT_API_BASE).unwrap();

    let printed = format!("{:?}", config);
    assert!(!printed.contains("pk.secret"));
    assert!(printed.contains("<redacted>"));
}

#[test]
fn from_lookup_rejects_bad_api_base() {
    for base in ["api.mapbox.com", "mailto:someone"] {
        let err = Config::from_lookup(|name| match name {
            "MAPBOX_API_KEY" => Ok("pk.test".into()),
            "MAPBOX_API_BASE" => Ok(base.into()),
            _ => Err(env::VarError::NotPresent),
        })
        .unwrap_err();

        assert_eq!(err.code, 2);
        assert!(err.message.contains("MAPBOX_API_BASE"));
    }
}

#[test]
fn new_rejects_bad_api_base() {
    assert_eq!(Config::new("pk.test", "not a url").unwrap_err().code, 2);
    assert!(Config::new("pk.test", "http://127.0.0.1:8080").is_ok());
}
