//! Values supplied through the process environment rather than the config file.

use std::fmt;
use std::path::PathBuf;

/// Login for the remote site. `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `PROXY`, `CHROMEPATH`, `SPIGOT_EMAIL` and `SPIGOT_PASSWORD`.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub proxy: Option<String>,
    pub chrome_path: Option<PathBuf>,
    pub credentials: Option<Credentials>,
}

impl Environment {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary lookup. Empty values count as unset; credentials
    /// are only present when both halves are.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let credentials = match (get("SPIGOT_EMAIL"), get("SPIGOT_PASSWORD")) {
            (Some(email), Some(password)) => Some(Credentials { email, password }),
            _ => None,
        };
        Self {
            proxy: get("PROXY"),
            chrome_path: get("CHROMEPATH").map(PathBuf::from),
            credentials,
        }
    }
}
