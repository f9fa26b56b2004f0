//! URL rules and page markers of the remote site.
//!
//! These are the whole integration contract with SpigotMC: the login page,
//! the element that only renders once the Cloudflare challenge has passed, and
//! how a versioned download link is formed.

use anyhow::{Context, Result};
use url::Url;

/// Username field of the login form. Doubles as the anti-bot gate marker.
pub const LOGIN_MARKER: &str = "#ctrl_pageLogin_login";

#[derive(Debug, Clone)]
pub struct Site {
    base: Url,
}

impl Site {
    pub fn parse(base: &str) -> Result<Self> {
        let base = Url::parse(base).with_context(|| format!("invalid site_url '{base}'"))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("site_url '{base}' cannot be used as a base URL");
        }
        Ok(Self { base })
    }

    fn with_segments(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn login_url(&self) -> Url {
        self.with_segments(&["login"])
    }

    /// `<base>/resources/<resource>/download?version=<version>`
    pub fn download_url(&self, resource: &str, version: &str) -> Url {
        let mut url = self.with_segments(&["resources", resource, "download"]);
        url.query_pairs_mut().append_pair("version", version);
        url
    }
}
