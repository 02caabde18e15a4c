//! Host address configuration

use clap::Parser;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref URL_HOST_REGEX: Regex =
        Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://(?:[^@/]*@)?([^/:?#]+)").unwrap();
}

/// Email configuration
#[derive(Clone, Default, Debug, Parser)]
pub struct EmailConfig {
    /// Administrator address used as the default sender (`addr` or `Name <addr>`)
    #[clap(long, env = "ADMIN_EMAIL")]
    pub admin_email: Option<String>,

    /// The absolute base URL of the site
    #[clap(long, env = "BASE_URL", default_value = "http://localhost/")]
    pub base_url: String,

    /// The site host, used for the `no-reply@<host>` fallback sender.
    /// Defaults to the host of the base URL.
    #[clap(long, env = "SITE_HOST")]
    pub site_host: Option<String>,
}

impl EmailConfig {
    /// The configured administrator address, if any
    pub fn admin_email(&self) -> Option<&str> {
        self.admin_email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    /// The base URL with a trailing slash
    pub fn absolute_base_url(&self) -> String {
        let base_url = self.base_url.trim();

        if base_url.is_empty() || base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        }
    }

    /// The site host, if it can be determined
    pub fn host(&self) -> Option<String> {
        self.site_host
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .or_else(|| {
                URL_HOST_REGEX
                    .captures(self.base_url.trim())
                    .map(|captures| captures[1].to_string())
            })
    }
}
