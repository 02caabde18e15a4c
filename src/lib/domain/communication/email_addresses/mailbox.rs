//! Mailbox: an email address with an optional display name

use std::{fmt, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;

use super::{EmailAddress, EmailAddressError};

lazy_static! {
    static ref NAMED_MAILBOX_REGEX: Regex =
        Regex::new(r#"^\s*"?([^"<]*?)"?\s*<([^<>]+)>\s*$"#).unwrap();
}

/// An email address with an optional display name
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mailbox {
    /// The display name, e.g. `Site Admin`
    pub name: Option<String>,

    /// The address
    pub email: EmailAddress,
}

impl Mailbox {
    /// Create a new mailbox
    pub fn new(name: Option<String>, email: EmailAddress) -> Self {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Self { name, email }
    }
}

impl From<EmailAddress> for Mailbox {
    fn from(email: EmailAddress) -> Self {
        Self { name: None, email }
    }
}

/// Parses either `addr@host` or `Display Name <addr@host>`
impl FromStr for Mailbox {
    type Err = EmailAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match NAMED_MAILBOX_REGEX.captures(s) {
            Some(captures) => Ok(Self::new(
                Some(captures[1].to_string()),
                EmailAddress::new(&captures[2])?,
            )),
            None => Ok(EmailAddress::new(s)?.into()),
        }
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.email),
            None => write!(f, "{}", self.email),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_parse_bare_address() -> TestResult {
        let mailbox: Mailbox = "admin@example.com".parse()?;

        assert_eq!(mailbox.name, None);
        assert_eq!(mailbox.email.as_str(), "admin@example.com");

        Ok(())
    }

    #[test]
    fn test_parse_named_address() -> TestResult {
        let mailbox: Mailbox = "Site Admin <admin@example.com>".parse()?;

        assert_eq!(mailbox.name.as_deref(), Some("Site Admin"));
        assert_eq!(mailbox.email.as_str(), "admin@example.com");
        assert_eq!(mailbox.to_string(), "Site Admin <admin@example.com>");

        Ok(())
    }

    #[test]
    fn test_parse_quoted_name() -> TestResult {
        let mailbox: Mailbox = "\"Support Team\" <support@example.com>".parse()?;

        assert_eq!(mailbox.name.as_deref(), Some("Support Team"));

        Ok(())
    }

    #[test]
    fn test_parse_empty_name_is_dropped() -> TestResult {
        let mailbox: Mailbox = "<admin@example.com>".parse()?;

        assert_eq!(mailbox.name, None);
        assert_eq!(mailbox.to_string(), "admin@example.com");

        Ok(())
    }

    #[test]
    fn test_parse_invalid_address_fails() {
        let result = "Site Admin <not an address>".parse::<Mailbox>();

        assert!(matches!(result, Err(EmailAddressError::InvalidEmailAddress)));
    }
}
