use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents the different deployment environments available for the client.
#[derive(Clone, Default, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Local development environment.
    Local,
    /// Staging environment for pre-production testing.
    Staging,
    /// Production service.
    #[default]
    Production,
}

impl Environment {
    /// Returns the mailbox service URL associated with the environment.
    pub fn api_url(&self) -> String {
        match self {
            Environment::Local => "http://localhost:8025".to_string(),
            Environment::Staging => "https://staging.driftmail.app".to_string(),
            Environment::Production => "https://driftmail.app".to_string(),
        }
    }

    /// Returns the mail domain appended to local parts for display.
    pub fn mail_domain(&self) -> &'static str {
        match self {
            Environment::Local => "localhost",
            Environment::Staging => "staging.driftmail.app",
            Environment::Production => "driftmail.app",
        }
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            _ => Err(()),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "Local"),
            Environment::Staging => write!(f, "Staging"),
            Environment::Production => write!(f, "Production"),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment::{}, URL: {}", self, self.api_url())
    }
}
