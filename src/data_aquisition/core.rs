use std::fmt::Display;

use crate::error::ReaderError;

use super::ssh::SshError;

pub const DEFAULT_SSH_PORT: u16 = 22;

/// Everything needed to open a management session to one switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub username: String,
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
}

impl ConnectionTarget {
    /// Parses a `user@host` connection string. Only the first `@` separates the
    /// user from the host.
    pub fn parse(descriptor: &str) -> Result<Self, ReaderError> {
        let (username, host) = descriptor.split_once('@').ok_or_else(|| {
            ReaderError::Config(format!(
                "connection string '{descriptor}' is not of the form user@device"
            ))
        })?;
        if username.is_empty() {
            return Err(ReaderError::Config(format!(
                "connection string '{descriptor}' has an empty user"
            )));
        }
        if host.is_empty() {
            return Err(ReaderError::Config(format!(
                "connection string '{descriptor}' has an empty device"
            )));
        }
        Ok(Self {
            username: username.to_string(),
            host: host.to_string(),
            port: DEFAULT_SSH_PORT,
            password: None,
        })
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }
}

impl Display for ConnectionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}:{}", self.username, self.host, self.port)
    }
}

/// An open session able to run one show-command at a time.
pub trait CommandSession {
    fn execute_command(&mut self, command: &str) -> Result<String, SshError>;
}

/// Opens sessions. Implemented over SSH for real switches and by an
/// in-memory script in tests.
pub trait Connector {
    type Session: CommandSession;

    fn connect(&self, target: &ConnectionTarget) -> Result<Self::Session, SshError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_descriptor() {
        let target = ConnectionTarget::parse("admin@10.0.0.1").unwrap();
        assert_eq!(target.username, "admin");
        assert_eq!(target.host, "10.0.0.1");
        assert_eq!(target.port, DEFAULT_SSH_PORT);
        assert_eq!(target.password, None);
    }

    #[test]
    fn test_parse_descriptor_without_separator() {
        let result = ConnectionTarget::parse("admin");
        assert!(matches!(result, Err(ReaderError::Config(_))));
    }

    #[test]
    fn test_parse_descriptor_splits_on_first_separator() {
        let target = ConnectionTarget::parse("admin@jump@n9k-a").unwrap();
        assert_eq!(target.username, "admin");
        assert_eq!(target.host, "jump@n9k-a");
    }

    #[test]
    fn test_parse_descriptor_empty_parts() {
        assert!(matches!(
            ConnectionTarget::parse("@n9k-a"),
            Err(ReaderError::Config(_))
        ));
        assert!(matches!(
            ConnectionTarget::parse("admin@"),
            Err(ReaderError::Config(_))
        ));
    }

    #[test]
    fn test_target_options() {
        let target = ConnectionTarget::parse("admin@n9k-a")
            .unwrap()
            .with_port(2222)
            .with_password(Some("secret".to_string()));
        assert_eq!(target.port, 2222);
        assert_eq!(target.password.as_deref(), Some("secret"));
        assert_eq!(target.to_string(), "admin@n9k-a:2222");
    }
}
