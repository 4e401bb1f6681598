use std::io::Read;
use std::net::TcpStream;

use ssh2::Session;
use thiserror::Error;
use tracing::{debug, info};

use super::core::{CommandSession, ConnectionTarget, Connector};

#[derive(Debug, Error)]
pub enum SshError {
    #[error("TCP error: {0}")]
    TcpError(String),
    #[error("SSH error: {0}")]
    SshError(String),
    #[error("SSH authentication error: {0}")]
    SshAuthError(String),
    #[error("Command execution error: {0}")]
    CommandError(String),
}

/// Opens blocking `ssh2` sessions. Authenticates with a password when one is
/// configured and falls back to the local SSH agent otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct SshConnector;

impl Connector for SshConnector {
    type Session = SshClient;

    fn connect(&self, target: &ConnectionTarget) -> Result<SshClient, SshError> {
        SshClient::connect(target)
    }
}

pub struct SshClient {
    session: Session,
}

impl SshClient {
    pub fn connect(target: &ConnectionTarget) -> Result<Self, SshError> {
        info!("opening SSH session to {}", target);
        let tcp = TcpStream::connect((target.host.as_str(), target.port))
            .map_err(|e| SshError::TcpError(e.to_string()))?;
        let mut session = Session::new().map_err(|e| SshError::SshError(e.to_string()))?;
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| SshError::SshError(e.to_string()))?;
        match &target.password {
            Some(password) => session
                .userauth_password(&target.username, password)
                .map_err(|e| SshError::SshAuthError(e.to_string()))?,
            None => session
                .userauth_agent(&target.username)
                .map_err(|e| SshError::SshAuthError(e.to_string()))?,
        }
        if !session.authenticated() {
            return Err(SshError::SshAuthError("Authentication failed".to_string()));
        }
        Ok(Self { session })
    }
}

impl CommandSession for SshClient {
    fn execute_command(&mut self, command: &str) -> Result<String, SshError> {
        debug!("exec '{}'", command);
        let mut channel = self
            .session
            .channel_session()
            .map_err(|e| SshError::SshError(e.to_string()))?;
        channel
            .exec(command)
            .map_err(|e| SshError::CommandError(e.to_string()))?;
        let mut output = String::new();
        channel
            .read_to_string(&mut output)
            .map_err(|e| SshError::CommandError(e.to_string()))?;
        channel
            .wait_close()
            .map_err(|e| SshError::SshError(e.to_string()))?;
        let status = channel
            .exit_status()
            .map_err(|e| SshError::SshError(e.to_string()))?;
        if status != 0 {
            return Err(SshError::CommandError(format!(
                "'{command}' exited with status {status}"
            )));
        }
        Ok(output)
    }
}
