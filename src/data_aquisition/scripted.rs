//! In-memory connector answering show-commands from canned output.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use super::{
    core::{CommandSession, ConnectionTarget, Connector},
    ssh::SshError,
};

/// Every command issued through a scripted session, plus the number of
/// sessions opened, shared with the test that built the connector.
#[derive(Debug, Default)]
pub struct Journal {
    pub connects: usize,
    pub commands: Vec<String>,
}

#[derive(Clone, Default)]
pub struct ScriptedConnector {
    replies: Rc<HashMap<String, String>>,
    refuse: bool,
    journal: Rc<RefCell<Journal>>,
}

impl ScriptedConnector {
    pub fn new<I, C, O>(replies: I) -> Self
    where
        I: IntoIterator<Item = (C, O)>,
        C: Into<String>,
        O: Into<String>,
    {
        Self {
            replies: Rc::new(
                replies
                    .into_iter()
                    .map(|(c, o)| (c.into(), o.into()))
                    .collect(),
            ),
            refuse: false,
            journal: Rc::default(),
        }
    }

    /// A connector whose sessions can never be established.
    pub fn unreachable() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    pub fn journal(&self) -> Rc<RefCell<Journal>> {
        Rc::clone(&self.journal)
    }
}

impl Connector for ScriptedConnector {
    type Session = ScriptedSession;

    fn connect(&self, target: &ConnectionTarget) -> Result<ScriptedSession, SshError> {
        if self.refuse {
            return Err(SshError::TcpError(format!("{} unreachable", target.host)));
        }
        self.journal.borrow_mut().connects += 1;
        Ok(ScriptedSession {
            replies: Rc::clone(&self.replies),
            journal: Rc::clone(&self.journal),
        })
    }
}

pub struct ScriptedSession {
    replies: Rc<HashMap<String, String>>,
    journal: Rc<RefCell<Journal>>,
}

impl CommandSession for ScriptedSession {
    fn execute_command(&mut self, command: &str) -> Result<String, SshError> {
        self.journal.borrow_mut().commands.push(command.to_string());
        self.replies
            .get(command)
            .cloned()
            .ok_or_else(|| SshError::CommandError(format!("no reply scripted for '{command}'")))
    }
}
