use tracing::debug;

use super::{EntryKey, FormSession, SessionError, actions::FormCommand};

/// What a command produced, when it produced anything beyond a state change.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandEffect {
    None,
    EntryAdded(EntryKey),
    EntryRemoved(serde_json::Value),
    Moved(bool),
    LinkAttached(bool),
}

pub fn apply_command(
    session: &mut FormSession,
    command: FormCommand,
) -> Result<CommandEffect, SessionError> {
    match command {
        FormCommand::UpdateField { name, value } => {
            session.update_field(&name, value)?;
            Ok(CommandEffect::None)
        }
        FormCommand::SetStart(date) => {
            session.set_start(date)?;
            Ok(CommandEffect::None)
        }
        FormCommand::SetEnd(date) => {
            session.set_end(date)?;
            Ok(CommandEffect::None)
        }
        FormCommand::ClearEnd => {
            session.clear_end()?;
            Ok(CommandEffect::None)
        }
        FormCommand::SetOngoing(ongoing) => {
            session.set_ongoing(ongoing)?;
            Ok(CommandEffect::None)
        }
        FormCommand::AppendEntry { field } => session.append_entry(&field).map(CommandEffect::EntryAdded),
        FormCommand::RemoveEntry { field, key } => session
            .remove_entry(&field, key)
            .map(CommandEffect::EntryRemoved),
        FormCommand::UpdateEntry { field, key, value } => {
            session.update_entry(&field, key, value)?;
            Ok(CommandEffect::None)
        }
        FormCommand::MoveEntry { field, key, delta } => session
            .move_entry(&field, key, delta)
            .map(CommandEffect::Moved),
        FormCommand::AttachLink(url) => session.attach_link(&url).map(CommandEffect::LinkAttached),
    }
}

impl FormSession {
    /// Applies a command and logs rejected ones; the session is left
    /// unchanged when an error is returned.
    pub fn dispatch(&mut self, command: FormCommand) -> Result<CommandEffect, SessionError> {
        let kind = self.kind();
        apply_command(self, command).inspect_err(|err| {
            debug!(%kind, %err, "form command rejected");
        })
    }
}
