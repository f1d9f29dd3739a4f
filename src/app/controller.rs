use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    catalog::{BlockCatalog, CatalogError},
    domain::{BlockKind, BlockPayload},
    form::{CommandEffect, FormCommand, FormSession, SessionError, SubmitOutcome},
    store::{CommitListener, DocumentStore, Snapshot, StoreError},
};

use super::DialogOptions;

/// Where the block dialog currently is. Only one form session can be live.
#[derive(Debug, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Catalog,
    Editing(FormSession),
}

impl DialogState {
    pub fn is_open(&self) -> bool {
        !matches!(self, DialogState::Closed)
    }

    pub fn selected(&self) -> Option<BlockKind> {
        match self {
            DialogState::Editing(session) => Some(session.kind()),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            DialogState::Closed => "closed",
            DialogState::Catalog => "showing the catalog",
            DialogState::Editing(_) => "editing",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("cannot {operation} while the dialog is {state}")]
    InvalidTransition {
        operation: &'static str,
        state: &'static str,
    },
    #[error(transparent)]
    UnknownBlockType(#[from] CatalogError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Owns the dialog state machine and the document it commits into.
///
/// ```text
/// Closed --open--> Catalog --select_block--> Editing
/// Editing --cancel_selection--> Catalog
/// Editing --submit (valid)--> Closed
/// any --close--> Closed
/// ```
#[derive(Debug)]
pub struct BlockDialogController {
    catalog: Arc<BlockCatalog>,
    store: DocumentStore,
    state: DialogState,
    options: DialogOptions,
}

impl BlockDialogController {
    pub fn new(catalog: Arc<BlockCatalog>) -> Self {
        Self::with_options(catalog, DialogOptions::default())
    }

    pub fn with_options(catalog: Arc<BlockCatalog>, options: DialogOptions) -> Self {
        Self {
            catalog,
            store: DocumentStore::new(),
            state: DialogState::Closed,
            options,
        }
    }

    /// Continues an existing document instead of starting an empty one.
    pub fn with_store(mut self, store: DocumentStore) -> Self {
        self.store = store;
        self
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn catalog(&self) -> &BlockCatalog {
        &self.catalog
    }

    pub fn options(&self) -> &DialogOptions {
        &self.options
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    pub fn subscribe(&mut self, listener: Arc<dyn CommitListener>) {
        self.store.subscribe(listener);
    }

    pub fn session(&self) -> Option<&FormSession> {
        match &self.state {
            DialogState::Editing(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut FormSession> {
        match &mut self.state {
            DialogState::Editing(session) => Some(session),
            _ => None,
        }
    }

    pub fn open(&mut self) -> Result<(), DialogError> {
        match self.state {
            DialogState::Closed => {
                debug!("dialog opened");
                self.state = DialogState::Catalog;
                Ok(())
            }
            DialogState::Catalog => Ok(()),
            DialogState::Editing(_) => Err(self.invalid("open")),
        }
    }

    /// Starts a fresh session for `id`. Any live session is discarded first.
    ///
    /// An unknown id changes nothing: a live session stays live and the
    /// catalog stays shown.
    pub fn select_block(&mut self, id: &str) -> Result<&mut FormSession, DialogError> {
        if matches!(self.state, DialogState::Closed) {
            return Err(self.invalid("select a block"));
        }
        let descriptor = match self.catalog.get(id) {
            Ok(descriptor) => Arc::clone(descriptor),
            Err(err) => {
                warn!(id, %err, "block selection rejected");
                return Err(err.into());
            }
        };
        if let Some(previous) = self.state.selected() {
            debug!(%previous, "discarding session for new selection");
        }
        debug!(kind = %descriptor.kind(), "block selected");
        let session = FormSession::new(descriptor, Arc::clone(&self.options.clock))
            .with_auto_validate(self.options.auto_validate);
        self.state = DialogState::Editing(session);
        self.session_mut()
            .ok_or(DialogError::InvalidTransition {
                operation: "select a block",
                state: "closed",
            })
    }

    /// Drops the live session and returns to the catalog.
    pub fn cancel_selection(&mut self) -> Result<(), DialogError> {
        match &self.state {
            DialogState::Editing(session) => {
                debug!(kind = %session.kind(), "selection cancelled");
                self.state = DialogState::Catalog;
                Ok(())
            }
            DialogState::Catalog => Ok(()),
            DialogState::Closed => Err(self.invalid("cancel a selection")),
        }
    }

    pub fn close(&mut self) {
        if let Some(kind) = self.state.selected() {
            debug!(%kind, "dialog closed with uncommitted session");
        } else if self.state.is_open() {
            debug!("dialog closed");
        }
        self.state = DialogState::Closed;
    }

    /// Forwards an edit to the live session.
    pub fn dispatch(&mut self, command: FormCommand) -> Result<CommandEffect, DialogError> {
        let session = self
            .session_mut()
            .ok_or(DialogError::InvalidTransition {
                operation: "edit a form",
                state: "not editing",
            })?;
        Ok(session.dispatch(command)?)
    }

    /// Validates the live session; a valid payload is committed and the
    /// dialog closes, an invalid one keeps the session open with its errors.
    pub fn submit(&mut self) -> Result<SubmitOutcome, DialogError> {
        let Some(session) = self.session_mut() else {
            return Err(self.invalid("submit"));
        };
        let outcome = session.submit();
        if let SubmitOutcome::Committed(payload) = &outcome {
            self.on_form_committed(payload.clone())?;
        }
        Ok(outcome)
    }

    /// Stores a payload produced by the live session and closes the dialog.
    pub fn on_form_committed(&mut self, payload: BlockPayload) -> Result<usize, DialogError> {
        let Some(kind) = self.state.selected() else {
            return Err(self.invalid("commit a form"));
        };
        let index = self.store.append(kind, payload)?;
        info!(%kind, index, "dialog closed after commit");
        self.state = DialogState::Closed;
        Ok(index)
    }

    fn invalid(&self, operation: &'static str) -> DialogError {
        let state = self.state.name();
        warn!(operation, state, "invalid dialog transition");
        DialogError::InvalidTransition { operation, state }
    }
}
