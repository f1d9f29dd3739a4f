mod controller;
mod options;

pub use controller::{BlockDialogController, DialogError, DialogState};
pub use options::DialogOptions;
