//! Edit surface state for one table.
//!
//! Tracks whether the dialog is open, whether it edits an existing row or
//! creates a new one, and the form values. A successful submit closes the
//! dialog and resets the form; a failed one leaves everything as entered.

use crate::service::{ConfigService, Notice, SaveOutcome};
use crate::tables::ConfigTable;

/// Outcome of submitting the dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub notice: Notice,
    pub outcome: Option<SaveOutcome>,
}

pub struct EditDialog<T: ConfigTable> {
    open: bool,
    editing_id: Option<String>,
    form: T::Form,
}

impl<T: ConfigTable> EditDialog<T> {
    /// A closed dialog with the empty form.
    pub fn new() -> Self {
        Self {
            open: false,
            editing_id: None,
            form: T::Form::default(),
        }
    }

    /// Open in create mode with the empty form.
    pub fn open_create(&mut self) {
        self.editing_id = None;
        self.form = T::Form::default();
        self.open = true;
    }

    /// Open in edit mode, prefilled from `record`.
    pub fn open_edit(&mut self, record: &T::Record) {
        self.editing_id = Some(T::record_id(record).to_string());
        self.form = T::form_from_record(record);
        self.open = true;
    }

    /// Open with values that were submitted elsewhere (e.g. over HTTP).
    pub fn restore(&mut self, editing_id: Option<String>, form: T::Form) {
        self.editing_id = editing_id;
        self.form = form;
        self.open = true;
    }

    /// Close and reset to the empty form.
    pub fn close(&mut self) {
        self.open = false;
        self.editing_id = None;
        self.form = T::Form::default();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn form(&self) -> &T::Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut T::Form {
        &mut self.form
    }

    pub fn title(&self) -> String {
        if self.is_editing() {
            format!("Edit {}", T::TITLE)
        } else {
            format!("Add {}", T::TITLE)
        }
    }

    /// Save the form through `service`.
    pub async fn submit(&mut self, service: &ConfigService<T>) -> Submission {
        let result = service.save(&self.form, self.editing_id.as_deref()).await;
        let notice = Notice::saved::<T>(&result);
        if result.is_ok() {
            self.close();
        }
        Submission {
            notice,
            outcome: result.ok(),
        }
    }
}

impl<T: ConfigTable> Default for EditDialog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ConfigTable> std::fmt::Debug for EditDialog<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditDialog")
            .field("table", &T::TABLE)
            .field("open", &self.open)
            .field("editing_id", &self.editing_id)
            .field("form", &self.form)
            .finish()
    }
}
