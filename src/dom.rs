use crate::models::{ActivityId, Kind};
use serde::Serialize;

pub trait Dom {
    fn show_form(&mut self);
    fn hide_form(&mut self);
    fn clear_fields(&mut self);
    /// Shows the field row belonging to `kind` and hides the other one.
    fn show_fields_for(&mut self, kind: Kind);
    /// Inserts a row directly below the form.
    fn insert_row(&mut self, id: &ActivityId, html: String);
    /// Returns false when no row carries `id`.
    fn remove_row(&mut self, id: &ActivityId) -> bool;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub id: ActivityId,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormState {
    pub visible: bool,
    pub kind: Kind,
    pub cleared: bool,
}

/// DOM stand-in that keeps rows in page order, newest first.
#[derive(Debug, Clone)]
pub struct HeadlessDom {
    form: FormState,
    rows: Vec<Row>,
}

impl Default for HeadlessDom {
    fn default() -> Self {
        Self {
            form: FormState {
                visible: false,
                kind: Kind::Running,
                cleared: true,
            },
            rows: Vec::new(),
        }
    }
}

impl HeadlessDom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, id: &ActivityId) -> Option<&Row> {
        self.rows.iter().find(|row| &row.id == id)
    }
}

impl Dom for HeadlessDom {
    fn show_form(&mut self) {
        self.form.visible = true;
        self.form.cleared = false;
    }

    fn hide_form(&mut self) {
        self.form.visible = false;
    }

    fn clear_fields(&mut self) {
        self.form.cleared = true;
    }

    fn show_fields_for(&mut self, kind: Kind) {
        self.form.kind = kind;
    }

    fn insert_row(&mut self, id: &ActivityId, html: String) {
        self.rows.insert(
            0,
            Row {
                id: id.clone(),
                html,
            },
        );
    }

    fn remove_row(&mut self, id: &ActivityId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| &row.id != id);
        self.rows.len() != before
    }
}
