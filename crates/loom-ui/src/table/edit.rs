use crate::control::ControlId;
use crate::host::{HandleClass, Host, NativeHandle};
use crate::ui::Ui;

use super::column::CellParts;
use super::value::TableValue;

/// An overlay edit control open over one text cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EditSession {
    pub row: usize,
    pub column: usize,
    pub handle: NativeHandle,
}

impl<H: Host> Ui<H> {
    /// Cell being edited, as `(row, view column)`.
    pub fn table_editing(&self, id: ControlId) -> Option<(usize, usize)> {
        self.table(id).edit.map(|e| (e.row, e.column))
    }

    /// Opens an edit control over the text part of a cell, seeded with the
    /// model's current text.
    pub(crate) fn table_begin_edit(&mut self, id: ControlId, row: usize, column: usize) {
        self.table_commit_edit(id);
        let m = self.table_metrics(id);
        let table = self.table(id);
        let col = &table.columns[column];
        let Some(text) = col.text else {
            return;
        };
        let cell = table.cell_bounds(row, column, m);
        let Some(bounds) = CellParts::layout(col, cell, m.pad).text else {
            return;
        };
        let value = table.model.cell_value(row, text.column);
        let seed = value.as_ref().and_then(TableValue::as_str).unwrap_or_default().to_owned();

        let parent = self.handle(id);
        let handle = self.create_handle(&HandleClass::Edit, Some(parent));
        if handle.is_null() {
            return;
        }
        self.host.move_resize(handle, bounds);
        self.host.set_text(handle, &seed);
        self.host.set_focus(handle);
        self.table_mut(id).edit = Some(EditSession { row, column, handle });
        log::debug!("editing cell ({row}, {column}) of {id:?}");
    }

    /// Writes the edit control's text to the model and closes it. Returns
    /// whether an edit was open.
    pub(crate) fn table_commit_edit(&mut self, id: ControlId) -> bool {
        let Some(edit) = self.table_mut(id).edit.take() else {
            return false;
        };
        let text = self.host.text(edit.handle);
        let table = self.table(id);
        if let Some(part) = table.columns[edit.column].text {
            table.model.set_cell_value(edit.row, part.column, Some(TableValue::String(text)));
        }
        self.host.destroy_handle(edit.handle);
        self.invalidate_table(id);
        true
    }

    /// Closes the edit control without touching the model.
    pub(crate) fn table_abort_edit(&mut self, id: ControlId) {
        if let Some(edit) = self.table_mut(id).edit.take() {
            log::debug!("discarding edit of cell ({}, {}) of {id:?}", edit.row, edit.column);
            self.host.destroy_handle(edit.handle);
            self.invalidate_table(id);
        }
    }
}
