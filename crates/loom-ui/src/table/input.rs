use crate::control::{ControlId, ControlKind};
use crate::error::{user_bug, UsageError};
use crate::event::{EventResult, Key, Modifiers, TableEvent};
use crate::host::{Host, NativeHandle, TimerId};
use crate::ui::Ui;

use super::column::{CellPart, CellParts};
use super::model::TableModel;
use super::progress::{PROGRESS_INDETERMINATE, PROGRESS_TIMER};
use super::value::TableValue;
use super::RowHit;

impl<H: Host> Ui<H> {
    /// Feeds a host input event to a table.
    pub fn table_event(&mut self, id: ControlId, event: &TableEvent) -> EventResult {
        match *event {
            TableEvent::Click { x, y, modifiers } => {
                self.table_click(id, x, y, modifiers);
                EventResult::Consumed
            }
            TableEvent::DoubleClick { y, .. } => {
                let m = self.table_metrics(id);
                let table = self.table_mut(id);
                let RowHit::Row(row) = table.row_at(y, m) else {
                    return EventResult::Ignored;
                };
                if let Some(cb) = table.on_row_double_clicked.as_mut() {
                    cb(row);
                }
                EventResult::Consumed
            }
            TableEvent::KeyPress { key, modifiers } => self.table_key(id, key, modifiers),
            TableEvent::ScrollWheel { delta } => {
                self.table_commit_edit(id);
                let m = self.table_metrics(id);
                let table = self.table_mut(id);
                table.first_row = table.first_row.saturating_add_signed(delta as isize);
                table.clamp_scroll(m);
                self.invalidate_table(id);
                EventResult::Consumed
            }
            TableEvent::EditorFocusLost => {
                if self.table_commit_edit(id) {
                    EventResult::Consumed
                } else {
                    EventResult::Ignored
                }
            }
            TableEvent::ColumnResized { column, width } => {
                self.table_set_column_width(id, column, width);
                EventResult::Consumed
            }
        }
    }

    fn table_click(&mut self, id: ControlId, x: i32, y: i32, modifiers: Modifiers) {
        self.table_commit_edit(id);
        let m = self.table_metrics(id);
        let hit = self.table(id).row_at(y, m);
        let row = match hit {
            RowHit::Header => {
                let table = self.table_mut(id);
                let column = table.column_at(x);
                if let (Some(column), Some(cb)) = (column, table.on_header_clicked.as_mut()) {
                    cb(column);
                }
                return;
            }
            RowHit::Empty => {
                self.table_mut(id).selection.click_empty(modifiers);
                self.table_selection_gesture_done(id);
                return;
            }
            RowHit::Row(row) => row,
        };

        self.table_mut(id).selection.click(row, modifiers);
        self.table_selection_gesture_done(id);
        if let Some(cb) = self.table_mut(id).on_row_clicked.as_mut() {
            cb(row);
        }

        let table = self.table(id);
        let Some(column) = table.column_at(x) else {
            return;
        };
        let col = &table.columns[column];
        let part = CellParts::layout(col, table.cell_bounds(row, column, m), m.pad).hit(x, y);
        match part {
            Some(CellPart::Checkbox) => {
                let Some(cb) = col.checkbox else {
                    return;
                };
                if !cb.editable.resolve(&table.model, row) {
                    return;
                }
                let value = table.model.cell_value(row, cb.column);
                let checked = value.and_then(|v| v.as_int()).unwrap_or(0) != 0;
                table.model.set_cell_value(row, cb.column, Some(TableValue::Int(!checked as i32)));
                self.invalidate_table(id);
            }
            Some(CellPart::Button) => {
                let Some(button) = col.button else {
                    return;
                };
                if button.editable.resolve(&table.model, row) {
                    table.model.set_cell_value(row, button.column, None);
                    self.invalidate_table(id);
                }
            }
            Some(CellPart::Text) => {
                let editable = col.text.is_some_and(|t| t.editable.resolve(&table.model, row));
                if editable {
                    self.table_begin_edit(id, row, column);
                }
            }
            Some(CellPart::Image | CellPart::Progress) | None => {}
        }
    }

    fn table_key(&mut self, id: ControlId, key: Key, modifiers: Modifiers) -> EventResult {
        if self.table(id).edit.is_some() {
            return match key {
                Key::Enter => {
                    self.table_commit_edit(id);
                    EventResult::Consumed
                }
                Key::Escape => {
                    self.table_abort_edit(id);
                    EventResult::Consumed
                }
                _ => EventResult::Ignored,
            };
        }
        let m = self.table_metrics(id);
        let table = self.table_mut(id);
        let rows = table.rows;
        if !table.selection.key(key, modifiers, rows) {
            return EventResult::Ignored;
        }
        if let Some(row) = table.selection.focused() {
            table.ensure_visible(row, m);
        }
        self.table_selection_gesture_done(id);
        self.invalidate_table(id);
        EventResult::Consumed
    }

    /// Routes a host timer tick. Returns whether a table used it.
    pub fn timer_fired(&mut self, handle: NativeHandle, timer: TimerId) -> bool {
        let Some(id) = self.handle_for(handle) else {
            return false;
        };
        if timer != PROGRESS_TIMER || !matches!(self.node(id).kind, ControlKind::Table(_)) {
            return false;
        }
        self.table_mut(id).progress.tick();
        self.invalidate_table(id);
        true
    }

    // ── model notifications ───────────────────────────────────────────────

    /// Tells every table showing `model` that a row was inserted at `index`.
    /// The model must already report the new row count.
    pub fn table_model_row_inserted(&mut self, model: &TableModel, index: usize) {
        for view in model.views() {
            self.table_row_inserted(view, index);
        }
    }

    pub fn table_model_row_changed(&mut self, model: &TableModel, index: usize) {
        for view in model.views() {
            self.table_row_changed(view, index);
        }
    }

    /// Tells every table showing `model` that row `index` was removed. The
    /// model must already report the new row count.
    pub fn table_model_row_deleted(&mut self, model: &TableModel, index: usize) {
        for view in model.views() {
            self.table_row_deleted(view, index);
        }
    }

    fn check_row_count(&self, id: ControlId, op: &'static str, expected: usize) {
        let actual = self.table(id).model.num_rows();
        if actual != expected {
            user_bug(UsageError::RowCountMismatch { op, expected, actual });
        }
    }

    fn table_row_inserted(&mut self, id: ControlId, index: usize) {
        let old = self.table(id).rows;
        self.check_row_count(id, "row insert", old + 1);
        if index > old {
            user_bug(UsageError::RowOutOfRange { index, rows: old + 1 });
        }
        self.table_abort_edit(id);
        let table = self.table_mut(id);
        table.rows = old + 1;
        table.selection.row_inserted(index);
        table.progress.row_inserted(index);
        self.invalidate_table(id);
    }

    fn table_row_changed(&mut self, id: ControlId, index: usize) {
        let rows = self.table(id).rows;
        if index >= rows {
            user_bug(UsageError::RowOutOfRange { index, rows });
        }
        if self.table(id).edit.is_some_and(|e| e.row == index) {
            self.table_abort_edit(id);
        }
        self.refresh_progress(id, index);
        self.invalidate_table(id);
    }

    fn table_row_deleted(&mut self, id: ControlId, index: usize) {
        let old = self.table(id).rows;
        if index >= old {
            user_bug(UsageError::RowOutOfRange { index, rows: old });
        }
        self.check_row_count(id, "row delete", old - 1);
        self.table_abort_edit(id);
        let m = self.table_metrics(id);
        let table = self.table_mut(id);
        table.rows = old - 1;
        table.selection.row_deleted(index);
        let edge = table.progress.row_deleted(index);
        table.clamp_scroll(m);
        self.apply_timer_edge(id, edge);
        self.invalidate_table(id);
    }

    /// Re-reads the progress columns of one row.
    pub(crate) fn refresh_progress(&mut self, id: ControlId, row: usize) {
        let table = self.table(id);
        let cells: Vec<(usize, bool)> = table
            .columns
            .iter()
            .filter_map(|c| c.progress)
            .map(|c| {
                let value = table.model.cell_value(row, c).and_then(|v| v.as_int());
                (c, value == Some(PROGRESS_INDETERMINATE))
            })
            .collect();
        for (column, indeterminate) in cells {
            let edge = self.table_mut(id).progress.update(row, column, indeterminate);
            self.apply_timer_edge(id, edge);
        }
    }
}
