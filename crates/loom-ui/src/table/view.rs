use std::rc::Rc;

use crate::control::{ControlId, ControlKind};
use crate::error::{user_bug, UsageError};
use crate::geometry::Size;
use crate::host::{HandleClass, Host, NativeHandle};
use crate::ui::Ui;

use super::column::{ColumnParams, Editable, ModelPart, SortIndicator, TextColumnParams, TextPart};
use super::model::TableModel;
use super::progress::{TimerEdge, PROGRESS_PERIOD, PROGRESS_TIMER};
use super::selection::{SelectionMode, TableSelection};
use super::{Metrics, Table, TableParams};

/// Minimum table size in dialog units.
const MIN_WIDTH_DLU: i32 = 107;
const MIN_HEIGHT_DLU: i32 = 14;

impl<H: Host> Ui<H> {
    /// Creates a table showing `params.model` and attaches it to the model.
    pub fn new_table(&mut self, params: TableParams) -> ControlId {
        if let Some(column) = params.row_background_color_column {
            let count = params.model.num_columns();
            if column >= count {
                user_bug(UsageError::ModelColumnOutOfRange { column, count });
            }
        }
        let model = Rc::clone(&params.model);
        let id = self.insert(ControlKind::Table(Box::new(Table::new(params))), HandleClass::Table);
        model.attach(id);
        id
    }

    pub(crate) fn table(&self, id: ControlId) -> &Table {
        match &self.node(id).kind {
            ControlKind::Table(t) => t,
            _ => user_bug(UsageError::WrongKind(id, "table")),
        }
    }

    pub(crate) fn table_mut(&mut self, id: ControlId) -> &mut Table {
        match &mut self.node_mut(id).kind {
            ControlKind::Table(t) => t,
            _ => user_bug(UsageError::WrongKind(id, "table")),
        }
    }

    pub(crate) fn table_metrics(&self, id: ControlId) -> Metrics {
        Metrics::new(&self.sizing(id))
    }

    pub fn table_model(&self, id: ControlId) -> Rc<TableModel> {
        Rc::clone(&self.table(id).model)
    }

    pub(crate) fn invalidate_table(&mut self, id: ControlId) {
        let handle = self.handle(id);
        self.host.invalidate(handle);
    }

    pub(crate) fn apply_timer_edge(&mut self, id: ControlId, edge: Option<TimerEdge>) {
        let handle = self.handle(id);
        match edge {
            Some(TimerEdge::Start) => {
                if let Err(err) = self.host.start_timer(handle, PROGRESS_TIMER, PROGRESS_PERIOD) {
                    log::error!("starting progress timer on {id:?} failed: {err:#}");
                }
            }
            Some(TimerEdge::Stop) => self.host.stop_timer(handle, PROGRESS_TIMER),
            None => {}
        }
    }

    // ── columns ───────────────────────────────────────────────────────────

    fn check_model_column(&self, id: ControlId, column: usize) {
        let count = self.table(id).model.num_columns();
        if column >= count {
            user_bug(UsageError::ModelColumnOutOfRange { column, count });
        }
    }

    fn check_table_column(&self, id: ControlId, column: usize) {
        let count = self.table(id).columns.len();
        if column >= count {
            user_bug(UsageError::TableColumnOutOfRange { column, count });
        }
    }

    fn append_column(&mut self, id: ControlId, mut column: ColumnParams) {
        for c in column.model_columns() {
            self.check_model_column(id, c);
        }
        let m = self.table_metrics(id);
        let name_width = self.host.text_width(self.handle(id), &column.name);
        column.width = (name_width + 4 * m.pad).max(2 * m.row_height);
        log::debug!("table {id:?}: appending column {:?} ({}px)", column.name, column.width);
        self.table_mut(id).columns.push(column);
        self.invalidate_table(id);
    }

    pub fn table_append_text_column(
        &mut self,
        id: ControlId,
        name: &str,
        text_column: usize,
        editable: Editable,
        params: TextColumnParams,
    ) {
        let mut c = ColumnParams::new(name, 0);
        c.text = Some(TextPart { column: text_column, editable, params });
        self.append_column(id, c);
    }

    pub fn table_append_image_column(&mut self, id: ControlId, name: &str, image_column: usize) {
        let mut c = ColumnParams::new(name, 0);
        c.image = Some(image_column);
        self.append_column(id, c);
    }

    pub fn table_append_image_text_column(
        &mut self,
        id: ControlId,
        name: &str,
        image_column: usize,
        text_column: usize,
        editable: Editable,
        params: TextColumnParams,
    ) {
        let mut c = ColumnParams::new(name, 0);
        c.image = Some(image_column);
        c.text = Some(TextPart { column: text_column, editable, params });
        self.append_column(id, c);
    }

    pub fn table_append_checkbox_column(
        &mut self,
        id: ControlId,
        name: &str,
        checkbox_column: usize,
        editable: Editable,
    ) {
        let mut c = ColumnParams::new(name, 0);
        c.checkbox = Some(ModelPart { column: checkbox_column, editable });
        self.append_column(id, c);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn table_append_checkbox_text_column(
        &mut self,
        id: ControlId,
        name: &str,
        checkbox_column: usize,
        checkbox_editable: Editable,
        text_column: usize,
        text_editable: Editable,
        params: TextColumnParams,
    ) {
        let mut c = ColumnParams::new(name, 0);
        c.checkbox = Some(ModelPart { column: checkbox_column, editable: checkbox_editable });
        c.text = Some(TextPart { column: text_column, editable: text_editable, params });
        self.append_column(id, c);
    }

    /// Model values are percentages; [`PROGRESS_INDETERMINATE`](super::PROGRESS_INDETERMINATE)
    /// shows an animated bar.
    pub fn table_append_progress_bar_column(
        &mut self,
        id: ControlId,
        name: &str,
        progress_column: usize,
    ) {
        let mut c = ColumnParams::new(name, 0);
        c.progress = Some(progress_column);
        self.append_column(id, c);
    }

    /// Clicking a clickable button calls `set_cell_value(row, button_column, None)`.
    pub fn table_append_button_column(
        &mut self,
        id: ControlId,
        name: &str,
        button_column: usize,
        clickable: Editable,
    ) {
        let mut c = ColumnParams::new(name, 0);
        c.button = Some(ModelPart { column: button_column, editable: clickable });
        self.append_column(id, c);
    }

    pub fn table_num_columns(&self, id: ControlId) -> usize {
        self.table(id).columns.len()
    }

    pub fn table_column_width(&self, id: ControlId, column: usize) -> i32 {
        self.check_table_column(id, column);
        self.table(id).columns[column].width
    }

    /// Resizes a column, committing any open edit first.
    pub fn table_set_column_width(&mut self, id: ControlId, column: usize, width: i32) {
        self.check_table_column(id, column);
        self.table_commit_edit(id);
        self.table_mut(id).columns[column].width = width.max(0);
        self.invalidate_table(id);
    }

    // ── header ────────────────────────────────────────────────────────────

    pub fn table_header_visible(&self, id: ControlId) -> bool {
        self.table(id).header_visible
    }

    pub fn table_set_header_visible(&mut self, id: ControlId, visible: bool) {
        self.table_commit_edit(id);
        let m = self.table_metrics(id);
        let table = self.table_mut(id);
        table.header_visible = visible;
        table.clamp_scroll(m);
        self.invalidate_table(id);
    }

    /// `f` receives the view column whose header was clicked.
    pub fn table_header_on_clicked(&mut self, id: ControlId, f: impl FnMut(usize) + 'static) {
        self.table_mut(id).on_header_clicked = Some(Box::new(f));
    }

    pub fn table_header_sort_indicator(&self, id: ControlId, column: usize) -> SortIndicator {
        self.check_table_column(id, column);
        self.table(id).columns[column].sort
    }

    pub fn table_header_set_sort_indicator(
        &mut self,
        id: ControlId,
        column: usize,
        sort: SortIndicator,
    ) {
        self.check_table_column(id, column);
        self.table_mut(id).columns[column].sort = sort;
        self.invalidate_table(id);
    }

    // ── callbacks ─────────────────────────────────────────────────────────

    pub fn table_on_row_clicked(&mut self, id: ControlId, f: impl FnMut(usize) + 'static) {
        self.table_mut(id).on_row_clicked = Some(Box::new(f));
    }

    pub fn table_on_row_double_clicked(&mut self, id: ControlId, f: impl FnMut(usize) + 'static) {
        self.table_mut(id).on_row_double_clicked = Some(Box::new(f));
    }

    /// Fires once per user gesture that changes the selection. Programmatic
    /// changes never fire it.
    pub fn table_on_selection_changed(&mut self, id: ControlId, f: impl FnMut() + 'static) {
        self.table_mut(id).on_selection_changed = Some(Box::new(f));
    }

    // ── selection ─────────────────────────────────────────────────────────

    pub fn table_selection_mode(&self, id: ControlId) -> SelectionMode {
        self.table(id).selection.mode()
    }

    pub fn table_set_selection_mode(&mut self, id: ControlId, mode: SelectionMode) {
        let table = self.table_mut(id);
        let rows = table.rows;
        table.selection.set_mode(mode, rows);
        self.invalidate_table(id);
    }

    pub fn table_selection(&self, id: ControlId) -> TableSelection {
        self.table(id).selection.snapshot()
    }

    pub fn table_set_selection(&mut self, id: ControlId, selection: &TableSelection) {
        let m = self.table_metrics(id);
        let table = self.table_mut(id);
        let rows = table.rows;
        table.selection.set_rows(selection.rows(), rows);
        if let Some(row) = table.selection.focused() {
            table.ensure_visible(row, m);
        }
        self.invalidate_table(id);
    }

    /// Reports a selection change from a user gesture, if there was one.
    pub(crate) fn table_selection_gesture_done(&mut self, id: ControlId) {
        let table = self.table_mut(id);
        if !table.selection.commit_change() {
            return;
        }
        if let Some(cb) = table.on_selection_changed.as_mut() {
            cb();
        }
        self.invalidate_table(id);
    }

    // ── sizing and lifetime ───────────────────────────────────────────────

    pub(crate) fn table_minimum_size(&self, id: ControlId) -> Size {
        let sizing = self.sizing(id);
        Size::new(sizing.dlu_to_x(MIN_WIDTH_DLU), sizing.dlu_to_y(MIN_HEIGHT_DLU))
    }

    pub(crate) fn table_resized(&mut self, id: ControlId, size: Size) {
        let m = self.table_metrics(id);
        let table = self.table_mut(id);
        table.size = size;
        table.clamp_scroll(m);
        self.invalidate_table(id);
    }

    /// Releases what a destroyed table still holds on the host and model.
    pub(crate) fn teardown_table(&mut self, id: ControlId, handle: NativeHandle, mut table: Table) {
        table.model.detach(id);
        if let Some(edit) = table.edit.take() {
            self.host.destroy_handle(edit.handle);
        }
        if table.progress.clear().is_some() && !handle.is_null() {
            self.host.stop_timer(handle, PROGRESS_TIMER);
        }
    }
}
