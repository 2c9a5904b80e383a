//! Virtualized table view over an application-supplied [`TableModel`].
//!
//! The view keeps only its row count, column setup, selection and scroll
//! position. Cell values are fetched from the model for the rows being
//! painted or clicked, never cached.

mod column;
mod draw;
mod edit;
mod input;
mod model;
mod progress;
mod selection;
mod value;
mod view;

use std::ops::Range;
use std::rc::Rc;

pub use column::{Editable, SortIndicator, TextColumnParams};
pub use model::{TableModel, TableModelHandler};
pub use progress::PROGRESS_INDETERMINATE;
pub use selection::{SelectionMode, TableSelection};
pub use value::{Image, TableValue, TableValueType};

use crate::geometry::{Bounds, Size, Sizing};

use column::ColumnParams;
use edit::EditSession;
use progress::Indeterminate;
use selection::Selection;

/// Construction parameters for [`Ui::new_table`](crate::Ui::new_table).
#[derive(Debug, Clone)]
pub struct TableParams {
    pub model: Rc<TableModel>,
    /// Model column holding a `Color` to paint behind each unselected row.
    pub row_background_color_column: Option<usize>,
}

impl TableParams {
    pub fn new(model: Rc<TableModel>) -> Self {
        Self { model, row_background_color_column: None }
    }

    pub fn row_background_color_column(mut self, column: usize) -> Self {
        self.row_background_color_column = Some(column);
        self
    }
}

type RowCallback = Box<dyn FnMut(usize)>;

/// Pixel metrics derived from the table's font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Metrics {
    pub row_height: i32,
    pub header_height: i32,
    pub pad: i32,
}

impl Metrics {
    pub fn new(sizing: &Sizing) -> Self {
        Self {
            row_height: sizing.dlu_to_y(12).max(1),
            header_height: sizing.dlu_to_y(14),
            pad: sizing.dlu_to_x(2),
        }
    }
}

/// What a point in the table's client area lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowHit {
    Header,
    Row(usize),
    Empty,
}

pub(crate) struct Table {
    pub model: Rc<TableModel>,
    pub row_background: Option<usize>,
    pub columns: Vec<ColumnParams>,
    /// Row count as of the last notification.
    pub rows: usize,
    pub header_visible: bool,
    pub selection: Selection,
    pub edit: Option<EditSession>,
    pub progress: Indeterminate,
    /// First row shown under the header.
    pub first_row: usize,
    pub size: Size,
    pub on_row_clicked: Option<RowCallback>,
    pub on_row_double_clicked: Option<RowCallback>,
    pub on_header_clicked: Option<RowCallback>,
    pub on_selection_changed: Option<Box<dyn FnMut()>>,
}

impl Table {
    fn new(params: TableParams) -> Self {
        let rows = params.model.num_rows();
        Self {
            model: params.model,
            row_background: params.row_background_color_column,
            columns: Vec::new(),
            rows,
            header_visible: true,
            selection: Selection::default(),
            edit: None,
            progress: Indeterminate::default(),
            first_row: 0,
            size: Size::zero(),
            on_row_clicked: None,
            on_row_double_clicked: None,
            on_header_clicked: None,
            on_selection_changed: None,
        }
    }

    pub fn header_height(&self, m: Metrics) -> i32 {
        if self.header_visible { m.header_height } else { 0 }
    }

    pub fn column_x(&self, column: usize) -> i32 {
        self.columns[..column].iter().map(|c| c.width).sum()
    }

    pub fn total_width(&self) -> i32 {
        self.columns.iter().map(|c| c.width).sum()
    }

    pub fn column_at(&self, x: i32) -> Option<usize> {
        let mut left = 0;
        for (i, c) in self.columns.iter().enumerate() {
            if x >= left && x < left + c.width {
                return Some(i);
            }
            left += c.width;
        }
        None
    }

    pub fn row_at(&self, y: i32, m: Metrics) -> RowHit {
        if y < 0 {
            return RowHit::Empty;
        }
        let header = self.header_height(m);
        if y < header {
            return RowHit::Header;
        }
        let row = self.first_row + ((y - header) / m.row_height) as usize;
        if row < self.rows { RowHit::Row(row) } else { RowHit::Empty }
    }

    pub fn row_y(&self, row: usize, m: Metrics) -> i32 {
        self.header_height(m) + (row as i32 - self.first_row as i32) * m.row_height
    }

    pub fn cell_bounds(&self, row: usize, column: usize, m: Metrics) -> Bounds {
        Bounds::new(
            self.column_x(column),
            self.row_y(row, m),
            self.columns[column].width,
            m.row_height,
        )
    }

    /// Rows fully visible at once, at least one.
    pub fn page_rows(&self, m: Metrics) -> usize {
        (((self.size.height - self.header_height(m)) / m.row_height).max(1)) as usize
    }

    /// Rows at least partly inside the viewport.
    pub fn visible_rows(&self, m: Metrics) -> Range<usize> {
        let avail = (self.size.height - self.header_height(m)).max(0);
        let count = ((avail + m.row_height - 1) / m.row_height) as usize;
        let end = (self.first_row + count).min(self.rows);
        self.first_row.min(end)..end
    }

    pub fn clamp_scroll(&mut self, m: Metrics) {
        let max_first = self.rows.saturating_sub(self.page_rows(m));
        self.first_row = self.first_row.min(max_first);
    }

    pub fn ensure_visible(&mut self, row: usize, m: Metrics) {
        let page = self.page_rows(m);
        if row < self.first_row {
            self.first_row = row;
        } else if row >= self.first_row + page {
            self.first_row = row + 1 - page;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Empty(usize);

    impl TableModelHandler for Empty {
        fn num_columns(&self) -> usize {
            1
        }
        fn column_type(&self, _column: usize) -> TableValueType {
            TableValueType::String
        }
        fn num_rows(&self) -> usize {
            self.0
        }
        fn cell_value(&self, _row: usize, _column: usize) -> Option<TableValue> {
            None
        }
        fn set_cell_value(&mut self, _row: usize, _column: usize, _value: Option<TableValue>) {}
    }

    fn table(rows: usize, height: i32) -> Table {
        let mut t = Table::new(TableParams::new(TableModel::new(Empty(rows))));
        t.columns.push(ColumnParams::new("a", 50));
        t.columns.push(ColumnParams::new("b", 30));
        t.size = Size::new(80, height);
        t
    }

    const M: Metrics = Metrics { row_height: 10, header_height: 14, pad: 2 };

    #[test]
    fn hit_testing_accounts_for_header_and_scroll() {
        let mut t = table(100, 114);
        assert_eq!(t.row_at(5, M), RowHit::Header);
        assert_eq!(t.row_at(14, M), RowHit::Row(0));
        t.first_row = 20;
        assert_eq!(t.row_at(35, M), RowHit::Row(22));
        assert_eq!(t.column_at(55), Some(1));
        assert_eq!(t.column_at(80), None);
        assert_eq!(t.cell_bounds(22, 1, M), Bounds::new(50, 34, 30, 10));
    }

    #[test]
    fn points_above_the_table_hit_nothing() {
        let mut t = table(100, 114);
        t.first_row = 20;
        assert_eq!(t.row_at(-1, M), RowHit::Empty);
        t.header_visible = false;
        assert_eq!(t.row_at(-5, M), RowHit::Empty);
        assert_eq!(t.row_at(0, M), RowHit::Row(20));
    }

    #[test]
    fn visible_rows_stop_at_the_model_end() {
        let mut t = table(100, 119);
        // 105 px of rows: ten full and one partial
        assert_eq!(t.visible_rows(M), 0..11);
        t.first_row = 95;
        assert_eq!(t.visible_rows(M), 95..100);
        t.clamp_scroll(M);
        assert_eq!(t.first_row, 90);
        t.rows = 0;
        assert!(t.visible_rows(M).is_empty());
    }

    #[test]
    fn ensure_visible_scrolls_minimally() {
        let mut t = table(100, 114);
        t.ensure_visible(15, M);
        assert_eq!(t.first_row, 6);
        t.ensure_visible(3, M);
        assert_eq!(t.first_row, 3);
    }
}
