use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::control::ControlId;

use super::value::{TableValue, TableValueType};

/// Application-side data source for one or more tables.
///
/// Tables never copy rows; they ask for cells as they need them. After
/// changing row data the application reports it through
/// [`Ui::table_model_row_inserted`](crate::Ui::table_model_row_inserted) and
/// friends, with [`num_rows`](Self::num_rows) already returning the new count.
pub trait TableModelHandler {
    fn num_columns(&self) -> usize;
    fn column_type(&self, column: usize) -> TableValueType;
    fn num_rows(&self) -> usize;
    fn cell_value(&self, row: usize, column: usize) -> Option<TableValue>;
    /// Called when the user edits a cell. Button clicks pass `None`.
    fn set_cell_value(&mut self, row: usize, column: usize, value: Option<TableValue>);
}

/// A handler plus the tables currently showing it.
pub struct TableModel {
    handler: RefCell<Box<dyn TableModelHandler>>,
    column_types: Vec<TableValueType>,
    views: RefCell<Vec<ControlId>>,
}

impl TableModel {
    /// Wraps `handler`. Column count and types are read once here.
    pub fn new(handler: impl TableModelHandler + 'static) -> Rc<Self> {
        let column_types = (0..handler.num_columns()).map(|c| handler.column_type(c)).collect();
        Rc::new(Self {
            handler: RefCell::new(Box::new(handler)),
            column_types,
            views: RefCell::new(Vec::new()),
        })
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.column_types.len()
    }

    pub fn column_type(&self, column: usize) -> Option<TableValueType> {
        self.column_types.get(column).copied()
    }

    pub fn num_rows(&self) -> usize {
        self.handler.borrow().num_rows()
    }

    pub fn cell_value(&self, row: usize, column: usize) -> Option<TableValue> {
        self.handler.borrow().cell_value(row, column)
    }

    pub(crate) fn set_cell_value(&self, row: usize, column: usize, value: Option<TableValue>) {
        log::debug!("set cell ({row}, {column}) to {value:?}");
        self.handler.borrow_mut().set_cell_value(row, column, value);
    }

    /// Tables attached to this model, in attach order.
    pub fn views(&self) -> Vec<ControlId> {
        self.views.borrow().clone()
    }

    pub(crate) fn attach(&self, view: ControlId) {
        self.views.borrow_mut().push(view);
    }

    pub(crate) fn detach(&self, view: ControlId) {
        self.views.borrow_mut().retain(|v| *v != view);
    }
}

impl fmt::Debug for TableModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableModel")
            .field("column_types", &self.column_types)
            .field("views", &self.views.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Squares;

    impl TableModelHandler for Squares {
        fn num_columns(&self) -> usize {
            2
        }

        fn column_type(&self, column: usize) -> TableValueType {
            [TableValueType::String, TableValueType::Int][column]
        }

        fn num_rows(&self) -> usize {
            10
        }

        fn cell_value(&self, row: usize, column: usize) -> Option<TableValue> {
            Some(match column {
                0 => TableValue::from(row.to_string()),
                _ => TableValue::from((row * row) as i32),
            })
        }

        fn set_cell_value(&mut self, _row: usize, _column: usize, _value: Option<TableValue>) {}
    }

    #[test]
    fn column_types_are_cached() {
        let model = TableModel::new(Squares);
        assert_eq!(model.num_columns(), 2);
        assert_eq!(model.column_type(1), Some(TableValueType::Int));
        assert_eq!(model.column_type(2), None);
        assert_eq!(model.cell_value(3, 1).and_then(|v| v.as_int()), Some(9));
    }

    #[test]
    fn views_attach_and_detach() {
        let model = TableModel::new(Squares);
        model.attach(ControlId(3));
        model.attach(ControlId(5));
        model.detach(ControlId(3));
        assert_eq!(model.views(), vec![ControlId(5)]);
    }
}
