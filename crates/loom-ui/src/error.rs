use thiserror::Error;

use crate::control::ControlId;
use crate::table::SelectionMode;

/// Contract violations by the embedding application.
///
/// These are not recoverable: [`user_bug`] logs the error and panics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("control {0:?} does not exist")]
    NoSuchControl(ControlId),
    #[error("control {0:?} is not a {1}")]
    WrongKind(ControlId, &'static str),
    #[error("cannot destroy control {0:?} while it still has a parent")]
    DestroyWithParent(ControlId),
    #[error("control {0:?} already has a parent")]
    AlreadyParented(ControlId),
    #[error("a window cannot be the child of another control")]
    WindowAsChild,
    #[error("index {index} out of range for {len} children")]
    ChildIndexOutOfRange { index: usize, len: usize },
    #[error("grid span {xspan}x{yspan} is negative")]
    NegativeSpan { xspan: i32, yspan: i32 },
    #[error("control {0:?} is not a child of this grid")]
    NotInGrid(ControlId),
    #[error("model column {column} out of range for a model with {count} columns")]
    ModelColumnOutOfRange { column: usize, count: usize },
    #[error("table column {column} out of range for {count} columns")]
    TableColumnOutOfRange { column: usize, count: usize },
    #[error("row {index} out of range for {rows} rows")]
    RowOutOfRange { index: usize, rows: usize },
    #[error("model reports {actual} rows after {op} but the table expected {expected}")]
    RowCountMismatch { op: &'static str, expected: usize, actual: usize },
    #[error("{len}-byte image buffer is too small for {width}x{height} at stride {byte_stride}")]
    ImageBuffer { width: u32, height: u32, byte_stride: usize, len: usize },
    #[error("selection of {count} rows is not allowed in {mode:?} mode")]
    SelectionTooLarge { count: usize, mode: SelectionMode },
}

/// Reports a usage bug and aborts the current operation.
#[track_caller]
pub fn user_bug(err: UsageError) -> ! {
    log::error!("usage bug: {err}");
    panic!("usage bug: {err}");
}
