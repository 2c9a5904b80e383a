//! loom UI: native-widget layout containers and a virtualized table view on
//! top of `loom-engine`.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use loom_ui::prelude::*;
//!
//! let mut ui = Ui::new(RecordingHost::new());
//! let window = ui.new_window("Files", 640, 480);
//! let grid = ui.new_grid();
//! ui.grid_set_padded(grid, true);
//!
//! let label = ui.new_native("label", Size::new(60, 14));
//! let entry = ui.new_native("entry", Size::new(120, 14));
//! ui.grid_append(grid, label, GridPlacement::at(0, 0).halign(Align::End));
//! ui.grid_append(grid, entry, GridPlacement::at(1, 0).hexpand(true));
//!
//! ui.window_set_child(window, Some(grid));
//! ui.show(window);
//! ```
//!
//! # Tables
//!
//! Implement [`TableModelHandler`](table::TableModelHandler) over your data,
//! wrap it in a [`TableModel`](table::TableModel) and hand the model to
//! [`Ui::new_table`]. After changing the data behind the model, report the
//! change through [`Ui::table_model_row_inserted`],
//! [`Ui::table_model_row_changed`] or [`Ui::table_model_row_deleted`] so
//! every attached view can resync.

pub mod control;
pub mod error;
pub mod event;
pub mod geometry;
pub mod host;
pub mod layout;
pub mod table;
pub mod ui;

pub use control::ControlId;
pub use error::{user_bug, UsageError};
pub use ui::Ui;

/// Everything needed to build an interface, in one import.
pub mod prelude {
    pub use crate::control::ControlId;
    pub use crate::error::{user_bug, UsageError};
    pub use crate::event::{EventResult, Key, Modifiers, TableEvent};
    pub use crate::geometry::{Bounds, Size, Sizing};
    pub use crate::host::{HandleClass, Host, HostCall, NativeHandle, RecordingHost, TimerId};
    pub use crate::layout::{Align, At, GridPlacement, Orientation};
    pub use crate::table::{
        Editable, Image, SelectionMode, SortIndicator, TableModel, TableModelHandler, TableParams,
        TableSelection, TableValue, TableValueType, TextColumnParams, PROGRESS_INDETERMINATE,
    };
    pub use crate::ui::Ui;

    // Engine primitives used by table painting and cell values.
    pub use loom_engine::draw::{DrawContext, DrawError};
    pub use loom_engine::paint::Color;
    pub use loom_engine::text::{FontDescriptor, FontSystem};
}
