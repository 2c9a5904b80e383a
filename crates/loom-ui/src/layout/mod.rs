//! Container controls that position their children: [`Orientation`]-stacked
//! boxes, labelled forms and grids.

mod box_layout;
mod form;
mod grid;

pub use box_layout::Orientation;
pub use grid::{Align, At, GridPlacement};

pub(crate) use box_layout::BoxLayout;
pub(crate) use form::FormLayout;
pub(crate) use grid::GridLayout;
