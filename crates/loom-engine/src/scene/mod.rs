//! Recorded draw stream.
//!
//! A [`DrawContext`](crate::draw::DrawContext) records into a [`DrawList`];
//! platform backends replay the list against their native render target.

mod cmd;
mod list;

pub use cmd::{DrawCmd, TextCmd};
pub use list::{DrawItem, DrawList};
