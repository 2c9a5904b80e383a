//! Boundary to the native windowing system.
//!
//! Everything the layout and table code needs from the platform goes
//! through [`Host`]: handle lifetime, placement, visibility, text metrics,
//! focus, repaint requests and timers. A platform backend implements it over
//! its widget API; [`RecordingHost`] implements it in memory.

mod recording;

use std::time::Duration;

use crate::geometry::{Bounds, Sizing};

pub use recording::{HostCall, RecordingHost};

/// Opaque native handle. [`NativeHandle::NULL`] stands in when creation
/// failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeHandle(pub u64);

impl NativeHandle {
    pub const NULL: NativeHandle = NativeHandle(0);

    #[inline]
    pub fn is_null(self) -> bool {
        self == Self::NULL
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// What kind of native window to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleClass {
    /// Top-level window.
    Window,
    /// Invisible parent window used by layout containers.
    Container,
    /// Static text, used for form labels.
    Label,
    /// Single-line edit control, used as the table's overlay editor.
    Edit,
    /// The owner-drawn table surface.
    Table,
    /// A control created by a collaborator, by class name.
    Native(String),
}

pub trait Host {
    fn create_handle(
        &mut self,
        class: &HandleClass,
        parent: Option<NativeHandle>,
    ) -> anyhow::Result<NativeHandle>;
    fn destroy_handle(&mut self, handle: NativeHandle);
    fn move_resize(&mut self, handle: NativeHandle, bounds: Bounds);
    fn set_visible(&mut self, handle: NativeHandle, visible: bool);
    fn set_enabled(&mut self, handle: NativeHandle, enabled: bool);
    fn set_parent_handle(&mut self, handle: NativeHandle, parent: Option<NativeHandle>);

    /// Dialog-unit base of the handle's current font.
    fn sizing(&self, handle: NativeHandle) -> anyhow::Result<Sizing>;
    /// Width in pixels of `text` in the handle's font.
    fn text_width(&self, handle: NativeHandle, text: &str) -> i32;

    fn set_text(&mut self, handle: NativeHandle, text: &str);
    fn text(&self, handle: NativeHandle) -> String;
    fn set_focus(&mut self, handle: NativeHandle);
    /// Schedules a repaint of the whole handle.
    fn invalidate(&mut self, handle: NativeHandle);

    fn start_timer(
        &mut self,
        handle: NativeHandle,
        timer: TimerId,
        period: Duration,
    ) -> anyhow::Result<()>;
    fn stop_timer(&mut self, handle: NativeHandle, timer: TimerId);
}
