use std::collections::HashMap;
use std::time::Duration;

use anyhow::{anyhow, bail};

use super::{HandleClass, Host, NativeHandle, TimerId};
use crate::geometry::{Bounds, Sizing};

/// One call made against a [`RecordingHost`].
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Create { handle: NativeHandle, class: HandleClass, parent: Option<NativeHandle> },
    Destroy(NativeHandle),
    MoveResize(NativeHandle, Bounds),
    SetVisible(NativeHandle, bool),
    SetEnabled(NativeHandle, bool),
    SetParent(NativeHandle, Option<NativeHandle>),
    SetText(NativeHandle, String),
    SetFocus(NativeHandle),
    Invalidate(NativeHandle),
    StartTimer(NativeHandle, TimerId, Duration),
    StopTimer(NativeHandle, TimerId),
}

/// Headless [`Host`] that records every call.
///
/// Text is measured as `char_width` pixels per character. Handles are
/// numbered from 1 in creation order.
#[derive(Debug)]
pub struct RecordingHost {
    next_handle: u64,
    calls: Vec<HostCall>,
    live: HashMap<NativeHandle, HandleClass>,
    texts: HashMap<NativeHandle, String>,
    bounds: HashMap<NativeHandle, Bounds>,
    running_timers: HashMap<(NativeHandle, TimerId), Duration>,
    sizing: Sizing,
    char_width: i32,
    fail_creates: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            calls: Vec::new(),
            live: HashMap::new(),
            texts: HashMap::new(),
            bounds: HashMap::new(),
            running_timers: HashMap::new(),
            sizing: Sizing::default(),
            char_width: 6,
            fail_creates: false,
        }
    }

    pub fn with_sizing(mut self, sizing: Sizing) -> Self {
        self.sizing = sizing;
        self
    }

    pub fn with_char_width(mut self, width: i32) -> Self {
        self.char_width = width;
        self
    }

    /// Makes subsequent `create_handle` calls fail.
    pub fn fail_creates(&mut self, fail: bool) {
        self.fail_creates = fail;
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn is_live(&self, handle: NativeHandle) -> bool {
        self.live.contains_key(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Last bounds the handle was moved to.
    pub fn bounds_of(&self, handle: NativeHandle) -> Option<Bounds> {
        self.bounds.get(&handle).copied()
    }

    /// Number of recorded `move_resize` calls for `handle`.
    pub fn move_count(&self, handle: NativeHandle) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HostCall::MoveResize(h, _) if *h == handle))
            .count()
    }

    pub fn timer_running(&self, handle: NativeHandle, timer: TimerId) -> bool {
        self.running_timers.contains_key(&(handle, timer))
    }

    /// Replaces a handle's text the way user typing would, without
    /// recording a call.
    pub fn type_text(&mut self, handle: NativeHandle, text: &str) {
        self.texts.insert(handle, text.to_owned());
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for RecordingHost {
    fn create_handle(
        &mut self,
        class: &HandleClass,
        parent: Option<NativeHandle>,
    ) -> anyhow::Result<NativeHandle> {
        if self.fail_creates {
            bail!("creating {class:?} failed");
        }
        let handle = NativeHandle(self.next_handle);
        self.next_handle += 1;
        self.live.insert(handle, class.clone());
        self.calls.push(HostCall::Create { handle, class: class.clone(), parent });
        Ok(handle)
    }

    fn destroy_handle(&mut self, handle: NativeHandle) {
        self.live.remove(&handle);
        self.texts.remove(&handle);
        self.bounds.remove(&handle);
        self.running_timers.retain(|(h, _), _| *h != handle);
        self.calls.push(HostCall::Destroy(handle));
    }

    fn move_resize(&mut self, handle: NativeHandle, bounds: Bounds) {
        self.bounds.insert(handle, bounds);
        self.calls.push(HostCall::MoveResize(handle, bounds));
    }

    fn set_visible(&mut self, handle: NativeHandle, visible: bool) {
        self.calls.push(HostCall::SetVisible(handle, visible));
    }

    fn set_enabled(&mut self, handle: NativeHandle, enabled: bool) {
        self.calls.push(HostCall::SetEnabled(handle, enabled));
    }

    fn set_parent_handle(&mut self, handle: NativeHandle, parent: Option<NativeHandle>) {
        self.calls.push(HostCall::SetParent(handle, parent));
    }

    fn sizing(&self, handle: NativeHandle) -> anyhow::Result<Sizing> {
        if !self.is_live(handle) {
            return Err(anyhow!("no such handle {handle:?}"));
        }
        Ok(self.sizing)
    }

    fn text_width(&self, _handle: NativeHandle, text: &str) -> i32 {
        text.chars().count() as i32 * self.char_width
    }

    fn set_text(&mut self, handle: NativeHandle, text: &str) {
        self.texts.insert(handle, text.to_owned());
        self.calls.push(HostCall::SetText(handle, text.to_owned()));
    }

    fn text(&self, handle: NativeHandle) -> String {
        self.texts.get(&handle).cloned().unwrap_or_default()
    }

    fn set_focus(&mut self, handle: NativeHandle) {
        self.calls.push(HostCall::SetFocus(handle));
    }

    fn invalidate(&mut self, handle: NativeHandle) {
        self.calls.push(HostCall::Invalidate(handle));
    }

    fn start_timer(
        &mut self,
        handle: NativeHandle,
        timer: TimerId,
        period: Duration,
    ) -> anyhow::Result<()> {
        if !self.is_live(handle) {
            bail!("cannot start timer {timer:?} on dead handle {handle:?}");
        }
        self.running_timers.insert((handle, timer), period);
        self.calls.push(HostCall::StartTimer(handle, timer, period));
        Ok(())
    }

    fn stop_timer(&mut self, handle: NativeHandle, timer: TimerId) {
        self.running_timers.remove(&(handle, timer));
        self.calls.push(HostCall::StopTimer(handle, timer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_numbered_and_tracked() {
        let mut host = RecordingHost::new();
        let a = host.create_handle(&HandleClass::Window, None).unwrap();
        let b = host.create_handle(&HandleClass::Label, Some(a)).unwrap();
        assert_eq!((a, b), (NativeHandle(1), NativeHandle(2)));
        host.destroy_handle(a);
        assert!(!host.is_live(a));
        assert_eq!(host.live_count(), 1);
    }

    #[test]
    fn failing_creates_return_errors() {
        let mut host = RecordingHost::new();
        host.fail_creates(true);
        assert!(host.create_handle(&HandleClass::Container, None).is_err());
        assert!(host.calls().is_empty());
    }

    #[test]
    fn text_width_is_per_character() {
        let host = RecordingHost::new().with_char_width(5);
        assert_eq!(host.text_width(NativeHandle(1), "héllo"), 25);
    }
}
