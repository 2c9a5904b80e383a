use std::collections::HashMap;

use loom_engine::text::{FontDescriptor, FontSystem};

use crate::control::{ControlId, ControlKind, NativeData, Node, WindowData};
use crate::error::{user_bug, UsageError};
use crate::geometry::{Bounds, Size, Sizing};
use crate::host::{HandleClass, Host, NativeHandle};

/// The application context: every control, the host they live on, and the
/// fonts used for drawing.
///
/// Controls are addressed by [`ControlId`]. Containers own their children;
/// destroying a container destroys everything under it.
pub struct Ui<H: Host> {
    pub(crate) host: H,
    fonts: FontSystem,
    font: FontDescriptor,
    nodes: Vec<Option<Node>>,
    handles: HashMap<NativeHandle, ControlId>,
}

impl<H: Host> Ui<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            fonts: FontSystem::new(),
            font: FontDescriptor::default(),
            nodes: Vec::new(),
            handles: HashMap::new(),
        }
    }

    #[inline]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[inline]
    pub fn fonts(&self) -> &FontSystem {
        &self.fonts
    }

    #[inline]
    pub fn fonts_mut(&mut self) -> &mut FontSystem {
        &mut self.fonts
    }

    /// Font used for table text and headers.
    pub fn font(&self) -> &FontDescriptor {
        &self.font
    }

    pub fn set_font(&mut self, font: FontDescriptor) {
        self.font = font;
    }

    // ── arena ─────────────────────────────────────────────────────────────

    pub fn exists(&self, id: ControlId) -> bool {
        matches!(self.nodes.get(id.0), Some(Some(_)))
    }

    pub(crate) fn node(&self, id: ControlId) -> &Node {
        match self.nodes.get(id.0).and_then(Option::as_ref) {
            Some(node) => node,
            None => user_bug(UsageError::NoSuchControl(id)),
        }
    }

    pub(crate) fn node_mut(&mut self, id: ControlId) -> &mut Node {
        match self.nodes.get_mut(id.0).and_then(Option::as_mut) {
            Some(node) => node,
            None => user_bug(UsageError::NoSuchControl(id)),
        }
    }

    /// Creates a host handle, logging and substituting the null handle on
    /// failure.
    pub(crate) fn create_handle(
        &mut self,
        class: &HandleClass,
        parent: Option<NativeHandle>,
    ) -> NativeHandle {
        match self.host.create_handle(class, parent) {
            Ok(handle) => handle,
            Err(err) => {
                log::error!("creating native handle of class {class:?} failed: {err:#}");
                NativeHandle::NULL
            }
        }
    }

    pub(crate) fn insert(&mut self, kind: ControlKind, class: HandleClass) -> ControlId {
        let handle = self.create_handle(&class, None);
        let id = ControlId(self.nodes.len());
        let visible = !matches!(kind, ControlKind::Window(_));
        log::debug!("new {} {id:?} on {handle:?}", kind.name());
        self.nodes.push(Some(Node {
            kind,
            parent: None,
            handle,
            visible,
            enabled: true,
            bounds: None,
        }));
        if !handle.is_null() {
            self.handles.insert(handle, id);
        }
        id
    }

    /// Dialog-unit base for a control, falling back to one pixel per unit
    /// when the host cannot tell.
    pub(crate) fn sizing(&self, id: ControlId) -> Sizing {
        let handle = self.node(id).handle;
        match self.host.sizing(handle) {
            Ok(sizing) => sizing,
            Err(err) => {
                log::error!("querying sizing of {id:?} ({handle:?}) failed: {err:#}");
                Sizing::default()
            }
        }
    }

    // ── leaves and windows ────────────────────────────────────────────────

    /// Creates a top-level window with the given client size. Windows start
    /// hidden.
    pub fn new_window(&mut self, title: &str, width: i32, height: i32) -> ControlId {
        let content = Size::new(width, height);
        let data = WindowData { title: title.to_owned(), child: None, margined: false, content };
        let id = self.insert(ControlKind::Window(data), HandleClass::Window);
        let handle = self.node(id).handle;
        self.host.set_text(handle, title);
        self.host.move_resize(handle, Bounds::new(0, 0, width, height));
        id
    }

    /// Wraps a collaborator's control. `min_size` is what it reports.
    pub fn new_native(&mut self, class: &str, min_size: Size) -> ControlId {
        let data = NativeData { class: class.to_owned(), min_size };
        self.insert(ControlKind::Native(data), HandleClass::Native(class.to_owned()))
    }

    pub fn native_class(&self, id: ControlId) -> &str {
        match &self.node(id).kind {
            ControlKind::Native(n) => &n.class,
            _ => user_bug(UsageError::WrongKind(id, "native control")),
        }
    }

    /// Updates a native leaf's reported minimum size and re-lays out the
    /// tree above it.
    pub fn set_native_minimum_size(&mut self, id: ControlId, size: Size) {
        match &mut self.node_mut(id).kind {
            ControlKind::Native(n) => n.min_size = size,
            _ => user_bug(UsageError::WrongKind(id, "native control")),
        }
        self.minimum_size_changed(id);
    }

    fn window(&self, id: ControlId) -> &WindowData {
        match &self.node(id).kind {
            ControlKind::Window(w) => w,
            _ => user_bug(UsageError::WrongKind(id, "window")),
        }
    }

    fn window_mut(&mut self, id: ControlId) -> &mut WindowData {
        match &mut self.node_mut(id).kind {
            ControlKind::Window(w) => w,
            _ => user_bug(UsageError::WrongKind(id, "window")),
        }
    }

    pub fn window_title(&self, id: ControlId) -> &str {
        &self.window(id).title
    }

    pub fn window_set_title(&mut self, id: ControlId, title: &str) {
        self.window_mut(id).title = title.to_owned();
        let handle = self.node(id).handle;
        self.host.set_text(handle, title);
    }

    pub fn window_child(&self, id: ControlId) -> Option<ControlId> {
        self.window(id).child
    }

    /// Replaces the window's content. The previous child is unparented, not
    /// destroyed.
    pub fn window_set_child(&mut self, id: ControlId, child: Option<ControlId>) {
        if let Some(old) = self.window(id).child {
            self.window_mut(id).child = None;
            self.detach(old);
        }
        if let Some(child) = child {
            self.set_parent(child, Some(id));
            self.window_mut(id).child = Some(child);
        }
        self.minimum_size_changed(id);
    }

    pub fn window_margined(&self, id: ControlId) -> bool {
        self.window(id).margined
    }

    pub fn window_set_margined(&mut self, id: ControlId, margined: bool) {
        self.window_mut(id).margined = margined;
        self.minimum_size_changed(id);
    }

    pub fn window_content_size(&self, id: ControlId) -> Size {
        self.window(id).content
    }

    /// Resizes the window's client area and lays its content out again.
    pub fn window_set_content_size(&mut self, id: ControlId, size: Size) {
        self.window_mut(id).content = size;
        let handle = self.node(id).handle;
        self.host.move_resize(handle, Bounds::new(0, 0, size.width, size.height));
        self.layout_children(id, Bounds::new(0, 0, size.width, size.height));
    }

    // ── common control operations ─────────────────────────────────────────

    #[inline]
    pub fn handle(&self, id: ControlId) -> NativeHandle {
        self.node(id).handle
    }

    /// Control owning a native handle, for routing host events.
    pub fn handle_for(&self, handle: NativeHandle) -> Option<ControlId> {
        self.handles.get(&handle).copied()
    }

    #[inline]
    pub fn parent(&self, id: ControlId) -> Option<ControlId> {
        self.node(id).parent
    }

    /// Topmost ancestor (the control itself when unparented).
    pub fn toplevel(&self, id: ControlId) -> ControlId {
        let mut cur = id;
        while let Some(parent) = self.node(cur).parent {
            cur = parent;
        }
        cur
    }

    #[inline]
    pub fn visible(&self, id: ControlId) -> bool {
        self.node(id).visible
    }

    #[inline]
    pub fn enabled(&self, id: ControlId) -> bool {
        self.node(id).enabled
    }

    /// Enabled itself and through every ancestor.
    pub fn enabled_to_user(&self, id: ControlId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if !self.node(c).enabled {
                return false;
            }
            cur = self.node(c).parent;
        }
        true
    }

    pub fn show(&mut self, id: ControlId) {
        self.set_visible(id, true);
    }

    pub fn hide(&mut self, id: ControlId) {
        self.set_visible(id, false);
    }

    fn set_visible(&mut self, id: ControlId, visible: bool) {
        let node = self.node_mut(id);
        if node.visible == visible {
            return;
        }
        node.visible = visible;
        let handle = node.handle;
        self.host.set_visible(handle, visible);
        self.minimum_size_changed(id);
    }

    pub fn enable(&mut self, id: ControlId) {
        self.set_enabled(id, true);
    }

    pub fn disable(&mut self, id: ControlId) {
        self.set_enabled(id, false);
    }

    fn set_enabled(&mut self, id: ControlId, enabled: bool) {
        let node = self.node_mut(id);
        node.enabled = enabled;
        let handle = node.handle;
        self.host.set_enabled(handle, enabled);
    }

    /// Sets or clears the parent back-reference. Giving a parent to a
    /// control that already has one is a usage bug.
    pub fn set_parent(&mut self, id: ControlId, parent: Option<ControlId>) {
        let node = self.node(id);
        if parent.is_some() {
            if matches!(node.kind, ControlKind::Window(_)) {
                user_bug(UsageError::WindowAsChild);
            }
            if node.parent.is_some() {
                user_bug(UsageError::AlreadyParented(id));
            }
        }
        let parent_handle = parent.map(|p| self.node(p).handle);
        let node = self.node_mut(id);
        node.parent = parent;
        let handle = node.handle;
        self.host.set_parent_handle(handle, parent_handle);
    }

    /// Clears the parent without the already-parented check.
    pub(crate) fn detach(&mut self, id: ControlId) {
        if self.node(id).parent.is_some() {
            self.set_parent(id, None);
        }
    }

    /// Destroys a control and everything it owns. The control must have
    /// been removed from its parent first.
    pub fn destroy(&mut self, id: ControlId) {
        if self.node(id).parent.is_some() {
            user_bug(UsageError::DestroyWithParent(id));
        }
        self.destroy_tree(id);
    }

    fn destroy_tree(&mut self, id: ControlId) {
        let Some(node) = self.nodes.get_mut(id.0).and_then(Option::take) else {
            user_bug(UsageError::NoSuchControl(id));
        };
        for child in node.kind.children() {
            if let Some(Some(c)) = self.nodes.get_mut(child.0) {
                c.parent = None;
            }
            self.destroy_tree(child);
        }
        match node.kind {
            ControlKind::Form(form) => {
                for row in form.rows {
                    if !row.label.is_null() {
                        self.host.destroy_handle(row.label);
                    }
                }
            }
            ControlKind::Table(table) => self.teardown_table(id, node.handle, *table),
            _ => {}
        }
        if !node.handle.is_null() {
            self.handles.remove(&node.handle);
            self.host.destroy_handle(node.handle);
        }
        log::debug!("destroyed {id:?}");
    }

    // ── sizing and layout ─────────────────────────────────────────────────

    /// Smallest size at which the control can be laid out.
    pub fn minimum_size(&self, id: ControlId) -> Size {
        match &self.node(id).kind {
            ControlKind::Window(w) => {
                let (mx, my) = self.sizing(id).margins(w.margined);
                let inner = match w.child {
                    Some(child) if self.node(child).visible => self.minimum_size(child),
                    _ => Size::zero(),
                };
                Size::new(inner.width + 2 * mx, inner.height + 2 * my)
            }
            ControlKind::Native(n) => n.min_size,
            ControlKind::Box(_) => self.box_minimum_size(id),
            ControlKind::Form(_) => self.form_minimum_size(id),
            ControlKind::Grid(_) => self.grid_minimum_size(id),
            ControlKind::Table(_) => self.table_minimum_size(id),
        }
    }

    /// Called when a control's minimum size may have changed. Walks up to
    /// the root first, then lays the tree out once from there.
    pub fn minimum_size_changed(&mut self, id: ControlId) {
        let root = self.toplevel(id);
        log::trace!("minimum size of {id:?} changed, relayout from {root:?}");
        let node = self.node(root);
        match node.kind {
            ControlKind::Window(ref w) => {
                let content = w.content;
                self.layout_children(root, Bounds::new(0, 0, content.width, content.height));
            }
            _ => {
                if let Some(bounds) = node.bounds {
                    self.relayout(root, bounds);
                }
            }
        }
    }

    /// Moves the control to `bounds` (parent client space) and lays out its
    /// children. Hidden controls are left where they are.
    pub fn relayout(&mut self, id: ControlId, bounds: Bounds) {
        let node = self.node_mut(id);
        node.bounds = Some(bounds);
        if !node.visible {
            return;
        }
        let handle = node.handle;
        self.host.move_resize(handle, bounds);
        self.layout_children(id, Bounds::new(0, 0, bounds.width, bounds.height));
    }

    fn layout_children(&mut self, id: ControlId, area: Bounds) {
        let node = self.node(id);
        match node.kind {
            ControlKind::Window(ref w) => {
                let Some(child) = w.child else {
                    return;
                };
                let (mx, my) = self.sizing(id).margins(w.margined);
                self.relayout(child, area.inset(mx, my));
            }
            ControlKind::Native(_) => {}
            ControlKind::Box(_) => self.relayout_box(id, area),
            ControlKind::Form(_) => self.relayout_form(id, area),
            ControlKind::Grid(_) => self.relayout_grid(id, area),
            ControlKind::Table(_) => self.table_resized(id, area.size()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostCall, RecordingHost};
    use crate::layout::Orientation;

    fn ui() -> Ui<RecordingHost> {
        Ui::new(RecordingHost::new())
    }

    // ── windows ───────────────────────────────────────────────────────────

    #[test]
    fn windows_start_hidden_and_lay_out_their_child() {
        let mut ui = ui();
        let win = ui.new_window("main", 200, 100);
        assert!(!ui.visible(win));
        let leaf = ui.new_native("button", Size::new(50, 20));
        ui.window_set_child(win, Some(leaf));
        assert_eq!(ui.host().bounds_of(ui.handle(leaf)), Some(Bounds::new(0, 0, 200, 100)));

        ui.window_set_margined(win, true);
        assert_eq!(ui.host().bounds_of(ui.handle(leaf)), Some(Bounds::new(7, 7, 186, 86)));
        assert_eq!(ui.minimum_size(win), Size::new(64, 34));
    }

    #[test]
    fn resizing_the_window_relayouts_content() {
        let mut ui = ui();
        let win = ui.new_window("main", 200, 100);
        let leaf = ui.new_native("button", Size::new(50, 20));
        ui.window_set_child(win, Some(leaf));
        ui.window_set_content_size(win, Size::new(300, 150));
        assert_eq!(ui.host().bounds_of(ui.handle(leaf)), Some(Bounds::new(0, 0, 300, 150)));
    }

    // ── parenting and destruction ─────────────────────────────────────────

    #[test]
    #[should_panic(expected = "already has a parent")]
    fn reparenting_a_parented_control_is_a_usage_bug() {
        let mut ui = ui();
        let a = ui.new_box(Orientation::Horizontal);
        let b = ui.new_box(Orientation::Horizontal);
        let leaf = ui.new_native("button", Size::new(10, 10));
        ui.box_append(a, leaf, false);
        ui.box_append(b, leaf, false);
    }

    #[test]
    #[should_panic(expected = "still has a parent")]
    fn destroying_a_parented_control_is_a_usage_bug() {
        let mut ui = ui();
        let b = ui.new_box(Orientation::Vertical);
        let leaf = ui.new_native("button", Size::new(10, 10));
        ui.box_append(b, leaf, false);
        ui.destroy(leaf);
    }

    #[test]
    fn destroy_releases_the_whole_subtree() {
        let mut ui = ui();
        let win = ui.new_window("w", 100, 100);
        let b = ui.new_box(Orientation::Vertical);
        let leaf = ui.new_native("button", Size::new(10, 10));
        ui.box_append(b, leaf, false);
        ui.window_set_child(win, Some(b));
        let leaf_handle = ui.handle(leaf);

        ui.destroy(win);
        assert!(!ui.exists(win) && !ui.exists(b) && !ui.exists(leaf));
        assert_eq!(ui.host().live_count(), 0);
        assert!(ui.handle_for(leaf_handle).is_none());
    }

    #[test]
    fn failed_handle_creation_degrades_to_null() {
        let mut ui = ui();
        ui.host_mut().fail_creates(true);
        let leaf = ui.new_native("button", Size::new(10, 10));
        assert!(ui.handle(leaf).is_null());
        // sizing falls back instead of failing
        assert_eq!(ui.sizing(leaf), Sizing::default());
    }

    // ── visibility ────────────────────────────────────────────────────────

    #[test]
    fn hidden_controls_are_never_moved() {
        let mut ui = ui();
        let win = ui.new_window("w", 100, 100);
        let b = ui.new_box(Orientation::Vertical);
        let leaf = ui.new_native("button", Size::new(10, 10));
        ui.hide(leaf);
        ui.box_append(b, leaf, false);
        ui.window_set_child(win, Some(b));
        ui.window_set_content_size(win, Size::new(120, 120));
        assert_eq!(ui.host().move_count(ui.handle(leaf)), 0);

        ui.show(leaf);
        assert_eq!(ui.host().move_count(ui.handle(leaf)), 1);
        assert!(ui.host().calls().contains(&HostCall::SetVisible(ui.handle(leaf), true)));
    }

    #[test]
    fn enabled_to_user_checks_ancestors() {
        let mut ui = ui();
        let b = ui.new_box(Orientation::Vertical);
        let leaf = ui.new_native("button", Size::new(10, 10));
        ui.box_append(b, leaf, false);
        ui.disable(b);
        assert!(ui.enabled(leaf));
        assert!(!ui.enabled_to_user(leaf));
    }

    #[test]
    fn toplevel_walks_parents() {
        let mut ui = ui();
        let win = ui.new_window("w", 10, 10);
        let b = ui.new_box(Orientation::Vertical);
        let leaf = ui.new_native("button", Size::new(1, 1));
        ui.box_append(b, leaf, true);
        ui.window_set_child(win, Some(b));
        assert_eq!(ui.toplevel(leaf), win);
        assert_eq!(ui.parent(leaf), Some(b));
    }
}
