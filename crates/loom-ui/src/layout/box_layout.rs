use crate::control::{ControlId, ControlKind};
use crate::error::{user_bug, UsageError};
use crate::geometry::{Bounds, Size};
use crate::host::{HandleClass, Host};
use crate::ui::Ui;

/// Axis along which a box stacks its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct BoxChild {
    pub control: ControlId,
    pub stretchy: bool,
}

#[derive(Debug)]
pub(crate) struct BoxLayout {
    pub orientation: Orientation,
    pub children: Vec<BoxChild>,
    pub padded: bool,
}

/// A visible child as the layout math sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BoxItem {
    pub min: Size,
    pub stretchy: bool,
}

/// Non-stretchy children add their minimum along the axis; stretchy ones
/// each count as the largest stretchy minimum. The cross axis takes the
/// largest minimum of all.
pub(crate) fn minimum_size(orientation: Orientation, items: &[BoxItem], padding: i32) -> Size {
    if items.is_empty() {
        return Size::zero();
    }
    let mut along = (items.len() as i32 - 1) * padding;
    let mut across = 0;
    let mut max_stretchy = 0;
    let mut n_stretchy = 0;
    for item in items {
        let (a, c) = match orientation {
            Orientation::Horizontal => (item.min.width, item.min.height),
            Orientation::Vertical => (item.min.height, item.min.width),
        };
        across = across.max(c);
        if item.stretchy {
            n_stretchy += 1;
            max_stretchy = max_stretchy.max(a);
        } else {
            along += a;
        }
    }
    along += n_stretchy * max_stretchy;
    match orientation {
        Orientation::Horizontal => Size::new(along, across),
        Orientation::Vertical => Size::new(across, along),
    }
}

/// Assigns each item a rectangle inside `area`.
///
/// Non-stretchy items get their minimum along the axis; the remainder is
/// split evenly between stretchy items with the division truncated, so
/// leftover pixels stay unassigned.
pub(crate) fn layout(
    orientation: Orientation,
    items: &[BoxItem],
    area: Bounds,
    padding: i32,
) -> Vec<Bounds> {
    if items.is_empty() {
        return Vec::new();
    }
    let total = match orientation {
        Orientation::Horizontal => area.width,
        Orientation::Vertical => area.height,
    };
    let mut stretchy_space = total - (items.len() as i32 - 1) * padding;
    let mut n_stretchy = 0;
    for item in items {
        if item.stretchy {
            n_stretchy += 1;
        } else {
            stretchy_space -= match orientation {
                Orientation::Horizontal => item.min.width,
                Orientation::Vertical => item.min.height,
            };
        }
    }
    if n_stretchy != 0 {
        stretchy_space /= n_stretchy;
    }

    let mut pos = 0;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let extent = match (item.stretchy, orientation) {
            (true, _) => stretchy_space,
            (false, Orientation::Horizontal) => item.min.width,
            (false, Orientation::Vertical) => item.min.height,
        };
        let b = match orientation {
            Orientation::Horizontal => Bounds::new(area.x + pos, area.y, extent, area.height),
            Orientation::Vertical => Bounds::new(area.x, area.y + pos, area.width, extent),
        };
        out.push(b);
        pos += extent + padding;
    }
    out
}

impl<H: Host> Ui<H> {
    pub fn new_box(&mut self, orientation: Orientation) -> ControlId {
        let data = BoxLayout { orientation, children: Vec::new(), padded: false };
        self.insert(ControlKind::Box(data), HandleClass::Container)
    }

    pub(crate) fn box_data(&self, id: ControlId) -> &BoxLayout {
        match &self.node(id).kind {
            ControlKind::Box(b) => b,
            _ => user_bug(UsageError::WrongKind(id, "box")),
        }
    }

    fn box_data_mut(&mut self, id: ControlId) -> &mut BoxLayout {
        match &mut self.node_mut(id).kind {
            ControlKind::Box(b) => b,
            _ => user_bug(UsageError::WrongKind(id, "box")),
        }
    }

    pub fn box_append(&mut self, id: ControlId, child: ControlId, stretchy: bool) {
        self.box_data(id);
        self.set_parent(child, Some(id));
        self.box_data_mut(id).children.push(BoxChild { control: child, stretchy });
        self.minimum_size_changed(id);
    }

    /// Removes the child at `index` and hands it back unparented.
    pub fn box_delete(&mut self, id: ControlId, index: usize) -> ControlId {
        let len = self.box_data(id).children.len();
        if index >= len {
            user_bug(UsageError::ChildIndexOutOfRange { index, len });
        }
        let child = self.box_data_mut(id).children.remove(index).control;
        self.detach(child);
        self.minimum_size_changed(id);
        child
    }

    pub fn box_num_children(&self, id: ControlId) -> usize {
        self.box_data(id).children.len()
    }

    pub fn box_orientation(&self, id: ControlId) -> Orientation {
        self.box_data(id).orientation
    }

    pub fn box_padded(&self, id: ControlId) -> bool {
        self.box_data(id).padded
    }

    pub fn box_set_padded(&mut self, id: ControlId, padded: bool) {
        self.box_data_mut(id).padded = padded;
        self.minimum_size_changed(id);
    }

    fn box_items(&self, b: &BoxLayout) -> Vec<(ControlId, BoxItem)> {
        b.children
            .iter()
            .filter(|c| self.node(c.control).visible)
            .map(|c| {
                let item = BoxItem { min: self.minimum_size(c.control), stretchy: c.stretchy };
                (c.control, item)
            })
            .collect()
    }

    fn box_padding(&self, id: ControlId, b: &BoxLayout) -> i32 {
        let (xpad, ypad) = self.sizing(id).padding(b.padded);
        match b.orientation {
            Orientation::Horizontal => xpad,
            Orientation::Vertical => ypad,
        }
    }

    pub(crate) fn box_minimum_size(&self, id: ControlId) -> Size {
        let b = self.box_data(id);
        let items: Vec<BoxItem> = self.box_items(b).into_iter().map(|(_, item)| item).collect();
        minimum_size(b.orientation, &items, self.box_padding(id, b))
    }

    pub(crate) fn relayout_box(&mut self, id: ControlId, area: Bounds) {
        let b = self.box_data(id);
        let (controls, items): (Vec<ControlId>, Vec<BoxItem>) =
            self.box_items(b).into_iter().unzip();
        let placed = layout(b.orientation, &items, area, self.box_padding(id, b));
        for (child, bounds) in controls.into_iter().zip(placed) {
            self.relayout(child, bounds);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;

    fn item(w: i32, h: i32, stretchy: bool) -> BoxItem {
        BoxItem { min: Size::new(w, h), stretchy }
    }

    // ── math ──────────────────────────────────────────────────────────────

    #[test]
    fn fixed_child_keeps_minimum_and_stretchy_takes_rest() {
        let items = [item(50, 10, true), item(100, 20, false)];
        let placed = layout(Orientation::Horizontal, &items, Bounds::new(0, 0, 300, 40), 0);
        assert_eq!(placed[0], Bounds::new(0, 0, 200, 40));
        assert_eq!(placed[1], Bounds::new(200, 0, 100, 40));
    }

    #[test]
    fn extents_and_padding_fill_the_axis() {
        let items = [item(10, 5, false), item(20, 5, true), item(30, 5, false), item(5, 5, true)];
        let pad = 4;
        // 200 - 3*4 - 40 = 148, split in two
        let placed = layout(Orientation::Horizontal, &items, Bounds::new(0, 0, 200, 10), pad);
        let sum: i32 = placed.iter().map(|b| b.width).sum();
        assert_eq!(sum + 3 * pad, 200);
        assert_eq!(placed[1].width, 74);
        assert_eq!(placed[3].x, placed[2].right() + pad);
    }

    #[test]
    fn stretchy_division_truncates() {
        let items = [item(0, 0, true), item(0, 0, true), item(0, 0, true)];
        let placed = layout(Orientation::Vertical, &items, Bounds::new(0, 0, 10, 100), 0);
        assert!(placed.iter().all(|b| b.height == 33));
        assert_eq!(placed[2].bottom(), 99);
    }

    #[test]
    fn minimum_size_counts_stretchy_at_largest() {
        let items = [item(10, 7, false), item(20, 3, true), item(40, 2, true)];
        assert_eq!(
            minimum_size(Orientation::Horizontal, &items, 5),
            Size::new(10 + 2 * 40 + 10, 7)
        );
        assert_eq!(minimum_size(Orientation::Vertical, &items, 0), Size::new(40, 7 + 2 * 3));
    }

    #[test]
    fn empty_box_is_zero_and_places_nothing() {
        assert_eq!(minimum_size(Orientation::Vertical, &[], 4), Size::zero());
        assert!(layout(Orientation::Vertical, &[], Bounds::new(0, 0, 10, 10), 4).is_empty());
    }

    // ── through the control tree ──────────────────────────────────────────

    #[test]
    fn hidden_children_are_skipped() {
        let mut ui = Ui::new(RecordingHost::new());
        let b = ui.new_box(Orientation::Horizontal);
        ui.box_set_padded(b, true);
        let a = ui.new_native("a", Size::new(30, 10));
        let hidden = ui.new_native("h", Size::new(500, 500));
        let c = ui.new_native("c", Size::new(10, 10));
        ui.hide(hidden);
        ui.box_append(b, a, false);
        ui.box_append(b, hidden, false);
        ui.box_append(b, c, true);

        assert_eq!(ui.minimum_size(b), Size::new(30 + 4 + 10, 10));
        ui.relayout(b, Bounds::new(0, 0, 100, 20));
        assert_eq!(ui.host().bounds_of(ui.handle(c)), Some(Bounds::new(34, 0, 66, 20)));
        assert_eq!(ui.host().move_count(ui.handle(hidden)), 0);
    }

    #[test]
    fn delete_returns_unparented_child() {
        let mut ui = Ui::new(RecordingHost::new());
        let b = ui.new_box(Orientation::Vertical);
        let a = ui.new_native("a", Size::new(1, 1));
        ui.box_append(b, a, false);
        assert_eq!(ui.box_delete(b, 0), a);
        assert_eq!(ui.parent(a), None);
        assert_eq!(ui.box_num_children(b), 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn delete_past_end_is_a_usage_bug() {
        let mut ui = Ui::new(RecordingHost::new());
        let b = ui.new_box(Orientation::Vertical);
        ui.box_delete(b, 0);
    }
}
