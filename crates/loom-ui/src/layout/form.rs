use crate::control::{ControlId, ControlKind};
use crate::error::{user_bug, UsageError};
use crate::geometry::{Bounds, Size, Sizing};
use crate::host::{HandleClass, Host, NativeHandle};
use crate::ui::Ui;

/// Label height in dialog units.
const LABEL_HEIGHT_DLU: i32 = 8;
/// Label offset from the top of its row in dialog units.
const LABEL_Y_OFFSET_DLU: i32 = 3;

#[derive(Debug)]
pub(crate) struct FormRow {
    pub label: NativeHandle,
    pub text: String,
    pub control: ControlId,
    pub stretchy: bool,
    pub label_shown: bool,
}

#[derive(Debug, Default)]
pub(crate) struct FormLayout {
    pub rows: Vec<FormRow>,
    pub padded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FormItem {
    pub label_width: i32,
    pub min: Size,
    pub stretchy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FormPlacement {
    pub label: Bounds,
    pub control: Bounds,
}

pub(crate) fn minimum_size(items: &[FormItem], xpad: i32, ypad: i32) -> Size {
    if items.is_empty() {
        return Size::zero();
    }
    let mut max_label = 0;
    let mut max_control = 0;
    let mut max_stretchy = 0;
    let mut n_stretchy = 0;
    let mut height = 0;
    for item in items {
        max_label = max_label.max(item.label_width);
        max_control = max_control.max(item.min.width);
        if item.stretchy {
            n_stretchy += 1;
            max_stretchy = max_stretchy.max(item.min.height);
        } else {
            height += item.min.height;
        }
    }
    height += n_stretchy * max_stretchy + (items.len() as i32 - 1) * ypad;
    Size::new(max_label + xpad + max_control, height)
}

/// Places labels in a left column as wide as the widest label and controls
/// in the rest. Stretchy rows share the leftover height, truncated.
pub(crate) fn layout(
    items: &[FormItem],
    area: Bounds,
    xpad: i32,
    ypad: i32,
    sizing: &Sizing,
) -> Vec<FormPlacement> {
    if items.is_empty() {
        return Vec::new();
    }
    let label_width = items.iter().map(|i| i.label_width).max().unwrap_or(0);
    let gaps = (items.len() as i32 - 1) * ypad;
    let mut stretchy_height = area.height - gaps;
    let mut n_stretchy = 0;
    for item in items {
        if item.stretchy {
            n_stretchy += 1;
        } else {
            stretchy_height -= item.min.height;
        }
    }
    if n_stretchy != 0 {
        stretchy_height /= n_stretchy;
    }

    let control_x = area.x + label_width + xpad;
    let control_width = area.width - label_width - xpad;
    let label_height = sizing.dlu_to_y(LABEL_HEIGHT_DLU);
    let label_offset = sizing.dlu_to_y(LABEL_Y_OFFSET_DLU) - sizing.internal_leading;

    let mut y = area.y;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let height = if item.stretchy { stretchy_height } else { item.min.height };
        out.push(FormPlacement {
            label: Bounds::new(area.x, y + label_offset, label_width, label_height),
            control: Bounds::new(control_x, y, control_width, height),
        });
        y += height + ypad;
    }
    out
}

impl<H: Host> Ui<H> {
    pub fn new_form(&mut self) -> ControlId {
        self.insert(ControlKind::Form(FormLayout::default()), HandleClass::Container)
    }

    fn form(&self, id: ControlId) -> &FormLayout {
        match &self.node(id).kind {
            ControlKind::Form(f) => f,
            _ => user_bug(UsageError::WrongKind(id, "form")),
        }
    }

    fn form_mut(&mut self, id: ControlId) -> &mut FormLayout {
        match &mut self.node_mut(id).kind {
            ControlKind::Form(f) => f,
            _ => user_bug(UsageError::WrongKind(id, "form")),
        }
    }

    /// Appends a labelled row. The label is a native static text owned by
    /// the form.
    pub fn form_append(&mut self, id: ControlId, label: &str, child: ControlId, stretchy: bool) {
        self.form(id);
        let parent = self.handle(id);
        self.set_parent(child, Some(id));
        let label_handle = self.create_handle(&HandleClass::Label, Some(parent));
        self.host.set_text(label_handle, label);
        self.form_mut(id).rows.push(FormRow {
            label: label_handle,
            text: label.to_owned(),
            control: child,
            stretchy,
            label_shown: true,
        });
        self.minimum_size_changed(id);
    }

    /// Removes row `index`, destroying its label and returning the control
    /// unparented.
    pub fn form_delete(&mut self, id: ControlId, index: usize) -> ControlId {
        let len = self.form(id).rows.len();
        if index >= len {
            user_bug(UsageError::ChildIndexOutOfRange { index, len });
        }
        let row = self.form_mut(id).rows.remove(index);
        if !row.label.is_null() {
            self.host.destroy_handle(row.label);
        }
        self.detach(row.control);
        self.minimum_size_changed(id);
        row.control
    }

    pub fn form_num_children(&self, id: ControlId) -> usize {
        self.form(id).rows.len()
    }

    pub fn form_label(&self, id: ControlId, index: usize) -> &str {
        let rows = &self.form(id).rows;
        match rows.get(index) {
            Some(row) => &row.text,
            None => user_bug(UsageError::ChildIndexOutOfRange { index, len: rows.len() }),
        }
    }

    pub fn form_padded(&self, id: ControlId) -> bool {
        self.form(id).padded
    }

    pub fn form_set_padded(&mut self, id: ControlId, padded: bool) {
        self.form_mut(id).padded = padded;
        self.minimum_size_changed(id);
    }

    fn form_items(&self, f: &FormLayout) -> Vec<(usize, FormItem)> {
        f.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| self.node(r.control).visible)
            .map(|(i, r)| {
                let item = FormItem {
                    label_width: self.host.text_width(r.label, &r.text),
                    min: self.minimum_size(r.control),
                    stretchy: r.stretchy,
                };
                (i, item)
            })
            .collect()
    }

    pub(crate) fn form_minimum_size(&self, id: ControlId) -> Size {
        let f = self.form(id);
        let items: Vec<FormItem> = self.form_items(f).into_iter().map(|(_, item)| item).collect();
        let (xpad, ypad) = self.sizing(id).padding(f.padded);
        minimum_size(&items, xpad, ypad)
    }

    pub(crate) fn relayout_form(&mut self, id: ControlId, area: Bounds) {
        let sizing = self.sizing(id);
        let f = self.form(id);
        let (xpad, ypad) = sizing.padding(f.padded);
        let (indices, items): (Vec<usize>, Vec<FormItem>) = self.form_items(f).into_iter().unzip();
        let placed = layout(&items, area, xpad, ypad, &sizing);

        // Labels follow their control's visibility.
        let mut toggles = Vec::new();
        for (i, row) in f.rows.iter().enumerate() {
            let shown = indices.contains(&i);
            if shown != row.label_shown {
                toggles.push((i, row.label, shown));
            }
        }
        let moves: Vec<(NativeHandle, ControlId, FormPlacement)> = indices
            .iter()
            .zip(placed)
            .map(|(&i, p)| (f.rows[i].label, f.rows[i].control, p))
            .collect();

        for (i, label, shown) in toggles {
            self.form_mut(id).rows[i].label_shown = shown;
            self.host.set_visible(label, shown);
        }
        for (label, control, p) in moves {
            if !label.is_null() {
                self.host.move_resize(label, p.label);
            }
            self.relayout(control, p.control);
        }
    }
}
