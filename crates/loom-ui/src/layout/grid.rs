use std::collections::HashMap;

use crate::control::{ControlId, ControlKind};
use crate::error::{user_bug, UsageError};
use crate::geometry::{Bounds, Size};
use crate::host::{HandleClass, Host};
use crate::ui::Ui;

/// Placement of a cell within the space its row/column gives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Fill,
    Start,
    Center,
    End,
}

/// Where [`Ui::grid_insert_at`] puts a new cell relative to an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum At {
    Leading,
    Top,
    Trailing,
    Bottom,
}

/// Position, span, expansion and alignment of one grid cell.
///
/// ```rust,ignore
/// ui.grid_append(grid, label, GridPlacement::at(0, 0).halign(Align::End));
/// ui.grid_append(grid, entry, GridPlacement::at(1, 0).hexpand(true));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPlacement {
    pub left: i32,
    pub top: i32,
    pub xspan: i32,
    pub yspan: i32,
    pub hexpand: bool,
    pub halign: Align,
    pub vexpand: bool,
    pub valign: Align,
}

impl GridPlacement {
    pub fn at(left: i32, top: i32) -> Self {
        Self {
            left,
            top,
            xspan: 1,
            yspan: 1,
            hexpand: false,
            halign: Align::Fill,
            vexpand: false,
            valign: Align::Fill,
        }
    }

    pub fn span(mut self, xspan: i32, yspan: i32) -> Self {
        self.xspan = xspan;
        self.yspan = yspan;
        self
    }

    pub fn hexpand(mut self, v: bool) -> Self {
        self.hexpand = v;
        self
    }

    pub fn halign(mut self, v: Align) -> Self {
        self.halign = v;
        self
    }

    pub fn vexpand(mut self, v: bool) -> Self {
        self.vexpand = v;
        self
    }

    pub fn valign(mut self, v: Align) -> Self {
        self.valign = v;
        self
    }
}

impl Default for GridPlacement {
    fn default() -> Self {
        Self::at(0, 0)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct GridChild {
    pub control: ControlId,
    pub cell: GridPlacement,
}

#[derive(Debug, Default)]
pub(crate) struct GridLayout {
    pub children: Vec<GridChild>,
    pub index_of: HashMap<ControlId, usize>,
    pub padded: bool,
}

impl GridLayout {
    fn reindex(&mut self) {
        self.index_of = self.children.iter().enumerate().map(|(i, c)| (c.control, i)).collect();
    }
}

/// A visible cell with its minimum size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GridItem {
    pub cell: GridPlacement,
    pub min: Size,
}

impl GridItem {
    fn occupies_space(&self) -> bool {
        self.cell.xspan > 0 && self.cell.yspan > 0
    }
}

/// Occupancy map over the bounding range of the cells.
struct Occupancy {
    xmin: i32,
    ymin: i32,
    xcount: usize,
    ycount: usize,
    /// `cells[y * xcount + x]`; later cells overwrite earlier ones.
    cells: Vec<Option<usize>>,
    visible_cols: Vec<bool>,
    visible_rows: Vec<bool>,
}

impl Occupancy {
    fn build(items: &[GridItem]) -> Option<Self> {
        let placed = || items.iter().filter(|i| i.occupies_space());
        let xmin = placed().map(|i| i.cell.left).min()?;
        let ymin = placed().map(|i| i.cell.top).min()?;
        let xmax = placed().map(|i| i.cell.left + i.cell.xspan).max()?;
        let ymax = placed().map(|i| i.cell.top + i.cell.yspan).max()?;
        let xcount = (xmax - xmin) as usize;
        let ycount = (ymax - ymin) as usize;

        let mut cells = vec![None; xcount * ycount];
        for (index, item) in items.iter().enumerate().filter(|(_, i)| i.occupies_space()) {
            let x0 = (item.cell.left - xmin) as usize;
            let y0 = (item.cell.top - ymin) as usize;
            for y in y0..y0 + item.cell.yspan as usize {
                for x in x0..x0 + item.cell.xspan as usize {
                    cells[y * xcount + x] = Some(index);
                }
            }
        }

        // A row/column only gets padding if something sits in it unspanned
        // or starts a span there.
        let mut visible_cols = vec![false; xcount];
        let mut visible_rows = vec![false; ycount];
        for y in 0..ycount {
            for x in 0..xcount {
                let Some(i) = cells[y * xcount + x] else {
                    continue;
                };
                let cell = items[i].cell;
                if cell.xspan == 1 || x as i32 == cell.left - xmin {
                    visible_cols[x] = true;
                }
                if cell.yspan == 1 || y as i32 == cell.top - ymin {
                    visible_rows[y] = true;
                }
            }
        }
        Some(Self { xmin, ymin, xcount, ycount, cells, visible_cols, visible_rows })
    }

    fn occupants(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        (0..self.ycount).flat_map(move |y| {
            (0..self.xcount).filter_map(move |x| self.cells[y * self.xcount + x].map(|i| (x, y, i)))
        })
    }

    fn n_visible_cols(&self) -> i32 {
        self.visible_cols.iter().filter(|v| **v).count() as i32
    }

    fn n_visible_rows(&self) -> i32 {
        self.visible_rows.iter().filter(|v| **v).count() as i32
    }

    /// Column widths and row heights from cell minimums. Spanning cells are
    /// not skipped: each contributes `min / span` (truncated) to every
    /// row/column it covers.
    fn intrinsic_sizes(&self, items: &[GridItem]) -> (Vec<i32>, Vec<i32>) {
        let mut widths = vec![0; self.xcount];
        let mut heights = vec![0; self.ycount];
        for (x, y, i) in self.occupants() {
            let item = &items[i];
            widths[x] = widths[x].max(item.min.width / item.cell.xspan);
            heights[y] = heights[y].max(item.min.height / item.cell.yspan);
        }
        (widths, heights)
    }
}

pub(crate) fn minimum_size(items: &[GridItem], xpad: i32, ypad: i32) -> Size {
    let Some(occ) = Occupancy::build(items) else {
        return Size::zero();
    };
    let (widths, heights) = occ.intrinsic_sizes(items);
    Size::new(
        widths.iter().sum::<i32>() + (occ.n_visible_cols() - 1) * xpad,
        heights.iter().sum::<i32>() + (occ.n_visible_rows() - 1) * ypad,
    )
}

/// Marks every spanned track as expanding when none of them already is.
fn spread_spanning_expansion(expand: &mut [bool], start: usize, span: usize) {
    let tracks = &mut expand[start..start + span];
    if !tracks.iter().any(|e| *e) {
        tracks.fill(true);
    }
}

/// Gives the expanding tracks an equal share of what the fixed ones leave.
fn distribute(sizes: &mut [i32], expand: &[bool], mut available: i32) {
    let n_expand = expand.iter().filter(|e| **e).count() as i32;
    for (size, e) in sizes.iter().zip(expand) {
        if !*e {
            available -= *size;
        }
    }
    if n_expand == 0 {
        return;
    }
    let share = (available / n_expand).max(0);
    for (size, e) in sizes.iter_mut().zip(expand) {
        if *e {
            *size = share;
        }
    }
}

/// Track start offsets. Padding precedes a track only when it is visible.
fn offsets(sizes: &[i32], visible: &[bool], pad: i32) -> Vec<i32> {
    let mut out = Vec::with_capacity(sizes.len());
    let mut cur = 0;
    for i in 0..sizes.len() {
        if i > 0 {
            cur += sizes[i - 1];
            if visible[i] {
                cur += pad;
            }
        }
        out.push(cur);
    }
    out
}

fn align(pos: i32, extent: i32, min: i32, how: Align) -> (i32, i32) {
    let slack = extent - min;
    if how == Align::Fill || slack <= 0 {
        return (pos, extent);
    }
    match how {
        Align::Center => (pos + slack / 2, min),
        Align::End => (pos + slack, min),
        _ => (pos, min),
    }
}

/// Final rectangles for `items`, `None` for cells with an empty span.
pub(crate) fn layout(
    items: &[GridItem],
    area: Bounds,
    xpad: i32,
    ypad: i32,
) -> Vec<Option<Bounds>> {
    let Some(occ) = Occupancy::build(items) else {
        return vec![None; items.len()];
    };
    let width = area.width - (occ.n_visible_cols() - 1) * xpad;
    let height = area.height - (occ.n_visible_rows() - 1) * ypad;

    let (mut widths, mut heights) = occ.intrinsic_sizes(items);

    let mut hexpand = vec![false; occ.xcount];
    let mut vexpand = vec![false; occ.ycount];
    for (x, y, i) in occ.occupants() {
        let cell = items[i].cell;
        if cell.hexpand && cell.xspan == 1 {
            hexpand[x] = true;
        }
        if cell.vexpand && cell.yspan == 1 {
            vexpand[y] = true;
        }
    }
    for item in items.iter().filter(|i| i.occupies_space()) {
        let cell = item.cell;
        if cell.hexpand && cell.xspan != 1 {
            let start = (cell.left - occ.xmin) as usize;
            spread_spanning_expansion(&mut hexpand, start, cell.xspan as usize);
        }
        if cell.vexpand && cell.yspan != 1 {
            let start = (cell.top - occ.ymin) as usize;
            spread_spanning_expansion(&mut vexpand, start, cell.yspan as usize);
        }
    }

    distribute(&mut widths, &hexpand, width);
    distribute(&mut heights, &vexpand, height);

    let xs = offsets(&widths, &occ.visible_cols, xpad);
    let ys = offsets(&heights, &occ.visible_rows, ypad);

    items
        .iter()
        .map(|item| {
            if !item.occupies_space() {
                return None;
            }
            let cell = item.cell;
            let x0 = (cell.left - occ.xmin) as usize;
            let y0 = (cell.top - occ.ymin) as usize;
            let x1 = x0 + cell.xspan as usize - 1;
            let y1 = y0 + cell.yspan as usize - 1;
            let w = xs[x1] + widths[x1] - xs[x0];
            let h = ys[y1] + heights[y1] - ys[y0];
            let (x, w) = align(xs[x0], w, item.min.width, cell.halign);
            let (y, h) = align(ys[y0], h, item.min.height, cell.valign);
            Some(Bounds::new(area.x + x, area.y + y, w, h))
        })
        .collect()
}

impl<H: Host> Ui<H> {
    pub fn new_grid(&mut self) -> ControlId {
        self.insert(ControlKind::Grid(GridLayout::default()), HandleClass::Container)
    }

    fn grid(&self, id: ControlId) -> &GridLayout {
        match &self.node(id).kind {
            ControlKind::Grid(g) => g,
            _ => user_bug(UsageError::WrongKind(id, "grid")),
        }
    }

    fn grid_mut(&mut self, id: ControlId) -> &mut GridLayout {
        match &mut self.node_mut(id).kind {
            ControlKind::Grid(g) => g,
            _ => user_bug(UsageError::WrongKind(id, "grid")),
        }
    }

    fn check_span(cell: &GridPlacement) {
        if cell.xspan < 0 || cell.yspan < 0 {
            user_bug(UsageError::NegativeSpan { xspan: cell.xspan, yspan: cell.yspan });
        }
    }

    pub fn grid_append(&mut self, id: ControlId, child: ControlId, cell: GridPlacement) {
        Self::check_span(&cell);
        self.grid(id);
        self.set_parent(child, Some(id));
        let g = self.grid_mut(id);
        g.index_of.insert(child, g.children.len());
        g.children.push(GridChild { control: child, cell });
        self.minimum_size_changed(id);
    }

    /// Inserts `child` next to `existing`, on the side named by `at`. The
    /// position in `cell` is ignored; span, expansion and alignment are used.
    pub fn grid_insert_at(
        &mut self,
        id: ControlId,
        child: ControlId,
        existing: ControlId,
        at: At,
        cell: GridPlacement,
    ) {
        Self::check_span(&cell);
        let Some(&index) = self.grid(id).index_of.get(&existing) else {
            user_bug(UsageError::NotInGrid(existing));
        };
        let prev = self.grid(id).children[index].cell;
        let mut cell = cell;
        match at {
            At::Leading => {
                cell.left = prev.left - cell.xspan;
                cell.top = prev.top;
            }
            At::Top => {
                cell.top = prev.top - cell.yspan;
                cell.left = prev.left;
            }
            At::Trailing => {
                cell.left = prev.left + prev.xspan;
                cell.top = prev.top;
            }
            At::Bottom => {
                cell.top = prev.top + prev.yspan;
                cell.left = prev.left;
            }
        }
        self.set_parent(child, Some(id));
        let g = self.grid_mut(id);
        g.children.insert(index + 1, GridChild { control: child, cell });
        g.reindex();
        self.minimum_size_changed(id);
    }

    pub fn grid_cell(&self, id: ControlId, child: ControlId) -> GridPlacement {
        let g = self.grid(id);
        match g.index_of.get(&child) {
            Some(&i) => g.children[i].cell,
            None => user_bug(UsageError::NotInGrid(child)),
        }
    }

    pub fn grid_num_children(&self, id: ControlId) -> usize {
        self.grid(id).children.len()
    }

    pub fn grid_padded(&self, id: ControlId) -> bool {
        self.grid(id).padded
    }

    pub fn grid_set_padded(&mut self, id: ControlId, padded: bool) {
        self.grid_mut(id).padded = padded;
        self.minimum_size_changed(id);
    }

    fn grid_items(&self, g: &GridLayout) -> Vec<(ControlId, GridItem)> {
        g.children
            .iter()
            .filter(|c| self.node(c.control).visible)
            .map(|c| (c.control, GridItem { cell: c.cell, min: self.minimum_size(c.control) }))
            .collect()
    }

    pub(crate) fn grid_minimum_size(&self, id: ControlId) -> Size {
        let g = self.grid(id);
        let items: Vec<GridItem> = self.grid_items(g).into_iter().map(|(_, item)| item).collect();
        let (xpad, ypad) = self.sizing(id).padding(g.padded);
        minimum_size(&items, xpad, ypad)
    }

    pub(crate) fn relayout_grid(&mut self, id: ControlId, area: Bounds) {
        let g = self.grid(id);
        let (xpad, ypad) = self.sizing(id).padding(g.padded);
        let (controls, items): (Vec<ControlId>, Vec<GridItem>) =
            self.grid_items(g).into_iter().unzip();
        let placed = layout(&items, area, xpad, ypad);
        for (child, bounds) in controls.into_iter().zip(placed) {
            if let Some(bounds) = bounds {
                self.relayout(child, bounds);
            }
        }
    }
}
