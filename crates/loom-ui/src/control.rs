use crate::geometry::{Bounds, Size};
use crate::host::NativeHandle;
use crate::layout::{BoxLayout, FormLayout, GridLayout};
use crate::table::Table;

/// Index of a control in its [`Ui`](crate::Ui) arena.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(pub(crate) usize);

#[derive(Debug)]
pub(crate) struct WindowData {
    pub title: String,
    pub child: Option<ControlId>,
    pub margined: bool,
    pub content: Size,
}

/// A leaf created by a collaborator; only its minimum size matters here.
#[derive(Debug)]
pub(crate) struct NativeData {
    pub class: String,
    pub min_size: Size,
}

pub(crate) enum ControlKind {
    Window(WindowData),
    Native(NativeData),
    Box(BoxLayout),
    Form(FormLayout),
    Grid(GridLayout),
    Table(Box<Table>),
}

impl ControlKind {
    pub fn name(&self) -> &'static str {
        match self {
            ControlKind::Window(_) => "window",
            ControlKind::Native(_) => "native control",
            ControlKind::Box(_) => "box",
            ControlKind::Form(_) => "form",
            ControlKind::Grid(_) => "grid",
            ControlKind::Table(_) => "table",
        }
    }

    /// Owned children in layout order.
    pub fn children(&self) -> Vec<ControlId> {
        match self {
            ControlKind::Window(w) => w.child.into_iter().collect(),
            ControlKind::Box(b) => b.children.iter().map(|c| c.control).collect(),
            ControlKind::Form(f) => f.rows.iter().map(|r| r.control).collect(),
            ControlKind::Grid(g) => g.children.iter().map(|c| c.control).collect(),
            ControlKind::Native(_) | ControlKind::Table(_) => Vec::new(),
        }
    }
}

pub(crate) struct Node {
    pub kind: ControlKind,
    pub parent: Option<ControlId>,
    pub handle: NativeHandle,
    pub visible: bool,
    pub enabled: bool,
    /// Last bounds assigned by the parent, in the parent's client space.
    pub bounds: Option<Bounds>,
}
