use crate::geometry::Bounds;

use super::model::TableModel;

/// Whether a checkbox, text or button part reacts to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Editable {
    #[default]
    Never,
    Always,
    /// Editable in rows where this model column holds a non-zero `Int`.
    Column(usize),
}

impl Editable {
    pub(crate) fn resolve(self, model: &TableModel, row: usize) -> bool {
        match self {
            Editable::Never => false,
            Editable::Always => true,
            Editable::Column(c) => {
                model.cell_value(row, c).and_then(|v| v.as_int()).is_some_and(|v| v != 0)
            }
        }
    }
}

/// Optional text styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextColumnParams {
    /// Model column holding a `Color` for the text, per row.
    pub color_column: Option<usize>,
}

/// Header sort arrow. Sorting itself is up to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortIndicator {
    #[default]
    None,
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TextPart {
    pub column: usize,
    pub editable: Editable,
    pub params: TextColumnParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ModelPart {
    pub column: usize,
    pub editable: Editable,
}

/// One view column. Which parts are set decides how its cells paint and
/// react to clicks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ColumnParams {
    pub name: String,
    pub width: i32,
    pub sort: SortIndicator,
    pub text: Option<TextPart>,
    pub image: Option<usize>,
    pub checkbox: Option<ModelPart>,
    pub progress: Option<usize>,
    pub button: Option<ModelPart>,
}

impl ColumnParams {
    pub fn new(name: &str, width: i32) -> Self {
        Self {
            name: name.to_owned(),
            width,
            sort: SortIndicator::None,
            text: None,
            image: None,
            checkbox: None,
            progress: None,
            button: None,
        }
    }

    /// Model columns this view column reads.
    pub fn model_columns(&self) -> impl Iterator<Item = usize> + '_ {
        let text = self
            .text
            .into_iter()
            .flat_map(|t| [Some(t.column), t.params.color_column])
            .flatten();
        let editable = |e: Editable| match e {
            Editable::Column(c) => Some(c),
            _ => None,
        };
        let part = move |p: ModelPart| [Some(p.column), editable(p.editable)];
        let checkbox = self.checkbox.into_iter().flat_map(part).flatten();
        let button = self.button.into_iter().flat_map(part).flatten();
        let text_editable = self.text.and_then(|t| editable(t.editable));
        text.chain(text_editable)
            .chain(self.image)
            .chain(checkbox)
            .chain(self.progress)
            .chain(button)
    }
}

/// Part of a cell under a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CellPart {
    Checkbox,
    Image,
    Text,
    Progress,
    Button,
}

/// Rectangles of each part inside one cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CellParts {
    pub checkbox: Option<Bounds>,
    pub image: Option<Bounds>,
    pub text: Option<Bounds>,
    pub progress: Option<Bounds>,
    pub button: Option<Bounds>,
}

impl CellParts {
    /// Lays parts out left to right: checkbox, image, text. Progress bars and
    /// buttons take the whole cell less the padding.
    pub fn layout(column: &ColumnParams, cell: Bounds, pad: i32) -> Self {
        let glyph = (cell.height - 2 * pad).max(0);
        let mut x = cell.x + pad;
        let mut parts = CellParts::default();
        if column.checkbox.is_some() {
            parts.checkbox = Some(Bounds::new(x, cell.y + pad, glyph, glyph));
            x += glyph + pad;
        }
        if column.image.is_some() {
            parts.image = Some(Bounds::new(x, cell.y + pad, glyph, glyph));
            x += glyph + pad;
        }
        if column.text.is_some() {
            parts.text = Some(Bounds::new(x, cell.y, (cell.right() - pad - x).max(0), cell.height));
        }
        if column.progress.is_some() {
            parts.progress = Some(cell.inset(pad, pad));
        }
        if column.button.is_some() {
            parts.button = Some(cell.inset(pad, pad));
        }
        parts
    }

    pub fn hit(&self, x: i32, y: i32) -> Option<CellPart> {
        [
            (self.checkbox, CellPart::Checkbox),
            (self.image, CellPart::Image),
            (self.text, CellPart::Text),
            (self.progress, CellPart::Progress),
            (self.button, CellPart::Button),
        ]
        .into_iter()
        .find_map(|(b, part)| b.filter(|b| b.contains(x, y)).map(|_| part))
    }
}
