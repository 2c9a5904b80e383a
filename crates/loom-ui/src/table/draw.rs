use loom_engine::coords::Rect;
use loom_engine::draw::{DrawContext, DrawError, DrawPath, FillMode, StrokeParams};
use loom_engine::paint::{Brush, Color};
use loom_engine::text::{
    Attribute, AttributedString, FontDescriptor, FontSystem, TextAlign, TextLayout,
    TextLayoutParams,
};

use crate::control::ControlId;
use crate::geometry::Bounds;
use crate::host::Host;
use crate::ui::Ui;

use super::column::{CellParts, ColumnParams, SortIndicator};
use super::progress::{PHASE_STEPS, PROGRESS_INDETERMINATE};
use super::{Metrics, Table};

const BACKGROUND: Color = Color::new(1.0, 1.0, 1.0, 1.0);
const HEADER_BACKGROUND: Color = Color::new(0.94, 0.94, 0.94, 1.0);
const GRID_LINE: Color = Color::new(0.85, 0.85, 0.85, 1.0);
const SELECTION: Color = Color::new(0.0, 0.47, 0.84, 1.0);
const TEXT: Color = Color::new(0.0, 0.0, 0.0, 1.0);
const SELECTED_TEXT: Color = Color::new(1.0, 1.0, 1.0, 1.0);
const CHECK_BORDER: Color = Color::new(0.2, 0.2, 0.2, 1.0);
const PROGRESS_TRACK: Color = Color::new(0.9, 0.9, 0.9, 1.0);
const PROGRESS_FILL: Color = Color::new(0.02, 0.69, 0.14, 1.0);
const BUTTON_FACE: Color = Color::new(0.88, 0.88, 0.88, 1.0);

fn rect(b: Bounds) -> Rect {
    Rect::new(b.x as f64, b.y as f64, b.width as f64, b.height as f64)
}

fn rect_path(b: Bounds) -> Result<DrawPath, DrawError> {
    let mut p = DrawPath::new(FillMode::Winding);
    p.add_rectangle(b.x as f64, b.y as f64, b.width as f64, b.height as f64)?;
    p.end()?;
    Ok(p)
}

fn fill(ctx: &mut DrawContext, b: Bounds, color: Color) -> Result<(), DrawError> {
    if b.width <= 0 || b.height <= 0 {
        return Ok(());
    }
    ctx.fill(&rect_path(b)?, &Brush::Solid(color))
}

fn outline(ctx: &mut DrawContext, b: Bounds, color: Color) -> Result<(), DrawError> {
    ctx.stroke(&rect_path(b)?, &Brush::Solid(color), &StrokeParams::default())
}

/// Runs `f` with the clip narrowed to `b`, restoring it even if `f` fails.
fn clipped(
    ctx: &mut DrawContext,
    b: Bounds,
    f: impl FnOnce(&mut DrawContext) -> Result<(), DrawError>,
) -> Result<(), DrawError> {
    let clip = rect_path(b)?;
    ctx.save();
    let drawn = ctx.clip(&clip).and_then(|_| f(ctx));
    ctx.restore()?;
    drawn
}

/// Text vertically centred in `b`. A non-left alignment lays out against
/// the full width of `b`.
fn text(
    ctx: &mut DrawContext,
    fonts: &FontSystem,
    font: &FontDescriptor,
    s: &str,
    color: Color,
    b: Bounds,
    align: TextAlign,
) {
    let mut string = AttributedString::new(s);
    let len = string.len();
    if let Err(err) = string.set_attribute(Attribute::Color(color), 0, len) {
        log::warn!("cannot color cell text: {err}");
    }
    let mut params = TextLayoutParams::new(string, font.clone()).align(align);
    if align != TextAlign::Left {
        params = params.width(b.width as f64);
    }
    let layout = TextLayout::new(&params, fonts);
    let (_, height) = layout.extents();
    ctx.draw_text(&layout, b.x as f64, b.y as f64 + (b.height as f64 - height) / 2.0);
}

fn sort_arrow(
    ctx: &mut DrawContext,
    b: Bounds,
    sort: SortIndicator,
    pad: i32,
) -> Result<(), DrawError> {
    let size = (b.height / 3).max(2) as f64;
    let cx = (b.right() - pad) as f64 - size;
    let cy = b.y as f64 + b.height as f64 / 2.0;
    let (tip, base) = match sort {
        SortIndicator::None => return Ok(()),
        SortIndicator::Ascending => (cy - size / 2.0, cy + size / 2.0),
        SortIndicator::Descending => (cy + size / 2.0, cy - size / 2.0),
    };
    let mut p = DrawPath::new(FillMode::Winding);
    p.new_figure(cx, tip)?;
    p.line_to(cx + size, base)?;
    p.line_to(cx - size, base)?;
    p.close_figure()?;
    p.end()?;
    ctx.fill(&p, &Brush::Solid(TEXT))
}

fn check_mark(ctx: &mut DrawContext, b: Bounds) -> Result<(), DrawError> {
    let (x, y, w, h) = (b.x as f64, b.y as f64, b.width as f64, b.height as f64);
    let mut p = DrawPath::new(FillMode::Winding);
    p.new_figure(x + w * 0.2, y + h * 0.5)?;
    p.line_to(x + w * 0.42, y + h * 0.75)?;
    p.line_to(x + w * 0.8, y + h * 0.25)?;
    p.end()?;
    ctx.stroke(&p, &Brush::Solid(CHECK_BORDER), &StrokeParams::default().thickness(1.5))
}

/// Marquee segment for an indeterminate bar at `phase`.
fn marquee(b: Bounds, phase: u32) -> Bounds {
    let seg = (b.width / 4).max(1);
    let travel = b.width + seg;
    let x = b.x - seg + travel * phase as i32 / PHASE_STEPS as i32;
    Bounds::new(x, b.y, seg, b.height)
}

struct CellPaint<'a> {
    table: &'a Table,
    fonts: &'a FontSystem,
    font: &'a FontDescriptor,
    m: Metrics,
    row: usize,
    selected: bool,
}

impl CellPaint<'_> {
    fn cell(
        &self,
        ctx: &mut DrawContext,
        column: &ColumnParams,
        cell: Bounds,
    ) -> Result<(), DrawError> {
        let model = &self.table.model;
        let row = self.row;
        let parts = CellParts::layout(column, cell, self.m.pad);

        if let (Some(part), Some(b)) = (column.checkbox, parts.checkbox) {
            fill(ctx, b, BACKGROUND)?;
            outline(ctx, b, CHECK_BORDER)?;
            let checked =
                model.cell_value(row, part.column).and_then(|v| v.as_int()).unwrap_or(0) != 0;
            if checked {
                check_mark(ctx, b)?;
            }
        }

        if let (Some(c), Some(b)) = (column.image, parts.image) {
            let value = model.cell_value(row, c);
            let bitmap = value
                .as_ref()
                .and_then(|v| v.as_image())
                .and_then(|i| i.best_for(b.width as u32, b.height as u32));
            if let Some(bitmap) = bitmap {
                ctx.draw_bitmap(bitmap, rect(b));
            }
        }

        if let (Some(part), Some(b)) = (column.text, parts.text) {
            if let Some(s) = model.cell_value(row, part.column).as_ref().and_then(|v| v.as_str()) {
                let color = if self.selected {
                    SELECTED_TEXT
                } else {
                    part.params
                        .color_column
                        .and_then(|c| model.cell_value(row, c))
                        .and_then(|v| v.as_color())
                        .unwrap_or(TEXT)
                };
                text(ctx, self.fonts, self.font, s, color, b, TextAlign::Left);
            }
        }

        if let (Some(c), Some(b)) = (column.progress, parts.progress) {
            let value = model.cell_value(row, c).and_then(|v| v.as_int()).unwrap_or(0);
            fill(ctx, b, PROGRESS_TRACK)?;
            if value == PROGRESS_INDETERMINATE {
                let phase = self.table.progress.phase(row, c).unwrap_or(0);
                clipped(ctx, b, |ctx| fill(ctx, marquee(b, phase), PROGRESS_FILL))?;
            } else {
                let width = b.width * value.clamp(0, 100) / 100;
                fill(ctx, Bounds::new(b.x, b.y, width, b.height), PROGRESS_FILL)?;
            }
            outline(ctx, b, GRID_LINE)?;
        }

        if let (Some(part), Some(b)) = (column.button, parts.button) {
            fill(ctx, b, BUTTON_FACE)?;
            outline(ctx, b, CHECK_BORDER)?;
            if let Some(s) = model.cell_value(row, part.column).as_ref().and_then(|v| v.as_str()) {
                text(ctx, self.fonts, self.font, s, TEXT, b, TextAlign::Center);
            }
        }
        Ok(())
    }
}

impl<H: Host> Ui<H> {
    /// Paints the table's client area into `ctx`.
    ///
    /// Only rows intersecting the viewport are read from the model.
    pub fn paint_table(&mut self, id: ControlId, ctx: &mut DrawContext) -> Result<(), DrawError> {
        let m = self.table_metrics(id);
        let visible = self.table(id).visible_rows(m);
        for row in visible {
            self.refresh_progress(id, row);
        }

        let table = self.table(id);
        let fonts = self.fonts();
        let font = self.font();
        let width = table.size.width;
        fill(ctx, Bounds::new(0, 0, width, table.size.height), BACKGROUND)?;

        if table.header_visible {
            let mut x = 0;
            for column in &table.columns {
                let b = Bounds::new(x, 0, column.width, m.header_height);
                fill(ctx, b, HEADER_BACKGROUND)?;
                fill(ctx, Bounds::new(b.right() - 1, 0, 1, b.height), GRID_LINE)?;
                clipped(ctx, b, |ctx| {
                    let label = Bounds::new(b.x + 2 * m.pad, b.y, b.width - 4 * m.pad, b.height);
                    text(ctx, fonts, font, &column.name, TEXT, label, TextAlign::Left);
                    sort_arrow(ctx, b, column.sort, m.pad)
                })?;
                x += column.width;
            }
        }

        for row in table.visible_rows(m) {
            let y = table.row_y(row, m);
            let row_bounds = Bounds::new(0, y, width.max(table.total_width()), m.row_height);
            let selected = table.selection.is_selected(row);
            if selected {
                fill(ctx, row_bounds, SELECTION)?;
            } else if let Some(c) = table.row_background {
                if let Some(color) = table.model.cell_value(row, c).and_then(|v| v.as_color()) {
                    fill(ctx, row_bounds, color)?;
                }
            }

            let painter = CellPaint { table, fonts, font, m, row, selected };
            let mut x = 0;
            for column in &table.columns {
                let cell = Bounds::new(x, y, column.width, m.row_height);
                x += column.width;
                if cell.right() <= 0 || cell.x >= width {
                    continue;
                }
                clipped(ctx, cell, |ctx| painter.cell(ctx, column, cell))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use loom_engine::coords::Point;
    use loom_engine::scene::DrawCmd;

    use super::*;
    use crate::host::RecordingHost;
    use crate::table::{
        Editable, Image, TableModel, TableModelHandler, TableParams, TableSelection, TableValue,
        TableValueType, TextColumnParams,
    };

    /// Rows of (text, image, progress, background); logs which rows were read.
    struct Logged {
        rows: usize,
        progress: i32,
        image: Rc<Image>,
        reads: Rc<RefCell<Vec<usize>>>,
    }

    impl TableModelHandler for Logged {
        fn num_columns(&self) -> usize {
            4
        }
        fn column_type(&self, column: usize) -> TableValueType {
            [
                TableValueType::String,
                TableValueType::Image,
                TableValueType::Int,
                TableValueType::Color,
            ][column]
        }
        fn num_rows(&self) -> usize {
            self.rows
        }
        fn cell_value(&self, row: usize, column: usize) -> Option<TableValue> {
            self.reads.borrow_mut().push(row);
            Some(match column {
                0 => TableValue::from(format!("row {row}")),
                1 => TableValue::Image(Rc::clone(&self.image)),
                2 => TableValue::Int(self.progress),
                _ => TableValue::Color(Color::new(1.0, 0.0, 0.0, 1.0)),
            })
        }
        fn set_cell_value(&mut self, _row: usize, _column: usize, _value: Option<TableValue>) {}
    }

    fn setup(
        rows: usize,
        progress: i32,
    ) -> (Ui<RecordingHost>, ControlId, Rc<RefCell<Vec<usize>>>) {
        let mut image = Image::new(8.0, 8.0);
        image.append(&[0xff; 8 * 8 * 4], 8, 8, 32);
        let reads = Rc::new(RefCell::new(Vec::new()));
        let model = TableModel::new(Logged {
            rows,
            progress,
            image: Rc::new(image),
            reads: Rc::clone(&reads),
        });
        let mut ui = Ui::new(RecordingHost::new());
        let table = ui.new_table(TableParams::new(model).row_background_color_column(3));
        ui.table_append_image_text_column(
            table,
            "Name",
            1,
            0,
            Editable::Never,
            TextColumnParams::default(),
        );
        ui.table_append_progress_bar_column(table, "Done", 2);
        ui.relayout(table, Bounds::new(0, 0, 200, 14 + 5 * 12));
        (ui, table, reads)
    }

    #[test]
    fn only_visible_rows_are_read() {
        let (mut ui, table, reads) = setup(10_000, 40);
        ui.table_event(table, &crate::event::TableEvent::ScrollWheel { delta: 500 });
        reads.borrow_mut().clear();

        let mut ctx = DrawContext::new();
        ui.paint_table(table, &mut ctx).unwrap();
        ctx.finish().unwrap();
        let read = reads.borrow();
        assert!(!read.is_empty());
        assert!(read.iter().all(|r| (500..505).contains(r)), "{read:?}");
    }

    #[test]
    fn paint_draws_text_images_and_balanced_clips() {
        let (mut ui, table, _) = setup(3, 40);
        let mut ctx = DrawContext::new();
        ui.paint_table(table, &mut ctx).unwrap();
        let list = ctx.finish().unwrap();
        // two header labels plus one text per row
        assert_eq!(list.texts().count(), 2 + 3);
        let bitmaps = list
            .items()
            .iter()
            .filter(|i| matches!(i.cmd, DrawCmd::Bitmap { .. }))
            .count();
        assert_eq!(bitmaps, 3);
    }

    #[test]
    fn selected_row_gets_highlight_instead_of_model_color() {
        let (mut ui, table, _) = setup(3, 40);
        ui.table_set_selection(table, &TableSelection::new(vec![1]));
        let mut ctx = DrawContext::new();
        ui.paint_table(table, &mut ctx).unwrap();
        let list = ctx.finish().unwrap();
        let fills_at = |p: Point| -> Vec<Color> {
            list.items()
                .iter()
                .filter(|i| i.covers(p))
                .filter_map(|i| match &i.cmd {
                    DrawCmd::Fill { brush: Brush::Solid(c), .. } => Some(*c),
                    _ => None,
                })
                .collect()
        };
        // right of the columns, inside row 1 and row 2
        assert!(fills_at(Point::new(190.0, 32.0)).contains(&SELECTION));
        assert!(fills_at(Point::new(190.0, 44.0)).contains(&Color::new(1.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn painting_an_indeterminate_bar_starts_the_timer() {
        let (mut ui, table, _) = setup(2, PROGRESS_INDETERMINATE);
        let mut ctx = DrawContext::new();
        ui.paint_table(table, &mut ctx).unwrap();
        ctx.finish().unwrap();
        assert!(ui.host().timer_running(ui.handle(table), super::super::progress::PROGRESS_TIMER));
    }

    #[test]
    fn marquee_sweeps_across_the_bar() {
        let bar = Bounds::new(10, 0, 80, 6);
        assert_eq!(marquee(bar, 0).right(), 10);
        assert_eq!(marquee(bar, PHASE_STEPS / 2).x, 10 - 20 + 50);
    }
}
