use std::rc::Rc;

use crate::coords::{Matrix, Point, Rect};
use crate::paint::{Bitmap, Brush};
use crate::scene::{DrawCmd, DrawList, TextCmd};
use crate::text::TextLayout;

use super::clip::ClipGeometry;
use super::error::DrawError;
use super::{DrawPath, FillMode, StrokeParams};

/// Drawing state captured by [`DrawContext::save`].
#[derive(Debug, Clone)]
struct SavedState {
    transform: Matrix,
    clip: Option<Rc<ClipGeometry>>,
}

/// Records fills, strokes and text into a [`DrawList`] under a transform and
/// clip stack.
///
/// A context is created for one paint pass and handed back with
/// [`finish`](Self::finish). Every `save` must be matched by a `restore`
/// before then.
#[derive(Debug)]
pub struct DrawContext {
    list: DrawList,
    transform: Matrix,
    clip: Option<Rc<ClipGeometry>>,
    states: Vec<SavedState>,
    finished: bool,
}

impl DrawContext {
    pub fn new() -> Self {
        Self {
            list: DrawList::new(),
            transform: Matrix::identity(),
            clip: None,
            states: Vec::new(),
            finished: false,
        }
    }

    #[inline]
    pub fn current_transform(&self) -> Matrix {
        self.transform
    }

    #[inline]
    pub fn current_clip(&self) -> Option<&Rc<ClipGeometry>> {
        self.clip.as_ref()
    }

    #[inline]
    pub fn save_depth(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn list(&self) -> &DrawList {
        &self.list
    }

    fn ended(path: &DrawPath) -> Result<Rc<DrawPath>, DrawError> {
        if !path.ended() {
            return Err(DrawError::PathNotEnded);
        }
        Ok(Rc::new(path.clone()))
    }

    fn record(&mut self, cmd: DrawCmd) {
        self.list.push(cmd, self.transform, self.clip.clone());
    }

    pub fn fill(&mut self, path: &DrawPath, brush: &Brush) -> Result<(), DrawError> {
        let path = Self::ended(path)?;
        self.record(DrawCmd::Fill { path, brush: brush.resolve() });
        Ok(())
    }

    pub fn stroke(
        &mut self,
        path: &DrawPath,
        brush: &Brush,
        params: &StrokeParams,
    ) -> Result<(), DrawError> {
        let path = Self::ended(path)?;
        self.record(DrawCmd::Stroke { path, brush: brush.resolve(), params: params.clone() });
        Ok(())
    }

    /// Applies `m` before the current transform.
    pub fn transform(&mut self, m: &Matrix) {
        self.transform = m.then(&self.transform);
    }

    /// Narrows the clip to its intersection with `path`.
    pub fn clip(&mut self, path: &DrawPath) -> Result<(), DrawError> {
        let path = Self::ended(path)?;
        let next = Rc::new(ClipGeometry::from_path(path, self.transform));
        self.clip = Some(match self.clip.take() {
            None => next,
            Some(current) => Rc::new(ClipGeometry::Intersect(current, next)),
        });
        Ok(())
    }

    pub fn save(&mut self) {
        self.states.push(SavedState { transform: self.transform, clip: self.clip.clone() });
    }

    pub fn restore(&mut self) -> Result<(), DrawError> {
        let state = self.states.pop().ok_or(DrawError::RestoreWithoutSave)?;
        self.transform = state.transform;
        self.clip = state.clip;
        Ok(())
    }

    /// Paints the layout with its top-left corner at `(x, y)`.
    ///
    /// Background attributes are not run properties, so their rectangles are
    /// filled first, underneath the glyphs.
    pub fn draw_text(&mut self, layout: &TextLayout, x: f64, y: f64) {
        let origin = Point::new(x, y);
        for (rect, color) in layout.background_rects() {
            let mut path = DrawPath::new(FillMode::Winding);
            let built = path
                .add_rectangle(rect.origin.x + x, rect.origin.y + y, rect.width, rect.height)
                .and_then(|_| path.end());
            if built.is_err() {
                continue;
            }
            self.record(DrawCmd::Fill { path: Rc::new(path), brush: Brush::Solid(color) });
        }
        self.record(DrawCmd::Text(TextCmd { layout: Rc::new(layout.clone()), origin }));
    }

    /// Paints `bitmap` scaled into `dest`.
    pub fn draw_bitmap(&mut self, bitmap: &Bitmap, dest: Rect) {
        if dest.is_empty() {
            return;
        }
        self.record(DrawCmd::Bitmap { bitmap: bitmap.clone(), dest });
    }

    /// Ends the paint pass and hands back what was recorded.
    pub fn finish(mut self) -> Result<DrawList, DrawError> {
        self.finished = true;
        if !self.states.is_empty() {
            log::error!("draw context finished with {} unrestored save(s)", self.states.len());
            return Err(DrawError::UnbalancedSave(self.states.len()));
        }
        Ok(std::mem::take(&mut self.list))
    }
}

impl Default for DrawContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DrawContext {
    fn drop(&mut self) {
        if !self.finished && !self.states.is_empty() {
            log::error!(
                "draw context dropped with {} unrestored save(s)",
                self.states.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    fn rect_path(x: f64, y: f64, w: f64, h: f64) -> DrawPath {
        let mut p = DrawPath::new(FillMode::Winding);
        p.add_rectangle(x, y, w, h).unwrap();
        p.end().unwrap();
        p
    }

    fn black() -> Brush {
        Brush::Solid(Color::black())
    }

    // ── path usage ────────────────────────────────────────────────────────

    #[test]
    fn fill_with_unended_path_is_rejected() {
        let mut ctx = DrawContext::new();
        let mut p = DrawPath::new(FillMode::Winding);
        p.add_rectangle(0.0, 0.0, 1.0, 1.0).unwrap();
        assert_eq!(ctx.fill(&p, &black()), Err(DrawError::PathNotEnded));
        assert_eq!(ctx.clip(&p), Err(DrawError::PathNotEnded));
        assert!(ctx.list().is_empty());
    }

    // ── clipping ──────────────────────────────────────────────────────────

    #[test]
    fn two_clips_render_only_their_intersection() {
        let mut ctx = DrawContext::new();
        ctx.clip(&rect_path(0.0, 0.0, 60.0, 60.0)).unwrap();
        ctx.clip(&rect_path(40.0, 40.0, 60.0, 60.0)).unwrap();
        ctx.fill(&rect_path(-1000.0, -1000.0, 3000.0, 3000.0), &black()).unwrap();

        let list = ctx.finish().unwrap();
        let item = &list.items()[0];
        assert!(item.covers(Point::new(50.0, 50.0)));
        assert!(!item.covers(Point::new(10.0, 10.0)));
        assert!(!item.covers(Point::new(90.0, 90.0)));
        assert!(!item.covers(Point::new(500.0, 500.0)));

        let bounds = item.clip.as_ref().and_then(|c| c.bounds()).unwrap();
        assert_eq!(
            (bounds.origin.x, bounds.origin.y, bounds.width, bounds.height),
            (40.0, 40.0, 20.0, 20.0)
        );
    }

    #[test]
    fn first_clip_adopts_the_path() {
        let mut ctx = DrawContext::new();
        ctx.clip(&rect_path(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert_eq!(ctx.current_clip().map(|c| c.depth()), Some(1));
        ctx.clip(&rect_path(0.0, 0.0, 5.0, 5.0)).unwrap();
        assert_eq!(ctx.current_clip().map(|c| c.depth()), Some(2));
    }

    #[test]
    fn restore_brings_back_clip_and_transform() {
        let mut ctx = DrawContext::new();
        ctx.save();
        let mut m = Matrix::identity();
        m.translate(100.0, 0.0);
        ctx.transform(&m);
        ctx.clip(&rect_path(0.0, 0.0, 10.0, 10.0)).unwrap();
        ctx.restore().unwrap();

        assert!(ctx.current_clip().is_none());
        assert!(ctx.current_transform().is_identity());
        ctx.fill(&rect_path(0.0, 0.0, 10.0, 10.0), &black()).unwrap();
        let list = ctx.finish().unwrap();
        assert!(list.items()[0].covers(Point::new(5.0, 5.0)));
    }

    #[test]
    fn clip_is_captured_in_device_space() {
        let mut ctx = DrawContext::new();
        let mut m = Matrix::identity();
        m.translate(100.0, 0.0);
        ctx.transform(&m);
        ctx.clip(&rect_path(0.0, 0.0, 10.0, 10.0)).unwrap();
        ctx.transform(&Matrix::identity());
        ctx.fill(&rect_path(-50.0, -50.0, 200.0, 200.0), &black()).unwrap();
        let list = ctx.finish().unwrap();
        assert!(list.items()[0].covers(Point::new(105.0, 5.0)));
        assert!(!list.items()[0].covers(Point::new(5.0, 5.0)));
    }

    // ── save / restore balance ────────────────────────────────────────────

    #[test]
    fn restore_without_save_is_an_error() {
        let mut ctx = DrawContext::new();
        assert_eq!(ctx.restore(), Err(DrawError::RestoreWithoutSave));
    }

    #[test]
    fn finish_reports_unbalanced_save() {
        let mut ctx = DrawContext::new();
        ctx.save();
        ctx.save();
        ctx.restore().unwrap();
        assert_eq!(ctx.finish().unwrap_err(), DrawError::UnbalancedSave(1));
    }

    // ── transforms and strokes ────────────────────────────────────────────

    #[test]
    fn transform_composes_new_matrix_first() {
        let mut ctx = DrawContext::new();
        let mut scale = Matrix::identity();
        scale.scale(Point::zero(), 2.0, 2.0);
        let mut shift = Matrix::identity();
        shift.translate(10.0, 0.0);
        ctx.transform(&scale);
        ctx.transform(&shift);
        // shift applies first, then the earlier scale: (1,0) -> (11,0) -> (22,0)
        let p = ctx.current_transform().transform_point(Point::new(1.0, 0.0));
        assert_eq!(p, Point::new(22.0, 0.0));
    }

    #[test]
    fn stroke_covers_points_near_the_outline_only() {
        let mut ctx = DrawContext::new();
        let params = StrokeParams::default().thickness(4.0);
        ctx.stroke(&rect_path(0.0, 0.0, 100.0, 100.0), &black(), &params).unwrap();
        let list = ctx.finish().unwrap();
        let item = &list.items()[0];
        assert!(item.covers(Point::new(1.0, 50.0)));
        assert!(!item.covers(Point::new(50.0, 50.0)));
    }

    // ── text ──────────────────────────────────────────────────────────────

    #[test]
    fn text_backgrounds_are_filled_before_glyphs() {
        use crate::text::{
            Attribute, AttributedString, FontDescriptor, FontSystem, TextLayoutParams,
        };

        let mut s = AttributedString::new("abcd");
        s.set_attribute(Attribute::Background(Color::white()), 0, 2).unwrap();
        let params = TextLayoutParams::new(s, FontDescriptor::new("Test", 12.0));
        let layout = TextLayout::new(&params, &FontSystem::new());

        let mut ctx = DrawContext::new();
        ctx.draw_text(&layout, 10.0, 20.0);
        let list = ctx.finish().unwrap();
        assert_eq!(list.len(), 2);
        assert!(matches!(list.items()[0].cmd, DrawCmd::Fill { .. }));
        assert!(list.items()[0].covers(Point::new(12.0, 22.0)));
        assert!(!list.items()[0].covers(Point::new(30.0, 22.0)));
        assert!(list.items()[1].covers(Point::new(40.0, 30.0)));
        assert_eq!(list.texts().count(), 1);
    }

    // ── bitmaps ───────────────────────────────────────────────────────────

    #[test]
    fn bitmap_is_recorded_under_the_current_clip() {
        let bitmap = Bitmap::from_rgba8(1, 1, vec![255, 0, 0, 255]).unwrap();
        let mut ctx = DrawContext::new();
        ctx.clip(&rect_path(0.0, 0.0, 8.0, 8.0)).unwrap();
        ctx.draw_bitmap(&bitmap, Rect::new(4.0, 4.0, 16.0, 16.0));
        ctx.draw_bitmap(&bitmap, Rect::new(0.0, 0.0, 0.0, 16.0));
        let list = ctx.finish().unwrap();
        assert_eq!(list.len(), 1);
        assert!(list.items()[0].covers(Point::new(6.0, 6.0)));
        assert!(!list.items()[0].covers(Point::new(12.0, 12.0)));
    }
}
