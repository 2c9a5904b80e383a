use std::ops::ControlFlow;

use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

use super::attribute::Attribute;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("byte range {start}..{end} is invalid for a string of {len} bytes")]
    InvalidRange { start: usize, end: usize, len: usize },
    #[error("byte offset {0} is not on a character boundary")]
    NotCharBoundary(usize),
}

/// An attribute applied to the half-open byte range `start..end`.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSpan {
    pub attr: Attribute,
    pub start: usize,
    pub end: usize,
}

/// UTF-8 text plus styling spans.
///
/// Spans of the same [`AttributeKind`](super::AttributeKind) never overlap:
/// setting an attribute trims or splits whatever of its kind was there, and
/// equal neighbours are merged. Editing the text keeps spans on the
/// characters they covered; inserted text is never attributed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributedString {
    text: String,
    spans: Vec<AttributeSpan>,
}

impl AttributedString {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), spans: Vec::new() }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Spans ordered by start offset.
    #[inline]
    pub fn spans(&self) -> &[AttributeSpan] {
        &self.spans
    }

    fn check_boundary(&self, at: usize) -> Result<(), TextError> {
        if at > self.text.len() {
            return Err(TextError::InvalidRange { start: at, end: at, len: self.text.len() });
        }
        if !self.text.is_char_boundary(at) {
            return Err(TextError::NotCharBoundary(at));
        }
        Ok(())
    }

    fn check_range(&self, start: usize, end: usize) -> Result<(), TextError> {
        if start > end || end > self.text.len() {
            return Err(TextError::InvalidRange { start, end, len: self.text.len() });
        }
        self.check_boundary(start)?;
        self.check_boundary(end)
    }

    // ── text edits ────────────────────────────────────────────────────────

    pub fn append_unattributed(&mut self, s: &str) {
        let at = self.text.len();
        self.text.push_str(s);
        // Spans end at most at the old length, so nothing moves.
        debug_assert!(self.spans.iter().all(|span| span.end <= at));
    }

    /// Inserts `s` at byte `at`. A span straddling `at` is split around the
    /// new text so the insertion carries no attributes.
    pub fn insert_at_unattributed(&mut self, s: &str, at: usize) -> Result<(), TextError> {
        self.check_boundary(at)?;
        let n = s.len();
        self.text.insert_str(at, s);

        let mut out = Vec::with_capacity(self.spans.len() + 1);
        for span in self.spans.drain(..) {
            if span.end <= at {
                out.push(span);
            } else if span.start >= at {
                out.push(AttributeSpan { start: span.start + n, end: span.end + n, ..span });
            } else {
                out.push(AttributeSpan { attr: span.attr.clone(), start: span.start, end: at });
                out.push(AttributeSpan { attr: span.attr, start: at + n, end: span.end + n });
            }
        }
        self.spans = out;
        self.sort_spans();
        Ok(())
    }

    /// Removes bytes `start..end`, shrinking or dropping affected spans.
    pub fn delete(&mut self, start: usize, end: usize) -> Result<(), TextError> {
        self.check_range(start, end)?;
        let removed = end - start;
        self.text.replace_range(start..end, "");

        let map = |p: usize| {
            if p <= start {
                p
            } else if p >= end {
                p - removed
            } else {
                start
            }
        };
        self.spans = self
            .spans
            .drain(..)
            .filter_map(|span| {
                let (s, e) = (map(span.start), map(span.end));
                (s < e).then_some(AttributeSpan { start: s, end: e, ..span })
            })
            .collect();
        self.merge_neighbours();
        Ok(())
    }

    // ── attributes ────────────────────────────────────────────────────────

    /// Applies `attr` to `start..end`, replacing overlapping attributes of
    /// the same kind. An empty range is a no-op.
    pub fn set_attribute(
        &mut self,
        attr: Attribute,
        start: usize,
        end: usize,
    ) -> Result<(), TextError> {
        self.check_range(start, end)?;
        if start == end {
            return Ok(());
        }
        let kind = attr.kind();
        let (mut start, mut end) = (start, end);

        let mut kept = Vec::with_capacity(self.spans.len() + 2);
        for span in self.spans.drain(..) {
            if span.attr.kind() != kind || span.end < start || span.start > end {
                kept.push(span);
                continue;
            }
            if span.attr == attr {
                start = start.min(span.start);
                end = end.max(span.end);
                continue;
            }
            if span.end == start || span.start == end {
                kept.push(span);
                continue;
            }
            if span.start < start {
                kept.push(AttributeSpan { attr: span.attr.clone(), start: span.start, end: start });
            }
            if span.end > end {
                kept.push(AttributeSpan { attr: span.attr, start: end, end: span.end });
            }
        }
        kept.push(AttributeSpan { attr, start, end });
        self.spans = kept;
        self.sort_spans();
        Ok(())
    }

    /// Visits spans in start order until `f` breaks.
    pub fn for_each_attribute(
        &self,
        mut f: impl FnMut(&Attribute, usize, usize) -> ControlFlow<()>,
    ) {
        for span in &self.spans {
            if f(&span.attr, span.start, span.end).is_break() {
                break;
            }
        }
    }

    fn sort_spans(&mut self) {
        self.spans.sort_by_key(|s| (s.start, s.end));
    }

    fn merge_neighbours(&mut self) {
        self.sort_spans();
        let mut merged: Vec<AttributeSpan> = Vec::with_capacity(self.spans.len());
        for span in self.spans.drain(..) {
            let partner = merged
                .iter_mut()
                .rev()
                .find(|m| {
                    m.attr.kind() == span.attr.kind() && m.end == span.start && m.attr == span.attr
                });
            match partner {
                Some(m) => m.end = span.end,
                None => merged.push(span),
            }
        }
        self.spans = merged;
    }

    // ── graphemes ─────────────────────────────────────────────────────────

    pub fn num_graphemes(&self) -> usize {
        self.text.graphemes(true).count()
    }

    /// Index of the grapheme containing byte `pos`; the end maps to
    /// [`num_graphemes`](Self::num_graphemes).
    pub fn byte_index_to_grapheme(&self, pos: usize) -> usize {
        if pos >= self.text.len() {
            return self.num_graphemes();
        }
        self.text
            .grapheme_indices(true)
            .take_while(|(start, _)| *start <= pos)
            .count()
            .saturating_sub(1)
    }

    /// Byte offset where grapheme `g` starts; past the end maps to the length.
    pub fn grapheme_to_byte_index(&self, g: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(g)
            .map(|(start, _)| start)
            .unwrap_or(self.text.len())
    }
}
