use std::collections::BTreeSet;

use crate::error::{user_bug, UsageError};
use crate::event::{Key, Modifiers};

/// How many rows a table lets the user select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    None,
    #[default]
    ZeroOrOne,
    One,
    ZeroOrMany,
}

impl SelectionMode {
    fn max_rows(self) -> usize {
        match self {
            SelectionMode::None => 0,
            SelectionMode::ZeroOrOne | SelectionMode::One => 1,
            SelectionMode::ZeroOrMany => usize::MAX,
        }
    }
}

/// Snapshot of the selected rows, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSelection {
    rows: Vec<usize>,
}

impl TableSelection {
    pub fn new(rows: Vec<usize>) -> Self {
        Self { rows }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }
}

/// Selection and focus state of a table.
///
/// Gestures mutate the state freely; [`commit_change`](Self::commit_change)
/// then compares the selected rows against what was last reported, so a
/// gesture that only moves focus, or ends where it started, is not reported.
#[derive(Debug, Default)]
pub(crate) struct Selection {
    mode: SelectionMode,
    selected: BTreeSet<usize>,
    focused: Option<usize>,
    anchor: Option<usize>,
    last_selected: BTreeSet<usize>,
}

impl Selection {
    #[inline]
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    #[inline]
    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    #[inline]
    pub fn is_selected(&self, row: usize) -> bool {
        self.selected.contains(&row)
    }

    pub fn snapshot(&self) -> TableSelection {
        TableSelection::new(self.selected.iter().copied().collect())
    }

    fn sync_cache(&mut self) {
        self.last_selected.clone_from(&self.selected);
    }

    /// Reports whether the selected rows differ from the last commit, and
    /// records the current rows as reported. Focus alone is not a change.
    pub fn commit_change(&mut self) -> bool {
        if self.last_selected == self.selected {
            return false;
        }
        self.sync_cache();
        true
    }

    /// Switches mode, first bringing the selection within the new mode's
    /// limit. Nothing is reported.
    pub fn set_mode(&mut self, mode: SelectionMode, num_rows: usize) {
        match mode {
            SelectionMode::None => self.selected.clear(),
            SelectionMode::ZeroOrOne => {
                if self.selected.len() > 1 {
                    self.selected.clear();
                }
            }
            SelectionMode::One => {
                if self.selected.len() > 1 {
                    let keep = self
                        .focused
                        .filter(|f| self.selected.contains(f))
                        .or(self.selected.first().copied());
                    self.selected.clear();
                    self.selected.extend(keep);
                }
                if self.selected.is_empty() && num_rows > 0 {
                    let row = self.focused.filter(|f| *f < num_rows).unwrap_or(0);
                    self.selected.insert(row);
                    self.focused = Some(row);
                }
            }
            SelectionMode::ZeroOrMany => {}
        }
        self.mode = mode;
        self.sync_cache();
    }

    /// Replaces the selection programmatically. Nothing is reported.
    pub fn set_rows(&mut self, rows: &[usize], num_rows: usize) {
        let wanted: BTreeSet<usize> = rows.iter().copied().collect();
        if wanted.len() > self.mode.max_rows() {
            user_bug(UsageError::SelectionTooLarge {
                count: wanted.len(),
                mode: self.mode,
            });
        }
        if let Some(&index) = wanted.iter().find(|r| **r >= num_rows) {
            user_bug(UsageError::RowOutOfRange { index, rows: num_rows });
        }
        self.focused = wanted.last().copied().or(self.focused);
        self.anchor = self.focused;
        self.selected = wanted;
        self.sync_cache();
    }

    fn select_only(&mut self, row: usize) {
        self.selected.clear();
        self.selected.insert(row);
    }

    fn select_range(&mut self, from: usize, to: usize, keep: bool) {
        if !keep {
            self.selected.clear();
        }
        self.selected.extend(from.min(to)..=from.max(to));
    }

    /// Click on `row`. A table without selection keeps no focus either.
    pub fn click(&mut self, row: usize, modifiers: Modifiers) {
        if self.mode == SelectionMode::None {
            return;
        }
        self.focused = Some(row);
        match self.mode {
            SelectionMode::None => {}
            SelectionMode::ZeroOrOne if modifiers.ctrl && self.selected.contains(&row) => {
                self.selected.clear()
            }
            SelectionMode::ZeroOrOne | SelectionMode::One => self.select_only(row),
            SelectionMode::ZeroOrMany => {
                if modifiers.shift {
                    let anchor = self.anchor.unwrap_or(row);
                    self.select_range(anchor, row, modifiers.ctrl);
                    return;
                }
                if modifiers.ctrl {
                    if !self.selected.remove(&row) {
                        self.selected.insert(row);
                    }
                } else {
                    self.select_only(row);
                }
            }
        }
        self.anchor = Some(row);
    }

    /// Click below the last row.
    pub fn click_empty(&mut self, modifiers: Modifiers) {
        if modifiers.ctrl || self.mode == SelectionMode::One {
            return;
        }
        self.selected.clear();
    }

    /// Keyboard navigation. Returns whether the key was used.
    pub fn key(&mut self, key: Key, modifiers: Modifiers, num_rows: usize) -> bool {
        if num_rows == 0 || self.mode == SelectionMode::None {
            return false;
        }
        let last = num_rows - 1;
        let target = match (key, self.focused) {
            (Key::Up, Some(f)) => f.saturating_sub(1),
            (Key::Down, Some(f)) => (f + 1).min(last),
            (Key::Up | Key::Down, None) | (Key::Home, _) => 0,
            (Key::End, _) => last,
            (Key::Char('a' | 'A'), _)
                if modifiers.ctrl && self.mode == SelectionMode::ZeroOrMany =>
            {
                self.selected.extend(0..num_rows);
                return true;
            }
            (Key::Space, Some(f)) if modifiers.ctrl && self.mode == SelectionMode::ZeroOrMany => {
                if !self.selected.remove(&f) {
                    self.selected.insert(f);
                }
                self.anchor = Some(f);
                return true;
            }
            _ => return false,
        };
        self.focused = Some(target);
        match self.mode {
            SelectionMode::ZeroOrMany if modifiers.shift => {
                let anchor = self.anchor.unwrap_or(target);
                self.select_range(anchor, target, false);
                return true;
            }
            SelectionMode::ZeroOrMany if modifiers.ctrl => {}
            _ => self.select_only(target),
        }
        self.anchor = Some(target);
        true
    }

    fn shift_row(row: &mut Option<usize>, f: impl Fn(usize) -> Option<usize>) {
        *row = row.and_then(f);
    }

    fn remap(&mut self, f: impl Fn(usize) -> Option<usize> + Copy) {
        self.selected = self.selected.iter().filter_map(|r| f(*r)).collect();
        Self::shift_row(&mut self.focused, f);
        Self::shift_row(&mut self.anchor, f);
    }

    /// Moves rows at or after `index` down by one. Nothing is reported.
    pub fn row_inserted(&mut self, index: usize) {
        self.remap(|r| Some(if r >= index { r + 1 } else { r }));
        self.sync_cache();
    }

    /// Forgets `index` and moves later rows up by one. Nothing is reported.
    pub fn row_deleted(&mut self, index: usize) {
        self.remap(|r| match r.cmp(&index) {
            std::cmp::Ordering::Less => Some(r),
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Greater => Some(r - 1),
        });
        self.sync_cache();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_mode(mode: SelectionMode) -> Selection {
        let mut s = Selection::default();
        s.set_mode(mode, 10);
        s
    }

    fn rows(s: &Selection) -> Vec<usize> {
        s.snapshot().rows().to_vec()
    }

    // ── modes ─────────────────────────────────────────────────────────────

    #[test]
    fn every_mode_transition_respects_the_new_limit() {
        let modes = [
            SelectionMode::None,
            SelectionMode::ZeroOrOne,
            SelectionMode::One,
            SelectionMode::ZeroOrMany,
        ];
        for from in modes {
            for to in modes {
                let mut s = with_mode(SelectionMode::ZeroOrMany);
                s.set_rows(&[1, 4, 6], 10);
                s.set_mode(from, 10);
                s.set_mode(to, 10);
                assert!(s.snapshot().count() <= to.max_rows(), "{from:?} -> {to:?}");
                if to == SelectionMode::One {
                    assert_eq!(s.snapshot().count(), 1, "{from:?} -> One");
                }
                assert!(!s.commit_change(), "{from:?} -> {to:?} must not report");
            }
        }
    }

    #[test]
    fn switching_to_none_clears_without_reporting() {
        let mut s = with_mode(SelectionMode::ZeroOrOne);
        s.set_rows(&[3], 10);
        s.set_mode(SelectionMode::None, 10);
        assert!(rows(&s).is_empty());
        assert!(!s.commit_change());
    }

    #[test]
    fn one_keeps_the_focused_row() {
        let mut s = with_mode(SelectionMode::ZeroOrMany);
        s.click(2, Modifiers::NONE);
        s.click(5, Modifiers::CTRL);
        s.set_mode(SelectionMode::One, 10);
        assert_eq!(rows(&s), vec![5]);
    }

    #[test]
    #[should_panic(expected = "not allowed in ZeroOrOne mode")]
    fn oversized_selection_is_a_usage_bug() {
        with_mode(SelectionMode::ZeroOrOne).set_rows(&[1, 2], 10);
    }

    // ── gestures ──────────────────────────────────────────────────────────

    #[test]
    fn ctrl_and_shift_clicks_in_multi_mode() {
        let mut s = with_mode(SelectionMode::ZeroOrMany);
        s.click(2, Modifiers::NONE);
        s.click(5, Modifiers::SHIFT);
        assert_eq!(rows(&s), vec![2, 3, 4, 5]);
        s.click(3, Modifiers::CTRL);
        assert_eq!(rows(&s), vec![2, 4, 5]);
        // anchor moved to 3
        s.click(1, Modifiers::SHIFT);
        assert_eq!(rows(&s), vec![1, 2, 3]);
    }

    #[test]
    fn repeated_click_reports_once() {
        let mut s = with_mode(SelectionMode::ZeroOrOne);
        s.click(4, Modifiers::NONE);
        assert!(s.commit_change());
        s.click(4, Modifiers::NONE);
        assert!(!s.commit_change());
        s.click(4, Modifiers::CTRL);
        assert!(s.commit_change());
        assert!(rows(&s).is_empty());
    }

    #[test]
    fn none_mode_ignores_clicks_and_keys() {
        let mut s = with_mode(SelectionMode::None);
        s.click(1, Modifiers::NONE);
        assert!(!s.key(Key::Down, Modifiers::NONE, 10));
        assert_eq!(s.focused(), None);
        assert!(rows(&s).is_empty());
        assert!(!s.commit_change());
    }

    #[test]
    fn moving_focus_alone_is_not_reported() {
        let mut s = with_mode(SelectionMode::ZeroOrMany);
        s.click(2, Modifiers::NONE);
        assert!(s.commit_change());
        assert!(s.key(Key::Down, Modifiers::CTRL, 10));
        assert_eq!(s.focused(), Some(3));
        assert_eq!(rows(&s), vec![2]);
        assert!(!s.commit_change());
        // ctrl+space then toggles the newly focused row
        assert!(s.key(Key::Space, Modifiers::CTRL, 10));
        assert!(s.commit_change());
        assert_eq!(rows(&s), vec![2, 3]);
    }

    #[test]
    fn click_below_rows_clears_unless_one() {
        let mut s = with_mode(SelectionMode::ZeroOrOne);
        s.click(1, Modifiers::NONE);
        s.click_empty(Modifiers::NONE);
        assert!(rows(&s).is_empty());

        let mut s = with_mode(SelectionMode::One);
        s.click(1, Modifiers::NONE);
        s.click_empty(Modifiers::NONE);
        assert_eq!(rows(&s), vec![1]);
    }

    #[test]
    fn arrow_keys_move_and_shift_extends() {
        let mut s = with_mode(SelectionMode::ZeroOrMany);
        assert!(s.key(Key::Down, Modifiers::NONE, 10));
        assert_eq!(rows(&s), vec![0]);
        s.key(Key::Down, Modifiers::SHIFT, 10);
        s.key(Key::Down, Modifiers::SHIFT, 10);
        assert_eq!(rows(&s), vec![0, 1, 2]);
        s.key(Key::End, Modifiers::NONE, 10);
        assert_eq!(rows(&s), vec![9]);
        s.key(Key::Down, Modifiers::NONE, 10);
        assert_eq!(s.focused(), Some(9));
        assert!(s.key(Key::Char('a'), Modifiers::CTRL, 10));
        assert_eq!(s.snapshot().count(), 10);
        assert!(!s.key(Key::Char('x'), Modifiers::NONE, 10));
    }

    // ── row bookkeeping ───────────────────────────────────────────────────

    #[test]
    fn rows_shift_with_inserts_and_deletes_silently() {
        let mut s = with_mode(SelectionMode::ZeroOrMany);
        s.set_rows(&[2, 5], 10);
        s.row_inserted(3);
        assert_eq!(rows(&s), vec![2, 6]);
        assert!(!s.commit_change());
        s.row_deleted(2);
        assert_eq!(rows(&s), vec![5]);
        assert!(!s.commit_change());
    }
}
