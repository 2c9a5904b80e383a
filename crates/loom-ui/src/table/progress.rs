use std::collections::HashMap;
use std::time::Duration;

use crate::host::TimerId;

/// Timer a table uses to animate indeterminate progress bars.
pub(crate) const PROGRESS_TIMER: TimerId = TimerId(1);
pub(crate) const PROGRESS_PERIOD: Duration = Duration::from_millis(30);
/// Ticks for one sweep of the indeterminate marquee.
pub(crate) const PHASE_STEPS: u32 = 60;

/// Model value meaning "busy, amount unknown".
pub const PROGRESS_INDETERMINATE: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerEdge {
    Start,
    Stop,
}

/// Animation phase per indeterminate `(row, model column)` cell.
#[derive(Debug, Default)]
pub(crate) struct Indeterminate {
    phases: HashMap<(usize, usize), u32>,
}

impl Indeterminate {
    fn edge(before: usize, after: usize) -> Option<TimerEdge> {
        match (before, after) {
            (0, n) if n > 0 => Some(TimerEdge::Start),
            (n, 0) if n > 0 => Some(TimerEdge::Stop),
            _ => None,
        }
    }

    /// Registers or forgets a cell. Returns the timer edge this causes.
    pub fn update(&mut self, row: usize, column: usize, indeterminate: bool) -> Option<TimerEdge> {
        let before = self.phases.len();
        if indeterminate {
            self.phases.entry((row, column)).or_insert(0);
        } else {
            self.phases.remove(&(row, column));
        }
        Self::edge(before, self.phases.len())
    }

    pub fn phase(&self, row: usize, column: usize) -> Option<u32> {
        self.phases.get(&(row, column)).copied()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn tick(&mut self) {
        for phase in self.phases.values_mut() {
            *phase = (*phase + 1) % PHASE_STEPS;
        }
    }

    pub fn row_inserted(&mut self, index: usize) {
        self.phases = self
            .phases
            .drain()
            .map(|((row, col), p)| ((if row >= index { row + 1 } else { row }, col), p))
            .collect();
    }

    pub fn row_deleted(&mut self, index: usize) -> Option<TimerEdge> {
        let before = self.phases.len();
        self.phases = self
            .phases
            .drain()
            .filter(|((row, _), _)| *row != index)
            .map(|((row, col), p)| ((if row > index { row - 1 } else { row }, col), p))
            .collect();
        Self::edge(before, self.phases.len())
    }

    /// Forgets every cell. Returns `Stop` if any was animating.
    pub fn clear(&mut self) -> Option<TimerEdge> {
        let before = self.phases.len();
        self.phases.clear();
        Self::edge(before, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_edges_only_on_first_and_last_cell() {
        let mut p = Indeterminate::default();
        assert_eq!(p.update(0, 3, true), Some(TimerEdge::Start));
        assert_eq!(p.update(1, 3, true), None);
        assert_eq!(p.update(0, 3, true), None);
        assert_eq!(p.update(0, 3, false), None);
        assert_eq!(p.update(1, 3, false), Some(TimerEdge::Stop));
        assert_eq!(p.update(1, 3, false), None);
    }

    #[test]
    fn tick_wraps_phases() {
        let mut p = Indeterminate::default();
        p.update(2, 0, true);
        for _ in 0..PHASE_STEPS + 5 {
            p.tick();
        }
        assert_eq!(p.phase(2, 0), Some(5));
    }

    #[test]
    fn rows_follow_inserts_and_deletes() {
        let mut p = Indeterminate::default();
        p.update(2, 0, true);
        p.update(5, 0, true);
        p.row_inserted(3);
        assert_eq!((p.phase(2, 0), p.phase(6, 0)), (Some(0), Some(0)));
        assert_eq!(p.row_deleted(2), None);
        assert_eq!(p.phase(5, 0), Some(0));
        assert_eq!(p.row_deleted(5), Some(TimerEdge::Stop));
        assert!(p.is_empty());
    }
}
