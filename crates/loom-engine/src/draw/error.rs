use thiserror::Error;

/// Misuse of the [`DrawPath`](super::DrawPath) builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("the path has been ended and can no longer be modified")]
    Ended,
    #[error("{0} needs an open figure; start one with new_figure first")]
    NoFigure(&'static str),
}

/// Misuse of a [`DrawContext`](super::DrawContext).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("cannot draw with a path that was not ended")]
    PathNotEnded,
    #[error("restore called without a matching save")]
    RestoreWithoutSave,
    #[error("save and restore are unbalanced: {0} saved state(s) left at teardown")]
    UnbalancedSave(usize),
    #[error(transparent)]
    Path(#[from] PathError),
}
