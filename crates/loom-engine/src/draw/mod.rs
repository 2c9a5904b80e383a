//! Vector drawing: path construction, stroke parameters, clipping and the
//! recording draw context.

mod clip;
mod context;
mod error;
mod path;
mod stroke;

pub use clip::ClipGeometry;
pub use context::DrawContext;
pub use error::{DrawError, PathError};
pub use path::{
    ArcSegment, ArcSize, DrawPath, Figure, FillMode, Polyline, Segment, SweepDirection,
    DEFAULT_TOLERANCE,
};
pub use stroke::{LineCap, LineJoin, StrokeParams, DEFAULT_MITER_LIMIT};
