//! Polygon and polyline primitives assumed-external by `spec.md` §2 #1 (the
//! FPA geometry library). `spec.md` explicitly puts map projections, field
//! file I/O, and the full `divide_area`/`hole_inside_area` polygon-boolean
//! machinery out of scope for a byte-faithful port; this crate supplies the
//! minimal real geometry those calls need so `gpg-interp` and `gpg-backend`
//! compile against an honest contract instead of a stub.

mod area;
mod error;
mod line;
mod pipe;
mod point;
mod spline;

pub use area::{divide_area, hole_inside_area};
pub use error::GeomError;
pub use line::{ClosestPoint, Line};
pub use pipe::{resolve_resolution_for_point_count, run_pipe, PipeOptions};
pub use point::Point;
pub use spline::{spline_resample, spline_resample_at_resolution};
