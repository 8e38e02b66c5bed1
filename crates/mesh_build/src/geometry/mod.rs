//! Geometry producers and the append-only writer they fill.
//!
//! A `GeometrySource` lives on each generator entity and is invoked by the
//! parallel build job. Producers only ever see a `GeometryWriter` wrapping
//! their own entity's buffers.

mod procedural;
mod source;
mod validate;
mod writer;

pub use procedural::{ProceduralShape, MAX_GRID_VERTICES};
pub use source::{FixedGeometry, GeometryProducer, GeometrySource};
pub use validate::validate_geometry;
pub use writer::GeometryWriter;
