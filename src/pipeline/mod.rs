//! Generation pipeline
//!
//! timeline -> sections -> per-section paths -> hit objects

pub mod assemble;
pub mod path;
pub mod predictor;
pub mod section;
pub mod timeline;

pub use assemble::{CurveKind, HitObject, assemble_section, declump, intersperse};
pub use path::{Path, PathContext, PathShape, arc_path, line_path, synthesize_path};
pub use predictor::{Prediction, Predictor};
pub use section::{Section, divides_stack, split_sections};
pub use timeline::{Span, SpanKind, Timeline};
