//! Domain model types

pub mod segment;

pub use segment::{
    composite, Segment, SegmentModel, COMPONENT_SEPARATOR, ELEMENT_SEPARATOR, SEGMENT_TERMINATOR,
};
