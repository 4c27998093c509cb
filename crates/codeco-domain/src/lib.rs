//! CODECO gate codec domain layer
//!
//! Segment model, encoder, decoder and structural validator, plus the
//! collaborator traits the outer layers implement.

pub mod model;
pub mod repository;
pub mod service;
