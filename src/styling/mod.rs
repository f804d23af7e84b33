//! Magnitude classification and feature styling

pub mod feature;
pub mod magnitude;
