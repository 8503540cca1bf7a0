//! egui rendering of the dashboard layout and its chart specs.

pub mod panels;
pub mod plot;
