// Purpose: quantum-state sampling and state-to-note mapping

pub mod mapper;
pub mod oscillator;

pub use mapper::{map_state_to_note, Note};
pub use oscillator::{QuantumState, QuantumStateGenerator, Spin};
