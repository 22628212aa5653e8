//! Human Design charts: gate activations at birth and at the design moment,
//! and the bodygraph they define.

pub mod bodygraph;
pub mod calculator;
pub mod gates;

pub use bodygraph::{center_of_gate, Authority, BodyGraph, Center, Definition, HdType, CHANNELS};
pub use calculator::{
    activations_from_positions, Activations, Activator, HumanDesignCalculator, HumanDesignChart,
};
pub use gates::{activation_for_longitude, gate_range, Activation, GATE_ORDER};
