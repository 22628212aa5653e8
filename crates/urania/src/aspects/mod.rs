pub mod calculator;
pub mod types;

pub use calculator::{angular_distance, is_aspect_applying, match_aspect, AspectCalculator};
pub use types::{
    AspectCore, AspectKind, AspectObjectRef, AspectPair, AspectSet, AspectSetKind,
    AspectSettings, AspectStrength, OrbTable,
};
