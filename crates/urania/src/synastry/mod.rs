pub mod descriptions;
pub mod engine;
pub mod types;

pub use engine::{aspect_harmony, body_weight, house_harmony, is_challenging, SynastryEngine};
pub use types::{
    CompatibilityScore, ElementContact, Partner, SynastryAspect, SynastryHouse, SynastryReport,
    SynastrySettings,
};
