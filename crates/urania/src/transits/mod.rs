pub mod calculator;
pub mod types;

pub use calculator::TransitsCalculator;
pub use types::{
    Ingress, Station, StationKind, TransitAspect, TransitEvent, TransitPosition, TransitReport,
    TransitSettings,
};
