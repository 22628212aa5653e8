pub mod adapter;
pub mod approximate;
pub mod provider;
pub mod types;

pub use adapter::{EphemerisError, SwissEphemerisAdapter};
pub use approximate::ApproximateEphemeris;
pub use provider::{EphemerisProvider, FallbackEphemeris};
pub use types::{
    BodyPositions, CelestialBody, EclipticPosition, EphemerisSettings, GeoLocation,
    HousePositions, HouseSystem, SkyPositions,
};
