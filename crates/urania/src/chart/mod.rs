pub mod houses;
pub mod natal;

pub use houses::{house_for_longitude, HouseData};
pub use natal::{ChartCalculator, ChartSettings, NatalChart, PlanetPosition};
