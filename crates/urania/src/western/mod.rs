pub mod decans;
pub mod dignities;
pub mod rulers;
pub mod signs;

pub use decans::{
    get_decan_index, get_decan_info_for_sign_and_degree, get_decan_info_from_longitude, DecanInfo,
};
pub use dignities::{DignitiesService, DignityResult, DignityType, ExactExaltation};
pub use rulers::{ruled_signs, sign_ruler, sign_ruler_from_longitude};
pub use signs::{degree_in_sign, element_affinity, Element, Modality, ZodiacSign};
