pub mod hide;
pub mod inspect;
pub mod unveil;
pub mod unveil_raw;
