pub mod hide;
pub mod inspect;
mod shared;
pub mod unveil;
pub mod unveil_raw;

pub use shared::{check_png_target, load_image, save_png};
