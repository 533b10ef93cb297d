pub mod f32;
pub mod io;
pub mod mask;
pub mod rgb;
pub mod traits;

pub use self::f32::ImageF32;
pub use self::mask::LaneMask;
pub use self::rgb::{ImageRgb8, RgbImage8};
pub use self::traits::{ImageView, ImageViewMut, Rows};
