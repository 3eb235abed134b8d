use video::Video;

/// Graphics mode 3. Bitmap mode that provides a 16-bit colour framebuffer.
pub mod bitmap3;
/// Colour types in the format the display hardware expects.
pub mod colours;
/// Giving out graphics mode.
pub mod video;

pub use colours::{Rgb, Rgb15};
pub use minimal_reg::{HEIGHT, WIDTH};

#[non_exhaustive]
/// Manages distribution of display modes, obtained from the gba struct
pub struct Display {
    pub video: Video,
}

impl Display {
    pub(crate) const unsafe fn new() -> Self {
        Display { video: Video {} }
    }
}
