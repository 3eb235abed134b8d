use super::bitmap3::Bitmap3;

/// The video struct controls access to the video hardware.
/// It ensures that only one video mode is active at a time.
#[non_exhaustive]
pub struct Video;

impl Video {
    /// Bitmap mode that provides a 16-bit colour framebuffer
    pub fn bitmap3(&mut self) -> Bitmap3<'_> {
        unsafe { Bitmap3::new() }
    }
}
