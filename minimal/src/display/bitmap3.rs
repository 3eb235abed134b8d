use crate::memory_mapped::{MemoryMapped, MemoryMapped2DArray};

use super::{colours::Rgb15, HEIGHT, WIDTH};

use core::marker::PhantomData;
use minimal_reg::{DisplayControl, BITMAP_MODE_3, DISPLAY_CONTROL};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("point ({x}, {y}) is outside of the screen")]
    OutOfBounds { x: i32, y: i32 },
}

/// Mode 3: a single full screen framebuffer of [`Rgb15`] colours where every
/// cell is one pixel on screen.
///
/// Creating one switches the display over to mode 3 with background 2 shown.
#[non_exhaustive]
pub struct Bitmap3<'gba> {
    framebuffer: MemoryMapped2DArray<Rgb15, WIDTH, HEIGHT>,
    phantom: PhantomData<&'gba ()>,
}

impl Bitmap3<'_> {
    pub(crate) unsafe fn new() -> Self {
        unsafe { Self::at(DISPLAY_CONTROL as usize, BITMAP_MODE_3 as usize) }
    }

    /// # Safety
    /// `display_control` must be valid for a `u16` write and `framebuffer`
    /// for `WIDTH * HEIGHT` `u16` writes for as long as the bitmap lives.
    pub(crate) unsafe fn at(display_control: usize, framebuffer: usize) -> Self {
        let control: MemoryMapped<DisplayControl> = unsafe { MemoryMapped::new(display_control) };
        // written whole, anything left over from before is discarded
        control.set(DisplayControl::bitmap3_with_background_2());

        Bitmap3 {
            framebuffer: unsafe { MemoryMapped2DArray::new(framebuffer) },
            phantom: PhantomData,
        }
    }

    /// Draws point to screen at (x, y) coordinates with colour. Nothing is
    /// drawn if (x, y) is out of the bounds of the screen.
    pub fn draw_point(&mut self, x: i32, y: i32, colour: Rgb15) -> Result<(), Error> {
        let (column, row) = Self::cell(x, y)?;
        self.framebuffer.set(column, row, colour);
        Ok(())
    }

    pub fn read_point(&self, x: i32, y: i32) -> Result<Rgb15, Error> {
        let (column, row) = Self::cell(x, y)?;
        Ok(self.framebuffer.get(column, row))
    }

    /// Sets every pixel on the screen to `colour`, one row at a time from the
    /// top.
    pub fn clear(&mut self, colour: Rgb15) {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                self.framebuffer.set(x, y, colour);
            }
        }
    }

    fn cell(x: i32, y: i32) -> Result<(usize, usize), Error> {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(column), Ok(row)) if column < WIDTH && row < HEIGHT => Ok((column, row)),
            _ => Err(Error::OutOfBounds { x, y }),
        }
    }
}
