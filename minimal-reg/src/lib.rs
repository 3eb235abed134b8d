#![no_std]
#![deny(clippy::all)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(missing_debug_implementations)]
#![deny(missing_copy_implementations)]

//! This crate contains definitions of the hardware registers the minimal
//! firmware touches on the Game Boy Advance. It contains bitfields that define
//! the registers as well as pointers to them.
//!
//! The pointers may only be dereferenced on the GBA, use elsewhere is a very
//! quick way to get UB. The bitfields themselves are plain values and work
//! anywhere.

use bilge::prelude::*;

/// Width of the Game Boy Advance screen in pixels
pub const WIDTH: usize = 240;
/// Height of the Game Boy Advance screen in pixels
pub const HEIGHT: usize = 160;

pub const DISPLAY_CONTROL: *mut DisplayControl = 0x0400_0000 as *mut _;

/// The mode 3 framebuffer, one BGR555 cell per pixel stored row major.
pub const BITMAP_MODE_3: *mut [[u16; WIDTH]; HEIGHT] = 0x0600_0000 as *mut _;

#[bitsize(16)]
#[derive(TryFromBits, Clone, Copy, PartialEq, Eq, DebugBits)]
pub struct DisplayControl {
    pub mode: DisplayMode,
    pub is_game_boy_colour: bool,
    pub page_select: Page,
    pub hblank_in_oam: bool,
    pub object_mapping: ObjectMappingMode,
    pub force_blank: bool,
    pub background: [IsEnabled; 4],
    pub object: IsEnabled,
    pub window: [IsEnabled; 2],
    pub window_object: IsEnabled,
}

impl DisplayControl {
    /// Linear framebuffer mode with only background 2 shown, which is the
    /// only layer that displays anything in the bitmap modes.
    #[must_use]
    pub fn bitmap3_with_background_2() -> Self {
        use IsEnabled::{Disabled, Enabled};

        DisplayControl::new(
            DisplayMode::Bitmap3,
            false,
            Page::Front,
            false,
            ObjectMappingMode::Map2D,
            false,
            [Disabled, Disabled, Enabled, Disabled],
            Disabled,
            [Disabled, Disabled],
            Disabled,
        )
    }
}

#[bitsize(1)]
#[derive(FromBits, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectMappingMode {
    Map2D,
    Map1D,
}

#[bitsize(1)]
#[derive(FromBits, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Front,
    Back,
}

#[bitsize(1)]
#[derive(FromBits, Clone, Copy, Debug, PartialEq, Eq)]
pub enum IsEnabled {
    Disabled,
    Enabled,
}

impl From<bool> for IsEnabled {
    fn from(value: bool) -> Self {
        match value {
            true => IsEnabled::Enabled,
            false => IsEnabled::Disabled,
        }
    }
}

impl From<IsEnabled> for bool {
    fn from(value: IsEnabled) -> Self {
        match value {
            IsEnabled::Disabled => false,
            IsEnabled::Enabled => true,
        }
    }
}

#[bitsize(3)]
#[derive(TryFromBits, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    Tiled0,
    Tiled1,
    Tiled2,
    Bitmap3,
    Bitmap4,
    Bitmap5,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap3_with_background_2_is_0x0403() {
        let control = DisplayControl::bitmap3_with_background_2();

        assert_eq!(u16::from(control), 0x0403);
    }

    #[test]
    fn bitmap3_control_only_enables_background_2() {
        let control = DisplayControl::bitmap3_with_background_2();

        assert_eq!(control.mode(), DisplayMode::Bitmap3);
        for bg in 0..4 {
            assert_eq!(bool::from(control.background_at(bg)), bg == 2);
        }
        assert_eq!(control.object(), IsEnabled::Disabled);
        assert!(!control.force_blank());
    }

    #[test]
    fn display_control_rejects_unused_modes() {
        assert!(DisplayControl::try_from(0x0005_u16).is_ok());
        assert!(DisplayControl::try_from(0x0006_u16).is_err());
        assert!(DisplayControl::try_from(0x0007_u16).is_err());
    }

    #[test]
    fn register_addresses() {
        assert_eq!(DISPLAY_CONTROL as usize, 0x0400_0000);
        assert_eq!(BITMAP_MODE_3 as usize, 0x0600_0000);
        assert_eq!(
            core::mem::size_of::<[[u16; WIDTH]; HEIGHT]>(),
            WIDTH * HEIGHT * 2
        );
    }
}
