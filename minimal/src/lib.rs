#![cfg_attr(not(test), no_std)]
#![deny(clippy::all)]
#![deny(unsafe_op_in_unsafe_fn)]

//! # minimal
//! `minimal` is the smallest amount of library needed to get a picture onto a
//! Game Boy Advance screen from Rust. It starts the console up, hands your
//! entry function a [`Gba`], and from there lets you switch the display into
//! the linear framebuffer mode and write colours to it.
//!
//! Logging goes to the mgba emulator's debug output via [`println!`] and
//! [`eprintln!`], and is silently dropped on real hardware.

/// This macro declares the entry point to your firmware written using `minimal`.
///
/// Your `main` function must be annotated with `#[minimal::entry]`, take 1
/// argument and never return. Doing this will ensure that `minimal` can
/// correctly set up the environment to call your rust function on start up.
///
/// # Examples
/// ```rust,ignore
/// #![no_std]
/// #![no_main]
///
/// use minimal::Gba;
///
/// #[minimal::entry]
/// fn main(mut gba: Gba) -> ! {
///     minimal::halt()
/// }
/// ```
pub use minimal_macros::entry;

/// Implements everything relating to things that are displayed on screen.
pub mod display;
#[cfg(target_arch = "arm")]
mod global_asm;
mod memory_mapped;
/// Implements logging to the mgba emulator.
pub mod mgba;
#[doc(hidden)]
pub mod print;

#[cfg(all(target_arch = "arm", not(test)))]
#[panic_handler]
fn panic_implementation(info: &core::panic::PanicInfo) -> ! {
    if let Some(mut mgba) = mgba::Mgba::new() {
        let _ = mgba.print(format_args!("{info}"), mgba::DebugLevel::Fatal);
    }

    halt()
}

/// The Gba struct is used to control access to the Game Boy Advance's hardware in a way which makes it the
/// borrow checker's responsibility to ensure no clashes of global resources.
///
/// This is will be created for you via the [`#[minimal::entry]`][entry] attribute.
#[non_exhaustive]
pub struct Gba {
    /// Manages access to the Game Boy Advance's display hardware
    pub display: display::Display,
}

impl Gba {
    /// # Safety
    /// Must only be called once, from the generated entry point.
    #[doc(hidden)]
    pub unsafe fn new_in_entry() -> Self {
        Self {
            display: unsafe { display::Display::new() },
        }
    }
}

/// Parks the CPU in an empty loop forever. Nothing after this runs, so it is
/// the last thing the firmware does once the screen is drawn.
pub fn halt() -> ! {
    #[allow(clippy::empty_loop)]
    loop {}
}
