// Firmware built with `minimal` is no_std, the console has no operating
// system for the standard library to sit on top of.
#![no_std]
// `minimal` provides the real entry point and calls the function marked with
// #[minimal::entry] once the hardware is set up.
#![no_main]

use minimal::display::Rgb15;

const BACKGROUND: Rgb15 = Rgb15::BLUE;

#[minimal::entry]
fn main(mut gba: minimal::Gba) -> ! {
    let mut bitmap = gba.display.video.bitmap3();
    bitmap.clear(BACKGROUND);

    minimal::println!("filled the screen with {:?}", BACKGROUND);

    minimal::halt()
}
