use core::fmt::Arguments;

use crate::mgba::{DebugLevel, Mgba};

/// Logs `args` if mgba answered the debug handshake. Off the emulator
/// [`Mgba::new`] is `None` and the message is dropped.
#[doc(hidden)]
pub fn log(level: DebugLevel, args: Arguments) {
    log_to(Mgba::new(), level, args);
}

fn log_to(mgba: Option<Mgba>, level: DebugLevel, args: Arguments) {
    if let Some(mut mgba) = mgba {
        // nowhere to report a formatting error to
        let _ = mgba.print(args, level);
    }
}

/// Logs a formatted line to mgba's debug log at the info level.
///
/// A no-op on hardware, where there is no log to write to.
///
/// ```rust,no_run
/// minimal::println!("mode 3 with background 2 enabled");
/// minimal::println!("{} by {} pixels", minimal::display::WIDTH, minimal::display::HEIGHT);
/// ```
#[macro_export]
macro_rules! println {
    ($($arg:tt)*) => {
        $crate::print::log($crate::mgba::DebugLevel::Info, format_args!($($arg)*))
    };
}

/// Same as [`println!`] but logged at the error level, so mgba shows it even
/// with info messages filtered out.
///
/// ```rust,no_run
/// let x = 240;
/// minimal::eprintln!("column {x} is off the screen");
/// ```
#[macro_export]
macro_rules! eprintln {
    ($($arg:tt)*) => {
        $crate::print::log($crate::mgba::DebugLevel::Error, format_args!($($arg)*))
    };
}
