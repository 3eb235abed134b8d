use crate::memory_mapped::{MemoryMapped, MemoryMapped1DArray};
use core::fmt::Write;

#[derive(Eq, PartialEq, Clone, Copy, Debug)]
#[allow(dead_code)]
pub enum DebugLevel {
    Fatal = 0,
    Error = 1,
    Warning = 2,
    Info = 3,
    Debug = 4,
}

const OUTPUT_BUFFER_SIZE: usize = 256;

const DEBUG_ENABLE: MemoryMapped<u16> = unsafe { MemoryMapped::new(0x04FF_F780) };

const ENABLE_HANDSHAKE_IN: u16 = 0xC0DE;
const ENABLE_HANDSHAKE_OUT: u16 = 0x1DEA;

// writing the level with this bit set makes mgba log the buffer
const DEBUG_FLAG_CODE: u16 = 0x0100;

fn is_running_in_mgba() -> bool {
    DEBUG_ENABLE.set(ENABLE_HANDSHAKE_IN);
    DEBUG_ENABLE.get() == ENABLE_HANDSHAKE_OUT
}

/// The string buffer mgba reads a message from, and the register that logs
/// it.
struct DebugRegisters {
    output: MemoryMapped1DArray<u8, OUTPUT_BUFFER_SIZE>,
    level: MemoryMapped<u16>,
}

impl DebugRegisters {
    const MGBA: DebugRegisters = unsafe { DebugRegisters::at(0x04FF_F600, 0x04FF_F700) };

    /// # Safety
    /// `output` must be valid for 256 byte writes and `level` for a `u16`
    /// write.
    const unsafe fn at(output: usize, level: usize) -> Self {
        DebugRegisters {
            output: unsafe { MemoryMapped1DArray::new(output) },
            level: unsafe { MemoryMapped::new(level) },
        }
    }

    fn flush(&self, level: DebugLevel) {
        self.level.set(DEBUG_FLAG_CODE | level as u16);
    }
}

/// Handle to the debug output of the mgba emulator.
///
/// Only obtainable when actually running under mgba, on real hardware
/// [`Mgba::new`] returns `None`.
pub struct Mgba {
    registers: DebugRegisters,
}

impl Mgba {
    #[must_use]
    pub fn new() -> Option<Self> {
        if is_running_in_mgba() {
            Some(Mgba {
                registers: DebugRegisters::MGBA,
            })
        } else {
            None
        }
    }

    /// Writes the formatted message and logs it at `level`. Messages longer
    /// than mgba's 256 byte buffer come out as several log lines.
    pub fn print(
        &mut self,
        output: core::fmt::Arguments,
        level: DebugLevel,
    ) -> Result<(), core::fmt::Error> {
        let mut writer = MgbaWriter {
            registers: &self.registers,
            bytes_written: 0,
            level,
        };
        write!(&mut writer, "{output}")?;
        self.registers.flush(level);
        Ok(())
    }
}

#[cfg(test)]
impl Mgba {
    /// # Safety
    /// Same requirements as [`DebugRegisters::at`].
    pub(crate) unsafe fn at(output: usize, level: usize) -> Self {
        Mgba {
            registers: unsafe { DebugRegisters::at(output, level) },
        }
    }
}

struct MgbaWriter<'a> {
    registers: &'a DebugRegisters,
    bytes_written: usize,
    level: DebugLevel,
}

impl Write for MgbaWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for b in s.bytes() {
            if self.bytes_written >= OUTPUT_BUFFER_SIZE {
                self.registers.flush(self.level);
                self.bytes_written = 0;
            }
            self.registers.output.set(self.bytes_written, b);
            self.bytes_written += 1;
        }
        Ok(())
    }
}
