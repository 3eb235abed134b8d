use core::arch::global_asm;

global_asm!(include_str!("crt0.s"));
