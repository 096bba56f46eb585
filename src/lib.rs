#![doc = r#"
Intel 8080 core and arcade bus for the Space Invaders hardware.

This crate exposes a CPU core and a system bus wiring it to a 64 KiB flat
address space and the cabinet's port-mapped I/O (the 16-bit shift register
and the player-1 input register). It is a library: the core never reads
files, draws pixels, or reads keyboards directly — those live in the
optional `loader` module and the `main` demo binary.

Modules:
- cpu: the Intel 8080 instruction set, registers, and flags
- memory: the flat 64 KiB address space
- io: the arcade's port-mapped shift register and player-input peripheral
- bus: ties cpu/memory/io together and drives frame pacing
- loader: optional ROM-loading and CP/M diagnostics-patch utilities

In tests, shared helpers for building and running short programs are
available under `crate::test_utils`.
"#]

pub mod bus;
pub mod cpu;
pub mod io;
pub mod loader;
pub mod memory;

#[cfg(feature = "screenshot")]
pub mod screenshot;

pub use bus::Bus;
pub use cpu::Cpu8080;
pub use memory::Memory;

#[cfg(test)]
pub mod test_utils;
