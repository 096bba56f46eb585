//! Shared helpers for unit tests scattered across the crate. Not compiled
//! into release builds.

use crate::cpu::Cpu8080;
use crate::io::ArcadeIo;
use crate::memory::Memory;

/// Loads `program` at address 0, then runs exactly `instruction_count`
/// instructions (via `Cpu8080::tick`, i.e. whole-instruction granularity,
/// not cycle granularity) and hands back the resulting CPU/memory/IO
/// triple for assertions.
pub fn run_program(program: &[u8], instruction_count: usize) -> (Cpu8080, Memory, ArcadeIo) {
    let mut mem = Memory::new();
    mem.load_at(program, 0);
    let mut io = ArcadeIo::new();
    let mut cpu = Cpu8080::new();
    for _ in 0..instruction_count {
        cpu.tick(&mut mem, &mut io);
    }
    (cpu, mem, io)
}

/// Asserts that exactly the flags named in `expected` (a slice of
/// `(mask, should_be_set)` pairs) hold on `cpu`. Kept small and explicit
/// rather than a full-byte comparison, since most call sites only care
/// about two or three flags after a given instruction.
pub fn assert_flags(cpu: &Cpu8080, expected: &[(u8, bool)]) {
    for &(mask, should_be_set) in expected {
        assert_eq!(
            cpu.get_flag(mask),
            should_be_set,
            "flag mask {:#04X} expected {}",
            mask,
            should_be_set
        );
    }
}
