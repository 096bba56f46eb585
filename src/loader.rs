/*!
loader.rs - ROM loading utilities, outside the CPU/Bus core.

These exist purely because the reference crate this core is modeled on
always ships *some* loader next to its CPU — `Rom::load_from_file`,
`Cartridge::from_ines_bytes` — even though "get bytes into memory" is
conceptually external to the instruction set itself. Nothing here is
exercised by `Bus::tick`; a caller that already has bytes in hand can
skip this module entirely and call `Bus::load_at` directly.
*/

use std::fs;
use std::path::Path;

use crate::bus::Bus;

/// Reads `path` into a byte vector. The only fallible boundary in this
/// module; everything else here is infallible memory manipulation.
pub fn load_rom_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, String> {
    let path = path.as_ref();
    fs::read(path).map_err(|err| format!("failed to read ROM file {}: {err}", path.display()))
}

/// Loads the four fixed-size ROM blocks making up the Space Invaders
/// program image (`invaders.h`, `.g`, `.f`, `.e`, conventionally 0x800
/// bytes each) back to back starting at address 0.
pub fn load_space_invaders_blocks(bus: &mut Bus, blocks: &[Vec<u8>; 4]) -> Result<(), String> {
    let mut addr: u32 = 0;
    for (index, block) in blocks.iter().enumerate() {
        if addr + block.len() as u32 > 0x1_0000 {
            return Err(format!(
                "ROM block {index} does not fit in the 64 KiB address space at offset {addr:#06X}"
            ));
        }
        bus.load_at(block, addr as u16);
        addr += block.len() as u32;
    }
    Ok(())
}

/// Applies the three CP/M diagnostics-ROM patches: `JMP 0x0100` at the
/// reset vector, a stack-pointer fix at 0x170, and a skip over the
/// DAA-exactness test at 0x59C. These are fixed-offset ROM rewrites a
/// CP/M test harness performs before running a diagnostics binary; they
/// have nothing to do with ordinary Space Invaders ROM images.
pub fn apply_cpm_patch(bus: &mut Bus) {
    bus.load_at(&[0xC3, 0x00, 0x01], 0x0000);
    bus.load_at(&[0x07], 0x0170);
    bus.load_at(&[0xC3, 0xC2, 0x05], 0x059C);
}
