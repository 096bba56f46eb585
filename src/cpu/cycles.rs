/*!
cycles.rs - Per-opcode base cycle counts for the 8080 core.

Purpose
=======
Provides `base_cycles(op)`: the cycle cost of executing opcode `op` when a
conditional branch/call/return is *not* taken (the cheaper of the two
costs). `dispatch.rs` looks this up before running an opcode's semantics
and, for the conditional control-flow opcodes, overwrites it with the
"taken" cost when the condition holds. This mirrors a fixed lookup table
that answers "how expensive is this opcode" independently of decode,
making the frame-pacing contract (~33,000 cycles/frame) easy to audit
against the standard 8080 timing table.

Scope
=====
Purely data. No instruction semantics live here. Entries for opcodes this
core does not implement (undocumented duplicate encodings outside the
target ROM's needs) are still populated so the table stays total — the
panic for those lives in the decode match in `dispatch.rs`, not here.
*/

/// Base (not-taken, for conditional ops) cycle cost of `opcode`.
pub(super) fn base_cycles(opcode: u8) -> u32 {
    match opcode {
        0x00 => 4, // NOP
        0x01 => 10, // LXI B,d16
        0x02 => 7, // STAX B
        0x03 => 5, // INX B
        0x04 => 5, // INR B
        0x05 => 5, // DCR B
        0x06 => 7, // MVI B,d8
        0x07 => 4, // RLC
        0x08 => 4, // unofficial duplicate of NOP
        0x09 => 10, // DAD B
        0x0A => 7, // LDAX B
        0x0B => 5, // DCX B
        0x0C => 5, // INR C
        0x0D => 5, // DCR C
        0x0E => 7, // MVI C,d8
        0x0F => 4, // RRC

        0x10 => 4,
        0x11 => 10, // LXI D,d16
        0x12 => 7, // STAX D
        0x13 => 5, // INX D
        0x14 => 5, // INR D
        0x15 => 5, // DCR D
        0x16 => 7, // MVI D,d8
        0x17 => 4, // RAL
        0x18 => 4,
        0x19 => 10, // DAD D
        0x1A => 7, // LDAX D
        0x1B => 5, // DCX D
        0x1C => 5, // INR E
        0x1D => 5, // DCR E
        0x1E => 7, // MVI E,d8
        0x1F => 4, // RAR

        0x20 => 4,
        0x21 => 10, // LXI H,d16
        0x22 => 16, // SHLD a16
        0x23 => 5, // INX H
        0x24 => 5, // INR H
        0x25 => 5, // DCR H
        0x26 => 7, // MVI H,d8
        0x27 => 4, // DAA
        0x28 => 4,
        0x29 => 10, // DAD H
        0x2A => 16, // LHLD a16
        0x2B => 5, // DCX H
        0x2C => 5, // INR L
        0x2D => 5, // DCR L
        0x2E => 7, // MVI L,d8
        0x2F => 4, // CMA

        0x30 => 4,
        0x31 => 10, // LXI SP,d16
        0x32 => 13, // STA a16
        0x33 => 5, // INX SP
        0x34 => 10, // INR M
        0x35 => 10, // DCR M
        0x36 => 10, // MVI M,d8
        0x37 => 4, // STC
        0x38 => 4,
        0x39 => 10, // DAD SP
        0x3A => 13, // LDA a16
        0x3B => 5, // DCX SP
        0x3C => 5, // INR A
        0x3D => 5, // DCR A
        0x3E => 7, // MVI A,d8
        0x3F => 4, // CMC

        // MOV r1,r2 (0x40..=0x7F): 5 cycles reg-reg, 7 if either side is M.
        // HLT (0x76) is 7.
        0x40..=0x7F => {
            if opcode == 0x76 {
                7
            } else if (opcode & 0x07) == 6 || ((opcode >> 3) & 0x07) == 6 {
                7
            } else {
                5
            }
        }

        // ADD/ADC/SUB/SBB/ANA/XRA/ORA/CMP r (0x80..=0xBF): 4 reg-reg, 7 if M.
        0x80..=0xBF => {
            if (opcode & 0x07) == 6 {
                7
            } else {
                4
            }
        }

        0xC0 => 5, // RNZ (11 if taken)
        0xC1 => 10, // POP B
        0xC2 => 10, // JNZ a16
        0xC3 => 10, // JMP a16
        0xC4 => 11, // CNZ a16 (17 if taken)
        0xC5 => 11, // PUSH B
        0xC6 => 7, // ADI d8
        0xC7 => 11, // RST 0
        0xC8 => 5, // RZ (11 if taken)
        0xC9 => 10, // RET
        0xCA => 10, // JZ a16
        0xCB => 10, // unofficial duplicate of JMP
        0xCC => 11, // CZ a16 (17 if taken)
        0xCD => 17, // CALL a16
        0xCE => 7, // ACI d8
        0xCF => 11, // RST 1

        0xD0 => 5, // RNC (11 if taken)
        0xD1 => 10, // POP D
        0xD2 => 10, // JNC a16
        0xD3 => 10, // OUT d8
        0xD4 => 11, // CNC a16 (17 if taken)
        0xD5 => 11, // PUSH D
        0xD6 => 7, // SUI d8
        0xD7 => 11, // RST 2
        0xD8 => 5, // RC (11 if taken)
        0xD9 => 10, // unofficial duplicate of RET
        0xDA => 10, // JC a16
        0xDB => 10, // IN d8
        0xDC => 11, // CC a16 (17 if taken)
        0xDD => 17, // unofficial duplicate of CALL
        0xDE => 7, // SBI d8
        0xDF => 11, // RST 3

        0xE0 => 5, // RPO (11 if taken)
        0xE1 => 10, // POP H
        0xE2 => 10, // JPO a16
        0xE3 => 18, // XTHL
        0xE4 => 11, // CPO a16 (17 if taken)
        0xE5 => 11, // PUSH H
        0xE6 => 7, // ANI d8
        0xE7 => 11, // RST 4
        0xE8 => 5, // RPE (11 if taken)
        0xE9 => 5, // PCHL
        0xEA => 10, // JPE a16
        0xEB => 5, // XCHG
        0xEC => 11, // CPE a16 (17 if taken)
        0xED => 17, // unofficial duplicate of CALL
        0xEE => 7, // XRI d8
        0xEF => 11, // RST 5

        0xF0 => 5, // RP (11 if taken)
        0xF1 => 10, // POP PSW
        0xF2 => 10, // JP a16
        0xF3 => 4, // DI
        0xF4 => 11, // CP a16 (17 if taken)
        0xF5 => 11, // PUSH PSW
        0xF6 => 7, // ORI d8
        0xF7 => 11, // RST 6
        0xF8 => 5, // RM (11 if taken)
        0xF9 => 5, // SPHL
        0xFA => 10, // JM a16
        0xFB => 4, // EI
        0xFC => 11, // CM a16 (17 if taken)
        0xFD => 17, // unofficial duplicate of CALL
        0xFE => 7, // CPI d8
        0xFF => 11, // RST 7
    }
}

/// Extra cycles added when a conditional RET is taken (5 -> 11).
pub(super) const COND_RET_TAKEN_EXTRA: u32 = 6;
/// Extra cycles added when a conditional CALL is taken (11 -> 17).
pub(super) const COND_CALL_TAKEN_EXTRA: u32 = 6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nop_is_four_cycles() {
        assert_eq!(base_cycles(0x00), 4);
    }

    #[test]
    fn mov_reg_reg_is_five_mov_with_memory_is_seven() {
        assert_eq!(base_cycles(0x41), 5); // MOV B,C
        assert_eq!(base_cycles(0x46), 7); // MOV B,M
        assert_eq!(base_cycles(0x70), 7); // MOV M,B
        assert_eq!(base_cycles(0x76), 7); // HLT
    }

    #[test]
    fn call_and_ret_base_costs_match_not_taken() {
        assert_eq!(base_cycles(0xCD), 17); // unconditional CALL
        assert_eq!(base_cycles(0xC4), 11); // conditional CALL, not taken
        assert_eq!(base_cycles(0xC9), 10); // unconditional RET
        assert_eq!(base_cycles(0xC0), 5); // conditional RET, not taken
    }
}
