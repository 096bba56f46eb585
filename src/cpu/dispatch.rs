/*!
dispatch.rs - Opcode fetch/decode/execute for the 8080 core.

Overview
========
A single large match on the opcode byte, in the shape §9 of the governing
spec calls out as both fastest and most readable for a fully-tabulated,
finite instruction set: operand/register-pair/condition bit-fields are
decoded by small shared helpers (`read_r`/`write_r`/`rp_read`/`rp_write`/
`condition_holds`), and the arithmetic/logic/rotate/stack semantics
themselves live in `execute.rs`. This function is what `Cpu8080::tick`
calls once its pending-cycle counter reaches zero.

Unimplemented opcodes
======================
The 8080 opcode space is fully tabulated; every byte not covered by an arm
below is either an undocumented duplicate encoding (e.g. 0x08, 0xCB, 0xDD)
that the target ROM never emits, or genuinely impossible. Hitting one is a
decoder bug, not a runtime condition a caller can recover from, so the
fallback arm panics with the opcode and PC, per the spec's fatal-failure
policy.
*/

use super::state::{Cpu8080, FLAG_CY};
use crate::io::ArcadeIo;
use crate::memory::Memory;

use super::cycles::{base_cycles, COND_CALL_TAKEN_EXTRA, COND_RET_TAKEN_EXTRA};

impl Cpu8080 {
    #[inline]
    fn fetch_byte(&mut self, mem: &Memory) -> u8 {
        let b = mem.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        b
    }

    #[inline]
    fn fetch_word(&mut self, mem: &Memory) -> u16 {
        let w = mem.read_word(self.pc);
        self.pc = self.pc.wrapping_add(2);
        w
    }

    /// Reads the operand selected by the 3-bit `r` field: 0..5 -> B,C,D,E,H,L;
    /// 6 -> M (memory at HL); 7 -> A.
    #[inline]
    fn read_r(&self, mem: &Memory, r: u8) -> u8 {
        match r {
            0 => self.b,
            1 => self.c,
            2 => self.d,
            3 => self.e,
            4 => self.h,
            5 => self.l,
            6 => mem.read(self.hl()),
            7 => self.a,
            _ => unreachable!("register selector is a 3-bit field"),
        }
    }

    #[inline]
    fn write_r(&mut self, mem: &mut Memory, r: u8, value: u8) {
        match r {
            0 => self.b = value,
            1 => self.c = value,
            2 => self.d = value,
            3 => self.e = value,
            4 => self.h = value,
            5 => self.l = value,
            6 => mem.write(self.hl(), value),
            7 => self.a = value,
            _ => unreachable!("register selector is a 3-bit field"),
        }
    }

    /// Reads the register pair selected by the 2-bit `rp` field for
    /// LXI/DAD/INX/DCX: 0=BC, 1=DE, 2=HL, 3=SP.
    #[inline]
    fn rp_read(&self, rp: u8) -> u16 {
        match rp {
            0 => self.bc(),
            1 => self.de(),
            2 => self.hl(),
            3 => self.sp,
            _ => unreachable!("register-pair selector is a 2-bit field"),
        }
    }

    #[inline]
    fn rp_write(&mut self, rp: u8, value: u16) {
        match rp {
            0 => self.set_bc(value),
            1 => self.set_de(value),
            2 => self.set_hl(value),
            3 => self.sp = value,
            _ => unreachable!("register-pair selector is a 2-bit field"),
        }
    }

    /// Evaluates the branch condition selected by the 3-bit `cc` field:
    /// 0=NZ,1=Z,2=NC,3=C,4=PO,5=PE,6=P,7=M.
    #[inline]
    fn condition_holds(&self, cc: u8) -> bool {
        match cc {
            0 => !self.get_flag(super::state::FLAG_Z),
            1 => self.get_flag(super::state::FLAG_Z),
            2 => !self.get_flag(FLAG_CY),
            3 => self.get_flag(FLAG_CY),
            4 => !self.get_flag(super::state::FLAG_P),
            5 => self.get_flag(super::state::FLAG_P),
            6 => !self.get_flag(super::state::FLAG_S),
            7 => self.get_flag(super::state::FLAG_S),
            _ => unreachable!("condition selector is a 3-bit field"),
        }
    }

    /// Dispatches the ALU group selected by the 3-bit opcode field shared
    /// by both the register (0x80-0xBF) and immediate (0xC6.. step 8)
    /// arithmetic/logic instructions.
    #[inline]
    fn apply_alu_group(&mut self, group: u8, operand: u8) {
        match group {
            0 => self.alu_add(operand, false), // ADD/ADI
            1 => self.alu_add(operand, true),  // ADC/ACI
            2 => self.alu_sub(operand, false, true), // SUB/SUI
            3 => self.alu_sub(operand, true, true),  // SBB/SBI
            4 => self.alu_and(operand),         // ANA/ANI
            5 => self.alu_xor(operand),         // XRA/XRI
            6 => self.alu_or(operand),          // ORA/ORI
            7 => self.alu_sub(operand, false, false), // CMP/CPI (discards result)
            _ => unreachable!("ALU group selector is a 3-bit field"),
        }
    }

    /// Fetches, decodes, and executes exactly one instruction. Returns the
    /// total cycle count for that instruction (including any
    /// conditional-branch-taken penalty).
    pub(super) fn execute_one(&mut self, mem: &mut Memory, io: &mut ArcadeIo) -> u32 {
        let opcode = self.fetch_byte(mem);
        self.last_opcode = opcode;
        let mut cycles = base_cycles(opcode);

        match opcode {
            0x00 => { /* NOP */ }

            // ---------------- HLT ----------------
            0x76 => {
                // Spin on this instruction; `interrupt` overwrites PC, at
                // which point the next tick fetches from the new PC instead.
                self.pc = self.pc.wrapping_sub(1);
            }

            // ---------------- MOV r1,r2 ----------------
            0x40..=0x7F => {
                let src = self.read_r(mem, opcode & 0x07);
                self.write_r(mem, (opcode >> 3) & 0x07, src);
            }

            // ---------------- MVI r,u8 ----------------
            op if op & 0xC7 == 0x06 => {
                let imm = self.fetch_byte(mem);
                self.write_r(mem, (op >> 3) & 0x07, imm);
            }

            // ---------------- LXI rp,u16 ----------------
            op if op & 0xCF == 0x01 => {
                let imm = self.fetch_word(mem);
                self.rp_write((op >> 4) & 0x03, imm);
            }

            // ---------------- LDA / STA ----------------
            0x3A => {
                let addr = self.fetch_word(mem);
                self.a = mem.read(addr);
            }
            0x32 => {
                let addr = self.fetch_word(mem);
                mem.write(addr, self.a);
            }

            // ---------------- LHLD / SHLD ----------------
            0x2A => {
                let addr = self.fetch_word(mem);
                self.l = mem.read(addr);
                self.h = mem.read(addr.wrapping_add(1));
            }
            0x22 => {
                let addr = self.fetch_word(mem);
                mem.write(addr, self.l);
                mem.write(addr.wrapping_add(1), self.h);
            }

            // ---------------- LDAX / STAX (BC, DE only) ----------------
            0x0A => self.a = mem.read(self.bc()),
            0x1A => self.a = mem.read(self.de()),
            0x02 => mem.write(self.bc(), self.a),
            0x12 => mem.write(self.de(), self.a),

            // ---------------- XCHG ----------------
            0xEB => {
                let hl = self.hl();
                let de = self.de();
                self.set_hl(de);
                self.set_de(hl);
            }

            // ---------------- ALU reg/mem (0x80..=0xBF) ----------------
            0x80..=0xBF => {
                let operand = self.read_r(mem, opcode & 0x07);
                self.apply_alu_group((opcode >> 3) & 0x07, operand);
            }

            // ---------------- ALU immediate ----------------
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
                let imm = self.fetch_byte(mem);
                self.apply_alu_group((opcode >> 3) & 0x07, imm);
            }

            // ---------------- INR / DCR ----------------
            op if op & 0xC7 == 0x04 => {
                let r = (op >> 3) & 0x07;
                let v = self.read_r(mem, r);
                let result = self.inr(v);
                self.write_r(mem, r, result);
            }
            op if op & 0xC7 == 0x05 => {
                let r = (op >> 3) & 0x07;
                let v = self.read_r(mem, r);
                let result = self.dcr(v);
                self.write_r(mem, r, result);
            }

            // ---------------- INX / DCX ----------------
            op if op & 0xCF == 0x03 => {
                let rp = (op >> 4) & 0x03;
                let v = self.rp_read(rp).wrapping_add(1);
                self.rp_write(rp, v);
            }
            op if op & 0xCF == 0x0B => {
                let rp = (op >> 4) & 0x03;
                let v = self.rp_read(rp).wrapping_sub(1);
                self.rp_write(rp, v);
            }

            // ---------------- DAD ----------------
            op if op & 0xCF == 0x09 => {
                let rp = (op >> 4) & 0x03;
                let operand = self.rp_read(rp);
                self.dad(operand);
            }

            // ---------------- Rotates ----------------
            0x07 => self.rlc(),
            0x0F => self.rrc(),
            0x17 => self.ral(),
            0x1F => self.rar(),

            // ---------------- Specials ----------------
            0x2F => self.cma(),
            0x37 => self.stc(),
            0x3F => self.cmc(),
            0x27 => self.daa(),

            // ---------------- Unconditional jump/call/return ----------------
            0xC3 => self.pc = self.fetch_word(mem),
            0xCD => {
                let target = self.fetch_word(mem);
                let return_addr = self.pc;
                self.push_word(mem, return_addr);
                self.pc = target;
            }
            0xC9 => self.pc = self.pop_word(mem),

            // ---------------- Conditional jump ----------------
            op if op & 0xC7 == 0xC2 => {
                let target = self.fetch_word(mem);
                if self.condition_holds((op >> 3) & 0x07) {
                    self.pc = target;
                }
            }

            // ---------------- Conditional call ----------------
            op if op & 0xC7 == 0xC4 => {
                let target = self.fetch_word(mem);
                if self.condition_holds((op >> 3) & 0x07) {
                    let return_addr = self.pc;
                    self.push_word(mem, return_addr);
                    self.pc = target;
                    cycles += COND_CALL_TAKEN_EXTRA;
                }
            }

            // ---------------- Conditional return ----------------
            op if op & 0xC7 == 0xC0 => {
                if self.condition_holds((op >> 3) & 0x07) {
                    self.pc = self.pop_word(mem);
                    cycles += COND_RET_TAKEN_EXTRA;
                }
            }

            // ---------------- RST n ----------------
            op if op & 0xC7 == 0xC7 => {
                let target = (((op >> 3) & 0x07) as u16) * 8;
                let return_addr = self.pc;
                self.push_word(mem, return_addr);
                self.pc = target;
            }

            // ---------------- PCHL / SPHL / XTHL ----------------
            0xE9 => self.pc = self.hl(),
            0xF9 => self.sp = self.hl(),
            0xE3 => {
                let mem_word = mem.read_word(self.sp);
                let hl = self.hl();
                mem.write_word(self.sp, hl);
                self.set_hl(mem_word);
            }

            // ---------------- Stack PUSH / POP ----------------
            op if op & 0xCF == 0xC5 => {
                let value = self.push_rp_value((op >> 4) & 0x03);
                self.push_word(mem, value);
            }
            op if op & 0xCF == 0xC1 => {
                let value = self.pop_word(mem);
                self.pop_into_rp((op >> 4) & 0x03, value);
            }

            // ---------------- I/O ----------------
            0xD3 => {
                let port = self.fetch_byte(mem);
                io.port_out(port, self.a);
            }
            0xDB => {
                let port = self.fetch_byte(mem);
                self.a = io.port_in(port);
            }

            // ---------------- Interrupt control ----------------
            0xF3 => self.interrupts_enabled = false,
            0xFB => self.interrupts_enabled = true,

            _ => panic!(
                "unimplemented 8080 opcode {:#04X} at PC {:#06X}",
                opcode,
                self.pc.wrapping_sub(1)
            ),
        }

        cycles
    }

    /// PUSH rp operand resolution: rp 0..2 are BC/DE/HL as usual; rp 3 is
    /// PSW (A, F) rather than SP (SP has no PUSH encoding).
    #[inline]
    fn push_rp_value(&self, rp: u8) -> u16 {
        match rp {
            0 => self.bc(),
            1 => self.de(),
            2 => self.hl(),
            3 => ((self.a as u16) << 8) | self.psw_low() as u16,
            _ => unreachable!("register-pair selector is a 2-bit field"),
        }
    }

    #[inline]
    fn pop_into_rp(&mut self, rp: u8, value: u16) {
        match rp {
            0 => self.set_bc(value),
            1 => self.set_de(value),
            2 => self.set_hl(value),
            3 => {
                self.a = (value >> 8) as u8;
                self.set_psw_low(value as u8);
            }
            _ => unreachable!("register-pair selector is a 2-bit field"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_flags, run_program};

    #[test]
    fn nop_advances_pc_by_one() {
        let (cpu, _mem, _io) = run_program(&[0x00, 0x00, 0x00], 3);
        assert_eq!(cpu.pc, 3);
        assert_eq!(cpu.a, 0);
        assert!(cpu.interrupts_enabled);
    }

    #[test]
    fn mvi_then_add_sets_a_and_flags() {
        // MVI A,5; MVI B,3; ADD B; HLT
        let (cpu, _mem, _io) = run_program(&[0x3E, 0x05, 0x06, 0x03, 0x80, 0x76], 4);
        assert_eq!(cpu.a, 8);
        assert_flags(
            &cpu,
            &[
                (FLAG_CY, false),
                (super::super::state::FLAG_Z, false),
                (super::super::state::FLAG_S, false),
                (super::super::state::FLAG_P, true),
            ],
        );
    }

    #[test]
    fn call_then_ret_returns_to_instruction_after_call() {
        // CALL 0x0006; HLT; NOP; NOP; RET
        let program = [0xCD, 0x06, 0x00, 0x76, 0x00, 0x00, 0xC9];
        let mut mem = Memory::new();
        mem.load_at(&program, 0x0000);
        let mut io = ArcadeIo::new();
        let mut cpu = Cpu8080::new();
        cpu.sp = 0x2400;
        let initial_sp = cpu.sp;

        cpu.execute_one(&mut mem, &mut io); // CALL
        assert_eq!(cpu.pc, 0x0006);
        cpu.execute_one(&mut mem, &mut io); // RET
        assert_eq!(cpu.pc, 0x0003);
        assert_eq!(cpu.sp, initial_sp);
    }

    #[test]
    fn cmp_sets_flags_like_sub_but_preserves_accumulator() {
        let mut mem = Memory::new();
        mem.load_at(&[0x3E, 0x10, 0xFE, 0x10], 0x0000); // MVI A,0x10; CPI 0x10
        let mut io = ArcadeIo::new();
        let mut cpu = Cpu8080::new();
        cpu.execute_one(&mut mem, &mut io);
        cpu.execute_one(&mut mem, &mut io);
        assert_eq!(cpu.a, 0x10);
        assert!(cpu.get_flag(super::super::state::FLAG_Z));
    }

    #[test]
    fn adi_overflow_sets_carry_zero_parity() {
        let mut mem = Memory::new();
        mem.load_at(&[0x3E, 0xFF, 0xC6, 0x01], 0x0000); // MVI A,0xFF; ADI 1
        let mut io = ArcadeIo::new();
        let mut cpu = Cpu8080::new();
        cpu.execute_one(&mut mem, &mut io);
        cpu.execute_one(&mut mem, &mut io);
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.get_flag(FLAG_CY));
        assert!(cpu.get_flag(super::super::state::FLAG_Z));
        assert!(!cpu.get_flag(super::super::state::FLAG_S));
        assert!(cpu.get_flag(super::super::state::FLAG_P));
    }

    #[test]
    fn pc_wraps_reading_operand_bytes_across_the_top_of_memory() {
        let mut mem = Memory::new();
        // LXI H,0x1234 placed so the opcode sits at 0xFFFE: low byte at
        // 0xFFFF, high byte wraps around to 0x0000.
        mem.write(0xFFFE, 0x21); // LXI H,d16
        mem.write(0xFFFF, 0x34);
        mem.write(0x0000, 0x12);
        let mut io = ArcadeIo::new();
        let mut cpu = Cpu8080::new();
        cpu.pc = 0xFFFE;
        cpu.execute_one(&mut mem, &mut io);
        assert_eq!(cpu.hl(), 0x1234);
        assert_eq!(cpu.pc, 0x0001);
    }

    #[test]
    fn push_pop_register_pair_round_trips() {
        let mut mem = Memory::new();
        mem.load_at(&[0xC5, 0xD1], 0x0000); // PUSH B; POP D
        let mut io = ArcadeIo::new();
        let mut cpu = Cpu8080::new();
        cpu.sp = 0x2400;
        cpu.set_bc(0xCAFE);
        cpu.execute_one(&mut mem, &mut io);
        cpu.execute_one(&mut mem, &mut io);
        assert_eq!(cpu.de(), 0xCAFE);
        assert_eq!(cpu.sp, 0x2400);
    }

    #[test]
    fn push_pop_psw_round_trips_flags() {
        let mut mem = Memory::new();
        mem.load_at(&[0xF5, 0xF1], 0x0000); // PUSH PSW; POP PSW
        let mut io = ArcadeIo::new();
        let mut cpu = Cpu8080::new();
        cpu.sp = 0x2400;
        cpu.a = 0x42;
        cpu.set_flag(FLAG_CY, true);
        cpu.set_flag(super::super::state::FLAG_Z, true);
        let psw_before = cpu.psw_low();

        cpu.execute_one(&mut mem, &mut io);
        cpu.execute_one(&mut mem, &mut io);
        assert_eq!(cpu.a, 0x42);
        assert_eq!(cpu.psw_low(), psw_before);
    }

    #[test]
    fn xchg_is_its_own_inverse() {
        let mut mem = Memory::new();
        mem.load_at(&[0xEB, 0xEB], 0x0000);
        let mut io = ArcadeIo::new();
        let mut cpu = Cpu8080::new();
        cpu.set_hl(0x1111);
        cpu.set_de(0x2222);
        cpu.execute_one(&mut mem, &mut io);
        assert_eq!(cpu.hl(), 0x2222);
        assert_eq!(cpu.de(), 0x1111);
        cpu.execute_one(&mut mem, &mut io);
        assert_eq!(cpu.hl(), 0x1111);
        assert_eq!(cpu.de(), 0x2222);
    }

    #[test]
    fn conditional_call_taken_costs_six_more_cycles_than_not_taken() {
        let mut mem = Memory::new();
        mem.load_at(&[0xC4, 0x00, 0x10], 0x0000); // CNZ 0x1000
        let mut io = ArcadeIo::new();
        let mut cpu = Cpu8080::new();
        cpu.sp = 0x2400;
        // Z flag clear -> NZ condition holds -> call is taken.
        let cycles = cpu.execute_one(&mut mem, &mut io);
        assert_eq!(cycles, 17);
        assert_eq!(cpu.pc, 0x1000);
    }

    #[test]
    fn conditional_call_not_taken_leaves_pc_past_the_operand() {
        let mut mem = Memory::new();
        mem.load_at(&[0xCC, 0x00, 0x10], 0x0000); // CZ 0x1000
        let mut io = ArcadeIo::new();
        let mut cpu = Cpu8080::new();
        // Z flag clear -> Z condition fails -> call not taken.
        let cycles = cpu.execute_one(&mut mem, &mut io);
        assert_eq!(cycles, 11);
        assert_eq!(cpu.pc, 0x0003);
    }

    #[test]
    fn rst_pushes_pc_and_jumps_to_vector_times_eight() {
        let mut mem = Memory::new();
        mem.load_at(&[0xDF], 0x0000); // RST 3
        let mut io = ArcadeIo::new();
        let mut cpu = Cpu8080::new();
        cpu.sp = 0x2400;
        cpu.execute_one(&mut mem, &mut io);
        assert_eq!(cpu.pc, 0x18);
        assert_eq!(cpu.pop_word(&mem), 0x0001);
    }

    #[test]
    #[should_panic(expected = "unimplemented 8080 opcode")]
    fn undocumented_duplicate_opcode_panics() {
        let mut mem = Memory::new();
        mem.load_at(&[0x08], 0x0000);
        let mut io = ArcadeIo::new();
        let mut cpu = Cpu8080::new();
        cpu.execute_one(&mut mem, &mut io);
    }
}
