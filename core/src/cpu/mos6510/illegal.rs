//! Undocumented 6510 opcodes. Most are combinations of two documented
//! operations the decoder happens to select simultaneously (e.g. SLO is
//! ASL immediately followed by ORA), a handful (ANE, LXA, SHA/SHY/SHX/TAS)
//! are unstable on real silicon and only approximated here using the
//! commonly measured magic-constant behavior.

use super::{ExecState, Mos6510, StatusFlag};
use crate::core::{Bus, BusMaster};

/// Magic constant observed on most NMOS 6510s for the ANE/LXA "unstable AND"
/// family. Real chips vary by batch and temperature; this value matches the
/// behavior most 6502 test suites expect.
const UNSTABLE_CONST: u8 = 0xEE;

impl Mos6510 {
    // ---- ALR / ANC / ANE / ARR / SBX / OAL (LXA): immediate-only ----

    /// ALR (ASR): A = (A & #imm), then LSR A.
    pub(crate) fn op_alr<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.alu_imm(cycle, bus, master, |cpu, operand| {
            cpu.perform_and(operand);
            cpu.a = cpu.perform_lsr(cpu.a);
        });
    }

    /// ANC: A = A & #imm, C = N (bit 7 of result).
    pub(crate) fn op_anc<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.alu_imm(cycle, bus, master, |cpu, operand| {
            cpu.perform_and(operand);
            cpu.set_flag(StatusFlag::C, cpu.a & 0x80 != 0);
        });
    }

    /// ANE (XAA): A = (A | magic) & X & #imm. Unstable; modeled with a
    /// fixed magic constant.
    pub(crate) fn op_ane<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.alu_imm(cycle, bus, master, |cpu, operand| {
            cpu.a = (cpu.a | UNSTABLE_CONST) & cpu.x & operand;
            cpu.set_nz(cpu.a);
        });
    }

    /// ARR: A = (A & #imm), then ROR A, with carry/overflow taken from
    /// pre-rotation bits 6/5 rather than the standard ROR flag rule.
    pub(crate) fn op_arr<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.alu_imm(cycle, bus, master, |cpu, operand| {
            cpu.a &= operand;
            let carry_in = cpu.p & (StatusFlag::C as u8) != 0;
            let result = (cpu.a >> 1) | if carry_in { 0x80 } else { 0 };
            cpu.a = result;
            cpu.set_nz(result);
            let bit6 = result & 0x40 != 0;
            let bit5 = result & 0x20 != 0;
            cpu.set_flag(StatusFlag::C, bit6);
            cpu.set_flag(StatusFlag::V, bit6 ^ bit5);
        });
    }

    /// SBX (AXS): X = (A & X) - #imm, unsigned subtract, no borrow in.
    pub(crate) fn op_sbx<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.alu_imm(cycle, bus, master, |cpu, operand| {
            let base = cpu.a & cpu.x;
            cpu.set_flag(StatusFlag::C, base >= operand);
            let result = base.wrapping_sub(operand);
            cpu.x = result;
            cpu.set_nz(result);
        });
    }

    /// OAL (LXA): A = X = (A | magic) & #imm. Unstable, same lineage as ANE.
    pub(crate) fn op_oal<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.alu_imm(cycle, bus, master, |cpu, operand| {
            let result = (cpu.a | UNSTABLE_CONST) & operand;
            cpu.a = result;
            cpu.x = result;
            cpu.set_nz(result);
        });
    }

    // ---- LAX: load A and X together ----

    pub(crate) fn op_lax_zp<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.alu_zp(cycle, bus, master, Self::lax_load);
    }
    pub(crate) fn op_lax_zp_y<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.alu_zp_y(cycle, bus, master, Self::lax_load);
    }
    pub(crate) fn op_lax_abs<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.alu_abs(cycle, bus, master, Self::lax_load);
    }
    pub(crate) fn op_lax_abs_y<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.alu_abs_y(cycle, bus, master, Self::lax_load);
    }
    pub(crate) fn op_lax_ind_x<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.alu_ind_x(cycle, bus, master, Self::lax_load);
    }
    pub(crate) fn op_lax_ind_y<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.alu_ind_y(cycle, bus, master, Self::lax_load);
    }

    #[inline]
    fn lax_load(cpu: &mut Self, operand: u8) {
        cpu.a = operand;
        cpu.x = operand;
        cpu.set_nz(operand);
    }

    /// LAS (LAR): A = X = SP = (operand & SP).
    pub(crate) fn op_las<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.alu_abs_y(cycle, bus, master, |cpu, operand| {
            let result = operand & cpu.sp;
            cpu.a = result;
            cpu.x = result;
            cpu.sp = result;
            cpu.set_nz(result);
        });
    }

    // ---- AXS (SAX): store A & X ----

    pub(crate) fn op_axs_zp<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        let data = self.a & self.x;
        self.store_zp(cycle, bus, master, data);
    }
    pub(crate) fn op_axs_zp_y<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        let data = self.a & self.x;
        self.store_zp_y(cycle, bus, master, data);
    }
    pub(crate) fn op_axs_abs<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        let data = self.a & self.x;
        self.store_abs(cycle, bus, master, data);
    }
    pub(crate) fn op_axs_ind_x<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        let data = self.a & self.x;
        self.store_ind_x(cycle, bus, master, data);
    }

    // ---- ASO (SLO): ASL then ORA A ----

    pub(crate) fn op_aso_zp<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_zp(cycle, bus, master, Self::aso_op);
    }
    pub(crate) fn op_aso_zp_x<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_zp_x(cycle, bus, master, Self::aso_op);
    }
    pub(crate) fn op_aso_abs<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_abs(cycle, bus, master, Self::aso_op);
    }
    pub(crate) fn op_aso_abs_x<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_abs_x(cycle, bus, master, Self::aso_op);
    }
    pub(crate) fn op_aso_abs_y<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_abs_y(cycle, bus, master, Self::aso_op);
    }
    pub(crate) fn op_aso_ind_x<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_ind_x(cycle, bus, master, Self::aso_op);
    }
    pub(crate) fn op_aso_ind_y<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_ind_y(cycle, bus, master, Self::aso_op);
    }

    #[inline]
    fn aso_op(cpu: &mut Self, value: u8) -> u8 {
        let shifted = cpu.perform_asl(value);
        cpu.perform_ora(shifted);
        shifted
    }

    // ---- RLA: ROL then AND A ----

    pub(crate) fn op_rla_zp<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_zp(cycle, bus, master, Self::rla_op);
    }
    pub(crate) fn op_rla_zp_x<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_zp_x(cycle, bus, master, Self::rla_op);
    }
    pub(crate) fn op_rla_abs<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_abs(cycle, bus, master, Self::rla_op);
    }
    pub(crate) fn op_rla_abs_x<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_abs_x(cycle, bus, master, Self::rla_op);
    }
    pub(crate) fn op_rla_abs_y<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_abs_y(cycle, bus, master, Self::rla_op);
    }
    pub(crate) fn op_rla_ind_x<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_ind_x(cycle, bus, master, Self::rla_op);
    }
    pub(crate) fn op_rla_ind_y<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_ind_y(cycle, bus, master, Self::rla_op);
    }

    #[inline]
    fn rla_op(cpu: &mut Self, value: u8) -> u8 {
        let rotated = cpu.perform_rol(value);
        cpu.perform_and(rotated);
        rotated
    }

    // ---- LSE (SRE): LSR then EOR A ----

    pub(crate) fn op_lse_zp<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_zp(cycle, bus, master, Self::lse_op);
    }
    pub(crate) fn op_lse_zp_x<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_zp_x(cycle, bus, master, Self::lse_op);
    }
    pub(crate) fn op_lse_abs<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_abs(cycle, bus, master, Self::lse_op);
    }
    pub(crate) fn op_lse_abs_x<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_abs_x(cycle, bus, master, Self::lse_op);
    }
    pub(crate) fn op_lse_abs_y<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_abs_y(cycle, bus, master, Self::lse_op);
    }
    pub(crate) fn op_lse_ind_x<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_ind_x(cycle, bus, master, Self::lse_op);
    }
    pub(crate) fn op_lse_ind_y<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_ind_y(cycle, bus, master, Self::lse_op);
    }

    #[inline]
    fn lse_op(cpu: &mut Self, value: u8) -> u8 {
        let shifted = cpu.perform_lsr(value);
        cpu.perform_eor(shifted);
        shifted
    }

    // ---- RRA: ROR then ADC A ----

    pub(crate) fn op_rra_zp<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_zp(cycle, bus, master, Self::rra_op);
    }
    pub(crate) fn op_rra_zp_x<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_zp_x(cycle, bus, master, Self::rra_op);
    }
    pub(crate) fn op_rra_abs<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_abs(cycle, bus, master, Self::rra_op);
    }
    pub(crate) fn op_rra_abs_x<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_abs_x(cycle, bus, master, Self::rra_op);
    }
    pub(crate) fn op_rra_abs_y<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_abs_y(cycle, bus, master, Self::rra_op);
    }
    pub(crate) fn op_rra_ind_x<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_ind_x(cycle, bus, master, Self::rra_op);
    }
    pub(crate) fn op_rra_ind_y<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_ind_y(cycle, bus, master, Self::rra_op);
    }

    #[inline]
    fn rra_op(cpu: &mut Self, value: u8) -> u8 {
        let rotated = cpu.perform_ror(value);
        cpu.perform_adc(rotated);
        rotated
    }

    // ---- DCM (DCP): DEC then CMP A ----

    pub(crate) fn op_dcm_zp<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_zp(cycle, bus, master, Self::dcm_op);
    }
    pub(crate) fn op_dcm_zp_x<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_zp_x(cycle, bus, master, Self::dcm_op);
    }
    pub(crate) fn op_dcm_abs<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_abs(cycle, bus, master, Self::dcm_op);
    }
    pub(crate) fn op_dcm_abs_x<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_abs_x(cycle, bus, master, Self::dcm_op);
    }
    pub(crate) fn op_dcm_abs_y<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_abs_y(cycle, bus, master, Self::dcm_op);
    }
    pub(crate) fn op_dcm_ind_x<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_ind_x(cycle, bus, master, Self::dcm_op);
    }
    pub(crate) fn op_dcm_ind_y<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_ind_y(cycle, bus, master, Self::dcm_op);
    }

    #[inline]
    fn dcm_op(cpu: &mut Self, value: u8) -> u8 {
        let decremented = value.wrapping_sub(1);
        cpu.perform_compare(cpu.a, decremented);
        decremented
    }

    // ---- INS (ISC/ISB): INC then SBC A ----

    pub(crate) fn op_ins_zp<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_zp(cycle, bus, master, Self::ins_op);
    }
    pub(crate) fn op_ins_zp_x<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_zp_x(cycle, bus, master, Self::ins_op);
    }
    pub(crate) fn op_ins_abs<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_abs(cycle, bus, master, Self::ins_op);
    }
    pub(crate) fn op_ins_abs_x<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_abs_x(cycle, bus, master, Self::ins_op);
    }
    pub(crate) fn op_ins_abs_y<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_abs_y(cycle, bus, master, Self::ins_op);
    }
    pub(crate) fn op_ins_ind_x<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_ind_x(cycle, bus, master, Self::ins_op);
    }
    pub(crate) fn op_ins_ind_y<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        self.rmw_ind_y(cycle, bus, master, Self::ins_op);
    }

    #[inline]
    fn ins_op(cpu: &mut Self, value: u8) -> u8 {
        let incremented = value.wrapping_add(1);
        cpu.perform_sbc(incremented);
        incremented
    }

    // ---- Unstable "store ANDed with address high byte + 1" family ----
    // AXA/SHA (abs,Y and (ind),Y), SAY/SHY (abs,X), XAS/SHX (abs,Y), SHS/TAS (abs,Y).
    // These read the high address byte mid-instruction and AND it with a
    // register combination before storing; real silicon sometimes drops the
    // +1 term when a page boundary is crossed. Modeled as always-applied.

    pub(crate) fn op_axa_abs_y<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        match cycle {
            0 => {
                self.temp_addr = bus.read(master, self.pc) as u16;
                self.pc = self.pc.wrapping_add(1);
                self.state = ExecState::Execute(self.opcode, 1);
            }
            1 => {
                let hi = bus.read(master, self.pc) as u16;
                self.pc = self.pc.wrapping_add(1);
                self.temp_data = ((hi + 1) & 0xFF) as u8;
                self.temp_addr = (hi << 8 | self.temp_addr).wrapping_add(self.y as u16);
                self.state = ExecState::Execute(self.opcode, 2);
            }
            2 => {
                self.state = ExecState::Execute(self.opcode, 3);
            }
            3 => {
                let value = self.a & self.x & self.temp_data;
                bus.write(master, self.temp_addr, value);
                self.state = ExecState::Fetch;
            }
            _ => self.state = ExecState::Fetch,
        }
    }

    pub(crate) fn op_axa_ind_y<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        match cycle {
            0 => {
                self.temp_data = bus.read(master, self.pc);
                self.pc = self.pc.wrapping_add(1);
                self.state = ExecState::Execute(self.opcode, 1);
            }
            1 => {
                self.temp_addr = bus.read(master, self.temp_data as u16) as u16;
                self.state = ExecState::Execute(self.opcode, 2);
            }
            2 => {
                let hi = bus.read(master, self.temp_data.wrapping_add(1) as u16) as u16;
                self.temp_data = ((hi + 1) & 0xFF) as u8;
                self.temp_addr = (hi << 8 | self.temp_addr).wrapping_add(self.y as u16);
                self.state = ExecState::Execute(self.opcode, 3);
            }
            3 => {
                self.state = ExecState::Execute(self.opcode, 4);
            }
            4 => {
                let value = self.a & self.x & self.temp_data;
                bus.write(master, self.temp_addr, value);
                self.state = ExecState::Fetch;
            }
            _ => self.state = ExecState::Fetch,
        }
    }

    /// SAY (SHY): store Y & (hi+1) at abs,X.
    pub(crate) fn op_say<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        match cycle {
            0 => {
                self.temp_addr = bus.read(master, self.pc) as u16;
                self.pc = self.pc.wrapping_add(1);
                self.state = ExecState::Execute(self.opcode, 1);
            }
            1 => {
                let hi = bus.read(master, self.pc) as u16;
                self.pc = self.pc.wrapping_add(1);
                self.temp_data = ((hi + 1) & 0xFF) as u8;
                self.temp_addr = (hi << 8 | self.temp_addr).wrapping_add(self.x as u16);
                self.state = ExecState::Execute(self.opcode, 2);
            }
            2 => {
                self.state = ExecState::Execute(self.opcode, 3);
            }
            3 => {
                let value = self.y & self.temp_data;
                bus.write(master, self.temp_addr, value);
                self.state = ExecState::Fetch;
            }
            _ => self.state = ExecState::Fetch,
        }
    }

    /// XAS (SHX): store X & (hi+1) at abs,Y.
    pub(crate) fn op_xas<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        match cycle {
            0 => {
                self.temp_addr = bus.read(master, self.pc) as u16;
                self.pc = self.pc.wrapping_add(1);
                self.state = ExecState::Execute(self.opcode, 1);
            }
            1 => {
                let hi = bus.read(master, self.pc) as u16;
                self.pc = self.pc.wrapping_add(1);
                self.temp_data = ((hi + 1) & 0xFF) as u8;
                self.temp_addr = (hi << 8 | self.temp_addr).wrapping_add(self.y as u16);
                self.state = ExecState::Execute(self.opcode, 2);
            }
            2 => {
                self.state = ExecState::Execute(self.opcode, 3);
            }
            3 => {
                let value = self.x & self.temp_data;
                bus.write(master, self.temp_addr, value);
                self.state = ExecState::Fetch;
            }
            _ => self.state = ExecState::Fetch,
        }
    }

    /// SHS (TAS): SP = A & X; store SP & (hi+1) at abs,Y.
    pub(crate) fn op_shs<B: Bus<Address = u16, Data = u8> + ?Sized>(&mut self, cycle: u8, bus: &mut B, master: BusMaster) {
        match cycle {
            0 => {
                self.temp_addr = bus.read(master, self.pc) as u16;
                self.pc = self.pc.wrapping_add(1);
                self.state = ExecState::Execute(self.opcode, 1);
            }
            1 => {
                let hi = bus.read(master, self.pc) as u16;
                self.pc = self.pc.wrapping_add(1);
                self.sp = self.a & self.x;
                self.temp_data = ((hi + 1) & 0xFF) as u8;
                self.temp_addr = (hi << 8 | self.temp_addr).wrapping_add(self.y as u16);
                self.state = ExecState::Execute(self.opcode, 2);
            }
            2 => {
                self.state = ExecState::Execute(self.opcode, 3);
            }
            3 => {
                let value = self.sp & self.temp_data;
                bus.write(master, self.temp_addr, value);
                self.state = ExecState::Fetch;
            }
            _ => self.state = ExecState::Fetch,
        }
    }
}
