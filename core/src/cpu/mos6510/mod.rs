mod alu;
mod binary;
mod branch;
mod illegal;
mod load_store;
mod shift;
mod stack;
mod unary;

use crate::core::{
    Bus, BusMaster,
    bus::InterruptState,
    component::{BusMasterComponent, Component},
};
use crate::cpu::{
    Cpu,
    state::{CpuStateTrait, Mos6510State},
};

#[repr(u8)]
#[derive(Copy, Clone, Debug)]
pub enum StatusFlag {
    C = 0x01, // Carry
    Z = 0x02, // Zero
    I = 0x04, // Interrupt Disable
    D = 0x08, // Decimal
    B = 0x10, // Break
    U = 0x20, // Unused (always 1)
    V = 0x40, // Overflow
    N = 0x80, // Negative
}

/// The 6510: a 6502 core plus a 6-bit I/O port multiplexed onto the zero
/// page at $0000/$0001 (handled by the MMU, not here) and an RDY line the
/// VIC-II pulls low to steal read cycles.
pub struct Mos6510 {
    // Registers
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub pc: u16,
    pub sp: u8,
    pub p: u8,

    // Internal state
    pub(crate) state: ExecState,
    pub(crate) opcode: u8,
    pub(crate) temp_addr: u16,
    /// Temporary data storage for multi-cycle operations (RMW operand, address bytes)
    pub(crate) temp_data: u8,
    /// Interrupt type being processed through `execute_interrupt`: 0=none,
    /// 1=NMI, 2=IRQ, 3=RST. BRK is a plain opcode (`op_brk` in stack.rs)
    /// handled entirely through `ExecState::Execute`, not this path.
    pub(crate) interrupt_type: u8,
    /// Previous NMI line state for edge detection
    pub(crate) nmi_previous: bool,
    /// Whether IRQ was already asserted on the previous Fetch-state poll;
    /// approximates the 6510's two-cycle interrupt recognition pipeline.
    pub(crate) irq_seen_last_poll: bool,
    /// RDY (AEC) line: false means the VIC-II is stealing the bus. Read
    /// cycles stall while low; write cycles are unaffected.
    pub(crate) rdy: bool,
    /// Software-latched IRQ/NMI request lines, toggled by `trigger_irq` etc.
    /// OR'd together with whatever the bus reports via `check_interrupts`.
    pub(crate) irq_line: bool,
    pub(crate) nmi_latched: bool,
    /// Previous RST line state for edge detection, mirroring `nmi_previous`.
    pub(crate) rst_previous: bool,
    pub(crate) rst_latched: bool,
    /// Set when the CPU executes a JAM/KIL opcode. The player surfaces this
    /// as `EngineError::Halt` and refuses to step further until reset.
    pub(crate) halted: Option<(u8, u16)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ExecState {
    Fetch,
    Execute(u8, u8), // (opcode, cycle)
    /// Hardware interrupt response sequence (NMI/IRQ push + vector)
    Interrupt(u8),
    /// Locked by a JAM/KIL illegal opcode; only `reset()` clears this.
    Halted,
}

impl Default for Mos6510 {
    fn default() -> Self {
        Self::new()
    }
}

impl Mos6510 {
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            pc: 0,
            sp: 0xFD,
            p: 0x24, // I=1, U=1
            state: ExecState::Fetch,
            opcode: 0,
            temp_addr: 0,
            temp_data: 0,
            interrupt_type: 0,
            nmi_previous: false,
            irq_seen_last_poll: false,
            rdy: true,
            irq_line: false,
            nmi_latched: false,
            rst_previous: false,
            rst_latched: false,
            halted: None,
        }
    }

    pub fn halted(&self) -> Option<(u8, u16)> {
        self.halted
    }

    #[inline]
    pub(crate) fn set_flag(&mut self, flag: StatusFlag, set: bool) {
        if set {
            self.p |= flag as u8;
        } else {
            self.p &= !(flag as u8);
        }
    }

    /// Called once per system φ2 cycle by the scheduler. Does nothing
    /// further once `halted` is set; the player must call `reset()` to
    /// recover.
    pub fn execute_cycle<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
    ) {
        if self.halted.is_some() {
            return;
        }

        if !self.rdy && bus.is_halted_for(master) {
            return;
        }

        match self.state {
            ExecState::Fetch => {
                let ints = bus.check_interrupts(master);
                if self.handle_interrupts(ints) {
                    return;
                }
                self.opcode = bus.read(master, self.pc);
                self.pc = self.pc.wrapping_add(1);
                self.state = ExecState::Execute(self.opcode, 0);
            }
            ExecState::Execute(op, cyc) => {
                self.execute_instruction(op, cyc, bus, master);
            }
            ExecState::Interrupt(cycle) => {
                self.execute_interrupt(cycle, bus, master);
            }
            ExecState::Halted => {}
        }
    }

    fn execute_instruction<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        opcode: u8,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        match opcode {
            // --- LDA ---
            0xA9 => self.op_lda_imm(cycle, bus, master),
            0xA5 => self.op_lda_zp(cycle, bus, master),
            0xB5 => self.op_lda_zp_x(cycle, bus, master),
            0xAD => self.op_lda_abs(cycle, bus, master),
            0xBD => self.op_lda_abs_x(cycle, bus, master),
            0xB9 => self.op_lda_abs_y(cycle, bus, master),
            0xA1 => self.op_lda_ind_x(cycle, bus, master),
            0xB1 => self.op_lda_ind_y(cycle, bus, master),

            // --- LDX ---
            0xA2 => self.op_ldx_imm(cycle, bus, master),
            0xA6 => self.op_ldx_zp(cycle, bus, master),
            0xB6 => self.op_ldx_zp_y(cycle, bus, master),
            0xAE => self.op_ldx_abs(cycle, bus, master),
            0xBE => self.op_ldx_abs_y(cycle, bus, master),

            // --- LDY ---
            0xA0 => self.op_ldy_imm(cycle, bus, master),
            0xA4 => self.op_ldy_zp(cycle, bus, master),
            0xB4 => self.op_ldy_zp_x(cycle, bus, master),
            0xAC => self.op_ldy_abs(cycle, bus, master),
            0xBC => self.op_ldy_abs_x(cycle, bus, master),

            // --- STA ---
            0x85 => self.op_sta_zp(cycle, bus, master),
            0x95 => self.op_sta_zp_x(cycle, bus, master),
            0x8D => self.op_sta_abs(cycle, bus, master),
            0x9D => self.op_sta_abs_x(cycle, bus, master),
            0x99 => self.op_sta_abs_y(cycle, bus, master),
            0x81 => self.op_sta_ind_x(cycle, bus, master),
            0x91 => self.op_sta_ind_y(cycle, bus, master),

            // --- STX ---
            0x86 => self.op_stx_zp(cycle, bus, master),
            0x96 => self.op_stx_zp_y(cycle, bus, master),
            0x8E => self.op_stx_abs(cycle, bus, master),

            // --- STY ---
            0x84 => self.op_sty_zp(cycle, bus, master),
            0x94 => self.op_sty_zp_x(cycle, bus, master),
            0x8C => self.op_sty_abs(cycle, bus, master),

            // --- ADC ---
            0x69 => self.op_adc_imm(cycle, bus, master),
            0x65 => self.op_adc_zp(cycle, bus, master),
            0x75 => self.op_adc_zp_x(cycle, bus, master),
            0x6D => self.op_adc_abs(cycle, bus, master),
            0x7D => self.op_adc_abs_x(cycle, bus, master),
            0x79 => self.op_adc_abs_y(cycle, bus, master),
            0x61 => self.op_adc_ind_x(cycle, bus, master),
            0x71 => self.op_adc_ind_y(cycle, bus, master),

            // --- SBC --- (0xEB is the illegal USBC mirror of 0xE9)
            0xE9 | 0xEB => self.op_sbc_imm(cycle, bus, master),
            0xE5 => self.op_sbc_zp(cycle, bus, master),
            0xF5 => self.op_sbc_zp_x(cycle, bus, master),
            0xED => self.op_sbc_abs(cycle, bus, master),
            0xFD => self.op_sbc_abs_x(cycle, bus, master),
            0xF9 => self.op_sbc_abs_y(cycle, bus, master),
            0xE1 => self.op_sbc_ind_x(cycle, bus, master),
            0xF1 => self.op_sbc_ind_y(cycle, bus, master),

            // --- CMP ---
            0xC9 => self.op_cmp_imm(cycle, bus, master),
            0xC5 => self.op_cmp_zp(cycle, bus, master),
            0xD5 => self.op_cmp_zp_x(cycle, bus, master),
            0xCD => self.op_cmp_abs(cycle, bus, master),
            0xDD => self.op_cmp_abs_x(cycle, bus, master),
            0xD9 => self.op_cmp_abs_y(cycle, bus, master),
            0xC1 => self.op_cmp_ind_x(cycle, bus, master),
            0xD1 => self.op_cmp_ind_y(cycle, bus, master),

            // --- AND ---
            0x29 => self.op_and_imm(cycle, bus, master),
            0x25 => self.op_and_zp(cycle, bus, master),
            0x35 => self.op_and_zp_x(cycle, bus, master),
            0x2D => self.op_and_abs(cycle, bus, master),
            0x3D => self.op_and_abs_x(cycle, bus, master),
            0x39 => self.op_and_abs_y(cycle, bus, master),
            0x21 => self.op_and_ind_x(cycle, bus, master),
            0x31 => self.op_and_ind_y(cycle, bus, master),

            // --- ORA ---
            0x09 => self.op_ora_imm(cycle, bus, master),
            0x05 => self.op_ora_zp(cycle, bus, master),
            0x15 => self.op_ora_zp_x(cycle, bus, master),
            0x0D => self.op_ora_abs(cycle, bus, master),
            0x1D => self.op_ora_abs_x(cycle, bus, master),
            0x19 => self.op_ora_abs_y(cycle, bus, master),
            0x01 => self.op_ora_ind_x(cycle, bus, master),
            0x11 => self.op_ora_ind_y(cycle, bus, master),

            // --- EOR ---
            0x49 => self.op_eor_imm(cycle, bus, master),
            0x45 => self.op_eor_zp(cycle, bus, master),
            0x55 => self.op_eor_zp_x(cycle, bus, master),
            0x4D => self.op_eor_abs(cycle, bus, master),
            0x5D => self.op_eor_abs_x(cycle, bus, master),
            0x59 => self.op_eor_abs_y(cycle, bus, master),
            0x41 => self.op_eor_ind_x(cycle, bus, master),
            0x51 => self.op_eor_ind_y(cycle, bus, master),

            // --- BIT ---
            0x24 => self.op_bit_zp(cycle, bus, master),
            0x2C => self.op_bit_abs(cycle, bus, master),

            // --- CPX ---
            0xE0 => self.op_cpx_imm(cycle, bus, master),
            0xE4 => self.op_cpx_zp(cycle, bus, master),
            0xEC => self.op_cpx_abs(cycle, bus, master),

            // --- CPY ---
            0xC0 => self.op_cpy_imm(cycle, bus, master),
            0xC4 => self.op_cpy_zp(cycle, bus, master),
            0xCC => self.op_cpy_abs(cycle, bus, master),

            // --- ASL ---
            0x0A => {
                if cycle == 0 {
                    self.a = self.perform_asl(self.a);
                    self.state = ExecState::Fetch;
                }
            }
            0x06 => self.op_asl_zp(cycle, bus, master),
            0x16 => self.op_asl_zp_x(cycle, bus, master),
            0x0E => self.op_asl_abs(cycle, bus, master),
            0x1E => self.op_asl_abs_x(cycle, bus, master),

            // --- LSR ---
            0x4A => {
                if cycle == 0 {
                    self.a = self.perform_lsr(self.a);
                    self.state = ExecState::Fetch;
                }
            }
            0x46 => self.op_lsr_zp(cycle, bus, master),
            0x56 => self.op_lsr_zp_x(cycle, bus, master),
            0x4E => self.op_lsr_abs(cycle, bus, master),
            0x5E => self.op_lsr_abs_x(cycle, bus, master),

            // --- ROL ---
            0x2A => {
                if cycle == 0 {
                    self.a = self.perform_rol(self.a);
                    self.state = ExecState::Fetch;
                }
            }
            0x26 => self.op_rol_zp(cycle, bus, master),
            0x36 => self.op_rol_zp_x(cycle, bus, master),
            0x2E => self.op_rol_abs(cycle, bus, master),
            0x3E => self.op_rol_abs_x(cycle, bus, master),

            // --- ROR ---
            0x6A => {
                if cycle == 0 {
                    self.a = self.perform_ror(self.a);
                    self.state = ExecState::Fetch;
                }
            }
            0x66 => self.op_ror_zp(cycle, bus, master),
            0x76 => self.op_ror_zp_x(cycle, bus, master),
            0x6E => self.op_ror_abs(cycle, bus, master),
            0x7E => self.op_ror_abs_x(cycle, bus, master),

            // --- INC ---
            0xE6 => self.op_inc_zp(cycle, bus, master),
            0xF6 => self.op_inc_zp_x(cycle, bus, master),
            0xEE => self.op_inc_abs(cycle, bus, master),
            0xFE => self.op_inc_abs_x(cycle, bus, master),

            // --- DEC ---
            0xC6 => self.op_dec_zp(cycle, bus, master),
            0xD6 => self.op_dec_zp_x(cycle, bus, master),
            0xCE => self.op_dec_abs(cycle, bus, master),
            0xDE => self.op_dec_abs_x(cycle, bus, master),

            // --- Flag instructions (all 2-cycle implied) ---
            0x18 => {
                if cycle == 0 {
                    self.set_flag(StatusFlag::C, false);
                    self.state = ExecState::Fetch;
                }
            }
            0x38 => {
                if cycle == 0 {
                    self.set_flag(StatusFlag::C, true);
                    self.state = ExecState::Fetch;
                }
            }
            0x58 => {
                if cycle == 0 {
                    self.set_flag(StatusFlag::I, false);
                    self.state = ExecState::Fetch;
                }
            }
            0x78 => {
                if cycle == 0 {
                    self.set_flag(StatusFlag::I, true);
                    self.state = ExecState::Fetch;
                }
            }
            0xB8 => {
                if cycle == 0 {
                    self.set_flag(StatusFlag::V, false);
                    self.state = ExecState::Fetch;
                }
            }
            0xD8 => {
                if cycle == 0 {
                    self.set_flag(StatusFlag::D, false);
                    self.state = ExecState::Fetch;
                }
            }
            0xF8 => {
                if cycle == 0 {
                    self.set_flag(StatusFlag::D, true);
                    self.state = ExecState::Fetch;
                }
            }

            // --- Transfer instructions (all 2-cycle implied) ---
            0xAA => {
                if cycle == 0 {
                    self.x = self.a;
                    self.set_nz(self.x);
                    self.state = ExecState::Fetch;
                }
            }
            0xA8 => {
                if cycle == 0 {
                    self.y = self.a;
                    self.set_nz(self.y);
                    self.state = ExecState::Fetch;
                }
            }
            0x8A => {
                if cycle == 0 {
                    self.a = self.x;
                    self.set_nz(self.a);
                    self.state = ExecState::Fetch;
                }
            }
            0x98 => {
                if cycle == 0 {
                    self.a = self.y;
                    self.set_nz(self.a);
                    self.state = ExecState::Fetch;
                }
            }
            0xBA => {
                if cycle == 0 {
                    self.x = self.sp;
                    self.set_nz(self.x);
                    self.state = ExecState::Fetch;
                }
            }
            0x9A => {
                if cycle == 0 {
                    self.sp = self.x;
                    self.state = ExecState::Fetch;
                }
            }

            // --- Register increment/decrement (all 2-cycle implied) ---
            0xE8 => {
                if cycle == 0 {
                    self.x = self.x.wrapping_add(1);
                    self.set_nz(self.x);
                    self.state = ExecState::Fetch;
                }
            }
            0xC8 => {
                if cycle == 0 {
                    self.y = self.y.wrapping_add(1);
                    self.set_nz(self.y);
                    self.state = ExecState::Fetch;
                }
            }
            0xCA => {
                if cycle == 0 {
                    self.x = self.x.wrapping_sub(1);
                    self.set_nz(self.x);
                    self.state = ExecState::Fetch;
                }
            }
            0x88 => {
                if cycle == 0 {
                    self.y = self.y.wrapping_sub(1);
                    self.set_nz(self.y);
                    self.state = ExecState::Fetch;
                }
            }

            // --- NOP and documented-equivalent illegal NOPs ---
            0xEA | 0x1A | 0x3A | 0x5A | 0x7A | 0xDA | 0xFA => {
                if cycle == 0 {
                    self.state = ExecState::Fetch;
                }
            }
            // Illegal NOPs that still consume an immediate/zp/abs operand.
            0x80 | 0x82 | 0x89 | 0xC2 | 0xE2 => self.alu_imm(cycle, bus, master, |_, _| {}),
            0x04 | 0x44 | 0x64 => self.alu_zp(cycle, bus, master, |_, _| {}),
            0x14 | 0x34 | 0x54 | 0x74 | 0xD4 | 0xF4 => self.alu_zp_x(cycle, bus, master, |_, _| {}),
            0x0C => self.alu_abs(cycle, bus, master, |_, _| {}),
            0x1C | 0x3C | 0x5C | 0x7C | 0xDC | 0xFC => self.alu_abs_x(cycle, bus, master, |_, _| {}),

            // --- Branches ---
            0x10 => self.op_bpl(cycle, bus, master),
            0x30 => self.op_bmi(cycle, bus, master),
            0x50 => self.op_bvc(cycle, bus, master),
            0x70 => self.op_bvs(cycle, bus, master),
            0x90 => self.op_bcc(cycle, bus, master),
            0xB0 => self.op_bcs(cycle, bus, master),
            0xD0 => self.op_bne(cycle, bus, master),
            0xF0 => self.op_beq(cycle, bus, master),

            // --- Jumps ---
            0x4C => self.op_jmp_abs(cycle, bus, master),
            0x6C => self.op_jmp_ind(cycle, bus, master),
            0x20 => self.op_jsr(cycle, bus, master),
            0x60 => self.op_rts(cycle, bus, master),
            0x40 => self.op_rti(cycle, bus, master),

            // --- Stack ---
            0x48 => self.op_pha(cycle, bus, master),
            0x68 => self.op_pla(cycle, bus, master),
            0x08 => self.op_php(cycle, bus, master),
            0x28 => self.op_plp(cycle, bus, master),

            // --- BRK ---
            0x00 => self.op_brk(cycle, bus, master),

            // --- Illegal/undocumented opcodes ---
            0x4B => self.op_alr(cycle, bus, master),
            0x0B | 0x2B => self.op_anc(cycle, bus, master),
            0x8B => self.op_ane(cycle, bus, master),
            0x6B => self.op_arr(cycle, bus, master),
            0x07 => self.op_aso_zp(cycle, bus, master),
            0x17 => self.op_aso_zp_x(cycle, bus, master),
            0x0F => self.op_aso_abs(cycle, bus, master),
            0x1F => self.op_aso_abs_x(cycle, bus, master),
            0x1B => self.op_aso_abs_y(cycle, bus, master),
            0x03 => self.op_aso_ind_x(cycle, bus, master),
            0x13 => self.op_aso_ind_y(cycle, bus, master),
            0x9F => self.op_axa_abs_y(cycle, bus, master),
            0x93 => self.op_axa_ind_y(cycle, bus, master),
            0x87 => self.op_axs_zp(cycle, bus, master),
            0x97 => self.op_axs_zp_y(cycle, bus, master),
            0x8F => self.op_axs_abs(cycle, bus, master),
            0x83 => self.op_axs_ind_x(cycle, bus, master),
            0xC7 => self.op_dcm_zp(cycle, bus, master),
            0xD7 => self.op_dcm_zp_x(cycle, bus, master),
            0xCF => self.op_dcm_abs(cycle, bus, master),
            0xDF => self.op_dcm_abs_x(cycle, bus, master),
            0xDB => self.op_dcm_abs_y(cycle, bus, master),
            0xC3 => self.op_dcm_ind_x(cycle, bus, master),
            0xD3 => self.op_dcm_ind_y(cycle, bus, master),
            0xE7 => self.op_ins_zp(cycle, bus, master),
            0xF7 => self.op_ins_zp_x(cycle, bus, master),
            0xEF => self.op_ins_abs(cycle, bus, master),
            0xFF => self.op_ins_abs_x(cycle, bus, master),
            0xFB => self.op_ins_abs_y(cycle, bus, master),
            0xE3 => self.op_ins_ind_x(cycle, bus, master),
            0xF3 => self.op_ins_ind_y(cycle, bus, master),
            0xBB => self.op_las(cycle, bus, master),
            0xA7 => self.op_lax_zp(cycle, bus, master),
            0xB7 => self.op_lax_zp_y(cycle, bus, master),
            0xAF => self.op_lax_abs(cycle, bus, master),
            0xBF => self.op_lax_abs_y(cycle, bus, master),
            0xA3 => self.op_lax_ind_x(cycle, bus, master),
            0xB3 => self.op_lax_ind_y(cycle, bus, master),
            0x47 => self.op_lse_zp(cycle, bus, master),
            0x57 => self.op_lse_zp_x(cycle, bus, master),
            0x4F => self.op_lse_abs(cycle, bus, master),
            0x5F => self.op_lse_abs_x(cycle, bus, master),
            0x5B => self.op_lse_abs_y(cycle, bus, master),
            0x43 => self.op_lse_ind_x(cycle, bus, master),
            0x53 => self.op_lse_ind_y(cycle, bus, master),
            0xAB => self.op_oal(cycle, bus, master),
            0x27 => self.op_rla_zp(cycle, bus, master),
            0x37 => self.op_rla_zp_x(cycle, bus, master),
            0x2F => self.op_rla_abs(cycle, bus, master),
            0x3F => self.op_rla_abs_x(cycle, bus, master),
            0x3B => self.op_rla_abs_y(cycle, bus, master),
            0x23 => self.op_rla_ind_x(cycle, bus, master),
            0x33 => self.op_rla_ind_y(cycle, bus, master),
            0x67 => self.op_rra_zp(cycle, bus, master),
            0x77 => self.op_rra_zp_x(cycle, bus, master),
            0x6F => self.op_rra_abs(cycle, bus, master),
            0x7F => self.op_rra_abs_x(cycle, bus, master),
            0x7B => self.op_rra_abs_y(cycle, bus, master),
            0x63 => self.op_rra_ind_x(cycle, bus, master),
            0x73 => self.op_rra_ind_y(cycle, bus, master),
            0x9C => self.op_say(cycle, bus, master),
            0xCB => self.op_sbx(cycle, bus, master),
            0x9B => self.op_shs(cycle, bus, master),
            0x9E => self.op_xas(cycle, bus, master),

            // --- JAM/KIL: locks the bus, requires a reset ---
            0x02 | 0x12 | 0x22 | 0x32 | 0x42 | 0x52 | 0x62 | 0x72 | 0x92 | 0xB2 | 0xD2 | 0xF2 => {
                self.halted = Some((opcode, self.pc.wrapping_sub(1)));
                self.state = ExecState::Halted;
            }

            _ => {
                self.state = ExecState::Fetch;
            }
        }
    }

    /// Check for pending interrupts during Fetch state. Returns true if an
    /// interrupt was taken (state transitions to Interrupt sequence).
    fn handle_interrupts(&mut self, ints: InterruptState) -> bool {
        // RST takes priority over NMI and IRQ alike, same as on real silicon.
        let rst_edge = self.rst_latched && !self.rst_previous;
        self.rst_previous = self.rst_latched;
        if rst_edge {
            self.rst_latched = false;
            self.interrupt_type = 3; // RST
            self.state = ExecState::Interrupt(0);
            return true;
        }

        let nmi_line = ints.nmi || self.nmi_latched;
        let nmi_edge = nmi_line && !self.nmi_previous;
        self.nmi_previous = nmi_line;

        if nmi_edge {
            self.nmi_latched = false;
            self.interrupt_type = 1; // NMI
            self.state = ExecState::Interrupt(0);
            return true;
        }

        // IRQ is level-triggered, masked by I flag, recognized only after it
        // has been observed asserted on two consecutive Fetch polls (the
        // 6510's two-cycle interrupt pipeline).
        let irq_line = ints.irq || self.irq_line;
        if irq_line && (self.p & StatusFlag::I as u8) == 0 {
            if self.irq_seen_last_poll {
                self.irq_seen_last_poll = false;
                self.interrupt_type = 2; // IRQ
                self.state = ExecState::Interrupt(0);
                return true;
            }
            self.irq_seen_last_poll = true;
        } else {
            self.irq_seen_last_poll = false;
        }

        false
    }

    /// Execute hardware interrupt sequence (NMI/IRQ/RST).
    /// 7 cycles total: 1 (detection in Fetch) + 6 (this handler, cycles 0-5).
    /// NMI/IRQ push PC and P (with B=0), then read their vector and set I.
    /// RST doesn't write anything real to the stack -- the same 3 cycles
    /// are dummy reads, matching real silicon, which only decrements SP --
    /// and additionally clears the halted/latched-interrupt state a power-on
    /// or reset-button press would clear.
    fn execute_interrupt<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        cycle: u8,
        bus: &mut B,
        master: BusMaster,
    ) {
        let is_reset = self.interrupt_type == 3;
        match cycle {
            0 => {
                self.state = ExecState::Interrupt(1);
            }
            1 => {
                if is_reset {
                    let _ = bus.read(master, 0x0100 | self.sp as u16);
                } else {
                    bus.write(master, 0x0100 | self.sp as u16, (self.pc >> 8) as u8);
                }
                self.sp = self.sp.wrapping_sub(1);
                self.state = ExecState::Interrupt(2);
            }
            2 => {
                if is_reset {
                    let _ = bus.read(master, 0x0100 | self.sp as u16);
                } else {
                    bus.write(master, 0x0100 | self.sp as u16, self.pc as u8);
                }
                self.sp = self.sp.wrapping_sub(1);
                self.state = ExecState::Interrupt(3);
            }
            3 => {
                if is_reset {
                    let _ = bus.read(master, 0x0100 | self.sp as u16);
                } else {
                    let p_push = (self.p | StatusFlag::U as u8) & !(StatusFlag::B as u8);
                    bus.write(master, 0x0100 | self.sp as u16, p_push);
                }
                self.sp = self.sp.wrapping_sub(1);
                self.state = ExecState::Interrupt(4);
            }
            4 => {
                self.set_flag(StatusFlag::I, true);
                if is_reset {
                    self.halted = None;
                    self.nmi_latched = false;
                    self.irq_line = false;
                    self.nmi_previous = false;
                    self.irq_seen_last_poll = false;
                }
                let vector_addr = match self.interrupt_type {
                    1 => 0xFFFA, // NMI
                    3 => 0xFFFC, // RST
                    _ => 0xFFFE, // IRQ
                };
                self.pc = bus.read(master, vector_addr) as u16;
                self.state = ExecState::Interrupt(5);
            }
            5 => {
                let vector_addr = match self.interrupt_type {
                    1 => 0xFFFB, // NMI
                    3 => 0xFFFD, // RST
                    _ => 0xFFFF, // IRQ
                };
                self.pc |= (bus.read(master, vector_addr) as u16) << 8;
                self.interrupt_type = 0;
                self.state = ExecState::Fetch;
            }
            _ => self.state = ExecState::Fetch,
        }
    }
}

impl Component for Mos6510 {
    fn tick(&mut self) -> bool {
        false
    }
}

impl BusMasterComponent for Mos6510 {
    type Bus = dyn Bus<Address = u16, Data = u8>;

    fn tick_with_bus(&mut self, bus: &mut Self::Bus, master: BusMaster) -> bool {
        self.execute_cycle(bus, master);
        matches!(self.state, ExecState::Fetch)
    }
}

impl Cpu for Mos6510 {
    fn reset(&mut self) {
        self.sp = 0xFD;
        self.p = 0x24;
        self.halted = None;
        self.interrupt_type = 0;
        self.nmi_previous = false;
        self.irq_seen_last_poll = false;
        self.irq_line = false;
        self.nmi_latched = false;
        self.rst_previous = false;
        self.rst_latched = false;
        // Synchronous power-on reset: clears state immediately and leaves
        // `pc` for the caller to set explicitly (e.g. to a tune's init
        // address). An in-flight reset asserted through `trigger_rst`
        // instead takes the real 7-cycle path through `execute_interrupt`,
        // fetching $FFFC/$FFFD itself.
        self.state = ExecState::Fetch;
    }

    fn trigger_irq(&mut self) {
        self.irq_line = true;
    }

    fn clear_irq(&mut self) {
        self.irq_line = false;
    }

    fn trigger_nmi(&mut self) {
        self.nmi_latched = true;
    }

    fn trigger_rst(&mut self) {
        self.rst_latched = true;
    }

    fn set_rdy(&mut self, ready: bool) {
        self.rdy = ready;
    }

    fn is_sleeping(&self) -> bool {
        self.halted.is_some()
    }
}

impl CpuStateTrait for Mos6510 {
    type Snapshot = Mos6510State;

    fn snapshot(&self) -> Mos6510State {
        Mos6510State {
            a: self.a,
            x: self.x,
            y: self.y,
            pc: self.pc,
            sp: self.sp,
            p: self.p,
        }
    }
}

/// Sets PC from the reset vector at $FFFC/$FFFD. Split out from `reset()`
/// since it needs bus access; the engine calls this once after wiring the
/// CPU to the MMU.
pub fn load_reset_vector<B: Bus<Address = u16, Data = u8> + ?Sized>(cpu: &mut Mos6510, bus: &mut B, master: BusMaster) {
    let lo = bus.read(master, 0xFFFC) as u16;
    let hi = bus.read(master, 0xFFFD) as u16;
    cpu.pc = lo | (hi << 8);
}
