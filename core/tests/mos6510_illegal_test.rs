use reson64_core::core::{BusMasterComponent, BusMaster};
use reson64_core::cpu::mos6510::{Mos6510, StatusFlag};
mod common;
use common::TestBus;

fn tick(cpu: &mut Mos6510, bus: &mut TestBus, n: usize) {
    for _ in 0..n {
        cpu.tick_with_bus(bus, BusMaster::Cpu);
    }
}

#[test]
fn lax_zero_page_loads_both_accumulator_and_x() {
    let mut cpu = Mos6510::new();
    let mut bus = TestBus::new();
    bus.memory[0x10] = 0x77;
    bus.load(0, &[0xA7, 0x10]); // LAX $10
    tick(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.a, 0x77);
    assert_eq!(cpu.x, 0x77);
}

#[test]
fn anc_immediate_copies_negative_flag_into_carry() {
    let mut cpu = Mos6510::new();
    let mut bus = TestBus::new();
    cpu.a = 0xFF;
    bus.load(0, &[0x0B, 0x80]); // ANC #$80 -> A = 0x80, N=1, C should mirror N
    tick(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a, 0x80);
    assert_eq!(cpu.p & StatusFlag::N as u8, StatusFlag::N as u8);
    assert_eq!(cpu.p & StatusFlag::C as u8, StatusFlag::C as u8);
}

#[test]
fn sbx_subtracts_operand_from_a_and_x_into_x() {
    let mut cpu = Mos6510::new();
    let mut bus = TestBus::new();
    cpu.a = 0xFF;
    cpu.x = 0x0F;
    bus.load(0, &[0xCB, 0x05]); // SBX #$05 -> X = (A & X) - 5 = 0x0F - 5 = 0x0A
    tick(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.x, 0x0A);
    assert_eq!(cpu.p & StatusFlag::C as u8, StatusFlag::C as u8, "no borrow needed");
}

#[test]
fn alr_ands_then_shifts_right_with_carry_from_bit0() {
    let mut cpu = Mos6510::new();
    let mut bus = TestBus::new();
    cpu.a = 0xFF;
    bus.load(0, &[0x4B, 0x03]); // ALR #$03 -> A&=3 -> 0x03, LSR -> 0x01, C=1
    tick(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a, 0x01);
    assert_eq!(cpu.p & StatusFlag::C as u8, StatusFlag::C as u8);
}

#[test]
fn jam_opcode_halts_the_cpu_until_reset() {
    use reson64_core::cpu::Cpu;
    let mut cpu = Mos6510::new();
    let mut bus = TestBus::new();
    bus.load(0, &[0x02]); // JAM/KIL
    tick(&mut cpu, &mut bus, 3);
    assert!(cpu.halted().is_some());
    let pc_at_halt = cpu.pc;
    tick(&mut cpu, &mut bus, 5); // further ticks must not advance a halted CPU
    assert_eq!(cpu.pc, pc_at_halt);
    cpu.reset();
    assert!(cpu.halted().is_none());
}
