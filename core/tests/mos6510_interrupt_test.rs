use reson64_core::core::{BusMasterComponent, BusMaster};
use reson64_core::cpu::mos6510::{Mos6510, StatusFlag};
use reson64_core::cpu::Cpu;
mod common;
use common::TestBus;

fn tick(cpu: &mut Mos6510, bus: &mut TestBus, n: usize) {
    for _ in 0..n {
        cpu.tick_with_bus(bus, BusMaster::Cpu);
    }
}

/// This core recognizes a level IRQ only after it has been observed
/// asserted on two consecutive Fetch-state polls, approximating the
/// 6510's two-cycle interrupt recognition pipeline: the first poll that
/// sees the line high still lets the in-flight/next instruction start, and
/// only the following poll actually takes the interrupt.
#[test]
fn irq_is_recognized_one_poll_after_assertion_when_i_is_clear() {
    let mut cpu = Mos6510::new();
    let mut bus = TestBus::new();
    cpu.p &= !(StatusFlag::I as u8);
    bus.memory[0xFFFE] = 0x00;
    bus.memory[0xFFFF] = 0x80;
    bus.load(0, &[0xEA, 0xEA, 0xEA, 0xEA]); // NOP x4
    bus.irq = true;
    // First Fetch poll (cycle 1) just marks irq_seen_last_poll; the NOP at
    // $0000 still executes (2 cycles), then the second poll (during the
    // next Fetch) takes the interrupt instead of fetching the next NOP.
    tick(&mut cpu, &mut bus, 2 + 7);
    assert_eq!(cpu.pc, 0x8000);
}

#[test]
fn irq_masked_while_i_flag_set() {
    let mut cpu = Mos6510::new();
    let mut bus = TestBus::new();
    cpu.p |= StatusFlag::I as u8;
    bus.memory[0xFFFE] = 0x00;
    bus.memory[0xFFFF] = 0x80;
    bus.load(0, &[0xEA, 0xEA, 0xEA]);
    bus.irq = true;
    tick(&mut cpu, &mut bus, 6);
    assert_eq!(cpu.pc, 0x03, "masked IRQ must not divert control flow");
}

#[test]
fn nmi_fires_on_rising_edge_regardless_of_i_flag() {
    let mut cpu = Mos6510::new();
    let mut bus = TestBus::new();
    cpu.p |= StatusFlag::I as u8;
    bus.memory[0xFFFA] = 0x00;
    bus.memory[0xFFFB] = 0x90;
    bus.load(0, &[0xEA]);
    tick(&mut cpu, &mut bus, 2);
    bus.nmi = true;
    tick(&mut cpu, &mut bus, 7);
    assert_eq!(cpu.pc, 0x9000);
}

#[test]
fn nmi_does_not_retrigger_while_line_held_high() {
    let mut cpu = Mos6510::new();
    let mut bus = TestBus::new();
    bus.memory[0xFFFA] = 0x00;
    bus.memory[0xFFFB] = 0x90;
    bus.load(0, &[0xEA]);
    tick(&mut cpu, &mut bus, 2);
    bus.nmi = true;
    tick(&mut cpu, &mut bus, 7);
    assert_eq!(cpu.pc, 0x9000);
    bus.memory[0x9000] = 0xEA;
    bus.memory[0x9001] = 0xEA;
    tick(&mut cpu, &mut bus, 4); // two more NOPs, NMI line still held
    assert_eq!(cpu.pc, 0x9002, "held NMI line must not retrigger");
}

#[test]
fn rst_takes_priority_over_a_pending_nmi_and_irq() {
    let mut cpu = Mos6510::new();
    let mut bus = TestBus::new();
    cpu.p &= !(StatusFlag::I as u8);
    cpu.a = 0x42;
    cpu.x = 0x42;
    bus.memory[0xFFFA] = 0x00;
    bus.memory[0xFFFB] = 0x90; // NMI vector
    bus.memory[0xFFFE] = 0x00;
    bus.memory[0xFFFF] = 0x80; // IRQ vector
    bus.memory[0xFFFC] = 0x00;
    bus.memory[0xFFFD] = 0xA0; // RESET vector
    bus.load(0, &[0xEA]);
    bus.nmi = true;
    bus.irq = true;
    cpu.trigger_rst();
    tick(&mut cpu, &mut bus, 7); // 1 detection cycle + 6 execute_interrupt cycles
    assert_eq!(cpu.pc, 0xA000, "RST must win over a simultaneously pending NMI/IRQ");
    assert!(cpu.halted().is_none());
}

#[test]
fn trigger_rst_is_edge_latched_not_level_sensitive() {
    // Calling trigger_rst twice in a row before it's recognized must not
    // cause a double reset; the request is consumed once.
    let mut cpu = Mos6510::new();
    let mut bus = TestBus::new();
    bus.memory[0xFFFC] = 0x00;
    bus.memory[0xFFFD] = 0xA0;
    bus.load(0xA000, &[0xEA, 0xEA]);
    cpu.trigger_rst();
    cpu.trigger_rst();
    tick(&mut cpu, &mut bus, 7); // recognizes the latched reset, jumps to $A000
    assert_eq!(cpu.pc, 0xA000);
    tick(&mut cpu, &mut bus, 2); // executes the NOP at $A000 normally
    assert_eq!(cpu.pc, 0xA001);
}
