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
fn brk_at_0xc000_pushes_return_address_and_status_then_vectors_through_fffe() {
    let mut cpu = Mos6510::new();
    let mut bus = TestBus::new();
    cpu.pc = 0xC000;
    cpu.sp = 0xFD;
    cpu.p = 0x20; // U always set, everything else clear
    bus.memory[0xFFFE] = 0x00;
    bus.memory[0xFFFF] = 0x90;
    bus.load(0xC000, &[0x00, 0x00]); // BRK ; padding byte
    tick(&mut cpu, &mut bus, 7); // BRK is 7 cycles total

    assert_eq!(cpu.pc, 0x9000, "must vector through $FFFE/$FFFF");
    assert_eq!(bus.memory[0x01FD], 0xC0, "pushed PCH must be $C0 (PC+2 high byte)");
    assert_eq!(bus.memory[0x01FC], 0x02, "pushed PCL must be $02 (PC+2 low byte)");
    assert_eq!(bus.memory[0x01FB], 0x20 | StatusFlag::B as u8, "pushed status must have B set");
    assert_eq!(cpu.p & StatusFlag::I as u8, StatusFlag::I as u8, "BRK must set the I flag");
    assert_eq!(cpu.sp, 0xFA);
}
