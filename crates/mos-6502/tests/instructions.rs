//! Program-level tests for 6502 instruction behavior.

use bridge_core::{BackendConfig, FlatBus, UndocumentedLevel};
use mos_6502::Mos6502;

/// Load a program at $0200 and point PC at it.
fn setup(program: &[u8]) -> (Mos6502, FlatBus) {
    let mut bus = FlatBus::new();
    bus.load(0x0200, program);
    let mut cpu = Mos6502::default();
    cpu.regs.pc = 0x0200;
    (cpu, bus)
}

/// Run `count` instructions, returning total cycles.
fn run(cpu: &mut Mos6502, bus: &mut FlatBus, count: usize) -> u32 {
    let mut total = 0;
    for _ in 0..count {
        let execution = cpu.step(bus).unwrap_or_else(|e| panic!("step failed: {e}"));
        total += execution.cycles;
    }
    total
}

#[test]
fn stack_pha_pla() {
    // LDA #$42; LDX #$FF; TXS; PHA; LDA #$00; PLA
    let (mut cpu, mut bus) = setup(&[
        0xA9, 0x42, // LDA #$42
        0xA2, 0xFF, // LDX #$FF
        0x9A, // TXS
        0x48, // PHA
        0xA9, 0x00, // LDA #$00
        0x68, // PLA
    ]);

    run(&mut cpu, &mut bus, 6);

    assert_eq!(cpu.regs.a, 0x42, "PLA should restore A");
    assert_eq!(cpu.regs.sp, 0xFF, "SP should be back to $FF after PLA");
}

#[test]
fn subroutine_nesting() {
    // Two levels of JSR/RTS, checking PC lands after each call site.
    let (mut cpu, mut bus) = setup(&[
        0x20, 0x00, 0x03, // JSR $0300
        0xEA, // NOP       @ $0203
    ]);
    bus.load(0x0300, &[0x20, 0x00, 0x04, 0x60]); // JSR $0400; RTS
    bus.load(0x0400, &[0x60]); // RTS

    run(&mut cpu, &mut bus, 1); // JSR $0300
    assert_eq!(cpu.regs.pc, 0x0300);
    run(&mut cpu, &mut bus, 1); // JSR $0400
    assert_eq!(cpu.regs.pc, 0x0400);
    run(&mut cpu, &mut bus, 1); // RTS
    assert_eq!(cpu.regs.pc, 0x0303);
    run(&mut cpu, &mut bus, 1); // RTS
    assert_eq!(cpu.regs.pc, 0x0203);
    assert_eq!(cpu.regs.sp, 0xFD, "both frames unwound");
}

#[test]
fn countdown_loop_cycles() {
    // LDX #$03; loop: DEX; BNE loop
    let (mut cpu, mut bus) = setup(&[
        0xA2, 0x03, // LDX #$03
        0xCA, // DEX
        0xD0, 0xFD, // BNE -3
    ]);

    // LDX(2) + 3*DEX(2) + 2 taken branches(3) + 1 not taken(2)
    let cycles = run(&mut cpu, &mut bus, 7);
    assert_eq!(cycles, 2 + 3 * 2 + 2 * 3 + 2);
    assert_eq!(cpu.regs.x, 0);
    assert_eq!(cpu.regs.pc, 0x0205);
}

#[test]
fn read_modify_write_in_memory() {
    // INC $10 three times, then ASL $10
    let (mut cpu, mut bus) = setup(&[
        0xE6, 0x10, // INC $10
        0xE6, 0x10, // INC $10
        0xE6, 0x10, // INC $10
        0x06, 0x10, // ASL $10
    ]);
    bus.load(0x0010, &[0x7E]);

    run(&mut cpu, &mut bus, 3);
    assert_eq!(bus.peek(0x0010), 0x81);
    assert!(cpu.regs.status.negative);

    run(&mut cpu, &mut bus, 1);
    assert_eq!(bus.peek(0x0010), 0x02);
    assert!(cpu.regs.status.carry, "bit 7 shifted into carry");
}

#[test]
fn indexed_indirect_store_and_load() {
    // Pointer table in zero page: ($20,X) with X=$04 -> pointer at $24
    let (mut cpu, mut bus) = setup(&[
        0xA2, 0x04, // LDX #$04
        0xA9, 0x5A, // LDA #$5A
        0x81, 0x20, // STA ($20,X)
        0xA9, 0x00, // LDA #$00
        0xA1, 0x20, // LDA ($20,X)
    ]);
    bus.load(0x0024, &[0x00, 0x13]); // -> $1300

    run(&mut cpu, &mut bus, 5);
    assert_eq!(bus.peek(0x1300), 0x5A);
    assert_eq!(cpu.regs.a, 0x5A);
}

#[test]
fn indirect_indexed_page_cross() {
    // LDA ($20),Y with Y pushing the address across a page
    let (mut cpu, mut bus) = setup(&[
        0xA0, 0x30, // LDY #$30
        0xB1, 0x20, // LDA ($20),Y
    ]);
    bus.load(0x0020, &[0xF0, 0x12]); // base $12F0, +$30 -> $1320
    bus.load(0x1320, &[0x77]);

    let cycles = run(&mut cpu, &mut bus, 2);
    assert_eq!(cycles, 2 + 6, "page cross adds a cycle to the 5-cycle base");
    assert_eq!(cpu.regs.a, 0x77);
}

#[test]
fn compare_sets_borrowless_carry() {
    let (mut cpu, mut bus) = setup(&[
        0xA9, 0x40, // LDA #$40
        0xC9, 0x30, // CMP #$30
        0xC9, 0x40, // CMP #$40
        0xC9, 0x50, // CMP #$50
    ]);

    run(&mut cpu, &mut bus, 2);
    assert!(cpu.regs.status.carry);
    assert!(!cpu.regs.status.zero);

    run(&mut cpu, &mut bus, 1);
    assert!(cpu.regs.status.carry);
    assert!(cpu.regs.status.zero);

    run(&mut cpu, &mut bus, 1);
    assert!(!cpu.regs.status.carry);
    assert!(cpu.regs.status.negative);
}

#[test]
fn zero_page_x_wraps_within_page_zero() {
    let (mut cpu, mut bus) = setup(&[
        0xA2, 0x10, // LDX #$10
        0xB5, 0xF8, // LDA $F8,X -> wraps to $08
    ]);
    bus.load(0x0008, &[0x3C]);

    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.regs.a, 0x3C);
}

#[test]
fn sax_stores_a_and_x() {
    let mut bus = FlatBus::new();
    bus.load(0x0200, &[0x87, 0x40]); // SAX $40
    let mut cpu = Mos6502::new(BackendConfig {
        undocumented: UndocumentedLevel::Partial,
        ..BackendConfig::default()
    });
    cpu.regs.pc = 0x0200;
    cpu.regs.a = 0xF0;
    cpu.regs.x = 0x3C;

    run(&mut cpu, &mut bus, 1);
    assert_eq!(bus.peek(0x0040), 0x30);
}

#[test]
fn isc_increments_then_subtracts() {
    let mut bus = FlatBus::new();
    bus.load(0x0200, &[0x38, 0xE7, 0x40]); // SEC; ISC $40
    bus.load(0x0040, &[0x0F]);
    let mut cpu = Mos6502::new(BackendConfig {
        undocumented: UndocumentedLevel::Partial,
        ..BackendConfig::default()
    });
    cpu.regs.pc = 0x0200;
    cpu.regs.a = 0x20;

    run(&mut cpu, &mut bus, 2);
    assert_eq!(bus.peek(0x0040), 0x10);
    assert_eq!(cpu.regs.a, 0x10, "$20 - $10 with carry set");
}
