//! The 6502 backend adapter.

use bridge_core::{
    BackendConfig, Bus, CpuBridge, CpuError, Execution, Flag, FlatBus, Register,
};
use mos_6502::{Mos6502, Status};
use tracing::{debug, trace};

/// A [`Mos6502`] engine and a memory bus behind the bridge contract.
///
/// The bus type is generic so hosts can plug in their own memory map;
/// the default is the flat 64 KiB [`FlatBus`].
pub struct Mos6502Bridge<B: Bus = FlatBus> {
    cpu: Mos6502,
    bus: B,
    started: bool,
}

impl Mos6502Bridge<FlatBus> {
    /// A bridge over flat RAM, for harnesses and standalone use.
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self::with_bus(config, FlatBus::new())
    }
}

impl<B: Bus> Mos6502Bridge<B> {
    /// A bridge over a host-supplied bus.
    pub fn with_bus(config: BackendConfig, bus: B) -> Self {
        Self {
            cpu: Mos6502::new(config),
            bus,
            started: false,
        }
    }

    /// The underlying bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable access to the underlying bus.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// The underlying engine, for host-side inspection.
    pub fn engine(&self) -> &Mos6502 {
        &self.cpu
    }

    /// Pull the engine's NMI line. Taken before the next `execute`.
    pub fn trigger_nmi(&mut self) {
        self.cpu.trigger_nmi();
    }

    /// Assert the engine's IRQ line. Taken before the next `execute`
    /// unless masked by the I flag.
    pub fn trigger_irq(&mut self) {
        self.cpu.trigger_irq();
    }
}

impl<B: Bus> CpuBridge for Mos6502Bridge<B> {
    fn start(&mut self) -> Result<(), CpuError> {
        if self.started {
            return Err(CpuError::AlreadyStarted);
        }
        self.cpu.reset(&mut self.bus);
        self.started = true;
        debug!("started: reset vector -> ${:04X}", self.cpu.regs.pc);
        Ok(())
    }

    fn pc(&self) -> u16 {
        self.cpu.regs.pc
    }

    fn set_pc(&mut self, value: u16) {
        self.cpu.regs.pc = value;
    }

    fn memory_fetch(&mut self, address: u16) -> u8 {
        self.bus.read(address)
    }

    fn memory_set(&mut self, address: u16, value: u8) {
        self.bus.write(address, value);
    }

    fn execute(&mut self) -> Result<Execution, CpuError> {
        if !self.started {
            return Err(CpuError::NotStarted);
        }
        let pc = self.cpu.regs.pc;
        let execution = self.cpu.step(&mut self.bus)?;
        trace!(
            "pc=${pc:04X} cycles={} interrupt={:?}",
            execution.cycles, execution.interrupt
        );
        Ok(execution)
    }

    fn register(&self, register: Register) -> u16 {
        let regs = &self.cpu.regs;
        match register {
            Register::A => u16::from(regs.a),
            Register::X => u16::from(regs.x),
            Register::Y => u16::from(regs.y),
            Register::Sp => u16::from(regs.sp),
            Register::Pc => regs.pc,
            // Packed from the flag set on every access, never stored
            Register::P => u16::from(regs.status.to_byte(false)),
        }
    }

    fn set_register(&mut self, register: Register, value: u16) {
        let regs = &mut self.cpu.regs;
        match register {
            Register::A => regs.a = value as u8,
            Register::X => regs.x = value as u8,
            Register::Y => regs.y = value as u8,
            Register::Sp => regs.sp = value as u8,
            Register::Pc => regs.pc = value,
            Register::P => regs.status = Status::from_byte(value as u8),
        }
    }

    fn flag(&self, flag: Flag) -> bool {
        self.cpu.regs.status.get(flag)
    }

    fn set_flag(&mut self, flag: Flag) {
        self.cpu.regs.status.set(flag, true);
    }

    fn clear_flag(&mut self, flag: Flag) {
        self.cpu.regs.status.set(flag, false);
    }

    fn push_byte(&mut self, value: u8) -> Result<(), CpuError> {
        self.cpu.push(&mut self.bus, value)
    }

    fn pull_byte(&mut self) -> Result<u8, CpuError> {
        self.cpu.pull(&mut self.bus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started_bridge() -> Mos6502Bridge {
        let mut bridge = Mos6502Bridge::new(BackendConfig::default());
        // Reset vector -> $0200
        bridge.memory_set(0xFFFC, 0x00);
        bridge.memory_set(0xFFFD, 0x02);
        bridge.start().unwrap_or_else(|e| panic!("{e}"));
        bridge
    }

    #[test]
    fn start_reads_reset_vector() {
        let bridge = started_bridge();
        assert_eq!(bridge.pc(), 0x0200);
    }

    #[test]
    fn start_twice_is_a_caller_error() {
        let mut bridge = started_bridge();
        assert_eq!(bridge.start(), Err(CpuError::AlreadyStarted));
    }

    #[test]
    fn execute_before_start_is_a_caller_error() {
        let mut bridge = Mos6502Bridge::new(BackendConfig::default());
        assert_eq!(bridge.execute(), Err(CpuError::NotStarted));
    }

    #[test]
    fn register_access_by_name() {
        let mut bridge = started_bridge();
        bridge.set_register(Register::A, 0x42);
        bridge.set_register(Register::X, 0x1234); // low byte only
        assert_eq!(bridge.register(Register::A), 0x42);
        assert_eq!(bridge.register(Register::X), 0x34);

        bridge.set_register(Register::Pc, 0xBEEF);
        assert_eq!(bridge.register(Register::Pc), 0xBEEF);
    }

    #[test]
    fn p_register_is_a_computed_view() {
        let mut bridge = started_bridge();
        bridge.set_register(Register::P, 0x00);
        bridge.set_flag(Flag::Carry);
        bridge.set_flag(Flag::Negative);
        // The packed byte reflects flag mutations made after the write
        assert_eq!(bridge.register(Register::P), 0x20 | 0x01 | 0x80);

        bridge.clear_flag(Flag::Carry);
        assert_eq!(bridge.register(Register::P), 0x20 | 0x80);
    }

    #[test]
    fn interrupt_lines_reach_the_engine() {
        let mut bridge = started_bridge();
        bridge.memory_set(0xFFFA, 0x00);
        bridge.memory_set(0xFFFB, 0x50);
        bridge.memory_set(0x0200, 0xEA);

        bridge.trigger_nmi();
        let execution = bridge.execute().unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(execution.interrupt, Some(bridge_core::Interrupt::Nmi));
        assert_eq!(bridge.pc(), 0x5000);
    }
}
