//! The 6502 engine: decode, execute, cycle accounting.

use bridge_core::{
    Bus, BackendConfig, CpuError, Execution, Interrupt, StackPolicy, UndocumentedLevel,
    IRQ_VECTOR, NMI_VECTOR, RESET_VECTOR, STACK_PAGE,
};

use crate::opcodes::{Mnemonic, Opcode, Tier, OPCODES};
use crate::{AddressingMode, Registers};

/// The MOS 6502 CPU.
///
/// Instruction-stepped: [`step`] runs one whole instruction and returns
/// its cycle cost. Register state is public so adapters and harnesses
/// can inspect and seed it directly.
///
/// [`step`]: Mos6502::step
#[derive(Debug)]
pub struct Mos6502 {
    /// CPU registers.
    pub regs: Registers,

    pub(crate) config: BackendConfig,

    /// NMI line was pulled; serviced before the next instruction.
    nmi_pending: bool,
    /// IRQ line is asserted; serviced when the I flag allows.
    irq_pending: bool,
    /// Set by JAM opcodes; a halted CPU executes nothing.
    halted: bool,
}

impl Default for Mos6502 {
    fn default() -> Self {
        Self::new(BackendConfig::default())
    }
}

impl Mos6502 {
    /// Create an engine with the given backend configuration.
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            regs: Registers::new(),
            config,
            nmi_pending: false,
            irq_pending: false,
            halted: false,
        }
    }

    /// The configuration this engine was built with.
    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Whether a JAM opcode has locked the CPU up.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Pull the NMI line. The interrupt is taken before the next
    /// instruction, regardless of the I flag.
    pub fn trigger_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Assert the IRQ line. The interrupt is taken before the next
    /// instruction unless the I flag masks it.
    pub fn trigger_irq(&mut self) {
        self.irq_pending = true;
    }

    /// Power-on/reset sequence: seven cycles, then PC is loaded from
    /// the reset vector.
    pub fn reset(&mut self, bus: &mut impl Bus) {
        bus.tick(7);
        self.regs = Registers::new();
        self.regs.pc = self.read_word(bus, RESET_VECTOR);
        self.nmi_pending = false;
        self.irq_pending = false;
        self.halted = false;
    }

    // =========================================================================
    // Stack
    // =========================================================================

    /// Push a byte onto the stack.
    pub fn push(&mut self, bus: &mut impl Bus, value: u8) -> Result<(), CpuError> {
        if self.regs.sp == 0x00 && self.config.stack_policy == StackPolicy::Fault {
            return Err(CpuError::StackOverflow);
        }
        bus.write(STACK_PAGE | u16::from(self.regs.sp), value);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        Ok(())
    }

    /// Pull a byte from the stack.
    pub fn pull(&mut self, bus: &mut impl Bus) -> Result<u8, CpuError> {
        if self.regs.sp == 0xFF && self.config.stack_policy == StackPolicy::Fault {
            return Err(CpuError::StackUnderflow);
        }
        self.regs.sp = self.regs.sp.wrapping_add(1);
        Ok(bus.read(STACK_PAGE | u16::from(self.regs.sp)))
    }

    /// Push a word: high byte first, so the low byte ends up on top.
    pub fn push_word(&mut self, bus: &mut impl Bus, value: u16) -> Result<(), CpuError> {
        self.push(bus, (value >> 8) as u8)?;
        self.push(bus, value as u8)
    }

    /// Pull a word: low byte first, then high.
    pub fn pull_word(&mut self, bus: &mut impl Bus) -> Result<u16, CpuError> {
        let low = self.pull(bus)?;
        let high = self.pull(bus)?;
        Ok(u16::from_le_bytes([low, high]))
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Run one instruction (or service a pending interrupt) and return
    /// the cycles consumed.
    pub fn step(&mut self, bus: &mut impl Bus) -> Result<Execution, CpuError> {
        if self.halted {
            return Ok(Execution {
                cycles: 0,
                interrupt: None,
            });
        }

        if self.nmi_pending {
            self.nmi_pending = false;
            let cycles = self.enter_interrupt(bus, NMI_VECTOR)?;
            return Ok(Execution {
                cycles,
                interrupt: Some(Interrupt::Nmi),
            });
        }

        if self.irq_pending && !self.regs.status.interrupt_disable {
            self.irq_pending = false;
            let cycles = self.enter_interrupt(bus, IRQ_VECTOR)?;
            return Ok(Execution {
                cycles,
                interrupt: Some(Interrupt::Irq),
            });
        }

        let opcode = self.fetch(bus);
        let entry = &OPCODES[opcode as usize];
        if !self.supported(entry.tier) {
            return Err(CpuError::UnsupportedOpcode { opcode });
        }

        let cycles = self.execute(bus, entry)?;
        Ok(Execution {
            cycles,
            interrupt: None,
        })
    }

    fn supported(&self, tier: Tier) -> bool {
        match self.config.undocumented {
            UndocumentedLevel::None => tier == Tier::Documented,
            UndocumentedLevel::Partial => tier <= Tier::Partial,
            UndocumentedLevel::Full => true,
        }
    }

    /// Hardware interrupt entry: like BRK without the padding fetch,
    /// and with the break flag clear in the pushed status byte.
    fn enter_interrupt(&mut self, bus: &mut impl Bus, vector: u16) -> Result<u32, CpuError> {
        bus.tick(2);
        self.push_word(bus, self.regs.pc)?;
        self.push(bus, self.regs.status.to_byte(false))?;
        self.regs.status.interrupt_disable = true;
        self.regs.pc = self.read_word(bus, vector);
        Ok(7)
    }

    /// Resolve and read the instruction's operand value.
    ///
    /// Returns the value and the page-cross penalty cycles charged.
    fn operand(&mut self, bus: &mut impl Bus, entry: &Opcode) -> (u8, u32) {
        if entry.mode == AddressingMode::Immediate {
            return (self.fetch(bus), 0);
        }
        let (addr, crossed) = self.address_read(bus, entry.mode);
        if crossed && entry.page_penalty {
            bus.tick(1);
            (bus.read(addr), 1)
        } else {
            (bus.read(addr), 0)
        }
    }

    /// Read-modify-write: read, spend the modify cycle, write back.
    /// Returns the written value for the combination illegals.
    fn rmw(
        &mut self,
        bus: &mut impl Bus,
        mode: AddressingMode,
        op: fn(&mut Self, u8) -> u8,
    ) -> u8 {
        let addr = self.address_write(bus, mode);
        let value = bus.read(addr);
        bus.tick(1);
        let result = op(self, value);
        bus.write(addr, result);
        result
    }

    /// Shift/rotate, on the accumulator or through memory.
    fn shift(&mut self, bus: &mut impl Bus, entry: &Opcode, op: fn(&mut Self, u8) -> u8) {
        if entry.mode == AddressingMode::Accumulator {
            bus.tick(1);
            self.regs.a = op(self, self.regs.a);
        } else {
            self.rmw(bus, entry.mode, op);
        }
    }

    fn execute(&mut self, bus: &mut impl Bus, entry: &Opcode) -> Result<u32, CpuError> {
        use Mnemonic as M;

        let base = u32::from(entry.cycles);
        let flags = self.regs.status;

        let cycles = match entry.mnemonic {
            // =================================================================
            // Load/store
            // =================================================================
            M::Lda => {
                let (value, extra) = self.operand(bus, entry);
                self.regs.a = value;
                self.regs.status.update_nz(value);
                base + extra
            }
            M::Ldx => {
                let (value, extra) = self.operand(bus, entry);
                self.regs.x = value;
                self.regs.status.update_nz(value);
                base + extra
            }
            M::Ldy => {
                let (value, extra) = self.operand(bus, entry);
                self.regs.y = value;
                self.regs.status.update_nz(value);
                base + extra
            }
            M::Sta => {
                let addr = self.address_write(bus, entry.mode);
                bus.write(addr, self.regs.a);
                base
            }
            M::Stx => {
                let addr = self.address_write(bus, entry.mode);
                bus.write(addr, self.regs.x);
                base
            }
            M::Sty => {
                let addr = self.address_write(bus, entry.mode);
                bus.write(addr, self.regs.y);
                base
            }

            // =================================================================
            // Transfers
            // =================================================================
            M::Tax => {
                bus.tick(1);
                self.regs.x = self.regs.a;
                self.regs.status.update_nz(self.regs.x);
                base
            }
            M::Tay => {
                bus.tick(1);
                self.regs.y = self.regs.a;
                self.regs.status.update_nz(self.regs.y);
                base
            }
            M::Tsx => {
                bus.tick(1);
                self.regs.x = self.regs.sp;
                self.regs.status.update_nz(self.regs.x);
                base
            }
            M::Txa => {
                bus.tick(1);
                self.regs.a = self.regs.x;
                self.regs.status.update_nz(self.regs.a);
                base
            }
            M::Tya => {
                bus.tick(1);
                self.regs.a = self.regs.y;
                self.regs.status.update_nz(self.regs.a);
                base
            }
            M::Txs => {
                // TXS does not affect flags
                bus.tick(1);
                self.regs.sp = self.regs.x;
                base
            }

            // =================================================================
            // Stack operations
            // =================================================================
            M::Pha => {
                bus.tick(1);
                self.push(bus, self.regs.a)?;
                base
            }
            M::Php => {
                bus.tick(1);
                self.push(bus, self.regs.status.to_byte(true))?;
                base
            }
            M::Pla => {
                bus.tick(2);
                self.regs.a = self.pull(bus)?;
                self.regs.status.update_nz(self.regs.a);
                base
            }
            M::Plp => {
                bus.tick(2);
                let byte = self.pull(bus)?;
                self.regs.status = crate::Status::from_byte(byte);
                base
            }

            // =================================================================
            // Arithmetic
            // =================================================================
            M::Adc => {
                let (value, extra) = self.operand(bus, entry);
                self.adc(value);
                base + extra
            }
            M::Sbc => {
                let (value, extra) = self.operand(bus, entry);
                self.sbc(value);
                base + extra
            }
            M::Cmp => {
                let (value, extra) = self.operand(bus, entry);
                self.compare(self.regs.a, value);
                base + extra
            }
            M::Cpx => {
                let (value, extra) = self.operand(bus, entry);
                self.compare(self.regs.x, value);
                base + extra
            }
            M::Cpy => {
                let (value, extra) = self.operand(bus, entry);
                self.compare(self.regs.y, value);
                base + extra
            }

            // =================================================================
            // Logic
            // =================================================================
            M::And => {
                let (value, extra) = self.operand(bus, entry);
                self.regs.a &= value;
                self.regs.status.update_nz(self.regs.a);
                base + extra
            }
            M::Ora => {
                let (value, extra) = self.operand(bus, entry);
                self.regs.a |= value;
                self.regs.status.update_nz(self.regs.a);
                base + extra
            }
            M::Eor => {
                let (value, extra) = self.operand(bus, entry);
                self.regs.a ^= value;
                self.regs.status.update_nz(self.regs.a);
                base + extra
            }
            M::Bit => {
                let (value, _) = self.operand(bus, entry);
                self.regs.status.zero = self.regs.a & value == 0;
                self.regs.status.negative = value & 0x80 != 0;
                self.regs.status.overflow = value & 0x40 != 0;
                base
            }

            // =================================================================
            // Shifts/rotates
            // =================================================================
            M::Asl => {
                self.shift(bus, entry, Self::asl);
                base
            }
            M::Lsr => {
                self.shift(bus, entry, Self::lsr);
                base
            }
            M::Rol => {
                self.shift(bus, entry, Self::rol);
                base
            }
            M::Ror => {
                self.shift(bus, entry, Self::ror);
                base
            }

            // =================================================================
            // Increments/decrements
            // =================================================================
            M::Inc => {
                self.rmw(bus, entry.mode, Self::inc);
                base
            }
            M::Dec => {
                self.rmw(bus, entry.mode, Self::dec);
                base
            }
            M::Inx => {
                bus.tick(1);
                self.regs.x = self.regs.x.wrapping_add(1);
                self.regs.status.update_nz(self.regs.x);
                base
            }
            M::Iny => {
                bus.tick(1);
                self.regs.y = self.regs.y.wrapping_add(1);
                self.regs.status.update_nz(self.regs.y);
                base
            }
            M::Dex => {
                bus.tick(1);
                self.regs.x = self.regs.x.wrapping_sub(1);
                self.regs.status.update_nz(self.regs.x);
                base
            }
            M::Dey => {
                bus.tick(1);
                self.regs.y = self.regs.y.wrapping_sub(1);
                self.regs.status.update_nz(self.regs.y);
                base
            }

            // =================================================================
            // Control flow
            // =================================================================
            M::Jmp => {
                if entry.mode == AddressingMode::Indirect {
                    let pointer = self.fetch_word(bus);
                    self.regs.pc = self.read_word_indirect(bus, pointer);
                } else {
                    self.regs.pc = self.fetch_word(bus);
                }
                base
            }
            M::Jsr => {
                let target = self.fetch_word(bus);
                bus.tick(1);
                // Return address is the last byte of the JSR itself;
                // RTS adds one on the way back.
                self.push_word(bus, self.regs.pc.wrapping_sub(1))?;
                self.regs.pc = target;
                base
            }
            M::Rts => {
                bus.tick(2);
                self.regs.pc = self.pull_word(bus)?.wrapping_add(1);
                bus.tick(1);
                base
            }
            M::Rti => {
                bus.tick(2);
                let byte = self.pull(bus)?;
                self.regs.status = crate::Status::from_byte(byte);
                // Pushed as an absolute resume address: no +1 here
                self.regs.pc = self.pull_word(bus)?;
                base
            }
            M::Brk => {
                // Padding byte: fetched and skipped
                self.fetch(bus);
                self.push_word(bus, self.regs.pc)?;
                self.push(bus, self.regs.status.to_byte(true))?;
                self.regs.status.interrupt_disable = true;
                self.regs.pc = self.read_word(bus, IRQ_VECTOR);
                base
            }
            M::Bpl => base + self.branch_if(bus, !flags.negative),
            M::Bmi => base + self.branch_if(bus, flags.negative),
            M::Bvc => base + self.branch_if(bus, !flags.overflow),
            M::Bvs => base + self.branch_if(bus, flags.overflow),
            M::Bcc => base + self.branch_if(bus, !flags.carry),
            M::Bcs => base + self.branch_if(bus, flags.carry),
            M::Bne => base + self.branch_if(bus, !flags.zero),
            M::Beq => base + self.branch_if(bus, flags.zero),

            // =================================================================
            // Flag operations
            // =================================================================
            M::Clc => {
                bus.tick(1);
                self.regs.status.carry = false;
                base
            }
            M::Sec => {
                bus.tick(1);
                self.regs.status.carry = true;
                base
            }
            M::Cli => {
                bus.tick(1);
                self.regs.status.interrupt_disable = false;
                base
            }
            M::Sei => {
                bus.tick(1);
                self.regs.status.interrupt_disable = true;
                base
            }
            M::Clv => {
                bus.tick(1);
                self.regs.status.overflow = false;
                base
            }
            M::Cld => {
                bus.tick(1);
                self.regs.status.decimal = false;
                base
            }
            M::Sed => {
                bus.tick(1);
                self.regs.status.decimal = true;
                base
            }
            M::Nop => match entry.mode {
                AddressingMode::Implied => {
                    bus.tick(1);
                    base
                }
                AddressingMode::Immediate => {
                    self.fetch(bus);
                    base
                }
                _ => {
                    let (_, extra) = self.operand(bus, entry);
                    base + extra
                }
            },

            // =================================================================
            // Undocumented: stable combinations
            // =================================================================
            M::Lax => {
                let (value, extra) = self.operand(bus, entry);
                self.regs.a = value;
                self.regs.x = value;
                self.regs.status.update_nz(value);
                base + extra
            }
            M::Sax => {
                let addr = self.address_write(bus, entry.mode);
                bus.write(addr, self.regs.a & self.regs.x);
                base
            }
            M::Dcp => {
                let result = self.rmw(bus, entry.mode, |_, value| value.wrapping_sub(1));
                self.compare(self.regs.a, result);
                base
            }
            M::Isc => {
                let result = self.rmw(bus, entry.mode, |_, value| value.wrapping_add(1));
                self.sbc(result);
                base
            }
            M::Slo => {
                let result = self.rmw(bus, entry.mode, Self::asl);
                self.regs.a |= result;
                self.regs.status.update_nz(self.regs.a);
                base
            }
            M::Sre => {
                let result = self.rmw(bus, entry.mode, Self::lsr);
                self.regs.a ^= result;
                self.regs.status.update_nz(self.regs.a);
                base
            }
            M::Rla => {
                let result = self.rmw(bus, entry.mode, Self::rol);
                self.regs.a &= result;
                self.regs.status.update_nz(self.regs.a);
                base
            }
            M::Rra => {
                let result = self.rmw(bus, entry.mode, Self::ror);
                self.adc(result);
                base
            }

            // =================================================================
            // Undocumented: immediate-only group
            // =================================================================
            M::Anc => {
                let value = self.fetch(bus);
                self.regs.a &= value;
                self.regs.status.update_nz(self.regs.a);
                self.regs.status.carry = self.regs.a & 0x80 != 0;
                base
            }
            M::Alr => {
                let value = self.fetch(bus);
                self.regs.a &= value;
                self.regs.a = self.lsr(self.regs.a);
                base
            }
            M::Arr => {
                let value = self.fetch(bus);
                self.regs.a &= value;
                self.regs.a = self.ror(self.regs.a);
                self.regs.status.carry = self.regs.a & 0x40 != 0;
                self.regs.status.overflow =
                    ((self.regs.a >> 6) ^ (self.regs.a >> 5)) & 0x01 != 0;
                base
            }
            M::Sbx => {
                let value = self.fetch(bus);
                let result = u16::from(self.regs.a & self.regs.x).wrapping_sub(u16::from(value));
                self.regs.x = result as u8;
                self.regs.status.carry = result < 0x100;
                self.regs.status.update_nz(self.regs.x);
                base
            }
            M::Las => {
                let (value, extra) = self.operand(bus, entry);
                let result = value & self.regs.sp;
                self.regs.a = result;
                self.regs.x = result;
                self.regs.sp = result;
                self.regs.status.update_nz(result);
                base + extra
            }

            // =================================================================
            // Undocumented: unstable group (best-effort)
            // =================================================================
            M::Xaa => {
                let value = self.fetch(bus);
                self.regs.a = self.regs.x & value;
                self.regs.status.update_nz(self.regs.a);
                base
            }
            M::Ahx => {
                let addr = self.address_write(bus, entry.mode);
                let value = self.regs.a & self.regs.x & ((addr >> 8) as u8).wrapping_add(1);
                bus.write(addr, value);
                base
            }
            M::Tas => {
                let addr = self.address_write(bus, entry.mode);
                self.regs.sp = self.regs.a & self.regs.x;
                bus.write(addr, self.regs.sp & ((addr >> 8) as u8).wrapping_add(1));
                base
            }
            M::Shy => {
                let addr = self.address_write(bus, entry.mode);
                bus.write(addr, self.regs.y & ((addr >> 8) as u8).wrapping_add(1));
                base
            }
            M::Shx => {
                let addr = self.address_write(bus, entry.mode);
                bus.write(addr, self.regs.x & ((addr >> 8) as u8).wrapping_add(1));
                base
            }
            M::Jam => {
                bus.tick(1);
                self.halted = true;
                base
            }
        };

        Ok(cycles)
    }

    // =========================================================================
    // ALU
    // =========================================================================

    fn adc(&mut self, value: u8) {
        if self.config.decimal_enabled && self.regs.status.decimal {
            self.adc_decimal(value);
        } else {
            self.adc_binary(value);
        }
    }

    fn adc_binary(&mut self, value: u8) {
        let a = self.regs.a;
        let carry = u16::from(self.regs.status.carry);
        let sum = u16::from(a) + u16::from(value) + carry;
        let result = sum as u8;

        self.regs.status.carry = sum > 0xFF;
        self.regs.status.overflow = (a ^ result) & (value ^ result) & 0x80 != 0;
        self.regs.status.update_nz(result);
        self.regs.a = result;
    }

    fn adc_decimal(&mut self, value: u8) {
        let a = u16::from(self.regs.a);
        let v = u16::from(value);
        let carry = u16::from(self.regs.status.carry);

        let mut low = (a & 0x0F) + (v & 0x0F) + carry;
        if low > 9 {
            low += 6;
        }
        let mut high = (a >> 4) + (v >> 4) + u16::from(low > 0x0F);

        // NMOS quirk: Z comes from the binary sum, N and V from the
        // intermediate high nibble
        let binary = (a + v + carry) as u8;
        self.regs.status.zero = binary == 0;
        self.regs.status.negative = high & 0x08 != 0;
        self.regs.status.overflow =
            (a ^ u16::from(binary)) & (v ^ u16::from(binary)) & 0x80 != 0;

        if high > 9 {
            high += 6;
        }
        self.regs.status.carry = high > 0x0F;
        self.regs.a = ((high << 4) | (low & 0x0F)) as u8;
    }

    fn sbc(&mut self, value: u8) {
        if self.config.decimal_enabled && self.regs.status.decimal {
            self.sbc_decimal(value);
        } else {
            // Subtraction is addition of the complement
            self.adc_binary(!value);
        }
    }

    fn sbc_decimal(&mut self, value: u8) {
        let a = i16::from(self.regs.a);
        let v = i16::from(value);
        let borrow = i16::from(!self.regs.status.carry);

        // Flags come from the binary result on NMOS
        let binary = a.wrapping_sub(v).wrapping_sub(borrow);
        self.regs.status.carry = binary >= 0;
        self.regs.status.zero = (binary as u8) == 0;
        self.regs.status.negative = binary & 0x80 != 0;
        self.regs.status.overflow = (a ^ binary) & (!v ^ binary) & 0x80 != 0;

        let mut low = (a & 0x0F) - (v & 0x0F) - borrow;
        let mut high = (a >> 4) - (v >> 4) - i16::from(low < 0);
        if low < 0 {
            low -= 6;
        }
        if high < 0 {
            high -= 6;
        }
        self.regs.a = ((high << 4) as u8) | ((low & 0x0F) as u8);
    }

    fn compare(&mut self, register: u8, value: u8) {
        let result = register.wrapping_sub(value);
        self.regs.status.carry = register >= value;
        self.regs.status.update_nz(result);
    }

    fn asl(&mut self, value: u8) -> u8 {
        self.regs.status.carry = value & 0x80 != 0;
        let result = value << 1;
        self.regs.status.update_nz(result);
        result
    }

    fn lsr(&mut self, value: u8) -> u8 {
        self.regs.status.carry = value & 0x01 != 0;
        let result = value >> 1;
        self.regs.status.update_nz(result);
        result
    }

    fn rol(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.regs.status.carry);
        self.regs.status.carry = value & 0x80 != 0;
        let result = (value << 1) | carry_in;
        self.regs.status.update_nz(result);
        result
    }

    fn ror(&mut self, value: u8) -> u8 {
        let carry_in = if self.regs.status.carry { 0x80 } else { 0 };
        self.regs.status.carry = value & 0x01 != 0;
        let result = (value >> 1) | carry_in;
        self.regs.status.update_nz(result);
        result
    }

    fn inc(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.regs.status.update_nz(result);
        result
    }

    fn dec(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.regs.status.update_nz(result);
        result
    }
}
