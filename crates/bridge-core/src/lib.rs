//! Bridge contract for interchangeable 6502 CPU backends.
//!
//! A host emulator drives a CPU through the [`CpuBridge`] trait without
//! knowing which concrete engine sits behind it. Backends keep their own
//! internal register and flag representations; the contract pins down the
//! observable behavior (byte ordering on the stack, the packed status
//! view, cycle counts) so that swapping engines never changes what the
//! caller sees.

mod bridge;
mod bus;
mod config;
mod error;
mod register;

pub use bridge::{CpuBridge, Execution, Interrupt};
pub use bus::{Bus, FlatBus};
pub use config::{BackendConfig, StackPolicy, UndocumentedLevel};
pub use error::CpuError;
pub use register::{Flag, Register};

/// Base address of the fixed stack page ($0100-$01FF).
pub const STACK_PAGE: u16 = 0x0100;

/// Non-maskable interrupt vector.
pub const NMI_VECTOR: u16 = 0xFFFA;

/// Power-on/reset vector.
pub const RESET_VECTOR: u16 = 0xFFFC;

/// Maskable interrupt / BRK vector.
pub const IRQ_VECTOR: u16 = 0xFFFE;
