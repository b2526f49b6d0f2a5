//! `Mos6502` engine behind the CPU bridge contract.
//!
//! [`Mos6502Bridge`] wires the instruction-stepped engine to a memory
//! bus and exposes the whole thing through `bridge_core::CpuBridge`, so
//! a host can swap it for any other conforming backend without touching
//! its call sites. The conformance suite in `tests/` exercises the
//! contract through the trait alone; point it at a new backend to
//! validate a second engine.

mod bridge;

pub use bridge::Mos6502Bridge;
