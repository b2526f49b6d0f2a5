//! Backend configuration.

/// How far into the undocumented opcode space a backend will execute.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UndocumentedLevel {
    /// Documented opcodes only; anything else is rejected.
    #[default]
    None,
    /// The stable, commonly-used illegals (LAX, SAX, DCP, ISC, SLO,
    /// SRE, RLA, RRA, the undocumented NOPs, SBC $EB).
    Partial,
    /// Everything: the immediate-only group (ANC, ALR, ARR, SBX, LAS),
    /// best-effort renditions of the unstable group, and JAM halts.
    Full,
}

/// What happens when the stack pointer would leave $0100-$01FF.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StackPolicy {
    /// The 8-bit pointer wraps silently, as the hardware does.
    #[default]
    Wrap,
    /// Pushing past $0100 or pulling past $01FF raises an error.
    Fault,
}

/// Configuration consumed by a concrete CPU backend.
///
/// These are host inputs the backend must honor; the bridge contract
/// itself does not re-implement any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BackendConfig {
    /// Undocumented opcode support level.
    pub undocumented: UndocumentedLevel,
    /// Stack boundary behavior.
    pub stack_policy: StackPolicy,
    /// Whether ADC/SBC honor the decimal flag. The NES 2A03 hardwires
    /// decimal mode off; a stock NMOS 6502 has it on.
    pub decimal_enabled: bool,
    /// Whether indirect JMP reproduces the NMOS page-wrap bug: the
    /// pointer high byte for `JMP ($xxFF)` is read from `$xx00`, not
    /// `$xx00 + $100`. On by default.
    pub jmp_indirect_page_wrap: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            undocumented: UndocumentedLevel::None,
            stack_policy: StackPolicy::Wrap,
            decimal_enabled: true,
            jmp_indirect_page_wrap: true,
        }
    }
}

impl BackendConfig {
    /// Configuration matching the NES's 2A03: decimal mode disabled,
    /// stable illegals enabled (commercial games use them).
    #[must_use]
    pub fn nes() -> Self {
        Self {
            undocumented: UndocumentedLevel::Partial,
            decimal_enabled: false,
            ..Self::default()
        }
    }
}
