//! CPU error taxonomy.

use thiserror::Error;

/// Errors surfaced by a CPU backend.
///
/// All of these are local to a single bridge call; none imply retries.
/// What the host does with a failed `execute` (crash, log, recover) is
/// host policy.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CpuError {
    /// The opcode byte has no entry at the configured undocumented
    /// support level. The program counter has already advanced past the
    /// opcode byte.
    #[error("unsupported opcode ${opcode:02X}")]
    UnsupportedOpcode { opcode: u8 },

    /// A push would leave the stack page, under `StackPolicy::Fault`.
    #[error("stack overflow: push past $0100")]
    StackOverflow,

    /// A pull would leave the stack page, under `StackPolicy::Fault`.
    #[error("stack underflow: pull past $01FF")]
    StackUnderflow,

    /// `execute` (or another run-time operation) was called before
    /// `start`.
    #[error("bridge not started")]
    NotStarted,

    /// `start` was called on an already-started bridge.
    #[error("bridge already started")]
    AlreadyStarted,
}
