use thiserror::Error;

/// Status of an interpreter step that touches analysed code.
///
/// Either variant aborts the current call frame only; gas and refund
/// handling belong to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StatusCode {
    /// The destination of a JUMP/JUMPI is out of bounds, is not a JUMPDEST,
    /// or lies inside push data.
    #[error("bad jump destination")]
    BadJumpDestination,

    /// The byte does not decode to any defined instruction.
    #[error("undefined instruction")]
    UndefinedInstruction,
}
