//! Jump destination analysis for legacy EVM bytecode.
//!
//! The core of this crate is [`code_bitmap`], which classifies every byte of
//! a contract as either an instruction start or push-immediate data. The
//! interpreter consults that classification through
//! [`Bytecode::valid_jump_destination`] so that a `JUMPDEST` byte hidden
//! inside push data is never accepted as a jump target.

pub mod cache;
pub mod disasm;
pub mod interpreter;

pub use {
    cache::{code_hash, AnalysisCache, CacheStats, NoCache, SharedAnalysisCache},
    disasm::{jump_destinations, Disassembler, Instruction},
    interpreter::{
        analysis::{code_bitmap, code_bitmap_into, CodeBitmap},
        opcode::{push_width, OpCode, MAX_PUSH_WIDTH},
        Bytecode, StatusCode, H256, U256,
    },
};

/// Maximum size of deployed contract code (EIP-170).
///
/// Enforced by the chain, not by the analysis; exposed for tooling.
pub const MAX_CODE_SIZE: usize = 0x6000;
