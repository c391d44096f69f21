pub mod analysis;
pub mod bytecode;
pub mod instructions;
pub mod opcode;
pub mod output;
pub mod uints;

pub use {
    analysis::CodeBitmap,
    bytecode::Bytecode,
    output::StatusCode,
    uints::{H256, U256},
};
