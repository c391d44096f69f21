//! Disassembly of analysed code.

use {
    crate::interpreter::{
        opcode::{push_width, OpCode},
        Bytecode,
    },
    std::fmt,
};

/// A single decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction<'c> {
    pub pc: usize,
    pub opcode: u8,
    /// Immediate bytes of a push; shorter than the push width when the code
    /// ends early.
    pub immediate: &'c [u8],
    pub truncated: bool,
}

impl Instruction<'_> {
    pub fn op(&self) -> Option<OpCode> {
        OpCode::try_from(self.opcode).ok()
    }

    /// Offset of the next instruction.
    pub fn next_pc(&self) -> usize {
        self.pc + 1 + push_width(self.opcode)
    }
}

impl fmt::Display for Instruction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}: ", self.pc)?;
        match self.op() {
            Some(op) => write!(f, "{op}")?,
            None => write!(f, "UNDEFINED(0x{:02x})", self.opcode)?,
        }
        if !self.immediate.is_empty() {
            write!(f, " 0x{}", hex::encode(self.immediate))?;
        }
        if self.truncated {
            f.write_str(" (truncated)")?;
        }
        Ok(())
    }
}

/// Walks the instruction starts of some code, in order.
pub struct Disassembler<'a, 'c> {
    bytecode: &'a Bytecode<'c>,
    pc: usize,
}

impl<'a, 'c> Disassembler<'a, 'c> {
    pub fn new(bytecode: &'a Bytecode<'c>) -> Self {
        Self { bytecode, pc: 0 }
    }
}

impl<'a, 'c> Iterator for Disassembler<'a, 'c> {
    type Item = Instruction<'c>;

    fn next(&mut self) -> Option<Self::Item> {
        let code = self.bytecode.code();
        let bitmap = self.bytecode.bitmap();
        // Skip forward to the next byte the analysis classified as code.
        while self.pc < code.len() && !bitmap.is_code(self.pc) {
            self.pc += 1;
        }
        if self.pc >= code.len() {
            return None;
        }

        let pc = self.pc;
        let opcode = code[pc];
        let start = pc + 1;
        let end = start + push_width(opcode);
        let immediate = &code[start.min(code.len())..end.min(code.len())];
        self.pc = end;

        Some(Instruction { pc, opcode, immediate, truncated: end > code.len() })
    }
}

/// Offsets of every valid jump destination, ascending.
pub fn jump_destinations(bytecode: &Bytecode) -> Vec<usize> {
    Disassembler::new(bytecode)
        .filter(|ins| bytecode.valid_jump_destination(ins.pc))
        .map(|ins| ins.pc)
        .collect()
}

#[cfg(test)]
mod tests {
    use {super::*, hex_literal::hex};

    #[test]
    fn listing() {
        let code = hex!("60806040525b0c615b");
        let bytecode = Bytecode::new(&code);
        let lines: Vec<String> = Disassembler::new(&bytecode).map(|i| i.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "0x0000: PUSH1 0x80",
                "0x0002: PUSH1 0x40",
                "0x0004: MSTORE",
                "0x0005: JUMPDEST",
                "0x0006: UNDEFINED(0x0c)",
                "0x0007: PUSH2 0x5b (truncated)",
            ]
        );
    }

    #[test]
    fn wide_immediate() {
        let mut code = vec![OpCode::PUSH32 as u8];
        code.extend(0u8..32);
        let bytecode = Bytecode::new(&code);
        let ins = Disassembler::new(&bytecode).next().unwrap();
        assert_eq!(
            ins.to_string(),
            "0x0000: PUSH32 0x000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f"
        );
    }

    #[test]
    fn skips_push_data() {
        let mut code = vec![OpCode::PUSH32 as u8];
        code.extend([OpCode::JUMPDEST as u8; 32]);
        code.push(OpCode::JUMPDEST as u8);
        let bytecode = Bytecode::new(&code);

        let instructions: Vec<_> = Disassembler::new(&bytecode).collect();
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[0].op(), Some(OpCode::PUSH32));
        assert_eq!(instructions[0].immediate.len(), 32);
        assert_eq!(instructions[0].next_pc(), 33);
        assert_eq!(instructions[1].pc, 33);
        assert_eq!(jump_destinations(&bytecode), vec![33]);
    }

    #[test]
    fn empty() {
        let bytecode = Bytecode::new(&[]);
        assert_eq!(Disassembler::new(&bytecode).count(), 0);
        assert!(jump_destinations(&bytecode).is_empty());
    }
}
