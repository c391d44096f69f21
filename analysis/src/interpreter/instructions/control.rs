use crate::interpreter::{output::StatusCode, Bytecode, U256};

#[inline]
fn destination(bytecode: &Bytecode, dest: U256) -> Result<usize, StatusCode> {
    let dst = dest.try_into().map_err(|_| StatusCode::BadJumpDestination)?;
    if !bytecode.valid_jump_destination(dst) {
        log::debug!(target: "evm", "rejected jump destination {dst}");
        return Err(StatusCode::BadJumpDestination);
    }
    Ok(dst)
}

#[inline]
pub fn jump(bytecode: &Bytecode, _pc: usize, dest: U256) -> Result<usize, StatusCode> {
    let dst = destination(bytecode, dest)?;
    // skip the JMPDEST noop sled
    Ok(dst + 1)
}

#[inline]
pub fn jumpi(bytecode: &Bytecode, pc: usize, dest: U256, test: U256) -> Result<usize, StatusCode> {
    if !test.is_zero() {
        let dst = destination(bytecode, dest)?;
        // skip the JMPDEST noop sled
        Ok(dst + 1)
    } else {
        Ok(pc + 1)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::interpreter::opcode::OpCode, hex_literal::hex};

    #[test]
    fn jump_to_jumpdest() {
        // PUSH1 0x03 JUMP JUMPDEST STOP
        let code = hex!("6003565b00");
        let bytecode = Bytecode::new(&code);
        assert_eq!(jump(&bytecode, 2, U256::from(3)), Ok(4));
    }

    #[test]
    fn jump_into_push_data() {
        // PUSH32 with a JUMPDEST byte in its operand, then a real JUMPDEST.
        let mut code = vec![OpCode::PUSH32 as u8];
        code.extend([OpCode::JUMPDEST as u8; 32]);
        code.push(OpCode::JUMPDEST as u8);
        let bytecode = Bytecode::new(&code);

        for dest in 1..=32u64 {
            assert_eq!(jump(&bytecode, 0, U256::from(dest)), Err(StatusCode::BadJumpDestination));
        }
        assert_eq!(jump(&bytecode, 0, U256::from(33)), Ok(34));
    }

    #[test]
    fn jump_out_of_range() {
        let code = hex!("5b");
        let bytecode = Bytecode::new(&code);
        assert_eq!(jump(&bytecode, 0, U256::from(1)), Err(StatusCode::BadJumpDestination));
        assert_eq!(jump(&bytecode, 0, U256::MAX), Err(StatusCode::BadJumpDestination));
    }

    #[test]
    fn jumpi_conditions() {
        // PUSH1 0x00 PUSH1 0x07 JUMPI STOP STOP JUMPDEST STOP
        let code = hex!("600060075700005b00");
        let bytecode = Bytecode::new(&code);
        assert_eq!(jumpi(&bytecode, 4, U256::from(7), U256::zero()), Ok(5));
        assert_eq!(jumpi(&bytecode, 4, U256::from(7), U256::one()), Ok(8));
        assert_eq!(
            jumpi(&bytecode, 4, U256::from(6), U256::one()),
            Err(StatusCode::BadJumpDestination)
        );
        // a bad destination is never looked at when the jump is not taken
        assert_eq!(jumpi(&bytecode, 4, U256::MAX, U256::zero()), Ok(5));
    }
}
