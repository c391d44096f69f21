use {
    super::{
        analysis::{code_bitmap, CodeBitmap},
        opcode::OpCode,
    },
    crate::cache::AnalysisCache,
    std::{ops::Deref, sync::Arc},
};

/// Contract code together with its jump destination analysis.
#[derive(Clone, Debug)]
pub struct Bytecode<'c> {
    code: &'c [u8],
    bitmap: Arc<CodeBitmap>,
}

impl<'c> Bytecode<'c> {
    pub fn new(bytecode: &'c [u8]) -> Self {
        Self { code: bytecode, bitmap: Arc::new(code_bitmap(bytecode)) }
    }

    /// Analyses the code through `cache`, so that frames running the same
    /// code share one bitmap.
    pub fn with_cache(bytecode: &'c [u8], cache: &impl AnalysisCache) -> Self {
        Self { code: bytecode, bitmap: cache.get_or_analyze(bytecode) }
    }

    pub fn code(&self) -> &'c [u8] {
        self.code
    }

    pub fn bitmap(&self) -> &CodeBitmap {
        &self.bitmap
    }

    /// Checks if the EVM is allowed to jump to this location.
    ///
    /// This location must begin with a JUMPDEST opcode that
    /// marks a valid jump destination, and that opcode must not
    /// be part of the immediate data of a PUSH.
    #[inline]
    pub fn valid_jump_destination(&self, offset: usize) -> bool {
        offset < self.code.len()
            && self.code[offset] == OpCode::JUMPDEST as u8
            && self.bitmap.is_code(offset)
    }
}

impl<'c> Deref for Bytecode<'c> {
    type Target = [u8];

    fn deref(&self) -> &'c Self::Target {
        self.code
    }
}

impl<'c> AsRef<[u8]> for Bytecode<'c> {
    fn as_ref(&self) -> &'c [u8] {
        self.code
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::cache::SharedAnalysisCache, hex_literal::hex};

    #[test]
    fn jumpdest_after_push1() {
        let code = hex!("60ff5b");
        let bytecode = Bytecode::new(&code);
        assert!(!bytecode.valid_jump_destination(0));
        assert!(!bytecode.valid_jump_destination(1));
        assert!(bytecode.valid_jump_destination(2));
        assert!(!bytecode.valid_jump_destination(3));
    }

    #[test]
    fn jumpdest_in_push_data() {
        // PUSH2 0x5b5b JUMPDEST
        let code = hex!("615b5b5b");
        let bytecode = Bytecode::new(&code);
        assert!(!bytecode.valid_jump_destination(1));
        assert!(!bytecode.valid_jump_destination(2));
        assert!(bytecode.valid_jump_destination(3));
    }

    #[test]
    fn instruction_start_that_is_not_jumpdest() {
        let code = hex!("5b00");
        let bytecode = Bytecode::new(&code);
        assert!(bytecode.bitmap().is_code(1));
        assert!(!bytecode.valid_jump_destination(1));
        assert!(!bytecode.valid_jump_destination(usize::MAX));
    }

    #[test]
    fn cached_bitmap_shared() {
        let code = hex!("6001565b00");
        let cache = SharedAnalysisCache::default();
        let a = Bytecode::with_cache(&code, &cache);
        let b = Bytecode::with_cache(&code, &cache);
        assert!(Arc::ptr_eq(&a.bitmap, &b.bitmap));
        assert_eq!(*a.bitmap, *Bytecode::new(&code).bitmap);
        assert!(a.valid_jump_destination(3));
        assert_eq!(&*a, &code[..]);
    }
}
