use {
    super::opcode::{push_width, MAX_PUSH_WIDTH},
    bitvec::{order::Lsb0, vec::BitVec},
};

/// Slack past the end of the code, so that the span of a push truncated by
/// the end of the code can be marked without bounds checks.
pub const PADDING_BITS: usize = MAX_PUSH_WIDTH;

/// Classification of every byte offset of a piece of code.
///
/// A set bit means the byte is push data, an unset bit means the byte
/// starts an instruction. Storage runs [`PADDING_BITS`] past the end of the
/// code; equality and the counting queries only look at the first `len` bits.
#[derive(Clone, Debug, Default)]
pub struct CodeBitmap {
    bits: BitVec<u64, Lsb0>,
    len: usize,
}

impl CodeBitmap {
    fn zeroed(len: usize) -> Self {
        Self { bits: BitVec::repeat(false, len + PADDING_BITS), len }
    }

    /// Length of the analysed code.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `offset` starts an instruction. False for offsets past the
    /// end of the code.
    #[inline(always)]
    pub fn is_code(&self, offset: usize) -> bool {
        offset < self.len && !self.bits[offset]
    }

    /// Whether `offset` holds push data. False for offsets past the end of
    /// the code.
    #[inline(always)]
    pub fn is_data(&self, offset: usize) -> bool {
        offset < self.len && self.bits[offset]
    }

    /// Number of push data bytes in the code.
    pub fn data_len(&self) -> usize {
        self.bits[..self.len].count_ones()
    }

    /// Offsets holding push data, ascending.
    pub fn data_offsets(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits[..self.len].iter_ones()
    }
}

impl PartialEq for CodeBitmap {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.bits[..self.len] == other.bits[..other.len]
    }
}

impl Eq for CodeBitmap {}

/// Collects the push data locations in `code`.
pub fn code_bitmap(code: &[u8]) -> CodeBitmap {
    let mut bitmap = CodeBitmap::zeroed(code.len());
    mark_push_data(code, &mut bitmap);
    bitmap
}

/// Same as [`code_bitmap`], reusing the storage of `bitmap`.
pub fn code_bitmap_into(code: &[u8], bitmap: &mut CodeBitmap) {
    bitmap.bits.clear();
    bitmap.bits.resize(code.len() + PADDING_BITS, false);
    bitmap.len = code.len();
    mark_push_data(code, bitmap);
}

fn mark_push_data(code: &[u8], bitmap: &mut CodeBitmap) {
    let mut pc = 0;
    while pc < code.len() {
        let width = push_width(code[pc]);
        pc += 1;
        if width != 0 {
            // A truncated push spills into the padding.
            bitmap.bits[pc..pc + width].fill(true);
            pc += width;
        }
    }
    log::trace!(
        target: "evm",
        "analysed {} bytes of code, {} data bytes",
        code.len(),
        bitmap.data_len()
    );
}
