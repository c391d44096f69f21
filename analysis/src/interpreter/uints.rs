// to silence construct_uint! clippy warnings
// see https://github.com/paritytech/parity-common/issues/660
#![allow(clippy::ptr_offset_with_cast, clippy::assign_op_pattern)]

use {fixed_hash::construct_fixed_hash, uint::construct_uint};

construct_uint! { pub struct U256(4); } // ethereum word size

construct_fixed_hash! {
    /// 32 byte hash, used to key analysed code by its keccak digest.
    pub struct H256(32);
}
