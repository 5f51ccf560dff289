//! Conversion between packed bytes and explicit bit sequences.
//!
//! Bits are ordered most-significant first: unpacking `0b1100` with four bits
//! yields `[1, 1, 0, 0]`. This is the order in which codewords map to matrix
//! row vectors, so column 0 of a codeword vector is bit 7 of the byte.

use crate::cs::ecc::Result;
use crate::error::Error;
use bitvec::prelude::*;

/// Maximum number of bits held by a packed value
pub const MAX_BITS: usize = 8;

/// Unpacks the `num_bits` low-order bits of `value` into one element per bit,
/// most-significant first.
///
/// # Arguments
///
/// * `value` - The byte holding the bits; bits above `num_bits - 1` are ignored
/// * `num_bits` - How many bits to unpack, in `[0, 8]`
///
/// # Returns
///
/// A vector of `num_bits` elements, each 0 or 1, or `InvalidBitCount`
pub fn unpack(value: u8, num_bits: usize) -> Result<Vec<u8>> {
    if num_bits > MAX_BITS {
        return Err(Error::InvalidBitCount(num_bits));
    }

    Ok(value.view_bits::<Msb0>()[MAX_BITS - num_bits..]
        .iter()
        .map(|bit| u8::from(*bit))
        .collect())
}

/// Packs a most-significant-first bit sequence into a byte.
///
/// This is the inverse of [`unpack`]: the last element becomes bit 0 of the
/// result.
///
/// # Returns
///
/// The packed byte, `InvalidLength` if there are more than 8 bits, or
/// `InvalidValue` if an element is not 0 or 1
pub fn pack(bits: &[u8]) -> Result<u8> {
    if bits.len() > MAX_BITS {
        return Err(Error::InvalidLength(bits.len()));
    }

    let mut packed = 0u8;
    let slots = &mut packed.view_bits_mut::<Msb0>()[MAX_BITS - bits.len()..];
    for (i, &bit) in bits.iter().enumerate() {
        if bit > 1 {
            return Err(Error::InvalidValue(bit));
        }
        slots.set(i, bit == 1);
    }

    Ok(packed)
}
