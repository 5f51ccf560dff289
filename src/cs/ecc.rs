//! Error correction code implementations.
//!
//! This module provides an extended Hamming (8,4) code built from first
//! principles:
//! - GF(2) matrix algebra (`binary_matrix`)
//! - Conversion between packed bytes and bit vectors (`bit_packing`)
//! - The codec itself, with syndrome-table decoding (`hamming`)
//! - Random error injection for exercising the codec (`injection`)
//! - Byte-stream transcoding with a drop policy for lost bytes (`stream`)
//! - Monte-Carlo channel simulation (`simulation`)
//!
//! # Error Correction Algorithms
//!
//! Error correction codes are used to detect and correct errors in data
//! transmission and storage, making digital communications more reliable.
//! The extended Hamming (8,4) code has minimum distance 4: it corrects every
//! single-bit error and detects every double-bit error in a codeword.
//!
//! # Examples
//!
//! ```rust
//! use hammer::ecc::{ErrorCorrection, ExtendedHamming};
//!
//! let code = ExtendedHamming::new();
//! let mut encoded = code.encode(b"Hi").unwrap();
//! encoded[1] ^= 0b0001_0000; // single-bit error
//! assert_eq!(code.decode(&encoded).unwrap(), b"Hi");
//! ```

pub use crate::error::{Error, Result};

/// Trait for error correction code implementations
pub trait ErrorCorrection {
    /// Encode data with error correction symbols
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decode data and correct errors if possible
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Binary matrices over GF(2)
pub mod binary_matrix;
pub use binary_matrix::BinaryMatrix;

/// Packing and unpacking of bits
pub mod bit_packing;
pub use bit_packing::{pack, unpack};

/// Extended Hamming (8,4) codec
pub mod hamming;
pub use hamming::{Correction, ExtendedHamming};

/// Random error injection
pub mod injection;
pub use injection::{inject_errors, ErrorInjector, ErrorPolicy};

/// Byte-stream transcoding
pub mod stream;
pub use stream::{decode_stream, encode_stream, DecodeReport, EncodeReport, NibbleDecoder};

/// Channel simulation
pub mod simulation;
pub use simulation::{simulate, SimulationConfig, SimulationReport};
