//! Extended Hamming (8,4) error correction code implementation.
//!
//! Hamming codes are a family of linear error-correcting codes developed by Richard Hamming in 1950.
//! The extended (8,4) variant appends an overall parity bit to the (7,4) code, raising the minimum
//! distance to 4: it corrects any single-bit error and detects, without correcting, any double-bit
//! error in an 8-bit codeword.
//!
//! This implementation is systematic and matrix based:
//! - Encoding multiplies the 1x4 source vector by the 4x8 generator matrix `G`
//! - Decoding multiplies the received 1x8 vector by the transposed parity-check matrix `H^T`,
//!   reads the 1x4 syndrome as a number and looks up the minimum-weight error pattern
//!   (the coset representative) in a precomputed syndrome table
//! - A representative of weight 2 means the codeword is uncorrectable
//!
//! Because the code is systematic, the four most significant bits of a codeword are the source
//! nibble itself.
//!
//! # Applications
//!
//! - Computer memory (SECDED ECC RAM)
//! - Teletext and other broadcast data services
//! - Short control words on noisy links

use crate::cs::ecc::bit_packing::{pack, unpack};
use crate::cs::ecc::{BinaryMatrix, ErrorCorrection, Result};
use crate::cs::ecc::stream::NibbleDecoder;
use crate::error::Error;
use log::warn;
use std::sync::OnceLock;

/// Number of source bits per codeword
pub const DATA_BITS: usize = 4;
/// Number of bits in a codeword
pub const CODEWORD_BITS: usize = 8;
/// Number of distinct syndromes
const SYNDROMES: usize = 1 << (CODEWORD_BITS - DATA_BITS);

/// Generator matrix, `[I_4 | P]`
const GENERATOR: [[u8; CODEWORD_BITS]; DATA_BITS] = [
    [1, 0, 0, 0, 0, 1, 1, 1],
    [0, 1, 0, 0, 1, 0, 1, 1],
    [0, 0, 1, 0, 1, 1, 0, 1],
    [0, 0, 0, 1, 1, 1, 1, 0],
];

/// Transposed parity-check matrix, `[P | I_4]^T`
const PARITY_CHECK_TRANSPOSED: [[u8; CODEWORD_BITS - DATA_BITS]; CODEWORD_BITS] = [
    [0, 1, 1, 1],
    [1, 0, 1, 1],
    [1, 1, 0, 1],
    [1, 1, 1, 0],
    [1, 0, 0, 0],
    [0, 1, 0, 0],
    [0, 0, 1, 0],
    [0, 0, 0, 1],
];

/// Coset representative for each syndrome, indexed by the syndrome read as a
/// 4-bit number. Syndrome `0b0010` maps to entry 2, the error `00000010`.
const SYNDROME_TABLE: [[u8; CODEWORD_BITS]; SYNDROMES] = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 1],
    [0, 0, 0, 0, 0, 0, 1, 0],
    [1, 0, 0, 0, 0, 1, 0, 0],
    [0, 0, 0, 0, 0, 1, 0, 0],
    [1, 0, 0, 0, 0, 0, 1, 0],
    [1, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 1, 0, 0, 0],
    [1, 0, 0, 1, 0, 0, 0, 0],
    [1, 0, 1, 0, 0, 0, 0, 0],
    [0, 1, 0, 0, 0, 0, 0, 0],
    [1, 1, 0, 0, 0, 0, 0, 0],
    [0, 0, 1, 0, 0, 0, 0, 0],
    [0, 0, 0, 1, 0, 0, 0, 0],
    [1, 0, 0, 0, 1, 0, 0, 0],
];

/// Outcome of correcting a single codeword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correction {
    /// The recovered source nibble, in the 4 low-order bits
    pub nibble: u8,
    /// Number of bit errors found and corrected, 0 or 1
    pub errors: usize,
}

/// The extended Hamming (8,4) code.
///
/// Holds the generator matrix, the transposed parity-check matrix and the
/// syndrome table. They are built once and never mutated, so a single
/// instance can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct ExtendedHamming {
    /// 4x8 generator matrix
    generator: BinaryMatrix,
    /// 8x4 transposed parity-check matrix
    parity_check_tr: BinaryMatrix,
    /// 1x8 coset representatives, one per syndrome
    syndrome_table: Vec<BinaryMatrix>,
}

impl Default for ExtendedHamming {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtendedHamming {
    /// Creates the code from its precomputed matrices
    pub fn new() -> Self {
        ExtendedHamming {
            generator: BinaryMatrix::from_table(&GENERATOR),
            parity_check_tr: BinaryMatrix::from_table(&PARITY_CHECK_TRANSPOSED),
            syndrome_table: SYNDROME_TABLE
                .iter()
                .map(|pattern| BinaryMatrix::from_table(&[*pattern]))
                .collect(),
        }
    }

    /// Encodes a nibble into an 8-bit codeword.
    ///
    /// # Arguments
    ///
    /// * `nibble` - The source word, in the 4 low-order bits; higher bits are ignored
    ///
    /// # Returns
    ///
    /// The codeword `s * G`, whose 4 high-order bits equal the nibble
    pub fn encode_nibble(&self, nibble: u8) -> Result<u8> {
        let source = BinaryMatrix::row_vector(&unpack(nibble, DATA_BITS)?)?;
        let codeword = source.multiply(&self.generator)?;
        pack(&codeword.row(0)?)
    }

    /// Encodes a byte into two codewords, low nibble first
    pub fn encode_byte(&self, byte: u8) -> Result<[u8; 2]> {
        Ok([self.encode_nibble(byte & 0x0F)?, self.encode_nibble(byte >> 4)?])
    }

    /// Computes the syndrome of a received codeword, as a number in `0..16`.
    ///
    /// The syndrome is 0 exactly when `codeword` is a valid codeword.
    pub fn syndrome(&self, codeword: u8) -> Result<u8> {
        let received = BinaryMatrix::row_vector(&unpack(codeword, CODEWORD_BITS)?)?;
        self.syndrome_of(&received)
    }

    fn syndrome_of(&self, received: &BinaryMatrix) -> Result<u8> {
        let syndrome = received.multiply(&self.parity_check_tr)?;
        pack(&syndrome.row(0)?)
    }

    /// Corrects a received codeword without reporting diagnostics.
    ///
    /// # Returns
    ///
    /// The recovered nibble and the number of corrected errors, or
    /// `UncorrectableError` if the syndrome points at a double-bit error
    pub fn correct(&self, codeword: u8) -> Result<Correction> {
        let received = BinaryMatrix::row_vector(&unpack(codeword, CODEWORD_BITS)?)?;
        let index = self.syndrome_of(&received)?;
        let error = &self.syndrome_table[usize::from(index)];

        // Nothing beyond 2 matters: the code corrects 1 error and detects 2
        let errors = error.row(0)?.iter().filter(|&&bit| bit == 1).take(2).count();
        if errors > 1 {
            return Err(Error::UncorrectableError(codeword));
        }

        // c = r - e, and subtraction is addition in GF(2)
        let corrected = pack(&received.add(error)?.row(0)?)?;

        Ok(Correction {
            nibble: corrected >> DATA_BITS,
            errors,
        })
    }

    /// Corrects a received codeword like [`correct`](Self::correct), logging a
    /// warning whenever a 1-bit or a 2-bit error is detected.
    pub fn diagnose(&self, codeword: u8) -> Result<Correction> {
        match self.correct(codeword) {
            Ok(correction) => {
                if correction.errors == 1 {
                    warn!(
                        "1-bit error detected in codeword {:#010b}, corrected",
                        codeword
                    );
                }
                Ok(correction)
            }
            Err(Error::UncorrectableError(word)) => {
                warn!("2-bit error detected in codeword {:#010b}", word);
                Err(Error::UncorrectableError(word))
            }
            Err(e) => Err(e),
        }
    }

    /// Decodes a codeword into its source nibble, correcting single-bit errors.
    ///
    /// Detected errors are reported as in [`diagnose`](Self::diagnose).
    ///
    /// # Returns
    ///
    /// The nibble in the 4 low-order bits, or `UncorrectableError`
    pub fn decode_codeword(&self, codeword: u8) -> Result<u8> {
        self.diagnose(codeword).map(|correction| correction.nibble)
    }
}

impl ErrorCorrection for ExtendedHamming {
    /// Encodes every byte into two codewords, low nibble first
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoded = Vec::with_capacity(data.len() * 2);
        for &byte in data {
            encoded.extend_from_slice(&self.encode_byte(byte)?);
        }
        Ok(encoded)
    }

    /// Decodes codeword pairs back into bytes.
    ///
    /// Bytes with an uncorrectable codeword are dropped from the output rather
    /// than substituted, so the result may be shorter than `data.len() / 2`.
    fn decode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = NibbleDecoder::new(self);
        let mut decoded = Vec::with_capacity(data.len() / 2);
        for &codeword in data {
            if let Some(byte) = decoder.push(codeword)? {
                decoded.push(byte);
            }
        }
        Ok(decoded)
    }
}

/// Code instance behind the free `encode` and `decode` functions
fn shared() -> &'static ExtendedHamming {
    static CODE: OnceLock<ExtendedHamming> = OnceLock::new();
    CODE.get_or_init(ExtendedHamming::new)
}

/// Encodes a nibble with the extended Hamming (8,4) code
pub fn encode(nibble: u8) -> Result<u8> {
    shared().encode_nibble(nibble)
}

/// Decodes an extended Hamming (8,4) codeword into its nibble
pub fn decode(codeword: u8) -> Result<u8> {
    shared().decode_codeword(codeword)
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use std::cell::RefCell;
    use std::sync::Once;

    thread_local! {
        static WARNINGS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    /// Keeps the warnings of each test thread apart
    struct CaptureLogger;

    impl Log for CaptureLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= Level::Warn
        }

        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                WARNINGS.with(|w| w.borrow_mut().push(record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger;
    static INIT: Once = Once::new();

    fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
        INIT.call_once(|| {
            log::set_logger(&LOGGER).unwrap();
            log::set_max_level(LevelFilter::Warn);
        });
        WARNINGS.with(|w| w.borrow_mut().clear());
        let result = f();
        (result, WARNINGS.with(|w| w.borrow_mut().drain(..).collect()))
    }

    #[test]
    fn test_matrix_shapes() {
        let code = ExtendedHamming::new();
        assert_eq!(code.generator.rows(), DATA_BITS);
        assert_eq!(code.generator.cols(), CODEWORD_BITS);
        assert_eq!(code.parity_check_tr.rows(), CODEWORD_BITS);
        assert_eq!(code.parity_check_tr.cols(), CODEWORD_BITS - DATA_BITS);
        assert_eq!(code.syndrome_table.len(), 16);
        for pattern in &code.syndrome_table {
            assert_eq!((pattern.rows(), pattern.cols()), (1, CODEWORD_BITS));
        }
    }

    #[test]
    fn test_generator_is_orthogonal_to_parity_check() {
        let code = ExtendedHamming::new();
        let product = code.generator.multiply(&code.parity_check_tr).unwrap();
        assert!(product.is_zero());
    }

    #[test]
    fn test_syndrome_table_matches_parity_check() {
        let code = ExtendedHamming::new();
        for (index, pattern) in code.syndrome_table.iter().enumerate() {
            let syndrome = pattern.multiply(&code.parity_check_tr).unwrap();
            assert_eq!(usize::from(pack(&syndrome.row(0).unwrap()).unwrap()), index);
        }
    }

    #[test]
    fn test_known_codeword() {
        let code = ExtendedHamming::new();
        assert_eq!(code.encode_nibble(0b1100).unwrap(), 0b1100_1100);
        assert_eq!(code.encode_nibble(0b0001).unwrap(), 0b0001_1110);
        assert_eq!(code.encode_nibble(0b0000).unwrap(), 0);
        assert_eq!(code.decode_codeword(0b1100_1100).unwrap(), 0b1100);
    }

    #[test]
    fn test_high_bits_of_nibble_ignored() {
        let code = ExtendedHamming::new();
        assert_eq!(
            code.encode_nibble(0xA5).unwrap(),
            code.encode_nibble(0x05).unwrap()
        );
    }

    #[test]
    fn test_encode_decode_no_errors() {
        let code = ExtendedHamming::new();
        for nibble in 0..16u8 {
            let codeword = code.encode_nibble(nibble).unwrap();
            assert_eq!(codeword >> 4, nibble);
            assert_eq!(code.syndrome(codeword).unwrap(), 0);
            assert_eq!(
                code.correct(codeword).unwrap(),
                Correction { nibble, errors: 0 }
            );
        }
    }

    #[test]
    fn test_single_error_correction() {
        let code = ExtendedHamming::new();
        for nibble in 0..16u8 {
            let codeword = code.encode_nibble(nibble).unwrap();
            for position in 0..8 {
                let received = codeword ^ (1 << position);
                assert_eq!(
                    code.correct(received).unwrap(),
                    Correction { nibble, errors: 1 }
                );
                assert_eq!(code.decode_codeword(received).unwrap(), nibble);
            }
        }
    }

    #[test]
    fn test_double_error_detection() {
        let code = ExtendedHamming::new();
        let codeword = code.encode_nibble(0b1011).unwrap();

        let result = code.decode_codeword(codeword ^ 0b0110_0000);
        assert!(matches!(result, Err(Error::UncorrectableError(w)) if w == codeword ^ 0b0110_0000));
    }

    #[test]
    fn test_byte_helpers() {
        let code = ExtendedHamming::new();
        let [low, high] = code.encode_byte(0xC3).unwrap();
        assert_eq!(low, code.encode_nibble(0x3).unwrap());
        assert_eq!(high, code.encode_nibble(0xC).unwrap());
    }

    #[test]
    fn test_error_correction_trait() {
        let data = b"Test data for Hamming code";
        let code = ExtendedHamming::new();

        let mut encoded = code.encode(data).unwrap();
        assert_eq!(encoded.len(), data.len() * 2);

        // Introduce a single bit error in a few codewords
        encoded[0] ^= 0x40;
        encoded[7] ^= 0x01;
        encoded[30] ^= 0x80;

        assert_eq!(code.decode(&encoded).unwrap(), data);
    }

    #[test]
    fn test_multi_bit_error_drops_byte() {
        let data = b"Test";
        let code = ExtendedHamming::new();

        let mut encoded = code.encode(data).unwrap();

        // Two bit errors in the high nibble of 'e'
        encoded[3] ^= 0x40;
        encoded[3] ^= 0x20;

        assert_eq!(code.decode(&encoded).unwrap(), b"Tst");
    }

    #[test]
    fn test_empty_input() {
        let code = ExtendedHamming::default();

        let encoded = code.encode(&[]).unwrap();
        assert!(encoded.is_empty());

        let decoded = code.decode(&[]).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_helper_functions() {
        for nibble in 0..16u8 {
            assert_eq!(decode(encode(nibble).unwrap()).unwrap(), nibble);
        }
    }

    #[test]
    fn test_decode_diagnostics() {
        let code = ExtendedHamming::new();
        let codeword = code.encode_nibble(0b0110).unwrap();

        let (result, warnings) = capture_warnings(|| code.decode_codeword(codeword));
        assert_eq!(result.unwrap(), 0b0110);
        assert!(warnings.is_empty());

        let (result, warnings) = capture_warnings(|| code.decode_codeword(codeword ^ 0b0000_0100));
        assert_eq!(result.unwrap(), 0b0110);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("1-bit error detected"));

        let (result, warnings) = capture_warnings(|| code.decode_codeword(codeword ^ 0b1000_0001));
        assert!(matches!(result, Err(Error::UncorrectableError(_))));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("2-bit error detected"));
    }

    #[test]
    fn test_correct_is_silent() {
        let code = ExtendedHamming::new();
        let codeword = code.encode_nibble(0b1001).unwrap();

        let (_, warnings) = capture_warnings(|| {
            code.correct(codeword ^ 0b0001_0000).unwrap();
            code.correct(codeword ^ 0b0011_0000).unwrap_err();
        });
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_free_functions_share_one_code() {
        assert!(std::ptr::eq(shared(), shared()));
        assert_eq!(encode(0b1100).unwrap(), 0b1100_1100);
        assert_eq!(decode(0b1100_1100 ^ 0b0000_0010).unwrap(), 0b1100);
    }

    #[test]
    fn test_syndrome_agrees_with_correction() {
        let code = ExtendedHamming::new();
        for word in 0..=255u8 {
            let clean = code.syndrome(word).unwrap() == 0;
            match code.correct(word) {
                Ok(correction) => assert_eq!(correction.errors == 0, clean),
                Err(_) => assert!(!clean),
            }
        }
    }
}
