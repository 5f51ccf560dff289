//! Byte-stream transcoding with the extended Hamming (8,4) code.
//!
//! Every input byte becomes two codewords: the low nibble first, then the
//! high nibble. Decoding reassembles pairs of codewords into bytes. When a
//! codeword cannot be corrected the whole byte is lost and is dropped from the
//! output, never substituted:
//! - if the first codeword of a pair fails, the second one is skipped unread
//! - if the second codeword fails, the already decoded low nibble is discarded

use crate::cs::ecc::{ErrorInjector, ExtendedHamming, Result};
use crate::error::Error;
use log::debug;
use rand::Rng;
use std::fmt;
use std::io::{BufReader, BufWriter, Read, Write};

/// Push-based decoder turning a sequence of codewords into bytes.
#[derive(Debug)]
pub struct NibbleDecoder<'a> {
    code: &'a ExtendedHamming,
    /// Codewords pushed so far, skipped ones included
    received: usize,
    /// Low nibble of the byte being assembled
    pending: u8,
    /// Whether the next codeword belongs to a byte already lost
    skip_next: bool,
    corrected: usize,
    uncorrectable: usize,
}

impl<'a> NibbleDecoder<'a> {
    pub fn new(code: &'a ExtendedHamming) -> Self {
        Self {
            code,
            received: 0,
            pending: 0,
            skip_next: false,
            corrected: 0,
            uncorrectable: 0,
        }
    }

    /// Feeds the next codeword.
    ///
    /// # Returns
    ///
    /// `Some(byte)` once the second codeword of a pair has been decoded, and
    /// `None` while a byte is incomplete or after it has been dropped
    pub fn push(&mut self, codeword: u8) -> Result<Option<u8>> {
        let high_nibble = self.received % 2 == 1;
        self.received += 1;

        if self.skip_next {
            self.skip_next = false;
            debug!("skipping codeword {:#04x} of an unrecoverable byte", codeword);
            return Ok(None);
        }

        match self.code.diagnose(codeword) {
            Ok(correction) => {
                self.corrected += correction.errors;
                if high_nibble {
                    let byte = self.pending | (correction.nibble << 4);
                    self.pending = 0;
                    Ok(Some(byte))
                } else {
                    self.pending = correction.nibble;
                    Ok(None)
                }
            }
            Err(Error::UncorrectableError(_)) => {
                self.uncorrectable += 1;
                self.pending = 0;
                if !high_nibble {
                    self.skip_next = true;
                }
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Number of codewords pushed so far
    pub fn received(&self) -> usize {
        self.received
    }

    /// Number of single-bit errors corrected so far
    pub fn corrected(&self) -> usize {
        self.corrected
    }

    /// Number of codewords found uncorrectable so far
    pub fn uncorrectable(&self) -> usize {
        self.uncorrectable
    }
}

/// Summary of an encoding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeReport {
    pub bytes_read: usize,
    pub bytes_written: usize,
    pub errors_injected: usize,
}

impl EncodeReport {
    /// Average number of injected errors per written codeword
    pub fn errors_per_codeword(&self) -> f64 {
        if self.bytes_written == 0 {
            return 0.0;
        }
        self.errors_injected as f64 / self.bytes_written as f64
    }
}

impl fmt::Display for EncodeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "encoded {} input bytes into {} bytes, introducing {} errors ({:.2} errors/byte)",
            self.bytes_read,
            self.bytes_written,
            self.errors_injected,
            self.errors_per_codeword()
        )
    }
}

/// Summary of a decoding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeReport {
    pub bytes_read: usize,
    pub bytes_recovered: usize,
    /// Single-bit errors corrected
    pub corrected: usize,
    /// Codewords that could not be corrected
    pub uncorrectable: usize,
}

impl DecodeReport {
    /// Fraction of the original message recovered, in `[0, 1]`.
    ///
    /// Each original byte took two codewords. An empty input counts as fully
    /// recovered.
    pub fn recovered_ratio(&self) -> f64 {
        if self.bytes_read == 0 {
            return 1.0;
        }
        (2 * self.bytes_recovered) as f64 / self.bytes_read as f64
    }
}

impl fmt::Display for DecodeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "decoded {} input bytes into {} bytes, recovering {:.2}% of the original message \
             ({} errors corrected, {} codewords uncorrectable)",
            self.bytes_read,
            self.bytes_recovered,
            100.0 * self.recovered_ratio(),
            self.corrected,
            self.uncorrectable
        )
    }
}

/// Encodes every byte of `input` into two codewords written to `output`,
/// corrupting each codeword through `injector`.
pub fn encode_stream<R: Read, W: Write, G: Rng>(
    code: &ExtendedHamming,
    input: R,
    output: W,
    injector: &mut ErrorInjector<G>,
) -> Result<EncodeReport> {
    let mut writer = BufWriter::new(output);
    let mut report = EncodeReport::default();
    let injected_before = injector.injected();

    for byte in BufReader::new(input).bytes() {
        let byte = byte?;
        let codewords = code.encode_byte(byte)?;
        let sent = codewords.map(|codeword| injector.corrupt(codeword));
        debug!(
            "byte {:#04x} encoded as {}, sent as {}",
            byte,
            hex::encode(codewords),
            hex::encode(sent)
        );

        writer.write_all(&sent)?;
        report.bytes_read += 1;
        report.bytes_written += sent.len();
    }

    writer.flush()?;
    report.errors_injected = injector.injected() - injected_before;
    Ok(report)
}

/// Decodes pairs of codewords from `input` into bytes written to `output`,
/// dropping bytes that cannot be recovered.
pub fn decode_stream<R: Read, W: Write>(
    code: &ExtendedHamming,
    input: R,
    output: W,
) -> Result<DecodeReport> {
    let mut writer = BufWriter::new(output);
    let mut decoder = NibbleDecoder::new(code);
    let mut report = DecodeReport::default();

    for codeword in BufReader::new(input).bytes() {
        let codeword = codeword?;
        report.bytes_read += 1;

        if let Some(byte) = decoder.push(codeword)? {
            writer.write_all(&[byte])?;
            report.bytes_recovered += 1;
        }
    }

    writer.flush()?;
    report.corrected = decoder.corrected();
    report.uncorrectable = decoder.uncorrectable();
    Ok(report)
}
