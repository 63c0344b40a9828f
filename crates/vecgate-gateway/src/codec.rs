//! Binary calling convention.
//!
//! Big-endian throughout:
//! - `u8`: domain, bool (0/1)
//! - `u32`: counts, labels, k, max_count
//! - `u64`: global ids, ttl, observation counts
//! - word: 32-byte two's-complement fixed-point value
//! - tag: 32 raw bytes
//! - vector: `u32` count, then that many words
//!
//! Every read is bounds-checked before it happens, and a length prefix is
//! checked against the bytes actually present before anything is allocated.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use vecgate_fixed::I256;
use vecgate_registry::{Domain, Tag};

pub const WORD_LEN: usize = 32;
pub const TAG_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Truncated payload: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("Trailing bytes after payload: {0}")]
    TrailingBytes(usize),

    #[error("Word does not fit a component")]
    ComponentOutOfRange,

    #[error("Word does not fit an unsigned 128-bit value")]
    QuotaOutOfRange,

    #[error("Invalid bool byte: {0}")]
    InvalidBool(u8),

    #[error("Unknown domain: {0}")]
    UnknownDomain(u8),

    #[error("Parallel arrays differ in length")]
    LengthMismatch,
}

pub type Result<T> = std::result::Result<T, CodecError>;

/// Cursor over an inbound payload.
pub struct Decoder<'a> {
    buf: &'a [u8],
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.buf.remaining() < needed {
            return Err(CodecError::Truncated {
                needed,
                remaining: self.buf.remaining(),
            });
        }
        Ok(())
    }

    /// Validate a count of fixed-size items against the bytes left.
    fn count(&mut self, item_len: usize) -> Result<usize> {
        let n = self.u32()? as usize;
        self.ensure(n.saturating_mul(item_len))?;
        Ok(n)
    }

    pub fn u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    pub fn bool(&mut self) -> Result<bool> {
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            b => Err(CodecError::InvalidBool(b)),
        }
    }

    pub fn u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.buf.get_u32())
    }

    pub fn u64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        Ok(self.buf.get_u64())
    }

    fn raw_word(&mut self) -> Result<[u8; WORD_LEN]> {
        self.ensure(WORD_LEN)?;
        let mut bytes = [0u8; WORD_LEN];
        self.buf.copy_to_slice(&mut bytes);
        Ok(bytes)
    }

    pub fn word(&mut self) -> Result<I256> {
        Ok(I256::from_be_bytes(self.raw_word()?))
    }

    /// A word narrowed to a component. Must be the sign extension of an `i128`.
    pub fn component(&mut self) -> Result<i128> {
        let bytes = self.raw_word()?;
        let (hi, lo) = bytes.split_at(WORD_LEN / 2);
        let mut low = [0u8; 16];
        low.copy_from_slice(lo);
        let value = i128::from_be_bytes(low);
        let ext = if value < 0 { 0xff } else { 0x00 };
        if hi.iter().any(|&b| b != ext) {
            return Err(CodecError::ComponentOutOfRange);
        }
        Ok(value)
    }

    /// A word narrowed to an unsigned 128-bit quantity.
    pub fn u128_word(&mut self) -> Result<u128> {
        let bytes = self.raw_word()?;
        let (hi, lo) = bytes.split_at(WORD_LEN / 2);
        if hi.iter().any(|&b| b != 0) {
            return Err(CodecError::QuotaOutOfRange);
        }
        let mut low = [0u8; 16];
        low.copy_from_slice(lo);
        Ok(u128::from_be_bytes(low))
    }

    pub fn vector(&mut self) -> Result<Vec<i128>> {
        let n = self.count(WORD_LEN)?;
        (0..n).map(|_| self.component()).collect()
    }

    pub fn words(&mut self) -> Result<Vec<I256>> {
        let n = self.count(WORD_LEN)?;
        (0..n).map(|_| self.word()).collect()
    }

    pub fn ids(&mut self) -> Result<Vec<u64>> {
        let n = self.count(8)?;
        (0..n).map(|_| self.u64()).collect()
    }

    pub fn tag(&mut self) -> Result<Tag> {
        self.ensure(TAG_LEN)?;
        let mut bytes = [0u8; TAG_LEN];
        self.buf.copy_to_slice(&mut bytes);
        Ok(Tag(bytes))
    }

    pub fn tags(&mut self) -> Result<Vec<Tag>> {
        let n = self.count(TAG_LEN)?;
        (0..n).map(|_| self.tag()).collect()
    }

    pub fn domain(&mut self) -> Result<Domain> {
        let b = self.u8()?;
        Domain::try_from(b).map_err(|_| CodecError::UnknownDomain(b))
    }

    pub fn domains(&mut self) -> Result<Vec<Domain>> {
        let n = self.count(1)?;
        (0..n).map(|_| self.domain()).collect()
    }

    /// A `u32` count followed by `(u64 id, u32 label)` pairs.
    pub fn labeled(&mut self) -> Result<Vec<(u64, u32)>> {
        let n = self.count(12)?;
        (0..n).map(|_| Ok((self.u64()?, self.u32()?))).collect()
    }

    /// Require that the whole payload was consumed.
    pub fn finish(self) -> Result<()> {
        if self.buf.has_remaining() {
            return Err(CodecError::TrailingBytes(self.buf.remaining()));
        }
        Ok(())
    }
}

/// Builder for an outbound payload.
#[derive(Default)]
pub struct Encoder {
    buf: BytesMut,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.put_u8(v);
        self
    }

    pub fn bool(&mut self, v: bool) -> &mut Self {
        self.u8(v as u8)
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.buf.put_u32(v);
        self
    }

    pub fn u64(&mut self, v: u64) -> &mut Self {
        self.buf.put_u64(v);
        self
    }

    /// Lengths are written as `u32`; payloads never approach that bound.
    fn len(&mut self, n: usize) -> &mut Self {
        self.u32(n as u32)
    }

    pub fn word(&mut self, v: I256) -> &mut Self {
        self.buf.put_slice(&v.to_be_bytes());
        self
    }

    pub fn component(&mut self, v: i128) -> &mut Self {
        let ext = if v < 0 { 0xff } else { 0x00 };
        self.buf.put_bytes(ext, WORD_LEN / 2);
        self.buf.put_i128(v);
        self
    }

    pub fn u128_word(&mut self, v: u128) -> &mut Self {
        self.buf.put_bytes(0, WORD_LEN / 2);
        self.buf.put_u128(v);
        self
    }

    pub fn vector(&mut self, v: &[i128]) -> &mut Self {
        self.len(v.len());
        for &c in v {
            self.component(c);
        }
        self
    }

    pub fn words(&mut self, v: &[I256]) -> &mut Self {
        self.len(v.len());
        for &w in v {
            self.word(w);
        }
        self
    }

    pub fn ids(&mut self, v: &[u64]) -> &mut Self {
        self.len(v.len());
        for &id in v {
            self.u64(id);
        }
        self
    }

    pub fn tags(&mut self, v: &[Tag]) -> &mut Self {
        self.len(v.len());
        for t in v {
            self.buf.put_slice(&t.0);
        }
        self
    }

    pub fn domain(&mut self, d: Domain) -> &mut Self {
        self.u8(d.as_u8())
    }

    pub fn domains(&mut self, v: &[Domain]) -> &mut Self {
        self.len(v.len());
        for &d in v {
            self.domain(d);
        }
        self
    }

    pub fn labeled(&mut self, v: &[(u64, u32)]) -> &mut Self {
        self.len(v.len());
        for &(id, label) in v {
            self.u64(id).u32(label);
        }
        self
    }

    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}
