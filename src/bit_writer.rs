use crate::{EncodeError, GrowableBuffer};

/// Bit writer of the lossy (`VP8 `) bitstream, bits are packed MSB first
#[derive(Debug, Default, Clone)]
pub struct Vp8BitWriter {
    buffer: GrowableBuffer,
    bits: u64,
    used: u32,
    finished: bool,
}

/// Bit writer of the lossless (`VP8L`) bitstream, bits are packed LSB first
#[derive(Debug, Default, Clone)]
pub struct Vp8lBitWriter {
    buffer: GrowableBuffer,
    bits: u64,
    used: u32,
    finished: bool,
}

#[inline(always)]
fn mask(value: u32, n_bits: u32) -> u64 {
    u64::from(value) & ((1u64 << n_bits) - 1)
}

impl Vp8BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the lowest `n_bits` (at most 32) of `value`
    pub fn put_bits(&mut self, value: u32, n_bits: u32) -> Result<(), EncodeError> {
        assert!(n_bits <= 32);

        if self.finished {
            return Err(EncodeError::WriterFinished);
        }

        self.bits = (self.bits << n_bits) | mask(value, n_bits);
        self.used += n_bits;

        while self.used >= 8 {
            self.used -= 8;
            self.buffer.push((self.bits >> self.used) as u8)?;
        }

        self.bits &= (1u64 << self.used) - 1;

        Ok(())
    }

    /// Zero pad the pending bits to a full byte. No writes are accepted afterwards.
    pub fn finish(&mut self) -> Result<(), EncodeError> {
        if self.finished {
            return Ok(());
        }

        if self.used > 0 {
            self.buffer.push((self.bits << (8 - self.used)) as u8)?;
            self.bits = 0;
            self.used = 0;
        }

        self.finished = true;

        Ok(())
    }

    fn pending_bits(&self) -> u32 {
        self.used
    }
}

impl Vp8lBitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the lowest `n_bits` (at most 32) of `value`
    pub fn put_bits(&mut self, value: u32, n_bits: u32) -> Result<(), EncodeError> {
        assert!(n_bits <= 32);

        if self.finished {
            return Err(EncodeError::WriterFinished);
        }

        self.bits |= mask(value, n_bits) << self.used;
        self.used += n_bits;

        if self.used >= 32 {
            self.buffer.append(&(self.bits as u32).to_le_bytes())?;
            self.bits >>= 32;
            self.used -= 32;
        }

        Ok(())
    }

    /// Flush the pending bits, zero padded to a full byte. No writes are accepted afterwards.
    pub fn finish(&mut self) -> Result<(), EncodeError> {
        if self.finished {
            return Ok(());
        }

        self.flush_bytes()?;

        if self.used > 0 {
            self.buffer.push(self.bits as u8)?;
            self.bits = 0;
            self.used = 0;
        }

        self.finished = true;

        Ok(())
    }

    /// Move all complete bytes into the buffer
    fn flush_bytes(&mut self) -> Result<(), EncodeError> {
        while self.used >= 8 {
            self.buffer.push(self.bits as u8)?;
            self.bits >>= 8;
            self.used -= 8;
        }

        Ok(())
    }

    fn pending_bits(&self) -> u32 {
        self.used
    }
}

/// Output of the entropy coder, either lossy or lossless.
///
/// Both share the [`GrowableBuffer`] arena and only differ in the bit order and in how they are
/// framed by [`write_framed_stream`](crate::write_framed_stream).
#[derive(Debug, Clone)]
pub enum BitWriter {
    Lossy(Vp8BitWriter),
    Lossless(Vp8lBitWriter),
}

impl BitWriter {
    pub fn new(lossless: bool) -> Self {
        if lossless {
            Self::Lossless(Vp8lBitWriter::new())
        } else {
            Self::Lossy(Vp8BitWriter::new())
        }
    }

    pub fn is_lossless(&self) -> bool {
        matches!(self, Self::Lossless(..))
    }

    pub fn put_bits(&mut self, value: u32, n_bits: u32) -> Result<(), EncodeError> {
        match self {
            Self::Lossy(w) => w.put_bits(value, n_bits),
            Self::Lossless(w) => w.put_bits(value, n_bits),
        }
    }

    /// Append whole bytes, the writer must be at a byte boundary
    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        if self.is_finished() {
            return Err(EncodeError::WriterFinished);
        }

        if let Self::Lossless(w) = self {
            w.flush_bytes()?;
        }

        let pending = self.pending_bits();

        if pending != 0 {
            return Err(EncodeError::UnalignedWrite { pending });
        }

        self.buffer_mut().append(bytes)
    }

    /// Flush pending sub-byte state, after this call no writes are accepted
    pub fn finish(&mut self) -> Result<(), EncodeError> {
        match self {
            Self::Lossy(w) => w.finish(),
            Self::Lossless(w) => w.finish(),
        }
    }

    pub fn is_finished(&self) -> bool {
        match self {
            Self::Lossy(w) => w.finished,
            Self::Lossless(w) => w.finished,
        }
    }

    /// Logical length in bytes, counting pending bits as a (partial) byte
    pub fn len(&self) -> usize {
        self.buffer().len() + self.pending_bits().div_ceil(8) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes allocated by the underlying buffer
    pub fn capacity(&self) -> usize {
        self.buffer().capacity()
    }

    /// Complete bytes written so far, all of them once finished
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer().as_bytes()
    }

    fn buffer(&self) -> &GrowableBuffer {
        match self {
            Self::Lossy(w) => &w.buffer,
            Self::Lossless(w) => &w.buffer,
        }
    }

    fn buffer_mut(&mut self) -> &mut GrowableBuffer {
        match self {
            Self::Lossy(w) => &mut w.buffer,
            Self::Lossless(w) => &mut w.buffer,
        }
    }

    fn pending_bits(&self) -> u32 {
        match self {
            Self::Lossy(w) => w.pending_bits(),
            Self::Lossless(w) => w.pending_bits(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lossless_is_lsb_first() {
        let mut w = BitWriter::new(true);

        w.put_bits(0x2f, 8).unwrap();
        w.put_bits(0b1, 1).unwrap();
        w.put_bits(0b10, 2).unwrap();

        assert_eq!(w.len(), 2);

        w.finish().unwrap();

        assert_eq!(w.as_bytes(), &[0x2f, 0b101]);
    }

    #[test]
    fn lossy_is_msb_first() {
        let mut w = BitWriter::new(false);

        w.put_bits(0x9d, 8).unwrap();
        w.put_bits(0b1, 1).unwrap();
        w.put_bits(0b10, 2).unwrap();

        assert_eq!(w.as_bytes(), &[0x9d]);
        assert_eq!(w.len(), 2);

        w.finish().unwrap();

        assert_eq!(w.as_bytes(), &[0x9d, 0b1100_0000]);
    }

    #[test]
    fn lossless_word_flush() {
        let mut w = Vp8lBitWriter::new();

        for _ in 0..5 {
            w.put_bits(0xabcd, 16).unwrap();
        }
        w.put_bits(0x7, 3).unwrap();
        w.finish().unwrap();

        assert_eq!(
            w.buffer.as_bytes(),
            &[0xcd, 0xab, 0xcd, 0xab, 0xcd, 0xab, 0xcd, 0xab, 0xcd, 0xab, 0x07]
        );
    }

    #[test]
    fn full_width_values() {
        let mut lossy = BitWriter::new(false);
        let mut lossless = BitWriter::new(true);

        lossy.put_bits(0x1234_5678, 32).unwrap();
        lossless.put_bits(0x1234_5678, 32).unwrap();

        lossy.finish().unwrap();
        lossless.finish().unwrap();

        assert_eq!(lossy.as_bytes(), &[0x12, 0x34, 0x56, 0x78]);
        assert_eq!(lossless.as_bytes(), &[0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn writes_after_finish_fail() {
        for lossless in [false, true] {
            let mut w = BitWriter::new(lossless);
            w.append_bytes(&[1, 2, 3]).unwrap();
            w.finish().unwrap();

            // finishing twice is harmless
            w.finish().unwrap();

            assert!(matches!(
                w.put_bits(1, 1),
                Err(EncodeError::WriterFinished)
            ));
            assert!(matches!(
                w.append_bytes(&[4]),
                Err(EncodeError::WriterFinished)
            ));
            assert_eq!(w.as_bytes(), &[1, 2, 3]);
        }
    }

    #[test]
    fn unaligned_byte_write() {
        for lossless in [false, true] {
            let mut w = BitWriter::new(lossless);
            w.put_bits(0b101, 3).unwrap();

            assert!(matches!(
                w.append_bytes(&[1]),
                Err(EncodeError::UnalignedWrite { pending: 3 })
            ));
        }

        // Complete bytes held in the lossless accumulator are flushed first
        let mut w = BitWriter::new(true);
        w.put_bits(0xff, 8).unwrap();
        w.append_bytes(&[1]).unwrap();
        w.finish().unwrap();

        assert_eq!(w.as_bytes(), &[0xff, 1]);
    }

    #[test]
    fn capacity_is_shared_growth_policy() {
        let mut w = BitWriter::new(true);
        assert_eq!(w.capacity(), 0);

        w.append_bytes(&[0; 3000]).unwrap();
        assert_eq!(w.capacity(), 3072);
        assert_eq!(w.len(), 3000);
    }
}
