use crate::EncodeError;
use log::debug;

/// Allocations are always a multiple of this
const GROWTH_GRANULARITY: usize = 1024;

/// Byte arena with an explicit growth policy.
///
/// The logical length (bytes written) is tracked separately from the physical capacity.
/// Capacity grows to at least 1.5 times its previous size, then up to the next multiple of
/// 1024 strictly above that, so a grown buffer always has room to spare. It never shrinks.
#[derive(Debug, Default, Clone)]
pub struct GrowableBuffer {
    // `data.len()` is the physical capacity
    data: Vec<u8>,
    len: usize,
}

impl GrowableBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes allocated
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Make room for `extra` more bytes, returns whether the buffer had to grow.
    ///
    /// Growth happens when nothing is allocated yet or `len + extra` reaches the capacity.
    pub fn ensure_capacity(&mut self, extra: usize) -> Result<bool, EncodeError> {
        let required = self
            .len
            .checked_add(extra)
            .ok_or(EncodeError::OutOfMemory {
                requested: usize::MAX,
            })?;

        let capacity = self.capacity();

        if capacity > 0 && required < capacity {
            return Ok(false);
        }

        let grown = (capacity + capacity / 2).max(required);

        let new_capacity = (grown / GROWTH_GRANULARITY)
            .checked_add(1)
            .and_then(|blocks| blocks.checked_mul(GROWTH_GRANULARITY))
            .ok_or(EncodeError::OutOfMemory {
                requested: usize::MAX,
            })?;

        let mut data = Vec::new();
        data.try_reserve_exact(new_capacity)
            .map_err(|_| EncodeError::OutOfMemory {
                requested: new_capacity,
            })?;

        data.extend_from_slice(&self.data[..self.len]);
        data.resize(new_capacity, 0);

        debug!(
            "growing bit buffer from {capacity} to {new_capacity} bytes ({} in use)",
            self.len
        );

        self.data = data;

        Ok(true)
    }

    pub fn append(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.ensure_capacity(bytes.len())?;

        self.data[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();

        Ok(())
    }

    pub fn push(&mut self, byte: u8) -> Result<(), EncodeError> {
        self.append(&[byte])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_allocation() {
        let mut buffer = GrowableBuffer::new();

        assert_eq!(buffer.capacity(), 0);
        assert!(buffer.ensure_capacity(0).unwrap());
        assert_eq!(buffer.capacity(), 1024);

        assert!(!buffer.ensure_capacity(1023).unwrap());
        assert_eq!(buffer.capacity(), 1024);
    }

    #[test]
    fn reaching_capacity_grows() {
        let mut buffer = GrowableBuffer::new();
        buffer.ensure_capacity(1).unwrap();

        // len + extra == capacity counts as full
        assert!(buffer.ensure_capacity(1024).unwrap());
        assert_eq!(buffer.capacity(), 2048);
    }

    #[test]
    fn grows_by_half() {
        let mut buffer = GrowableBuffer::new();
        buffer.append(&[7; 4000]).unwrap();
        assert_eq!(buffer.capacity(), 4096);

        buffer.append(&[8; 96]).unwrap();
        // max(4096 * 1.5, 4096) = 6144, which moves on to the next 1024 boundary
        assert_eq!(buffer.capacity(), 7168);

        assert_eq!(buffer.len(), 4096);
        assert!(buffer.as_bytes()[..4000].iter().all(|&b| b == 7));
        assert!(buffer.as_bytes()[4000..].iter().all(|&b| b == 8));
    }

    #[test]
    fn large_append_wins_over_factor() {
        let mut buffer = GrowableBuffer::new();
        buffer.append(&[1; 10]).unwrap();

        buffer.ensure_capacity(100_000).unwrap();
        assert_eq!(buffer.capacity(), 100_352);
    }

    #[test]
    fn growth_is_monotonic() {
        let mut buffer = GrowableBuffer::new();
        let mut prev_capacity = 0;

        for i in 0..2000usize {
            let chunk = vec![i as u8; i % 97];
            buffer.append(&chunk).unwrap();

            let capacity = buffer.capacity();
            assert!(capacity >= prev_capacity);
            assert_eq!(capacity % 1024, 0);
            assert!(capacity >= buffer.len());

            prev_capacity = capacity;
        }
    }

    #[test]
    fn overflow_is_reported() {
        let mut buffer = GrowableBuffer::new();
        buffer.push(1).unwrap();

        assert!(matches!(
            buffer.ensure_capacity(usize::MAX),
            Err(EncodeError::OutOfMemory { .. })
        ));
    }
}
