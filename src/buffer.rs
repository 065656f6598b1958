// src/buffer.rs

/// Fixed-capacity byte buffer.
///
/// Every streaming component (control input, reply output, file and listing
/// transfers) moves bytes through one of these. Appends never grow the
/// storage: callers learn how much was accepted and keep the rest.
#[derive(Debug, Clone)]
pub struct Buffer {
    data: Box<[u8]>,
    len: usize,
}

impl Buffer {
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "buffer capacity must be non-zero");
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn remaining(&self) -> usize {
        self.capacity() - self.len
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Copies as much of `bytes` as fits and returns the number of bytes taken.
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(self.remaining());
        self.data[self.len..self.len + n].copy_from_slice(&bytes[..n]);
        self.len += n;
        n
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Unused tail of the storage, for reads that fill the buffer in place.
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.len..]
    }

    /// Marks `n` bytes of the spare region as filled.
    pub fn commit(&mut self, n: usize) {
        assert!(n <= self.remaining(), "commit past buffer capacity");
        self.len += n;
    }

    /// Drops the first `n` bytes, shifting the remainder to the front in order.
    pub fn consume(&mut self, n: usize) {
        let n = n.min(self.len);
        self.data.copy_within(n..self.len, 0);
        self.len -= n;
    }

    pub fn last(&self) -> Option<u8> {
        self.as_slice().last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_is_bounded() {
        let mut buf = Buffer::with_capacity(4);
        assert_eq!(buf.append(b"ab"), 2);
        assert_eq!(buf.append(b"cdef"), 2);
        assert!(buf.is_full());
        assert_eq!(buf.as_slice(), b"abcd");
        assert_eq!(buf.append(b"x"), 0);
    }

    #[test]
    fn test_consume_preserves_order() {
        let mut buf = Buffer::with_capacity(8);
        buf.append(b"USER\r\nPA");
        buf.consume(6);
        assert_eq!(buf.as_slice(), b"PA");
        assert_eq!(buf.remaining(), 6);
    }

    #[test]
    fn test_spare_and_commit() {
        let mut buf = Buffer::with_capacity(5);
        buf.append(b"ab");
        buf.spare_mut()[..2].copy_from_slice(b"cd");
        buf.commit(2);
        assert_eq!(buf.as_slice(), b"abcd");
        assert_eq!(buf.last(), Some(b'd'));
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.last(), None);
    }
}
