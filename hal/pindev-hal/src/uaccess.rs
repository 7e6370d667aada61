//! User-space copy primitives
//!
//! Copies across the user boundary can fault part-way. Both directions
//! return the number of bytes that were NOT copied; the bytes that were
//! copied always form a prefix.

/// Destination of a read: a user buffer of `len()` bytes
pub trait UserWriter {
    /// Number of bytes the caller asked for
    fn len(&self) -> usize;

    /// Check if the caller asked for nothing
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy `src` to the start of the user buffer
    ///
    /// `src.len()` never exceeds `len()`. Returns the uncopied byte count.
    fn copy_to_user(&mut self, src: &[u8]) -> usize;
}

/// Source of a write: a user buffer of `len()` bytes
pub trait UserReader {
    /// Number of bytes the caller offered
    fn len(&self) -> usize;

    /// Check if the caller offered nothing
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy the start of the user buffer into `dst`
    ///
    /// `dst.len()` never exceeds `len()`. Returns the uncopied byte count.
    fn copy_from_user(&mut self, dst: &mut [u8]) -> usize;
}

/// In-memory [`UserWriter`] that never faults
pub struct SliceWriter<'a> {
    buf: &'a mut [u8],
}

impl<'a> SliceWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf }
    }
}

impl UserWriter for SliceWriter<'_> {
    fn len(&self) -> usize {
        self.buf.len()
    }

    fn copy_to_user(&mut self, src: &[u8]) -> usize {
        let n = src.len().min(self.buf.len());
        self.buf[..n].copy_from_slice(&src[..n]);
        src.len() - n
    }
}

/// In-memory [`UserReader`] that never faults
pub struct SliceReader<'a> {
    buf: &'a [u8],
}

impl<'a> SliceReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }
}

impl UserReader for SliceReader<'_> {
    fn len(&self) -> usize {
        self.buf.len()
    }

    fn copy_from_user(&mut self, dst: &mut [u8]) -> usize {
        let n = dst.len().min(self.buf.len());
        dst[..n].copy_from_slice(&self.buf[..n]);
        dst.len() - n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_writer_copies_prefix() {
        let mut buf = [0u8; 4];
        let mut w = SliceWriter::new(&mut buf);
        assert_eq!(w.len(), 4);
        assert_eq!(w.copy_to_user(b"ab"), 0);
        assert_eq!(&buf[..2], b"ab");
    }

    #[test]
    fn test_slice_reader_copies_prefix() {
        let mut dst = [0u8; 3];
        let mut r = SliceReader::new(b"xyz");
        assert_eq!(r.copy_from_user(&mut dst), 0);
        assert_eq!(&dst, b"xyz");
    }

    #[test]
    fn test_empty_buffers() {
        let mut buf = [0u8; 0];
        let w = SliceWriter::new(&mut buf);
        assert!(w.is_empty());
        let r = SliceReader::new(&[]);
        assert!(r.is_empty());
    }
}
