use crate::error::{Error, Result};

/// Check that a buffer of `len` bytes can hold a `name` packet of at least `minimum` bytes.
pub fn check_len(name: &str, minimum: usize, len: usize) -> Result<()> {
    if len >= minimum {
        Ok(())
    } else {
        Err(Error::InsufficientPacketBuffer(
            String::from(name),
            minimum,
            len,
        ))
    }
}

/// A byte buffer that holds a mutable or immutable byte slice.
#[derive(Debug)]
pub enum Buffer<'a> {
    Immutable(&'a [u8]),
    Mutable(&'a mut [u8]),
}

impl Buffer<'_> {
    /// access the buffer as an immutable slice of bytes.
    pub fn as_slice(&self) -> &[u8] {
        match &self {
            Buffer::Immutable(packet) => packet,
            Buffer::Mutable(packet) => packet,
        }
    }

    /// access the buffer as a mutable slice of bytes.
    pub fn as_slice_mut(&mut self) -> &mut [u8] {
        match self {
            Buffer::Immutable(_) => panic!("write operation called on readonly buffer"),
            Buffer::Mutable(packet) => packet,
        }
    }

    /// Get N bytes from the packet at a given byte offset.
    pub fn get_bytes<const N: usize>(&self, offset: usize) -> [u8; N] {
        core::array::from_fn(|i| self.read(offset + i))
    }

    /// Set N bytes in the packet at a given offset.
    pub fn set_bytes<const N: usize>(&mut self, offset: usize, bytes: [u8; N]) {
        self.as_slice_mut()[offset..offset + N].copy_from_slice(&bytes);
    }

    /// Read a network byte order `u16` at a given offset.
    pub fn get_u16(&self, offset: usize) -> u16 {
        u16::from_be_bytes(self.get_bytes(offset))
    }

    /// Write a `u16` in network byte order at a given offset.
    pub fn set_u16(&mut self, offset: usize, val: u16) {
        self.set_bytes(offset, val.to_be_bytes());
    }

    /// Get the value at a given offset.
    pub fn read(&self, offset: usize) -> u8 {
        self.as_slice()[offset]
    }

    /// Set the value at a given offset.
    pub fn write(&mut self, offset: usize) -> &mut u8 {
        &mut self.as_slice_mut()[offset]
    }

    /// The bytes from `offset` to the end of the buffer, empty if `offset` is out of range.
    pub fn tail(&self, offset: usize) -> &[u8] {
        let slice = self.as_slice();
        &slice[offset.min(slice.len())..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immutable_buffer() {
        let buf = [0_u8; 5];
        let buffer = Buffer::Immutable(&buf);
        assert_eq!(buf.as_slice(), buffer.as_slice());
        assert_eq!(buf, buffer.get_bytes(0));
        assert_eq!(0_u8, buffer.read(0));
    }

    #[test]
    fn test_mutable_buffer() {
        let mut buf = [0_u8; 5];
        let mut buffer = Buffer::Mutable(&mut buf);
        buffer.set_u16(1, 0xABCD);
        assert_eq!(0xABCD, buffer.get_u16(1));
        assert_eq!([0x00, 0xAB, 0xCD, 0x00, 0x00], buffer.get_bytes(0));
        *buffer.write(4) = 7;
        assert_eq!(7_u8, buffer.read(4));
    }

    #[test]
    fn test_tail() {
        let buf = [1_u8, 2, 3];
        let buffer = Buffer::Immutable(&buf);
        assert_eq!(&[2_u8, 3], buffer.tail(1));
        assert!(buffer.tail(3).is_empty());
        assert!(buffer.tail(10).is_empty());
    }

    #[test]
    fn test_check_len() {
        assert_eq!(Ok(()), check_len("Test", 8, 8));
        assert_eq!(
            Err(Error::InsufficientPacketBuffer(String::from("Test"), 8, 7)),
            check_len("Test", 8, 7)
        );
    }

    #[test]
    #[should_panic(expected = "write operation called on readonly buffer")]
    fn test_immutable_buffer_cannot_write() {
        let buf = [0_u8; 5];
        let mut buffer = Buffer::Immutable(&buf);
        buffer.set_u16(0, 1);
    }
}
