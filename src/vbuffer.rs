//! `VBuffer`: a growable raw byte buffer, the crate's binary counterpart to
//! `VString`'s UTF-8 text. In-place mutations return a clone of the receiver
//! for chaining, matching every other non-`VString` container.

use crate::shared::Handle;
use crate::vstring::VString;

const INITIAL_CAPACITY: usize = 512;

#[derive(Clone)]
pub struct VBuffer {
    bytes: Handle<Vec<u8>>,
}

impl VBuffer {
    pub fn new() -> Self {
        VBuffer {
            bytes: Handle::new(Vec::with_capacity(INITIAL_CAPACITY)),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        VBuffer {
            bytes: Handle::new(Vec::with_capacity(capacity.max(INITIAL_CAPACITY))),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        VBuffer {
            bytes: Handle::new(bytes.to_vec()),
        }
    }

    pub fn from_string(text: &VString) -> Self {
        VBuffer::from_bytes(text.as_str().as_bytes())
    }

    pub fn duplicate(&self) -> VBuffer {
        VBuffer {
            bytes: Handle::new(self.bytes.snapshot()),
        }
    }

    pub fn length(&self) -> usize {
        self.bytes.read(|b| b.len())
    }

    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    pub fn clear(&self) -> VBuffer {
        self.bytes.write(|b| b.clear());
        self.clone()
    }

    /// Drops any spare capacity the buffer is carrying.
    pub fn trim(&self) -> VBuffer {
        self.bytes.write(|b| b.shrink_to_fit());
        self.clone()
    }

    pub fn append(&self, other: &[u8]) -> VBuffer {
        self.bytes.write(|b| b.extend_from_slice(other));
        self.clone()
    }

    pub fn prepend(&self, other: &[u8]) -> VBuffer {
        self.bytes.write(|b| {
            let mut combined = Vec::with_capacity(b.len() + other.len());
            combined.extend_from_slice(other);
            combined.extend_from_slice(b);
            *b = combined;
        });
        self.clone()
    }

    /// `index` clamps to `[0, length]`.
    pub fn insert(&self, index: isize, other: &[u8]) -> VBuffer {
        self.bytes.write(|b| {
            let idx = index.clamp(0, b.len() as isize) as usize;
            let mut combined = Vec::with_capacity(b.len() + other.len());
            combined.extend_from_slice(&b[..idx]);
            combined.extend_from_slice(other);
            combined.extend_from_slice(&b[idx..]);
            *b = combined;
        });
        self.clone()
    }

    /// In-place two-pointer reversal. Returns the receiver.
    pub fn reverse(&self) -> VBuffer {
        self.bytes.write(|b| b.reverse());
        self.clone()
    }

    /// Drops the byte range `[start, end)`, clamped to `[0, length]` like
    /// `VList::remove`'s range counterpart. No-op if the clamped range is empty.
    pub fn remove(&self, start: isize, end: isize) -> VBuffer {
        self.bytes.write(|b| {
            let len = b.len() as isize;
            let start = start.clamp(0, len) as usize;
            let end = end.clamp(0, len) as usize;
            if start < end {
                b.drain(start..end);
            }
        });
        self.clone()
    }

    /// A new, deep-copied buffer over the clamped byte range `[start, end)`.
    pub fn slice(&self, start: isize, end: isize) -> VBuffer {
        self.bytes.read(|b| {
            let len = b.len() as isize;
            let start = start.clamp(0, len) as usize;
            let end = end.clamp(0, len) as usize;
            if start < end {
                VBuffer::from_bytes(&b[start..end])
            } else {
                VBuffer::new()
            }
        })
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        self.bytes.snapshot()
    }

    /// Raw bytes reinterpreted as UTF-8 (lossily, like every other
    /// stringification in this crate).
    pub fn to_vstring(&self) -> VString {
        self.bytes.read(|b| VString::from_bytes(b))
    }

    pub fn to_base64(&self) -> String {
        self.bytes.read(|b| crate::base64::encode(b))
    }

    pub fn from_base64(text: &str) -> VBuffer {
        VBuffer::from_bytes(&crate::base64::decode(text))
    }

    pub fn equals(&self, other: &VBuffer) -> bool {
        self.bytes.read(|a| other.bytes.read(|b| a == b))
    }

    /// The same djb2 `VString::hash` uses, applied to the raw bytes.
    pub fn hash(&self) -> u64 {
        self.bytes.read(|b| crate::vstring::djb2(b))
    }

    #[cfg(feature = "cipher")]
    pub fn encrypt(&self, key: &[u8; 32], nonce: &[u8; 12]) -> VBuffer {
        let data = self.as_bytes();
        VBuffer::from_bytes(&crate::cipher::chacha20_xor(key, nonce, &data))
    }

    #[cfg(feature = "cipher")]
    pub fn decrypt(&self, key: &[u8; 32], nonce: &[u8; 12]) -> VBuffer {
        // ChaCha20 is its own inverse: XOR with the same keystream.
        self.encrypt(key, nonce)
    }

    #[cfg(feature = "compress")]
    pub fn compress(&self) -> VBuffer {
        let data = self.as_bytes();
        VBuffer::from_bytes(&crate::compress::compress(&data))
    }

    #[cfg(feature = "compress")]
    pub fn decompress(&self) -> VBuffer {
        let data = self.as_bytes();
        VBuffer::from_bytes(&crate::compress::decompress(&data))
    }
}

impl Default for VBuffer {
    fn default() -> Self {
        VBuffer::new()
    }
}

impl std::fmt::Debug for VBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VBuffer({} bytes)", self.length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_prepend_insert() {
        let b = VBuffer::from_bytes(b"bc");
        b.prepend(b"a");
        b.append(b"d");
        b.insert(2, b"X");
        assert_eq!(b.as_bytes(), b"abXcd");
    }

    #[test]
    fn base64_round_trip() {
        let b = VBuffer::from_bytes(b"hello world");
        let encoded = b.to_base64();
        let decoded = VBuffer::from_base64(&encoded);
        assert!(b.equals(&decoded));
    }

    #[test]
    fn duplicate_is_independent() {
        let a = VBuffer::from_bytes(b"abc");
        let dup = a.duplicate();
        dup.append(b"d");
        assert_eq!(a.length(), 3);
        assert_eq!(dup.length(), 4);
    }

    #[test]
    fn hash_of_empty_buffer_is_zero() {
        assert_eq!(VBuffer::new().hash(), 0);
    }

    #[test]
    fn hash_matches_vstring_djb2_over_the_same_bytes() {
        let b = VBuffer::from_bytes(b"hello");
        let s = VString::from("hello");
        assert_eq!(b.hash(), s.hash());
    }

    #[test]
    fn reverse_flips_byte_order_in_place() {
        let b = VBuffer::from_bytes(b"abc");
        b.reverse();
        assert_eq!(b.as_bytes(), b"cba");
    }

    #[test]
    fn remove_drops_clamped_range() {
        let b = VBuffer::from_bytes(b"abcdef");
        b.remove(2, 4);
        assert_eq!(b.as_bytes(), b"abef");
        // out-of-range clamps rather than panicking
        b.remove(-5, 100);
        assert_eq!(b.as_bytes(), Vec::<u8>::new());
    }

    #[test]
    fn slice_returns_independent_subrange() {
        let b = VBuffer::from_bytes(b"abcdef");
        let s = b.slice(1, 4);
        assert_eq!(s.as_bytes(), b"bcd");
        s.append(b"X");
        assert_eq!(b.as_bytes(), b"abcdef");
    }
}
