use std::borrow::BorrowMut;

/// An LSB ordered bitmap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitmap {
    len: usize,
    data: Vec<u8>,
}

impl Bitmap {
    /// Create a new bitmap of a given length with all values initialized to
    /// the given value.
    pub fn new_with_val(val: bool, len: usize) -> Self {
        let byte = if val { u8::MAX } else { 0 };
        let mut bitmap = Bitmap {
            len,
            data: vec![byte; (len + 7) / 8],
        };
        bitmap.clear_trailing_bits();
        bitmap
    }

    pub fn new_with_all_true(len: usize) -> Self {
        Self::new_with_val(true, len)
    }

    pub fn from_bool_iter(iter: impl IntoIterator<Item = bool>) -> Self {
        let mut iter = iter.into_iter();

        let mut data = Vec::new();
        let mut len = 0;

        loop {
            let mut byte = 0;
            let mut bit_len = 0;

            for (idx, bit) in iter.borrow_mut().take(8).enumerate() {
                bit_len += 1;
                if bit {
                    byte |= 1 << idx;
                }
            }

            // No more bits, exit loop.
            if bit_len == 0 {
                break;
            }

            // Push byte, continue loop to get next 8 values.
            data.push(byte);
            len += bit_len;
        }

        Bitmap { len, data }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the value at index.
    ///
    /// Panics if index is out of bounds.
    pub fn value(&self, idx: usize) -> bool {
        assert!(idx < self.len);
        self.data[idx / 8] & (1 << (idx % 8)) != 0
    }

    /// Set a bit at index.
    pub fn set(&mut self, idx: usize, val: bool) {
        assert!(idx < self.len);
        if val {
            // Set bit.
            self.data[idx / 8] |= 1 << (idx % 8)
        } else {
            // Unset bit
            self.data[idx / 8] &= !(1 << (idx % 8))
        }
    }

    /// Push a value onto the end of the bitmap.
    pub fn push(&mut self, val: bool) {
        if self.len % 8 == 0 {
            self.data.push(0);
        }
        self.len += 1;
        self.set(self.len - 1, val);
    }

    /// Get the underlying bytes of the bitmap.
    ///
    /// Bit `idx` lives in byte `idx >> 3` at position `idx & 7`.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Read the 64 bits starting at bit `word_idx * 64` as a little-endian
    /// word.
    ///
    /// Bits past the end of the bitmap read as zero.
    pub fn word64(&self, word_idx: usize) -> u64 {
        let start = word_idx * 8;
        if start >= self.data.len() {
            return 0;
        }

        let end = usize::min(start + 8, self.data.len());
        let mut buf = [0; 8];
        buf[..end - start].copy_from_slice(&self.data[start..end]);

        u64::from_le_bytes(buf)
    }

    /// Zero out bits in the last byte that sit past `len`.
    fn clear_trailing_bits(&mut self) {
        let rem = self.len % 8;
        if rem != 0 {
            if let Some(last) = self.data.last_mut() {
                *last &= (1 << rem) - 1;
            }
        }
    }
}

impl FromIterator<bool> for Bitmap {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        Self::from_bool_iter(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple() {
        let bits = [true, false, true, false, true, true, true, true];
        let bm = Bitmap::from_bool_iter(bits);

        assert_eq!(8, bm.len());

        let got: Vec<_> = (0..bm.len()).map(|idx| bm.value(idx)).collect();
        assert_eq!(bits.as_slice(), got);
    }

    #[test]
    fn not_multiple_of_eight() {
        let bits = [
            true, false, true, false, true, true, true, true, //
            true, false, true, false,
        ];
        let bm = Bitmap::from_bool_iter(bits);

        assert_eq!(12, bm.len());

        let got: Vec<_> = (0..bm.len()).map(|idx| bm.value(idx)).collect();
        assert_eq!(bits.as_slice(), got);
    }

    #[test]
    fn set_simple() {
        let bits = [true, false, true, false, true, true, true, true];
        let mut bm = Bitmap::from_bool_iter(bits);

        bm.set(0, false);
        assert!(!bm.value(0));

        bm.set(1, true);
        assert!(bm.value(1));
    }

    #[test]
    fn push_across_bytes() {
        let mut bm = Bitmap::default();
        for idx in 0..10 {
            bm.push(idx % 3 == 0);
        }

        assert_eq!(10, bm.len());
        assert_eq!(0b10_0100_1001, bm.word64(0));
        assert!(bm.value(9));
        assert!(!bm.value(8));
    }

    #[test]
    fn all_true_clears_trailing() {
        let bm = Bitmap::new_with_all_true(10);
        assert_eq!(0b11_1111_1111, bm.word64(0));
    }

    #[test]
    fn word64_spans_bytes() {
        // Bit 0 and bit 63 in the first word, bit 64 in the second.
        let bm = Bitmap::from_iter((0..70).map(|idx| idx == 0 || idx == 63 || idx == 64));

        assert_eq!(1 | (1 << 63), bm.word64(0));
        assert_eq!(1, bm.word64(1));
        assert_eq!(0, bm.word64(2));
    }
}
