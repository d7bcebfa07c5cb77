use super::DecodeError;

/// Sequential little-endian cursor over a host parcel buffer.
///
/// Every field starts on a 4-byte boundary. The cursor only moves forward;
/// `reset` is the single way back to the start.
pub struct ParcelReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ParcelReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    pub fn reset(&mut self) {
        self.pos = 0;
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < len {
            return Err(DecodeError::Truncated {
                offset: self.pos,
                needed: len,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        self.take_array::<4>().map(i32::from_le_bytes)
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        self.take_array::<8>().map(i64::from_le_bytes)
    }

    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        self.take_array::<4>().map(f32::from_le_bytes)
    }

    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        self.take_array::<8>().map(f64::from_le_bytes)
    }

    /// Reads a length-prefixed UTF-16 string. `Ok(None)` is the null string.
    pub fn read_string16(&mut self) -> Result<Option<String>, DecodeError> {
        let offset = self.pos;
        let len = self.read_i32()?;
        if len == -1 {
            return Ok(None);
        }
        if len < 0 {
            return Err(DecodeError::InvalidLength { offset, len });
        }

        // Code units plus the NUL terminator, padded to the next word.
        let units = len as usize;
        let byte_len = padded(units.saturating_add(1).saturating_mul(2));
        let bytes = self.take(byte_len)?;

        let code_units: Vec<u16> = bytes[..units * 2]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        String::from_utf16(&code_units)
            .map(Some)
            .map_err(|_| DecodeError::InvalidUtf16 { offset })
    }
}

pub(crate) fn padded(len: usize) -> usize {
    (len + 3) & !3
}
