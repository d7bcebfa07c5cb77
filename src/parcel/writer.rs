use super::reader::padded;
use super::{ValueKind, REFLECTION_ACTION_TAG, SET_TEXT_METHOD};

/// Builds action streams in the same layout `ParcelReader` consumes.
///
/// Used to produce replay fixtures and test inputs.
#[derive(Debug, Default)]
pub struct ParcelWriter {
    buf: Vec<u8>,
}

impl ParcelWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_string16(&mut self, value: Option<&str>) {
        let Some(text) = value else {
            self.write_i32(-1);
            return;
        };

        let units: Vec<u16> = text.encode_utf16().collect();
        self.write_i32(units.len() as i32);

        let start = self.buf.len();
        for unit in units.iter().chain(std::iter::once(&0u16)) {
            self.buf.extend_from_slice(&unit.to_le_bytes());
        }
        let written = self.buf.len() - start;
        self.buf.resize(start + padded(written), 0);
    }

    /// Writes a full record header: tag, view id, method name and value kind.
    pub fn write_record_header(&mut self, tag: i32, view_id: i32, method: &str, kind: ValueKind) {
        self.write_i32(tag);
        self.write_i32(view_id);
        self.write_string16(Some(method));
        self.write_i32(kind.code());
    }

    /// Writes a reflection `setText` record carrying plain text.
    pub fn write_set_text(&mut self, view_id: i32, text: &str) {
        self.write_record_header(
            REFLECTION_ACTION_TAG,
            view_id,
            SET_TEXT_METHOD,
            ValueKind::CharSequence,
        );
        self.write_i32(super::PLAIN_TEXT_KIND);
        self.write_string16(Some(text));
    }

    /// Writes a reflection record with an int payload, e.g. `setVisibility`.
    pub fn write_int_action(&mut self, view_id: i32, method: &str, value: i32) {
        self.write_record_header(REFLECTION_ACTION_TAG, view_id, method, ValueKind::Int);
        self.write_i32(value);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
