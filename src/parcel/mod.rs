//! Decoder for the binary action streams attached to host notifications.
//!
//! A stream is a flat run of records with no outer length prefix, so field
//! boundaries are only known by reading every field in order. Records that are
//! not `setText` reflection actions are read in full and dropped.

pub mod action;
pub mod reader;
pub mod writer;

pub use action::{ActionRecord, ActionValue, ValueKind};
pub use reader::ParcelReader;
pub use writer::ParcelWriter;

use thiserror::Error;

pub const REFLECTION_ACTION_TAG: i32 = 2;
pub const SET_TEXT_METHOD: &str = "setText";

pub(crate) const STYLED_TEXT_KIND: i32 = 0;
pub(crate) const PLAIN_TEXT_KIND: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("stream truncated at byte {offset}: needed {needed} bytes, {available} left")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("invalid string length {len} at byte {offset}")]
    InvalidLength { offset: usize, len: i32 },
    #[error("invalid UTF-16 string at byte {offset}")]
    InvalidUtf16 { offset: usize },
    #[error("unknown value type {code} at byte {offset}")]
    UnknownValueType { offset: usize, code: i32 },
    #[error("unknown text kind {kind} at byte {offset}")]
    UnknownTextKind { offset: usize, kind: i32 },
    #[error("unknown span kind {kind} at byte {offset}")]
    UnknownSpanKind { offset: usize, kind: i32 },
}

/// Lazily yields the `setText` records of a stream.
///
/// The first error is yielded once and ends the iteration; no partially read
/// record is ever produced.
pub struct ActionStream<'a> {
    reader: ParcelReader<'a>,
    failed: bool,
}

impl<'a> ActionStream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: ParcelReader::new(data),
            failed: false,
        }
    }

    /// Starts decoding again from the first byte.
    pub fn restart(&mut self) {
        self.reader.reset();
        self.failed = false;
    }
}

impl Iterator for ActionStream<'_> {
    type Item = Result<ActionRecord, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.failed && !self.reader.is_exhausted() {
            match action::read_record(&mut self.reader) {
                Ok(record) if record.is_set_text() => return Some(Ok(record)),
                Ok(_) => continue,
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
        None
    }
}

impl std::iter::FusedIterator for ActionStream<'_> {}

pub fn decode(data: &[u8]) -> ActionStream<'_> {
    ActionStream::new(data)
}

/// Decodes a whole stream and returns the non-null `setText` payloads in
/// stream order.
pub fn set_text_payloads(data: &[u8]) -> Result<Vec<String>, DecodeError> {
    let mut texts = Vec::new();
    for record in decode(data) {
        if let Some(text) = record?.text() {
            texts.push(text.to_string());
        }
    }
    Ok(texts)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLE_ID: i32 = 0x0102_0016;
    const TEXT_ID: i32 = 0x0102_0046;

    #[test]
    fn single_set_text_yields_its_payload() {
        let mut writer = ParcelWriter::new();
        writer.write_set_text(TEXT_ID, "Mon 7:05");
        let bytes = writer.into_bytes();

        assert_eq!(set_text_payloads(&bytes).unwrap(), vec!["Mon 7:05".to_string()]);
    }

    #[test]
    fn other_records_are_consumed_and_dropped() {
        let mut writer = ParcelWriter::new();
        writer.write_int_action(TEXT_ID, "setVisibility", 0);
        writer.write_record_header(REFLECTION_ACTION_TAG, TEXT_ID, "setAlpha", ValueKind::Float);
        writer.write_f32(0.5);
        writer.write_record_header(REFLECTION_ACTION_TAG, TEXT_ID, "setTime", ValueKind::Long);
        writer.write_i64(1_700_000_000_000);
        writer.write_record_header(REFLECTION_ACTION_TAG, TEXT_ID, "setScale", ValueKind::Double);
        writer.write_f64(2.0);
        writer.write_set_text(TITLE_ID, "Upcoming alarm");
        writer.write_record_header(REFLECTION_ACTION_TAG, TEXT_ID, "setChecked", ValueKind::Boolean);
        writer.write_i32(1);
        writer.write_set_text(TEXT_ID, "Tue 6:30");
        let bytes = writer.into_bytes();

        let records: Vec<ActionRecord> = decode(&bytes).map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].view_id, TITLE_ID);
        assert_eq!(records[0].text(), Some("Upcoming alarm"));
        assert_eq!(records[1].text(), Some("Tue 6:30"));
        assert!(records.iter().all(|r| r.value_kind == ValueKind::CharSequence));
    }

    #[test]
    fn no_set_text_records_yields_nothing() {
        let mut writer = ParcelWriter::new();
        writer.write_int_action(TEXT_ID, "setVisibility", 8);
        writer.write_int_action(TEXT_ID, "setTextColor", -1);
        let bytes = writer.into_bytes();

        assert!(set_text_payloads(&bytes).unwrap().is_empty());
        assert!(set_text_payloads(&[]).unwrap().is_empty());
    }

    #[test]
    fn set_text_with_other_tag_is_skipped() {
        let mut writer = ParcelWriter::new();
        writer.write_record_header(7, TEXT_ID, SET_TEXT_METHOD, ValueKind::String);
        writer.write_string16(Some("9:00"));
        writer.write_set_text(TEXT_ID, "10:15");
        let bytes = writer.into_bytes();

        assert_eq!(set_text_payloads(&bytes).unwrap(), vec!["10:15".to_string()]);
    }

    #[test]
    fn string_valued_set_text_is_surfaced() {
        let mut writer = ParcelWriter::new();
        writer.write_record_header(REFLECTION_ACTION_TAG, TEXT_ID, SET_TEXT_METHOD, ValueKind::String);
        writer.write_string16(Some("Wed 21:40"));
        let bytes = writer.into_bytes();

        assert_eq!(set_text_payloads(&bytes).unwrap(), vec!["Wed 21:40".to_string()]);
    }

    #[test]
    fn null_text_contributes_no_candidate() {
        let mut writer = ParcelWriter::new();
        writer.write_record_header(REFLECTION_ACTION_TAG, TEXT_ID, SET_TEXT_METHOD, ValueKind::CharSequence);
        writer.write_i32(PLAIN_TEXT_KIND);
        writer.write_string16(None);
        writer.write_set_text(TEXT_ID, "8:00");
        let bytes = writer.into_bytes();

        let records: Vec<_> = decode(&bytes).collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text(), None);
        assert_eq!(set_text_payloads(&bytes).unwrap(), vec!["8:00".to_string()]);
    }

    #[test]
    fn styled_text_spans_are_skipped() {
        let mut writer = ParcelWriter::new();
        writer.write_record_header(REFLECTION_ACTION_TAG, TEXT_ID, SET_TEXT_METHOD, ValueKind::CharSequence);
        writer.write_i32(STYLED_TEXT_KIND);
        writer.write_string16(Some("Thu 5:45"));
        // style span: body, start, end, flags
        writer.write_i32(7);
        writer.write_i32(1);
        writer.write_i32(0);
        writer.write_i32(3);
        writer.write_i32(33);
        // relative size span
        writer.write_i32(3);
        writer.write_f32(1.25);
        writer.write_i32(4);
        writer.write_i32(8);
        writer.write_i32(33);
        // underline span, empty body
        writer.write_i32(6);
        writer.write_i32(0);
        writer.write_i32(8);
        writer.write_i32(0);
        writer.write_i32(0);
        writer.write_set_text(TEXT_ID, "after");
        let bytes = writer.into_bytes();

        assert_eq!(
            set_text_payloads(&bytes).unwrap(),
            vec!["Thu 5:45".to_string(), "after".to_string()]
        );
    }

    #[test]
    fn unknown_value_type_fails_instead_of_guessing() {
        let mut writer = ParcelWriter::new();
        writer.write_set_text(TEXT_ID, "7:00");
        writer.write_i32(REFLECTION_ACTION_TAG);
        writer.write_i32(TEXT_ID);
        writer.write_string16(Some("setImageBitmap"));
        writer.write_i32(12);
        writer.write_i32(0);
        let bytes = writer.into_bytes();

        let mut stream = decode(&bytes);
        assert_eq!(stream.next().unwrap().unwrap().text(), Some("7:00"));
        assert!(matches!(
            stream.next(),
            Some(Err(DecodeError::UnknownValueType { code: 12, .. }))
        ));
        assert!(stream.next().is_none());
    }

    #[test]
    fn unknown_span_kind_fails() {
        let mut writer = ParcelWriter::new();
        writer.write_record_header(REFLECTION_ACTION_TAG, TEXT_ID, SET_TEXT_METHOD, ValueKind::CharSequence);
        writer.write_i32(STYLED_TEXT_KIND);
        writer.write_string16(Some("7:00"));
        writer.write_i32(11);
        let bytes = writer.into_bytes();

        assert!(matches!(
            set_text_payloads(&bytes),
            Err(DecodeError::UnknownSpanKind { kind: 11, .. })
        ));
    }

    #[test]
    fn unknown_text_kind_fails() {
        let mut writer = ParcelWriter::new();
        writer.write_record_header(REFLECTION_ACTION_TAG, TEXT_ID, SET_TEXT_METHOD, ValueKind::CharSequence);
        writer.write_i32(4);
        let bytes = writer.into_bytes();

        assert!(matches!(
            set_text_payloads(&bytes),
            Err(DecodeError::UnknownTextKind { kind: 4, .. })
        ));
    }

    #[test]
    fn truncated_payload_is_a_hard_failure() {
        let mut writer = ParcelWriter::new();
        writer.write_set_text(TEXT_ID, "Fri 9:15");
        let mut bytes = writer.into_bytes();
        bytes.truncate(bytes.len() - 6);

        let results: Vec<_> = decode(&bytes).collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(DecodeError::Truncated { .. })));
    }

    #[test]
    fn truncation_after_good_record_keeps_earlier_record_only() {
        let mut writer = ParcelWriter::new();
        writer.write_set_text(TEXT_ID, "6:00");
        writer.write_record_header(REFLECTION_ACTION_TAG, TEXT_ID, SET_TEXT_METHOD, ValueKind::CharSequence);
        let bytes = writer.into_bytes();

        let results: Vec<_> = decode(&bytes).collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().text(), Some("6:00"));
        assert!(results[1].is_err());
        assert!(set_text_payloads(&bytes).is_err());
    }

    #[test]
    fn trailing_partial_word_is_truncation() {
        let mut writer = ParcelWriter::new();
        writer.write_set_text(TEXT_ID, "6:00");
        let mut bytes = writer.into_bytes();
        bytes.extend_from_slice(&[2, 0]);

        assert!(matches!(
            set_text_payloads(&bytes),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn restart_decodes_from_the_beginning() {
        let mut writer = ParcelWriter::new();
        writer.write_set_text(TEXT_ID, "1:00");
        writer.write_set_text(TEXT_ID, "2:00");
        let bytes = writer.into_bytes();

        let mut stream = decode(&bytes);
        assert_eq!(stream.next().unwrap().unwrap().text(), Some("1:00"));
        stream.restart();
        let texts: Vec<String> = stream
            .map(|r| r.unwrap().text().unwrap().to_string())
            .collect();
        assert_eq!(texts, vec!["1:00".to_string(), "2:00".to_string()]);
    }
}
