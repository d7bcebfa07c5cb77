use super::reader::ParcelReader;
use super::{DecodeError, PLAIN_TEXT_KIND, REFLECTION_ACTION_TAG, SET_TEXT_METHOD, STYLED_TEXT_KIND};

/// Declared type of a reflection record's value.
///
/// The set is closed: a code outside it means the stream layout is unknown
/// and the decoder cannot tell how many bytes to skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
    CharSequence,
}

impl ValueKind {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(ValueKind::Boolean),
            2 => Some(ValueKind::Byte),
            3 => Some(ValueKind::Short),
            4 => Some(ValueKind::Int),
            5 => Some(ValueKind::Long),
            6 => Some(ValueKind::Float),
            7 => Some(ValueKind::Double),
            8 => Some(ValueKind::Char),
            9 => Some(ValueKind::String),
            10 => Some(ValueKind::CharSequence),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            ValueKind::Boolean => 1,
            ValueKind::Byte => 2,
            ValueKind::Short => 3,
            ValueKind::Int => 4,
            ValueKind::Long => 5,
            ValueKind::Float => 6,
            ValueKind::Double => 7,
            ValueKind::Char => 8,
            ValueKind::String => 9,
            ValueKind::CharSequence => 10,
        }
    }
}

/// Payload of a decoded record. Only text is kept; everything else has been
/// read past and dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionValue {
    Text(Option<String>),
    Skipped,
}

/// One UI-mutation instruction recovered from an action stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRecord {
    pub tag: i32,
    pub view_id: i32,
    pub method_name: Option<String>,
    pub value_kind: ValueKind,
    pub value: ActionValue,
}

impl ActionRecord {
    pub fn is_set_text(&self) -> bool {
        self.tag == REFLECTION_ACTION_TAG && self.method_name.as_deref() == Some(SET_TEXT_METHOD)
    }

    pub fn text(&self) -> Option<&str> {
        match &self.value {
            ActionValue::Text(text) => text.as_deref(),
            ActionValue::Skipped => None,
        }
    }
}

/// Reads one whole record, header and value, leaving the cursor on the next.
pub(crate) fn read_record(reader: &mut ParcelReader<'_>) -> Result<ActionRecord, DecodeError> {
    let tag = reader.read_i32()?;
    let view_id = reader.read_i32()?;
    let method_name = reader.read_string16()?;

    let kind_offset = reader.position();
    let code = reader.read_i32()?;
    let value_kind = ValueKind::from_code(code).ok_or(DecodeError::UnknownValueType {
        offset: kind_offset,
        code,
    })?;

    let value = read_value(reader, value_kind)?;

    Ok(ActionRecord {
        tag,
        view_id,
        method_name,
        value_kind,
        value,
    })
}

fn read_value(reader: &mut ParcelReader<'_>, kind: ValueKind) -> Result<ActionValue, DecodeError> {
    match kind {
        // Sub-word primitives are widened to a full int on the wire.
        ValueKind::Boolean | ValueKind::Byte | ValueKind::Short | ValueKind::Int | ValueKind::Char => {
            reader.read_i32()?;
        }
        ValueKind::Long => {
            reader.read_i64()?;
        }
        ValueKind::Float => {
            reader.read_f32()?;
        }
        ValueKind::Double => {
            reader.read_f64()?;
        }
        ValueKind::String => return Ok(ActionValue::Text(reader.read_string16()?)),
        ValueKind::CharSequence => return read_char_sequence(reader).map(ActionValue::Text),
    }
    Ok(ActionValue::Skipped)
}

fn read_char_sequence(reader: &mut ParcelReader<'_>) -> Result<Option<String>, DecodeError> {
    let offset = reader.position();
    let kind = reader.read_i32()?;
    match kind {
        PLAIN_TEXT_KIND => reader.read_string16(),
        STYLED_TEXT_KIND => {
            let text = reader.read_string16()?;
            skip_spans(reader)?;
            Ok(text)
        }
        other => Err(DecodeError::UnknownTextKind {
            offset,
            kind: other,
        }),
    }
}

/// Walks the span list of styled text up to its zero terminator.
fn skip_spans(reader: &mut ParcelReader<'_>) -> Result<(), DecodeError> {
    loop {
        let offset = reader.position();
        let span_kind = reader.read_i32()?;
        match span_kind {
            0 => return Ok(()),
            // strikethrough, underline
            5 | 6 => {}
            // foreground color, style, background color
            2 | 7 | 12 => {
                reader.read_i32()?;
            }
            // relative size, scale x
            3 | 4 => {
                reader.read_f32()?;
            }
            // absolute size: size, dip flag
            16 => {
                reader.read_i32()?;
                reader.read_i32()?;
            }
            other => {
                return Err(DecodeError::UnknownSpanKind {
                    offset,
                    kind: other,
                })
            }
        }

        // start, end, flags
        reader.read_i32()?;
        reader.read_i32()?;
        reader.read_i32()?;
    }
}
