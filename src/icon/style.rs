use std::fmt;

/// Visual style of the clock face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockStyle {
    /// Ring outline with solid hands.
    #[default]
    Aosp,
    /// Filled disc with the hands cut out.
    TouchWiz,
}

impl ClockStyle {
    /// Maps the stored preference value ("0" or "1"). Unknown values fall
    /// back to the default style.
    pub fn from_pref(value: &str) -> Self {
        match value.trim() {
            "1" => ClockStyle::TouchWiz,
            _ => ClockStyle::Aosp,
        }
    }

    pub fn as_pref(self) -> &'static str {
        match self {
            ClockStyle::Aosp => "0",
            ClockStyle::TouchWiz => "1",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Drops the alpha channel of a packed `0xAARRGGBB` color.
    pub fn from_argb(argb: i32) -> Self {
        let [_, r, g, b] = (argb as u32).to_be_bytes();
        Self { r, g, b }
    }

    /// Packs as an opaque `0xFFRRGGBB` color.
    pub fn to_argb(self) -> i32 {
        u32::from_be_bytes([0xff, self.r, self.g, self.b]) as i32
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_pref_mapping() {
        assert_eq!(ClockStyle::from_pref("0"), ClockStyle::Aosp);
        assert_eq!(ClockStyle::from_pref("1"), ClockStyle::TouchWiz);
        assert_eq!(ClockStyle::from_pref("banana"), ClockStyle::Aosp);
        assert_eq!(ClockStyle::TouchWiz.as_pref(), "1");
    }

    #[test]
    fn argb_round_trip_drops_alpha() {
        assert_eq!(Rgb::from_argb(-1), Rgb::WHITE);
        assert_eq!(Rgb::from_argb(0x80_33_66_99u32 as i32), Rgb::new(0x33, 0x66, 0x99));
        assert_eq!(Rgb::new(0x33, 0x66, 0x99).to_argb(), 0xff_33_66_99u32 as i32);
    }

    #[test]
    fn displays_as_hex() {
        assert_eq!(Rgb::new(0x0a, 0xbc, 0xff).to_string(), "#0abcff");
    }
}
