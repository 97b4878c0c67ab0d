use std::fmt;

/// Formats whole seconds as `HH:MM:SS`.
///
/// Every field is zero-padded to two digits. Hours are not wrapped, the field just grows
/// (`100:00:00` after a hundred hours).
pub fn format_elapsed(seconds: u64) -> String {
    Hms(seconds).to_string()
}

/// [Display](fmt::Display) adapter for [format_elapsed].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Hms(pub u64);

impl Hms {
    /// The `(hours, minutes, seconds)` parts.
    pub fn parts(self) -> (u64, u64, u64) {
        let Hms(total) = self;
        (total / 3600, (total % 3600) / 60, total % 60)
    }
}

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hours, minutes, seconds) = self.parts();
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
    }
}
