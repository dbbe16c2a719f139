//! Central error types for the .gir parsing pipeline.
//!
//! Fatal errors carry the 1-based line/column of the offending construct so
//! a failing file can be reported precisely and skipped by the caller.
//! Recoverable conditions (unknown child elements, a second `finish()` on a
//! builder) are *not* errors here; they are logged and absorbed.

use core::fmt;
use std::borrow::Cow;

/// 1-basierte Zeilen/Spalten-Position im XML-Dokument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextPos {
    pub line: u32,
    pub column: u32,
}

impl TextPos {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Berechnet Zeile/Spalte aus einem Byte-Offset in `input`.
    ///
    /// Laeuft linear ueber den Prefix; wird nur auf Fehler- und
    /// Diagnosepfaden aufgerufen, nie pro Event.
    pub fn from_offset(input: &[u8], offset: usize) -> Self {
        let upto = &input[..offset.min(input.len())];
        let line = memchr::memchr_iter(b'\n', upto).count() as u32 + 1;
        let line_start = memchr::memrchr(b'\n', upto).map_or(0, |p| p + 1);
        let column = (upto.len() - line_start) as u32 + 1;
        Self { line, column }
    }
}

impl fmt::Display for TextPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// All fatal error conditions of the parsing pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A mandatory attribute is missing from an element.
    MissingAttribute {
        /// Element-Name wie im Dokument (z.B. "glib:signal").
        element: Cow<'static, str>,
        attribute: Cow<'static, str>,
        pos: TextPos,
    },
    /// An attribute value is not a member of its closed value set
    /// (stability, scope, direction, transfer-ownership, signal timing).
    InvalidEnumValue {
        attribute: Cow<'static, str>,
        /// Der abgelehnte Wert, wie er im Dokument stand.
        value: String,
        pos: TextPos,
    },
    /// A sub-element appeared where gir-1.2 forbids any
    /// (`<implements>`, `<prerequisite>`, `<varargs>`).
    StructuralViolation {
        message: Cow<'static, str>,
        pos: TextPos,
    },
    /// The underlying XML is not well-formed.
    InvalidXml { message: String, pos: TextPos },
    /// Reading the source file failed.
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAttribute { element, attribute, pos } => {
                write!(f, "{pos}: missing mandatory attribute '{attribute}' on <{element}>")
            }
            Self::InvalidEnumValue { attribute, value, pos } => {
                write!(f, "{pos}: invalid value '{value}' for attribute '{attribute}'")
            }
            Self::StructuralViolation { message, pos } => {
                write!(f, "{pos}: {message}")
            }
            Self::InvalidXml { message, pos } => {
                write!(f, "{pos}: XML parse error: {message}")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl Error {
    /// Erstellt einen `MissingAttribute` Fehler.
    pub fn missing_attribute(
        element: impl Into<Cow<'static, str>>,
        attribute: impl Into<Cow<'static, str>>,
        pos: TextPos,
    ) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
            pos,
        }
    }

    /// Erstellt einen `InvalidEnumValue` Fehler.
    pub fn invalid_enum_value(
        attribute: impl Into<Cow<'static, str>>,
        value: impl Into<String>,
        pos: TextPos,
    ) -> Self {
        Self::InvalidEnumValue {
            attribute: attribute.into(),
            value: value.into(),
            pos,
        }
    }

    /// Erstellt einen `StructuralViolation` Fehler.
    pub fn structural(message: impl Into<Cow<'static, str>>, pos: TextPos) -> Self {
        Self::StructuralViolation {
            message: message.into(),
            pos,
        }
    }

    /// Erstellt einen `InvalidXml` Fehler.
    pub fn invalid_xml(message: impl Into<String>, pos: TextPos) -> Self {
        Self::InvalidXml {
            message: message.into(),
            pos,
        }
    }
}

/// A convenience `Result` type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    /// Every variant must produce a Display string naming the offending
    /// construct; positioned variants must lead with "line:column".

    #[test]
    fn missing_attribute_display() {
        let e = Error::missing_attribute("glib:signal", "name", TextPos::new(12, 3));
        let msg = e.to_string();
        assert!(msg.starts_with("12:3"), "{msg}");
        assert!(msg.contains("'name'"), "{msg}");
        assert!(msg.contains("<glib:signal>"), "{msg}");
    }

    #[test]
    fn invalid_enum_value_display() {
        let e = Error::invalid_enum_value("direction", "sideways", TextPos::new(4, 9));
        let msg = e.to_string();
        assert!(msg.starts_with("4:9"), "{msg}");
        assert!(msg.contains("sideways"), "{msg}");
        assert!(msg.contains("direction"), "{msg}");
    }

    #[test]
    fn structural_violation_display() {
        let e = Error::structural("sub-element inside <implements>", TextPos::new(7, 1));
        let msg = e.to_string();
        assert!(msg.starts_with("7:1"), "{msg}");
        assert!(msg.contains("implements"), "{msg}");
    }

    #[test]
    fn invalid_xml_display() {
        let e = Error::invalid_xml("mismatched tag", TextPos::new(2, 2));
        let msg = e.to_string();
        assert!(msg.contains("XML parse error"), "{msg}");
        assert!(msg.contains("mismatched tag"), "{msg}");
    }

    #[test]
    fn io_error_from_std() {
        let e = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(e.to_string().contains("gone"));
    }

    #[test]
    fn text_pos_from_offset_first_line() {
        let pos = TextPos::from_offset(b"<repository/>", 5);
        assert_eq!(pos, TextPos::new(1, 6));
    }

    #[test]
    fn text_pos_from_offset_later_line() {
        let input = b"<a>\n  <b>\n    <c/>\n</a>";
        // Offset 14 zeigt auf '<' von <c/> (Zeile 3, Spalte 5).
        let pos = TextPos::from_offset(input, 14);
        assert_eq!(pos, TextPos::new(3, 5));
    }

    #[test]
    fn text_pos_from_offset_clamps_past_end() {
        let pos = TextPos::from_offset(b"ab", 100);
        assert_eq!(pos, TextPos::new(1, 3));
    }
}
