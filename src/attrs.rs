//! Typed attribute collection on top of quick-xml start tags.
//!
//! Ein [`Attrs`] borgt die Attribute eines Start-Tags und liefert sie
//! typisiert aus: als String, als Pool-Offset (interniert als
//! Seiteneffekt), als Boolean, Int64 oder eine der kleinen Attribut-Enums.
//! Pflicht-Attribute melden ihr Fehlen als positionierter Fehler,
//! optionale fallen auf den Default zurueck. Unbekannte Attribute werden
//! ignoriert.

use std::borrow::Cow;

use quick_xml::events::BytesStart;

use crate::blob::{Direction, Scope, SignalWhen, Stability, StringOffset, TransferOwnership};
use crate::error::{Error, Result, TextPos};
use crate::string_pool::StringPool;

pub struct Attrs<'xml> {
    input: &'xml [u8],
    element: &'xml str,
    offset: usize,
    entries: Vec<(&'xml str, Cow<'xml, str>)>,
}

impl<'xml> Attrs<'xml> {
    /// Sammelt die Attribute eines Start-Tags ein. `offset` ist die
    /// Byte-Position des Tags in `input`, nur fuer Diagnosen.
    pub fn from_start(
        input: &'xml [u8],
        start: &'xml BytesStart<'xml>,
        offset: usize,
    ) -> Result<Self> {
        let element = str::from_utf8(start.name().into_inner())
            .map_err(|_| Error::invalid_xml("element name is not UTF-8", text_pos(input, offset)))?;
        let mut entries = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| {
                Error::invalid_xml(format!("bad attribute: {e}"), text_pos(input, offset))
            })?;
            let key = str::from_utf8(attr.key.into_inner()).map_err(|_| {
                Error::invalid_xml("attribute name is not UTF-8", text_pos(input, offset))
            })?;
            let value = attr.unescape_value().map_err(|e| {
                Error::invalid_xml(
                    format!("attribute \"{key}\": {e}"),
                    text_pos(input, offset),
                )
            })?;
            entries.push((key, value));
        }
        Ok(Self {
            input,
            element,
            offset,
            entries,
        })
    }

    /// Leerer Attributsatz, fuer synthetische Elemente.
    pub fn empty(element: &'xml str) -> Self {
        Self {
            input: b"",
            element,
            offset: 0,
            entries: Vec::new(),
        }
    }

    pub fn element(&self) -> &str {
        self.element
    }

    /// Zeile/Spalte des Start-Tags. Nur auf Fehlerpfaden rufen, die
    /// Berechnung scannt den Eingabepuffer.
    pub fn text_pos(&self) -> TextPos {
        text_pos(self.input, self.offset)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_ref())
    }

    /// Pflicht-Attribut als String.
    pub fn required(&self, name: &'static str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| Error::missing_attribute(self.element.to_owned(), name, self.text_pos()))
    }

    /// Optionales Attribut, interniert in `pool`. Fehlend oder leer -> 0.
    pub fn intern(&self, pool: &mut StringPool, name: &str) -> StringOffset {
        match self.get(name) {
            Some(value) => pool.add(value),
            None => 0,
        }
    }

    /// Pflicht-Attribut, interniert in `pool`.
    pub fn intern_required(&self, pool: &mut StringPool, name: &'static str) -> Result<StringOffset> {
        let value = self.required(name)?;
        Ok(pool.add(value))
    }

    /// Optionaler Boolean. Ein vorhandener, aber unlesbarer Wert ist nie
    /// fatal: er wird geloggt und fuer `deprecated` zu `true` gezwungen
    /// (bekannte fehlerhafte .gir-Dateien schreiben dort Versionsnummern),
    /// sonst faellt er auf den Default zurueck.
    pub fn boolean(&self, name: &str, default: bool) -> bool {
        let Some(value) = self.get(name) else {
            return default;
        };
        match parse_bool(value) {
            Some(b) => b,
            None => {
                log::warn!(
                    "<{}>: unreadable boolean {}=\"{}\"",
                    self.element,
                    name,
                    value
                );
                if name == "deprecated" { true } else { default }
            }
        }
    }

    /// Optionaler Int64.
    pub fn int64(&self, name: &'static str, default: i64) -> Result<i64> {
        match self.get(name) {
            None => Ok(default),
            Some(value) => value
                .parse()
                .map_err(|_| self.bad_value(name, value)),
        }
    }

    pub fn stability(&self, name: &'static str, default: Stability) -> Result<Stability> {
        self.closed_enum(name, default, Stability::parse)
    }

    pub fn scope(&self, name: &'static str, default: Scope) -> Result<Scope> {
        self.closed_enum(name, default, Scope::parse)
    }

    pub fn direction(&self, name: &'static str, default: Direction) -> Result<Direction> {
        self.closed_enum(name, default, Direction::parse)
    }

    pub fn transfer(
        &self,
        name: &'static str,
        default: TransferOwnership,
    ) -> Result<TransferOwnership> {
        self.closed_enum(name, default, TransferOwnership::parse)
    }

    pub fn signal_when(&self, name: &'static str, default: SignalWhen) -> Result<SignalWhen> {
        self.closed_enum(name, default, SignalWhen::parse)
    }

    fn closed_enum<T>(
        &self,
        name: &'static str,
        default: T,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T> {
        match self.get(name) {
            None => Ok(default),
            Some(value) => parse(value).ok_or_else(|| self.bad_value(name, value)),
        }
    }

    fn bad_value(&self, name: &'static str, value: &str) -> Error {
        Error::invalid_enum_value(name, value.to_owned(), self.text_pos())
    }

    /// Positionierter Strukturfehler an diesem Element.
    pub fn structural(&self, message: impl Into<String>) -> Error {
        Error::structural(message.into(), self.text_pos())
    }
}

fn text_pos(input: &[u8], offset: usize) -> TextPos {
    TextPos::from_offset(input, offset)
}

/// GMarkup-Boolean: true/t/yes/y/1 bzw. false/f/no/n/0, case-insensitiv.
fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true")
        || s.eq_ignore_ascii_case("t")
        || s.eq_ignore_ascii_case("yes")
        || s.eq_ignore_ascii_case("y")
        || s == "1"
    {
        Some(true)
    } else if s.eq_ignore_ascii_case("false")
        || s.eq_ignore_ascii_case("f")
        || s.eq_ignore_ascii_case("no")
        || s.eq_ignore_ascii_case("n")
        || s == "0"
    {
        Some(false)
    } else {
        None
    }
}
