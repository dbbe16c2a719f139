//! Append-only NUL-terminated string pool.
//!
//! Jeder Pool beginnt mit einem einzelnen NUL-Byte, so dass Offset 0 immer
//! den leeren String bezeichnet. Es wird nie dedupliziert: zweimal dasselbe
//! Wort einfuegen liefert zwei Offsets. Offsets sind fuer die Lebensdauer
//! des Pools stabil.

use memchr::memchr;

use crate::blob::StringOffset;

#[derive(Debug, Clone)]
pub struct StringPool {
    buf: Vec<u8>,
    count: u32,
}

impl StringPool {
    pub fn new() -> Self {
        Self {
            buf: vec![0],
            count: 0,
        }
    }

    /// Haengt `s` samt NUL-Terminator an und liefert seinen Offset.
    /// Der leere String wird nicht abgelegt, er ist immer Offset 0.
    pub fn add(&mut self, s: &str) -> StringOffset {
        if s.is_empty() {
            return 0;
        }
        let offset = self.buf.len() as StringOffset;
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
        self.count += 1;
        offset
    }

    /// Liest den String am `offset`. `None` bei Offsets ausserhalb des
    /// Pools oder ohne Terminator.
    pub fn get(&self, offset: StringOffset) -> Option<&str> {
        let start = offset as usize;
        if start >= self.buf.len() {
            return None;
        }
        let len = memchr(0, &self.buf[start..])?;
        str::from_utf8(&self.buf[start..start + len]).ok()
    }

    /// Anzahl eingefuegter Strings (ohne den Seed).
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Pool-Groesse in Bytes, inklusive Seed und Terminatoren.
    pub fn byte_len(&self) -> usize {
        self.buf.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}
