//! Streaming-Parser für eine .gir-Datei.
//!
//! Ein [`Parser`] fährt genau einen synchronen Scan über die Bytes
//! einer Datei und ruft die Builder-Callbacks inline auf. Der Pool mit
//! seinen Freilisten überlebt zwischen Dateien, ein Resultat entsteht
//! pro Aufruf.
//!
//! Der Frame-Stack spiegelt die offenen Elemente: Elemente mit eigenem
//! Builder, inline konsumierte Elemente und unbehandelte Unterbäume.
//! Unbehandelte Elemente sind nie fatal, sie werden protokolliert und
//! samt Unterbau übersprungen.

use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};

use crate::attrs::Attrs;
use crate::builder::{BuilderKind, Ctx, Dispatch, Finished};
use crate::element::ElementKind;
use crate::error::{Error, Result, TextPos};
use crate::pool::Pool;
use crate::result::ParserResult;

/// Ein offenes Element während des Scans.
#[derive(Debug, Clone, Copy)]
enum Frame {
    /// Hat einen eigenen Builder auf dem Pool-Stack.
    Builder(ElementKind),
    /// Vom umschließenden Builder inline konsumiert.
    Inline(ElementKind),
    /// Unbekannt oder hier nicht akzeptiert; der Unterbaum wird
    /// übersprungen.
    Unhandled,
}

pub struct Parser {
    pool: Pool,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            pool: Pool::new(true),
        }
    }

    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<ParserResult> {
        let path = path.as_ref();
        let input =
            std::fs::read(path).map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;
        self.parse_bytes(&input, path)
    }

    /// Parst ein vollständiges Dokument aus `input`. `file` dient nur
    /// der Diagnose und den Statistiken.
    pub fn parse_bytes(&mut self, input: &[u8], file: impl Into<PathBuf>) -> Result<ParserResult> {
        // Nach einem Fehlabbruch können Builder auf dem Stack
        // zurückbleiben; die dürfen den nächsten Lauf nicht sehen.
        while let Some(builder) = self.pool.release_object() {
            self.pool.recycle(builder);
        }

        let mut result = ParserResult::new(file);
        let mut reader = Reader::from_reader(input);
        let mut frames: Vec<Frame> = Vec::new();

        loop {
            let offset = reader.buffer_position() as usize;
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    self.start_element(&mut result, input, &mut frames, &e, offset, false)?;
                }
                Ok(Event::Empty(e)) => {
                    self.start_element(&mut result, input, &mut frames, &e, offset, true)?;
                }
                Ok(Event::End(_)) => {
                    self.end_element(&mut result, input, &mut frames, offset)?;
                }
                Ok(Event::Text(e)) => {
                    if !matches!(frames.last(), Some(Frame::Unhandled)) {
                        let raw = str::from_utf8(&e).map_err(|_| {
                            Error::invalid_xml(
                                "character data is not UTF-8",
                                TextPos::from_offset(input, offset),
                            )
                        })?;
                        let text = quick_xml::escape::unescape(raw).map_err(|err| {
                            Error::invalid_xml(
                                format!("bad character data: {err}"),
                                TextPos::from_offset(input, offset),
                            )
                        })?;
                        if let Some(builder) = self.pool.current_mut() {
                            builder.text(&text);
                        }
                    }
                }
                Ok(Event::CData(e)) => {
                    if !matches!(frames.last(), Some(Frame::Unhandled)) {
                        let raw = str::from_utf8(&e).map_err(|_| {
                            Error::invalid_xml(
                                "character data is not UTF-8",
                                TextPos::from_offset(input, offset),
                            )
                        })?;
                        if let Some(builder) = self.pool.current_mut() {
                            builder.text(raw);
                        }
                    }
                }
                Ok(Event::GeneralRef(e)) => {
                    if !matches!(frames.last(), Some(Frame::Unhandled)) {
                        let name = str::from_utf8(e.as_ref()).map_err(|_| {
                            Error::invalid_xml(
                                "entity reference is not UTF-8",
                                TextPos::from_offset(input, offset),
                            )
                        })?;
                        match resolve_reference(name) {
                            Some(text) => {
                                if let Some(builder) = self.pool.current_mut() {
                                    builder.text(&text);
                                }
                            }
                            None => log::warn!("unknown entity reference &{name};"),
                        }
                    }
                }
                Ok(Event::Decl(_))
                | Ok(Event::Comment(_))
                | Ok(Event::PI(_))
                | Ok(Event::DocType(_)) => {}
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::invalid_xml(
                        e.to_string(),
                        TextPos::from_offset(input, reader.buffer_position() as usize),
                    ));
                }
            }
        }

        if !frames.is_empty() {
            return Err(Error::invalid_xml(
                "unexpected end of document",
                TextPos::from_offset(input, input.len()),
            ));
        }
        if result.header().is_none() {
            return Err(Error::invalid_xml(
                "document has no <repository> root",
                TextPos::from_offset(input, input.len()),
            ));
        }
        Ok(result)
    }

    fn start_element(
        &mut self,
        result: &mut ParserResult,
        input: &[u8],
        frames: &mut Vec<Frame>,
        e: &BytesStart<'_>,
        offset: usize,
        empty: bool,
    ) -> Result<()> {
        if frames.is_empty() {
            let attrs = Attrs::from_start(input, e, offset)?;
            if ElementKind::from_name(attrs.element()) != Some(ElementKind::Repository) {
                return Err(attrs.structural("root element must be <repository>"));
            }
            let builder = self.pool.get_object(BuilderKind::Header);
            builder.parse(result, ElementKind::Repository, &attrs)?;
            if empty {
                self.close_builder(result, input, ElementKind::Repository, offset)?;
            } else {
                frames.push(Frame::Builder(ElementKind::Repository));
            }
            return Ok(());
        }

        if matches!(frames.last(), Some(Frame::Unhandled)) {
            if !empty {
                frames.push(Frame::Unhandled);
            }
            return Ok(());
        }

        let attrs = Attrs::from_start(input, e, offset)?;
        let Some(kind) = ElementKind::from_name(attrs.element()) else {
            result.record_unhandled(attrs.element());
            log::debug!("unknown element <{}>, subtree skipped", attrs.element());
            if !empty {
                frames.push(Frame::Unhandled);
            }
            return Ok(());
        };

        let dispatch = match self.pool.current_mut() {
            Some(builder) => builder.start_child(result, kind, &attrs)?,
            None => Dispatch::Unhandled,
        };
        match dispatch {
            Dispatch::Inline => {
                if empty {
                    if let Some(builder) = self.pool.current_mut() {
                        builder.end_inline(result, kind, Ctx::new(input, offset))?;
                    }
                } else {
                    frames.push(Frame::Inline(kind));
                }
            }
            Dispatch::Delegate(builder_kind) => {
                let builder = self.pool.get_object(builder_kind);
                builder.parse(result, kind, &attrs)?;
                if empty {
                    self.close_builder(result, input, kind, offset)?;
                } else {
                    frames.push(Frame::Builder(kind));
                }
            }
            Dispatch::Unhandled => {
                result.record_unhandled(attrs.element());
                log::debug!("element <{}> not accepted here, subtree skipped", attrs.element());
                if !empty {
                    frames.push(Frame::Unhandled);
                }
            }
        }
        Ok(())
    }

    fn end_element(
        &mut self,
        result: &mut ParserResult,
        input: &[u8],
        frames: &mut Vec<Frame>,
        offset: usize,
    ) -> Result<()> {
        match frames.pop() {
            None => Err(Error::invalid_xml(
                "end tag without open element",
                TextPos::from_offset(input, offset),
            )),
            Some(Frame::Unhandled) => Ok(()),
            Some(Frame::Inline(kind)) => {
                if let Some(builder) = self.pool.current_mut() {
                    builder.end_inline(result, kind, Ctx::new(input, offset))?;
                }
                Ok(())
            }
            Some(Frame::Builder(kind)) => self.close_builder(result, input, kind, offset),
        }
    }

    /// Schließt den innersten Builder ab: Blob herstellen, beim Eltern-
    /// Builder verbuchen lassen und bei Erfolg die Indizes des Kindes
    /// schreiben. Die Wurzel liefert den Header des Resultats.
    fn close_builder(
        &mut self,
        result: &mut ParserResult,
        input: &[u8],
        kind: ElementKind,
        offset: usize,
    ) -> Result<()> {
        let Some(mut builder) = self.pool.release_object() else {
            return Ok(());
        };
        let mut outcome = Ok(());
        if let Some(finished) = builder.finish(result) {
            if self.pool.is_empty() {
                if let Finished::Header(header) = finished {
                    result.set_header(header);
                    builder.index(result, 0);
                }
            } else if let Some(parent) = self.pool.current_mut() {
                outcome = match parent.child_finished(result, kind, finished, Ctx::new(input, offset))
                {
                    Ok(Some(position)) => {
                        builder.index(result, position);
                        Ok(())
                    }
                    Ok(None) => Ok(()),
                    Err(e) => Err(e),
                };
            }
        }
        self.pool.recycle(builder);
        outcome
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Löst eine allgemeine Referenz auf: Zeichenreferenzen und die fünf
/// vordefinierten Entities. .gir-Dateien deklarieren keine eigenen.
fn resolve_reference(name: &str) -> Option<String> {
    if let Some(digits) = name.strip_prefix('#') {
        let code = if let Some(hex) = digits.strip_prefix('x') {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            digits.parse::<u32>().ok()?
        };
        char::from_u32(code).map(String::from)
    } else {
        resolve_predefined_entity(name).map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::BlobKind;

    fn parse(input: &str) -> Result<ParserResult> {
        Parser::new().parse_bytes(input.as_bytes(), "t.gir")
    }

    #[test]
    fn minimal_repository_yields_a_header() {
        let result = parse(
            r#"<?xml version="1.0"?>
<repository version="1.2">
  <namespace name="Foo" version="1.0" shared-library="libfoo.so.0"/>
</repository>"#,
        )
        .unwrap();

        assert_eq!(result.namespace(), "Foo");
        let header = result.header().unwrap();
        assert_eq!(header.repository_major, 1);
        assert_eq!(header.repository_minor, 2);
        assert_eq!(header.nsversion_major, 1);
        assert_eq!(result.header_string(header.shared_library), Some("libfoo.so.0"));
        // Namespace-Eintrag im globalen Index.
        assert_eq!(result.global_index()[0].name, "Foo");
    }

    #[test]
    fn root_must_be_repository() {
        let err = parse("<namespace name=\"Foo\"/>").unwrap_err();
        assert!(err.to_string().contains("repository"), "{err}");

        let err = parse("<something-else/>").unwrap_err();
        assert!(err.to_string().contains("repository"), "{err}");
    }

    #[test]
    fn empty_repository_tag_still_finishes() {
        let result = parse("<repository version=\"1.2\"/>").unwrap();
        assert_eq!(result.header().unwrap().repository_major, 1);
        assert_eq!(result.namespace(), "");
    }

    #[test]
    fn unknown_children_are_skipped_not_fatal() {
        let result = parse(
            r#"<repository version="1.2">
  <namespace name="Foo" version="1.0">
    <class name="Widget">
      <fancy-new-thing><nested attr="1"><deeper/></nested></fancy-new-thing>
      <method name="show"/>
    </class>
  </namespace>
</repository>"#,
        )
        .unwrap();

        assert_eq!(result.unhandled_elements(), ["fancy-new-thing"]);
        let class = &result.objects()[0];
        assert_eq!(class.functions.count, 1);
        let method = &result.functions()[class.functions.base as usize];
        assert_eq!(result.string(method.common.name), Some("show"));
        assert_eq!(method.common.kind, BlobKind::Method);
    }

    #[test]
    fn doc_text_collects_entities_and_references() {
        let result = parse(
            r#"<repository version="1.2">
  <namespace name="Foo" version="1.0">
    <constant name="C" value="1">
      <doc xml:space="preserve">a &amp; b &#38; c</doc>
    </constant>
  </namespace>
</repository>"#,
        )
        .unwrap();

        let constant = &result.constants()[0];
        let doc = &result.docs()[constant.common.doc as usize];
        assert_eq!(result.doc_string(doc.body), Some("a & b & c"));
    }

    #[test]
    fn truncated_document_is_invalid() {
        let err = parse("<repository version=\"1.2\"><namespace name=\"Foo\">").unwrap_err();
        assert!(matches!(err, Error::InvalidXml { .. }), "{err:?}");
    }

    #[test]
    fn structural_violation_carries_position() {
        let err = parse(
            r#"<repository version="1.2">
  <namespace name="Foo" version="1.0">
    <class name="A">
      <implements name="Gtk.Buildable"><type name="x"/></implements>
    </class>
  </namespace>
</repository>"#,
        )
        .unwrap_err();

        let Error::StructuralViolation { pos, .. } = err else {
            panic!("expected structural violation, got {err:?}");
        };
        assert_eq!(pos.line, 4);
    }

    /// Ein fehlgeschlagener Lauf hinterlässt keinen Zustand für den
    /// nächsten: derselbe Parser parst danach sauber.
    #[test]
    fn parser_recovers_after_a_failed_file() {
        let mut parser = Parser::new();
        parser
            .parse_bytes(b"<repository><namespace name=\"Foo\">", "bad.gir")
            .unwrap_err();

        let result = parser
            .parse_bytes(
                b"<repository version=\"1.0\"><namespace name=\"Bar\" version=\"2.0\"/></repository>",
                "good.gir",
            )
            .unwrap();
        assert_eq!(result.namespace(), "Bar");
        assert!(result.objects().is_empty());
    }
}
