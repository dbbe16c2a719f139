//! `<doc>` Familie: Text sammeln und Doc-Blobs zusammensetzen.
//!
//! Der [`DocBuilder`] selbst sammelt nur die Zeichendaten eines einzelnen
//! doc-Elements. Das eigentliche [`DocBlob`] eines Elements entsteht im
//! Eltern-Builder über [`DocState`], der die bis zu vier Textteile und
//! die `<annotation>` Paare zusammenführt.

use crate::attrs::Attrs;
use crate::blob::{DocBlob, DocOffset, Run};
use crate::element::ElementKind;
use crate::error::Result;
use crate::result::ParserResult;

use super::{Dispatch, ElementBuilder, Finished};

/// Fertiger doc-Teil: welche Schreibweise (`doc`, `doc-deprecated`,
/// `doc-stability`, `doc-version`) und der gesammelte Text.
#[derive(Debug, Clone)]
pub struct DocPiece {
    pub part: ElementKind,
    pub text: String,
}

/// Sammelt die Zeichendaten genau eines doc-Elements.
#[derive(Default)]
pub struct DocBuilder {
    part: Option<ElementKind>,
    text: String,
}

impl ElementBuilder for DocBuilder {
    fn parse(
        &mut self,
        _result: &mut ParserResult,
        kind: ElementKind,
        _attrs: &Attrs<'_>,
    ) -> Result<()> {
        self.part = Some(kind);
        Ok(())
    }

    fn start_child(
        &mut self,
        _result: &mut ParserResult,
        _kind: ElementKind,
        _attrs: &Attrs<'_>,
    ) -> Result<Dispatch> {
        Ok(Dispatch::Unhandled)
    }

    fn text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn finish(&mut self, _result: &mut ParserResult) -> Finished {
        Finished::Doc(DocPiece {
            part: self.part.take().unwrap_or(ElementKind::Doc),
            text: std::mem::take(&mut self.text),
        })
    }

    fn reset(&mut self) {
        self.part = None;
        self.text.clear();
    }
}

/// Doku-Sammelzustand eines Eltern-Builders: die vier Textteile plus
/// gesammelte Annotationen. `finish` verbucht alles und liefert den
/// Doc-Offset für das `doc`-Feld des Blobs, -1 ohne Inhalt.
#[derive(Default)]
pub(crate) struct DocState {
    blob: DocBlob,
    has_doc: bool,
    annotations: Vec<(String, String)>,
}

impl DocState {
    pub(crate) fn absorb(&mut self, result: &mut ParserResult, piece: DocPiece) {
        let slot = match piece.part {
            ElementKind::Doc => &mut self.blob.body,
            ElementKind::DocDeprecated => &mut self.blob.deprecated,
            ElementKind::DocStability => &mut self.blob.stability,
            ElementKind::DocVersion => &mut self.blob.version,
            _ => return,
        };
        *slot = result.add_doc_string(&piece.text);
        self.has_doc = true;
    }

    /// Kurzform für `child_finished`-Arme der Eltern-Builder.
    pub(crate) fn absorb_finished(&mut self, result: &mut ParserResult, finished: Finished) {
        if let Finished::Doc(piece) = finished {
            self.absorb(result, piece);
        }
    }

    /// Ein `<annotation key="..." value="..."/>` Paar. Manche Dateien
    /// schreiben `name` statt `key`.
    pub(crate) fn annotate(&mut self, attrs: &Attrs<'_>) {
        let key = attrs.get("key").or_else(|| attrs.get("name")).unwrap_or("");
        let value = attrs.get("value").unwrap_or("");
        self.annotations.push((key.to_owned(), value.to_owned()));
    }

    /// Verbucht Annotationen als zusammenhängenden "key=value" Lauf im
    /// Annotation-Pool und das Blob in der Doc-Tabelle.
    pub(crate) fn finish(&mut self, result: &mut ParserResult) -> DocOffset {
        if !self.has_doc && self.annotations.is_empty() {
            return -1;
        }
        let mut run = Run::default();
        for (i, (key, value)) in self.annotations.drain(..).enumerate() {
            let offset = result.add_annotation_string(&format!("{key}={value}"));
            if i == 0 {
                run.base = offset;
            }
            run.count += 1;
        }
        self.blob.annotations = run.base;
        self.blob.n_annotations = run.count;
        result.add_doc(self.blob)
    }

    pub(crate) fn reset(&mut self) {
        self.blob = DocBlob::default();
        self.has_doc = false;
        self.annotations.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(part: ElementKind, text: &str) -> DocPiece {
        DocPiece {
            part,
            text: text.to_owned(),
        }
    }

    /// Zeichendaten kommen in Stücken an und werden aneinandergehängt.
    #[test]
    fn builder_accumulates_text() {
        let mut result = ParserResult::new("t.gir");
        let mut b = DocBuilder::default();
        b.parse(&mut result, ElementKind::DocDeprecated, &Attrs::empty("doc-deprecated"))
            .unwrap();
        b.text("Use ");
        b.text("the other one.");
        let Finished::Doc(piece) = b.finish(&mut result) else {
            panic!("expected doc piece");
        };
        assert_eq!(piece.part, ElementKind::DocDeprecated);
        assert_eq!(piece.text, "Use the other one.");
    }

    #[test]
    fn state_routes_parts_into_slots() {
        let mut result = ParserResult::new("t.gir");
        let mut state = DocState::default();
        state.absorb(&mut result, piece(ElementKind::Doc, "body"));
        state.absorb(&mut result, piece(ElementKind::DocVersion, "3.2"));
        let offset = state.finish(&mut result);
        assert_eq!(offset, 0);
        let blob = result.docs()[0];
        assert_eq!(result.doc_string(blob.body), Some("body"));
        assert_eq!(result.doc_string(blob.version), Some("3.2"));
        assert_eq!(blob.deprecated, 0);
        assert_eq!(blob.n_annotations, 0);
    }

    /// Ohne Text und Annotationen gibt es keinen Doc-Blob.
    #[test]
    fn empty_state_yields_minus_one() {
        let mut result = ParserResult::new("t.gir");
        let mut state = DocState::default();
        assert_eq!(state.finish(&mut result), -1);
        assert!(result.docs().is_empty());
    }

    /// Annotationen landen als zusammenhängende "key=value" Strings im
    /// Annotation-Pool.
    #[test]
    fn annotations_flush_contiguously() {
        let mut result = ParserResult::new("t.gir");
        let mut state = DocState::default();
        state
            .annotations
            .push(("org.gtk.Method.get_property".to_owned(), "icon-name".to_owned()));
        state
            .annotations
            .push(("org.gtk.Method.set_property".to_owned(), "icon-name".to_owned()));
        let offset = state.finish(&mut result);
        assert_eq!(offset, 0);
        let blob = result.docs()[0];
        assert_eq!(blob.n_annotations, 2);
        let first = result.annotation_string(blob.annotations).unwrap();
        assert_eq!(first, "org.gtk.Method.get_property=icon-name");
        let second_offset = blob.annotations + first.len() as u32 + 1;
        assert_eq!(
            result.annotation_string(second_offset),
            Some("org.gtk.Method.set_property=icon-name")
        );
    }
}
