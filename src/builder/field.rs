//! `<field>` eines Records, einer Union oder einer Klasse.
//!
//! Der Typ kommt entweder als `<type>`/`<array>` oder als eingebetteter
//! `<callback>`; beide landen im selben Typ-Slot, ein zweiter ist ein
//! Strukturfehler.

use crate::attrs::Attrs;
use crate::blob::{BlobKind, FieldBlob};
use crate::element::{ElementKind, mask};
use crate::error::Result;
use crate::result::ParserResult;

use super::{Ctx, Dispatch, DocState, ElementBuilder, Finished, collect_common, store_type_child};

#[derive(Default)]
pub struct FieldBuilder {
    blob: FieldBlob,
    doc: DocState,
}

impl ElementBuilder for FieldBuilder {
    fn parse(
        &mut self,
        result: &mut ParserResult,
        _kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<()> {
        self.blob.common = collect_common(result, attrs, BlobKind::Field)?;
        self.blob.readable = attrs.boolean("readable", false);
        self.blob.writable = attrs.boolean("writable", false);
        self.blob.private = attrs.boolean("private", false);
        self.blob.bits = attrs.int64("bits", 0)? as u8;
        Ok(())
    }

    fn start_child(
        &mut self,
        _result: &mut ParserResult,
        kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<Dispatch> {
        use ElementKind as K;
        Ok(match kind {
            K::Annotation | K::Attributes => {
                self.doc.annotate(attrs);
                Dispatch::Inline
            }
            k => Dispatch::masked(mask::FIELD, k),
        })
    }

    fn child_finished(
        &mut self,
        result: &mut ParserResult,
        _kind: ElementKind,
        finished: Finished,
        ctx: Ctx<'_>,
    ) -> Result<Option<u32>> {
        match finished {
            Finished::Type(_) | Finished::Array(_) => {
                store_type_child(result, &mut self.blob.typeref, finished, ctx)?;
            }
            Finished::Callback(blob) => {
                if !self.blob.typeref.is_none() {
                    return Err(ctx.structural("type_ref already set"));
                }
                self.blob.typeref = result.add_callback(blob);
            }
            Finished::Doc(piece) => self.doc.absorb(result, piece),
            _ => {}
        }
        Ok(None)
    }

    fn finish(&mut self, result: &mut ParserResult) -> Finished {
        self.blob.common.doc = self.doc.finish(result);
        Finished::Field(self.blob)
    }

    fn reset(&mut self) {
        self.blob = FieldBlob::default();
        self.doc.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::BasicType;
    use crate::builder::TypeBuilder;
    use quick_xml::events::BytesStart;

    #[test]
    fn field_with_bits() {
        let input = b"<field/>";
        let mut result = ParserResult::new("t.gir");
        let mut b = FieldBuilder::default();
        let e = BytesStart::from_content(
            r#"field name="in_destruction" readable="1" private="1" bits="1""#,
            5,
        );
        let attrs = Attrs::from_start(input, &e, 0).unwrap();
        b.parse(&mut result, ElementKind::Field, &attrs).unwrap();

        let mut child = TypeBuilder::default();
        let t = BytesStart::from_content(r#"type name="guint""#, 4);
        child
            .parse(&mut result, ElementKind::Type, &Attrs::from_start(input, &t, 0).unwrap())
            .unwrap();
        let finished = child.finish(&mut result);
        b.child_finished(&mut result, ElementKind::Type, finished, Ctx::new(input, 0))
            .unwrap();

        let Finished::Field(blob) = b.finish(&mut result) else {
            panic!("expected field blob");
        };
        assert!(blob.readable);
        assert!(blob.private);
        assert!(!blob.writable);
        assert_eq!(blob.bits, 1);
        assert_eq!(blob.typeref.kind, BasicType::UInt);
    }

    /// Callback-Feld nach Typ-Feld am selben Knoten ist ein Strukturfehler.
    #[test]
    fn second_type_slot_rejected() {
        let input = b"<field/>";
        let mut result = ParserResult::new("t.gir");
        let mut b = FieldBuilder::default();
        let e = BytesStart::from_content(r#"field name="notify""#, 5);
        let attrs = Attrs::from_start(input, &e, 0).unwrap();
        b.parse(&mut result, ElementKind::Field, &attrs).unwrap();

        let mut child = TypeBuilder::default();
        let t = BytesStart::from_content(r#"type name="gpointer""#, 4);
        child
            .parse(&mut result, ElementKind::Type, &Attrs::from_start(input, &t, 0).unwrap())
            .unwrap();
        let finished = child.finish(&mut result);
        b.child_finished(&mut result, ElementKind::Type, finished, Ctx::new(input, 0))
            .unwrap();

        let cb = Finished::Callback(crate::blob::CallbackBlob::default());
        let err = b
            .child_finished(&mut result, ElementKind::Callback, cb, Ctx::new(input, 0))
            .unwrap_err();
        assert!(err.to_string().contains("type_ref already set"), "{err}");
    }
}
