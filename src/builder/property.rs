//! `<property>`. Anders als bei Feldern ist `readable` hier per
//! gir-Schema voreingestellt wahr.

use crate::attrs::Attrs;
use crate::blob::{BlobKind, PropertyBlob, TransferOwnership};
use crate::element::{ElementKind, mask};
use crate::error::Result;
use crate::result::ParserResult;

use super::{Ctx, Dispatch, DocState, ElementBuilder, Finished, collect_common, store_type_child};

#[derive(Default)]
pub struct PropertyBuilder {
    blob: PropertyBlob,
    doc: DocState,
}

impl ElementBuilder for PropertyBuilder {
    fn parse(
        &mut self,
        result: &mut ParserResult,
        _kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<()> {
        self.blob.common = collect_common(result, attrs, BlobKind::Property)?;
        self.blob.readable = attrs.boolean("readable", true);
        self.blob.writable = attrs.boolean("writable", false);
        self.blob.construct = attrs.boolean("construct", false);
        self.blob.construct_only = attrs.boolean("construct-only", false);
        self.blob.transfer = attrs.transfer("transfer-ownership", TransferOwnership::None)?;
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
            k => Dispatch::masked(mask::PROPERTY, k),
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
            Finished::Doc(piece) => self.doc.absorb(result, piece),
            _ => {}
        }
        Ok(None)
    }

    fn finish(&mut self, result: &mut ParserResult) -> Finished {
        self.blob.common.doc = self.doc.finish(result);
        Finished::Property(self.blob)
    }

    fn reset(&mut self) {
        self.blob = PropertyBlob::default();
        self.doc.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::events::BytesStart;

    #[test]
    fn readable_defaults_to_true() {
        let input = b"<property/>";
        let mut result = ParserResult::new("t.gir");
        let mut b = PropertyBuilder::default();
        let e = BytesStart::from_content(
            r#"property name="visible" writable="1" construct="1""#,
            8,
        );
        let attrs = Attrs::from_start(input, &e, 0).unwrap();
        b.parse(&mut result, ElementKind::Property, &attrs).unwrap();

        let Finished::Property(blob) = b.finish(&mut result) else {
            panic!("expected property blob");
        };
        assert!(blob.readable);
        assert!(blob.writable);
        assert!(blob.construct);
        assert!(!blob.construct_only);
        assert_eq!(blob.transfer, TransferOwnership::None);
    }

    #[test]
    fn explicit_readable_false() {
        let input = b"<property/>";
        let mut result = ParserResult::new("t.gir");
        let mut b = PropertyBuilder::default();
        let e = BytesStart::from_content(r#"property name="child" readable="0""#, 8);
        let attrs = Attrs::from_start(input, &e, 0).unwrap();
        b.parse(&mut result, ElementKind::Property, &attrs).unwrap();

        let Finished::Property(blob) = b.finish(&mut result) else {
            panic!("expected property blob");
        };
        assert!(!blob.readable);
    }
}
