//! `<constant>`. Der Wert bleibt als String erhalten; erst der Verbraucher
//! interpretiert ihn anhand des Typs.

use crate::attrs::Attrs;
use crate::blob::{BlobKind, ConstantBlob};
use crate::element::{ElementKind, mask};
use crate::error::Result;
use crate::result::ParserResult;

use super::{Ctx, Dispatch, DocState, ElementBuilder, Finished, collect_common, store_type_child};

#[derive(Default)]
pub struct ConstantBuilder {
    blob: ConstantBlob,
    doc: DocState,
}

impl ElementBuilder for ConstantBuilder {
    fn parse(
        &mut self,
        result: &mut ParserResult,
        _kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<()> {
        self.blob.common = collect_common(result, attrs, BlobKind::Constant)?;
        self.blob.value = attrs.intern(result.strings_mut(), "value");
        self.blob.c_type = attrs.intern(result.strings_mut(), "c:type");
        self.blob.c_identifier = attrs.intern(result.strings_mut(), "c:identifier");
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
            k => Dispatch::masked(mask::CONSTANT, k),
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
        Finished::Constant(self.blob)
    }

    fn index(&self, result: &mut ParserResult, position: u32) {
        if let Some(name) = result.string(self.blob.common.name)
            && !name.is_empty()
        {
            let name = name.to_owned();
            result.add_object_index(&name, BlobKind::Constant, position);
        }
    }

    fn reset(&mut self) {
        self.blob = ConstantBlob::default();
        self.doc.reset();
    }
}
