//! `<member>` einer Enumeration bzw. eines Bitfelds.

use crate::attrs::Attrs;
use crate::blob::{BlobKind, ValueBlob};
use crate::element::{ElementKind, mask};
use crate::error::Result;
use crate::result::ParserResult;

use super::{Ctx, Dispatch, DocState, ElementBuilder, Finished, collect_common};

#[derive(Default)]
pub struct ValueBuilder {
    blob: ValueBlob,
    doc: DocState,
}

impl ElementBuilder for ValueBuilder {
    fn parse(
        &mut self,
        result: &mut ParserResult,
        _kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<()> {
        self.blob.common = collect_common(result, attrs, BlobKind::Value)?;
        self.blob.c_identifier = attrs.intern(result.strings_mut(), "c:identifier");
        self.blob.nick = attrs.intern(result.strings_mut(), "glib:nick");
        self.blob.value = attrs.int64("value", 0)?;
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
            k => Dispatch::masked(mask::MEMBER, k),
        })
    }

    fn child_finished(
        &mut self,
        result: &mut ParserResult,
        _kind: ElementKind,
        finished: Finished,
        _ctx: Ctx<'_>,
    ) -> Result<Option<u32>> {
        self.doc.absorb_finished(result, finished);
        Ok(None)
    }

    fn finish(&mut self, result: &mut ParserResult) -> Finished {
        self.blob.common.doc = self.doc.finish(result);
        Finished::Value(self.blob)
    }

    fn reset(&mut self) {
        self.blob = ValueBlob::default();
        self.doc.reset();
    }
}
