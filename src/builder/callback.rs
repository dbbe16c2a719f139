//! `<callback>`, freistehend im Namespace oder eingebettet in ein Feld.

use crate::attrs::Attrs;
use crate::blob::{BlobKind, CallbackBlob};
use crate::element::{ElementKind, mask};
use crate::error::Result;
use crate::result::ParserResult;

use super::{Ctx, Dispatch, DocState, ElementBuilder, Finished, collect_common};

#[derive(Default)]
pub struct CallbackBuilder {
    blob: CallbackBlob,
    doc: DocState,
}

impl ElementBuilder for CallbackBuilder {
    fn parse(
        &mut self,
        result: &mut ParserResult,
        _kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<()> {
        self.blob.common = collect_common(result, attrs, BlobKind::Callback)?;
        self.blob.c_type = attrs.intern(result.strings_mut(), "c:type");
        self.blob.throws = attrs.boolean("throws", false);
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
            k => Dispatch::masked(mask::CALLBACK, k),
        })
    }

    fn child_finished(
        &mut self,
        result: &mut ParserResult,
        _kind: ElementKind,
        finished: Finished,
        _ctx: Ctx<'_>,
    ) -> Result<Option<u32>> {
        match finished {
            Finished::Parameters(run) => self.blob.parameters = run,
            Finished::ReturnValue(blob) => {
                self.blob.return_value = result.add_parameter(blob) as i32;
            }
            Finished::Doc(piece) => self.doc.absorb(result, piece),
            _ => {}
        }
        Ok(None)
    }

    fn finish(&mut self, result: &mut ParserResult) -> Finished {
        self.blob.common.doc = self.doc.finish(result);
        Finished::Callback(self.blob)
    }

    fn index(&self, result: &mut ParserResult, position: u32) {
        if let Some(name) = result.string(self.blob.common.name)
            && !name.is_empty()
        {
            let name = name.to_owned();
            result.add_object_index(&name, BlobKind::Callback, position);
        }
    }

    fn reset(&mut self) {
        self.blob = CallbackBlob::default();
        self.doc.reset();
    }
}
