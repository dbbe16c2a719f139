//! `<glib:signal>`.

use crate::attrs::Attrs;
use crate::blob::{BlobKind, SignalBlob, SignalWhen};
use crate::element::{ElementKind, mask};
use crate::error::Result;
use crate::result::ParserResult;

use super::{Ctx, Dispatch, DocState, ElementBuilder, Finished, collect_common};

#[derive(Default)]
pub struct SignalBuilder {
    blob: SignalBlob,
    doc: DocState,
}

impl ElementBuilder for SignalBuilder {
    fn parse(
        &mut self,
        result: &mut ParserResult,
        _kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<()> {
        self.blob.common = collect_common(result, attrs, BlobKind::Signal)?;
        self.blob.when = attrs.signal_when("when", SignalWhen::None)?;
        self.blob.action = attrs.boolean("action", false);
        self.blob.detailed = attrs.boolean("detailed", false);
        self.blob.no_hooks = attrs.boolean("no-hooks", false);
        self.blob.no_recurse = attrs.boolean("no-recurse", false);
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
            k => Dispatch::masked(mask::SIGNAL, k),
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
        Finished::Signal(self.blob)
    }

    fn reset(&mut self) {
        self.blob = SignalBlob::default();
        self.doc.reset();
    }
}
