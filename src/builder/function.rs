//! Die vier Callable-Schreibweisen `<constructor>`, `<function>`,
//! `<method>` und `<virtual-method>`.
//!
//! Alle landen im Funktions-Table; die Schreibweise bleibt als
//! [`BlobKind`] im gemeinsamen Kopf erhalten.

use crate::attrs::Attrs;
use crate::blob::{BlobKind, FunctionBlob};
use crate::element::{ElementKind, mask};
use crate::error::Result;
use crate::result::ParserResult;

use super::{Ctx, Dispatch, DocState, ElementBuilder, Finished, collect_common};

#[derive(Default)]
pub struct FunctionBuilder {
    blob: FunctionBlob,
    doc: DocState,
}

fn blob_kind(kind: ElementKind) -> BlobKind {
    match kind {
        ElementKind::Constructor => BlobKind::Constructor,
        ElementKind::Method => BlobKind::Method,
        ElementKind::VirtualMethod => BlobKind::Vfunc,
        _ => BlobKind::Function,
    }
}

impl ElementBuilder for FunctionBuilder {
    fn parse(
        &mut self,
        result: &mut ParserResult,
        kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<()> {
        self.blob.common = collect_common(result, attrs, blob_kind(kind))?;
        self.blob.c_identifier = attrs.intern(result.strings_mut(), "c:identifier");
        self.blob.shadows = attrs.intern(result.strings_mut(), "shadows");
        self.blob.shadowed_by = attrs.intern(result.strings_mut(), "shadowed-by");
        self.blob.moved_to = attrs.intern(result.strings_mut(), "moved-to");
        self.blob.invoker = attrs.intern(result.strings_mut(), "invoker");
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
            k => Dispatch::masked(mask::FUNCTION, k),
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
        Finished::Function(self.blob)
    }

    fn index(&self, result: &mut ParserResult, position: u32) {
        if let Some(name) = result.string(self.blob.common.name)
            && !name.is_empty()
        {
            let name = name.to_owned();
            result.add_object_index(&name, self.blob.common.kind, position);
        }
    }

    fn reset(&mut self) {
        self.blob = FunctionBlob::default();
        self.doc.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::Run;
    use quick_xml::events::BytesStart;

    #[test]
    fn spelling_lands_in_common_kind() {
        let input = b"<x/>";
        let mut result = ParserResult::new("t.gir");
        for (kind, expected) in [
            (ElementKind::Constructor, BlobKind::Constructor),
            (ElementKind::Function, BlobKind::Function),
            (ElementKind::Method, BlobKind::Method),
            (ElementKind::VirtualMethod, BlobKind::Vfunc),
        ] {
            let mut b = FunctionBuilder::default();
            let e = BytesStart::from_content(r#"x name="new""#, 1);
            let attrs = Attrs::from_start(input, &e, 0).unwrap();
            b.parse(&mut result, kind, &attrs).unwrap();
            let Finished::Function(blob) = b.finish(&mut result) else {
                panic!("expected function blob");
            };
            assert_eq!(blob.common.kind, expected);
        }
    }

    #[test]
    fn callable_attributes() {
        let input = b"<method/>";
        let mut result = ParserResult::new("t.gir");
        let mut b = FunctionBuilder::default();
        let e = BytesStart::from_content(
            r#"method name="show" c:identifier="gtk_widget_show" throws="1" shadowed-by="show_full""#,
            6,
        );
        let attrs = Attrs::from_start(input, &e, 0).unwrap();
        b.parse(&mut result, ElementKind::Method, &attrs).unwrap();

        let run = Run { base: 7, count: 3 };
        b.child_finished(
            &mut result,
            ElementKind::Parameters,
            Finished::Parameters(run),
            Ctx::new(input, 0),
        )
        .unwrap();

        let Finished::Function(blob) = b.finish(&mut result) else {
            panic!("expected function blob");
        };
        assert_eq!(result.string(blob.c_identifier), Some("gtk_widget_show"));
        assert_eq!(result.string(blob.shadowed_by), Some("show_full"));
        assert!(blob.throws);
        assert_eq!(blob.parameters, run);
    }
}
