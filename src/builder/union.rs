//! `<union>`, freistehend oder in einen Record eingebettet.

use crate::attrs::Attrs;
use crate::blob::{BlobKind, FieldBlob, FunctionBlob, PrefixKind, RecordBlob, UnionBlob};
use crate::element::{ElementKind, mask};
use crate::error::Result;
use crate::result::ParserResult;

use super::{Ctx, Dispatch, DocState, ElementBuilder, Finished, collect_common, flush_run};

#[derive(Default)]
pub struct UnionBuilder {
    blob: UnionBlob,
    doc: DocState,
    fields: Vec<FieldBlob>,
    functions: Vec<FunctionBlob>,
    records: Vec<RecordBlob>,
}

impl ElementBuilder for UnionBuilder {
    fn parse(
        &mut self,
        result: &mut ParserResult,
        _kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<()> {
        self.blob.common = collect_common(result, attrs, BlobKind::Union)?;
        self.blob.c_type = attrs.intern(result.strings_mut(), "c:type");
        self.blob.c_symbol_prefix = attrs.intern(result.strings_mut(), "c:symbol-prefix");
        self.blob.g_type_name = attrs.intern(result.strings_mut(), "glib:type-name");
        self.blob.g_get_type = attrs.intern(result.strings_mut(), "glib:get-type");
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
            k => Dispatch::masked(mask::UNION, k),
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
            Finished::Field(blob) => self.fields.push(blob),
            Finished::Function(blob) => self.functions.push(blob),
            Finished::Record(blob) => self.records.push(blob),
            Finished::Doc(piece) => self.doc.absorb(result, piece),
            _ => {}
        }
        Ok(None)
    }

    fn finish(&mut self, result: &mut ParserResult) -> Finished {
        self.blob.common.doc = self.doc.finish(result);
        self.blob.fields = flush_run(result, &mut self.fields, |r, b| r.add_field(b));
        self.blob.functions = flush_run(result, &mut self.functions, |r, b| r.add_function(b));
        self.blob.records = flush_run(result, &mut self.records, |r, b| r.add_record(b));
        Finished::Union(self.blob)
    }

    fn index(&self, result: &mut ParserResult, position: u32) {
        if let Some(name) = result.string(self.blob.common.name)
            && !name.is_empty()
        {
            let name = name.to_owned();
            result.add_object_index(&name, BlobKind::Union, position);
        }
        if let Some(g_type) = result.string(self.blob.g_type_name)
            && !g_type.is_empty()
        {
            let g_type = g_type.to_owned();
            result.add_global_index(&g_type, position, PrefixKind::GType, BlobKind::Union, false);
        }
    }

    fn reset(&mut self) {
        self.blob = UnionBlob::default();
        self.doc.reset();
        self.fields.clear();
        self.functions.clear();
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FieldBuilder;
    use quick_xml::events::BytesStart;

    #[test]
    fn union_buffers_fields() {
        let input = b"<union/>";
        let mut result = ParserResult::new("t.gir");
        let mut b = UnionBuilder::default();
        let e = BytesStart::from_content(r#"union name="Event" c:type="GdkEvent""#, 5);
        let attrs = Attrs::from_start(input, &e, 0).unwrap();
        b.parse(&mut result, ElementKind::Union, &attrs).unwrap();

        for name in ["type", "button", "key"] {
            let mut child = FieldBuilder::default();
            let fe = BytesStart::from_content(format!(r#"field name="{name}""#), 5);
            child
                .parse(&mut result, ElementKind::Field, &Attrs::from_start(input, &fe, 0).unwrap())
                .unwrap();
            let finished = child.finish(&mut result);
            b.child_finished(&mut result, ElementKind::Field, finished, Ctx::new(input, 0))
                .unwrap();
        }

        let Finished::Union(blob) = b.finish(&mut result) else {
            panic!("expected union blob");
        };
        assert_eq!(blob.fields.count, 3);
        assert_eq!(
            result.string(result.fields()[blob.fields.base as usize + 2].common.name),
            Some("key"),
        );
    }
}
