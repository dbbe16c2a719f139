//! `<record>` und `<glib:boxed>`.
//!
//! Boxed-Typen tragen ihren Namen im `glib:name`-Attribut, teilen sich
//! sonst aber Blob und Ablauf mit Records. Kinder werden pro Kategorie
//! gepuffert und bei `finish` als zusammenhängende Läufe verbucht.

use crate::attrs::Attrs;
use crate::blob::{
    BlobKind, CallbackBlob, FieldBlob, FunctionBlob, PrefixKind, PropertyBlob, RecordBlob,
    UnionBlob,
};
use crate::element::{ElementKind, mask};
use crate::error::Result;
use crate::result::ParserResult;

use super::{Ctx, Dispatch, DocState, ElementBuilder, Finished, collect_common, flush_run};

#[derive(Default)]
pub struct RecordBuilder {
    blob: RecordBlob,
    doc: DocState,
    callbacks: Vec<CallbackBlob>,
    fields: Vec<FieldBlob>,
    functions: Vec<FunctionBlob>,
    properties: Vec<PropertyBlob>,
    unions: Vec<UnionBlob>,
}

impl ElementBuilder for RecordBuilder {
    fn parse(
        &mut self,
        result: &mut ParserResult,
        kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<()> {
        let blob_kind = if kind == ElementKind::Boxed {
            BlobKind::Boxed
        } else {
            BlobKind::Record
        };
        self.blob.common = collect_common(result, attrs, blob_kind)?;
        if kind == ElementKind::Boxed && self.blob.common.name == 0 {
            self.blob.common.name = attrs.intern(result.strings_mut(), "glib:name");
        }
        self.blob.disguised = attrs.boolean("disguised", false);
        self.blob.foreign = attrs.boolean("foreign", false);
        self.blob.c_type = attrs.intern(result.strings_mut(), "c:type");
        self.blob.c_symbol_prefix = attrs.intern(result.strings_mut(), "c:symbol-prefix");
        self.blob.gtype_struct_for = attrs.intern(result.strings_mut(), "glib:is-gtype-struct-for");
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
            k => Dispatch::masked(mask::RECORD, k),
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
            Finished::Callback(blob) => self.callbacks.push(blob),
            Finished::Field(blob) => self.fields.push(blob),
            Finished::Function(blob) => self.functions.push(blob),
            Finished::Property(blob) => self.properties.push(blob),
            Finished::Union(blob) => self.unions.push(blob),
            Finished::Doc(piece) => self.doc.absorb(result, piece),
            _ => {}
        }
        Ok(None)
    }

    fn finish(&mut self, result: &mut ParserResult) -> Finished {
        self.blob.common.doc = self.doc.finish(result);
        self.blob.callbacks = flush_run(result, &mut self.callbacks, |r, b| r.add_callback(b).offset);
        self.blob.fields = flush_run(result, &mut self.fields, |r, b| r.add_field(b));
        self.blob.functions = flush_run(result, &mut self.functions, |r, b| r.add_function(b));
        self.blob.properties = flush_run(result, &mut self.properties, |r, b| r.add_property(b));
        self.blob.unions = flush_run(result, &mut self.unions, |r, b| r.add_union(b));
        Finished::Record(self.blob)
    }

    fn index(&self, result: &mut ParserResult, position: u32) {
        if let Some(name) = result.string(self.blob.common.name)
            && !name.is_empty()
        {
            let name = name.to_owned();
            result.add_object_index(&name, self.blob.common.kind, position);
        }
        if let Some(g_type) = result.string(self.blob.g_type_name)
            && !g_type.is_empty()
        {
            let g_type = g_type.to_owned();
            result.add_global_index(
                &g_type,
                position,
                PrefixKind::GType,
                self.blob.common.kind,
                false,
            );
        }
    }

    fn reset(&mut self) {
        self.blob = RecordBlob::default();
        self.doc.reset();
        self.callbacks.clear();
        self.fields.clear();
        self.functions.clear();
        self.properties.clear();
        self.unions.clear();
    }
}
