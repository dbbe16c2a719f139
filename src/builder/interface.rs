//! `<interface>`.
//!
//! Wie eine Klasse, nur schmaler: keine Eltern-Referenz, keine Records
//! oder Unions. `<prerequisite>` wird wie `<implements>` sofort als
//! unvollständiger Querverweis verbucht; ob dahinter eine Klasse oder
//! ein Interface steht, entscheidet erst der Auflösungslauf.

use crate::attrs::Attrs;
use crate::blob::{
    BlobKind, CallbackBlob, ConstantBlob, FieldBlob, FunctionBlob, ObjectBlob, PrefixKind,
    PropertyBlob, SignalBlob,
};
use crate::element::{ElementKind, mask};
use crate::error::Result;
use crate::result::ParserResult;

use super::{Ctx, Dispatch, DocState, ElementBuilder, Finished, collect_common, flush_run};

#[derive(Default)]
pub struct InterfaceBuilder {
    blob: ObjectBlob,
    doc: DocState,
    callbacks: Vec<CallbackBlob>,
    constants: Vec<ConstantBlob>,
    fields: Vec<FieldBlob>,
    functions: Vec<FunctionBlob>,
    properties: Vec<PropertyBlob>,
    signals: Vec<SignalBlob>,
    in_prerequisite: bool,
}

impl InterfaceBuilder {
    fn parse_prerequisite(&mut self, result: &mut ParserResult, attrs: &Attrs<'_>) {
        let name = attrs.get("name").unwrap_or("");
        let is_local = !name.contains('.');
        let qname = result.qualify(name);

        let index = result.add_crossref(BlobKind::Unknown, &qname, is_local);
        if self.blob.interfaces.count == 0 {
            self.blob.interfaces.base = index;
        }
        self.blob.interfaces.count += 1;
    }
}

impl ElementBuilder for InterfaceBuilder {
    fn parse(
        &mut self,
        result: &mut ParserResult,
        _kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<()> {
        self.blob.common = collect_common(result, attrs, BlobKind::Interface)?;
        self.blob.g_type_name = attrs.intern(result.strings_mut(), "glib:type-name");
        self.blob.g_get_type = attrs.intern(result.strings_mut(), "glib:get-type");
        self.blob.g_type_struct = attrs.intern(result.strings_mut(), "glib:type-struct");
        self.blob.c_type = attrs.intern(result.strings_mut(), "c:type");
        self.blob.c_symbol_prefix = attrs.intern(result.strings_mut(), "c:symbol-prefix");
        Ok(())
    }

    fn start_child(
        &mut self,
        result: &mut ParserResult,
        kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<Dispatch> {
        use ElementKind as K;
        if self.in_prerequisite {
            return Err(attrs.structural("We should not have sub-elements in <prerequisite>"));
        }
        Ok(match kind {
            K::Prerequisite => {
                self.in_prerequisite = true;
                self.parse_prerequisite(result, attrs);
                Dispatch::Inline
            }
            K::Annotation | K::Attributes => {
                self.doc.annotate(attrs);
                Dispatch::Inline
            }
            k => Dispatch::masked(mask::INTERFACE, k),
        })
    }

    fn end_inline(
        &mut self,
        _result: &mut ParserResult,
        kind: ElementKind,
        _ctx: Ctx<'_>,
    ) -> Result<()> {
        if kind == ElementKind::Prerequisite {
            self.in_prerequisite = false;
        }
        Ok(())
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
            Finished::Constant(blob) => self.constants.push(blob),
            Finished::Field(blob) => self.fields.push(blob),
            Finished::Function(blob) => self.functions.push(blob),
            Finished::Property(blob) => self.properties.push(blob),
            Finished::Signal(blob) => self.signals.push(blob),
            Finished::Doc(piece) => self.doc.absorb(result, piece),
            _ => {}
        }
        Ok(None)
    }

    fn finish(&mut self, result: &mut ParserResult) -> Finished {
        self.blob.common.doc = self.doc.finish(result);
        self.blob.callbacks = flush_run(result, &mut self.callbacks, |r, b| r.add_callback(b).offset);
        self.blob.constants = flush_run(result, &mut self.constants, |r, b| r.add_constant(b));
        self.blob.fields = flush_run(result, &mut self.fields, |r, b| r.add_field(b));
        self.blob.functions = flush_run(result, &mut self.functions, |r, b| r.add_function(b));
        self.blob.properties = flush_run(result, &mut self.properties, |r, b| r.add_property(b));
        self.blob.signals = flush_run(result, &mut self.signals, |r, b| r.add_signal(b));
        Finished::Object(self.blob)
    }

    fn index(&self, result: &mut ParserResult, position: u32) {
        if let Some(name) = result.string(self.blob.common.name)
            && !name.is_empty()
        {
            let name = name.to_owned();
            result.add_object_index(&name, BlobKind::Interface, position);
        }
        // Interfaces sind selbst nie buildable, auch wenn eine
        // Voraussetzung auf Gtk.Buildable zeigt.
        if let Some(g_type) = result.string(self.blob.g_type_name)
            && !g_type.is_empty()
        {
            let g_type = g_type.to_owned();
            result.add_global_index(
                &g_type,
                position,
                PrefixKind::GType,
                BlobKind::Interface,
                false,
            );
        }
    }

    fn reset(&mut self) {
        self.blob = ObjectBlob::default();
        self.doc.reset();
        self.callbacks.clear();
        self.constants.clear();
        self.fields.clear();
        self.functions.clear();
        self.properties.clear();
        self.signals.clear();
        self.in_prerequisite = false;
    }
}
