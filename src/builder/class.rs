//! `<class>`.
//!
//! Der größte Verbund: acht Kind-Kategorien plus `<implements>`.
//! Implements-Einträge werden sofort als unvollständige Querverweise
//! verbucht, die Namespace-Version ergänzt erst der spätere
//! Auflösungslauf. Alle anderen Kinder sammeln sich in Puffern und
//! gehen bei `finish` als zusammenhängende Läufe in ihre Tabellen.

use crate::attrs::Attrs;
use crate::blob::{
    BlobKind, CallbackBlob, ConstantBlob, FieldBlob, FunctionBlob, ObjectBlob, PrefixKind,
    PropertyBlob, RecordBlob, SignalBlob, UnionBlob,
};
use crate::element::{ElementKind, mask};
use crate::error::Result;
use crate::result::ParserResult;

use super::{Ctx, Dispatch, DocState, ElementBuilder, Finished, collect_common, flush_run};

#[derive(Default)]
pub struct ClassBuilder {
    blob: ObjectBlob,
    doc: DocState,
    callbacks: Vec<CallbackBlob>,
    constants: Vec<ConstantBlob>,
    fields: Vec<FieldBlob>,
    functions: Vec<FunctionBlob>,
    properties: Vec<PropertyBlob>,
    records: Vec<RecordBlob>,
    signals: Vec<SignalBlob>,
    unions: Vec<UnionBlob>,
    in_implements: bool,
}

impl ClassBuilder {
    /// Unvollständiger Querverweis; `Gtk.Buildable` schaltet zusätzlich
    /// das Buildable-Bit im Index-Eintrag.
    fn parse_implements(&mut self, result: &mut ParserResult, attrs: &Attrs<'_>) {
        let name = attrs.get("name").unwrap_or("");
        let is_local = !name.contains('.');
        let qname = result.qualify(name);

        let index = result.add_crossref(BlobKind::Class, &qname, is_local);
        if self.blob.interfaces.count == 0 {
            self.blob.interfaces.base = index;
        }
        self.blob.interfaces.count += 1;

        if !self.blob.is_buildable && qname == "Gtk.Buildable" {
            self.blob.is_buildable = true;
        }
    }
}

impl ElementBuilder for ClassBuilder {
    fn parse(
        &mut self,
        result: &mut ParserResult,
        _kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<()> {
        self.blob.common = collect_common(result, attrs, BlobKind::Class)?;
        self.blob.is_abstract = attrs.boolean("abstract", false);
        self.blob.fundamental = attrs.boolean("glib:fundamental", false);
        self.blob.g_type_name = attrs.intern(result.strings_mut(), "glib:type-name");
        self.blob.g_get_type = attrs.intern(result.strings_mut(), "glib:get-type");
        self.blob.g_type_struct = attrs.intern(result.strings_mut(), "glib:type-struct");
        self.blob.g_ref_func = attrs.intern(result.strings_mut(), "glib:ref-func");
        self.blob.g_unref_func = attrs.intern(result.strings_mut(), "glib:unref-func");
        self.blob.g_set_value_func = attrs.intern(result.strings_mut(), "glib:set-value-func");
        self.blob.g_get_value_func = attrs.intern(result.strings_mut(), "glib:get-value-func");
        self.blob.c_type = attrs.intern(result.strings_mut(), "c:type");
        self.blob.c_symbol_prefix = attrs.intern(result.strings_mut(), "c:symbol-prefix");

        if let Some(parent) = attrs.get("parent").filter(|p| !p.is_empty()) {
            let is_local = !parent.contains('.');
            let qname = result.qualify(parent);
            self.blob.parent = result.add_crossref(BlobKind::Unknown, &qname, is_local);
            self.blob.has_parent = true;
        }
        Ok(())
    }

    fn start_child(
        &mut self,
        result: &mut ParserResult,
        kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<Dispatch> {
        use ElementKind as K;
        if self.in_implements {
            return Err(attrs.structural("We should not have sub-elements in <implements>"));
        }
        Ok(match kind {
            K::Implements => {
                self.in_implements = true;
                self.parse_implements(result, attrs);
                Dispatch::Inline
            }
            K::Annotation | K::Attributes => {
                self.doc.annotate(attrs);
                Dispatch::Inline
            }
            k => Dispatch::masked(mask::CLASS, k),
        })
    }

    fn end_inline(
        &mut self,
        _result: &mut ParserResult,
        kind: ElementKind,
        _ctx: Ctx<'_>,
    ) -> Result<()> {
        if kind == ElementKind::Implements {
            self.in_implements = false;
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
            Finished::Record(blob) => self.records.push(blob),
            Finished::Signal(blob) => self.signals.push(blob),
            Finished::Union(blob) => self.unions.push(blob),
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
        self.blob.records = flush_run(result, &mut self.records, |r, b| r.add_record(b));
        self.blob.signals = flush_run(result, &mut self.signals, |r, b| r.add_signal(b));
        self.blob.unions = flush_run(result, &mut self.unions, |r, b| r.add_union(b));
        Finished::Object(self.blob)
    }

    fn index(&self, result: &mut ParserResult, position: u32) {
        if let Some(name) = result.string(self.blob.common.name)
            && !name.is_empty()
        {
            let name = name.to_owned();
            result.add_object_index(&name, BlobKind::Class, position);
        }
        if let Some(g_type) = result.string(self.blob.g_type_name)
            && !g_type.is_empty()
        {
            let g_type = g_type.to_owned();
            result.add_global_index(
                &g_type,
                position,
                PrefixKind::GType,
                BlobKind::Class,
                self.blob.is_buildable,
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
        self.records.clear();
        self.signals.clear();
        self.unions.clear();
        self.in_implements = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::HeaderBlob;
    use crate::builder::FunctionBuilder;
    use quick_xml::events::BytesStart;

    fn result_with_namespace(ns: &str) -> ParserResult {
        let mut result = ParserResult::new("t.gir");
        let mut header = HeaderBlob::default();
        header.namespace = result.add_header_string(ns);
        result.set_header(header);
        result
    }

    #[test]
    fn parent_becomes_local_crossref() {
        let input = b"<class/>";
        let mut result = result_with_namespace("Gtk");
        let mut b = ClassBuilder::default();
        let e = BytesStart::from_content(
            r#"class name="Button" parent="Widget" glib:type-name="GtkButton" abstract="0""#,
            5,
        );
        let attrs = Attrs::from_start(input, &e, 0).unwrap();
        b.parse(&mut result, ElementKind::Class, &attrs).unwrap();

        let Finished::Object(blob) = b.finish(&mut result) else {
            panic!("expected object blob");
        };
        assert!(blob.has_parent);
        let crossref = &result.crossrefs()[blob.parent as usize];
        assert!(crossref.is_local);
        assert_eq!(result.string(crossref.qname), Some("Gtk.Widget"));
        assert_eq!(crossref.kind_hint, BlobKind::Unknown);
    }

    #[test]
    fn foreign_parent_stays_qualified() {
        let input = b"<class/>";
        let mut result = result_with_namespace("Gtk");
        let mut b = ClassBuilder::default();
        let e = BytesStart::from_content(r#"class name="Widget" parent="GObject.Object""#, 5);
        let attrs = Attrs::from_start(input, &e, 0).unwrap();
        b.parse(&mut result, ElementKind::Class, &attrs).unwrap();

        let Finished::Object(blob) = b.finish(&mut result) else {
            panic!("expected object blob");
        };
        let crossref = &result.crossrefs()[blob.parent as usize];
        assert!(!crossref.is_local);
        assert_eq!(result.string(crossref.qname), Some("GObject.Object"));
    }

    #[test]
    fn implements_counts_interfaces_and_buildable() {
        let input = b"<class><implements name=\"Buildable\"/></class>";
        let mut result = result_with_namespace("Gtk");
        let mut b = ClassBuilder::default();
        let e = BytesStart::from_content(r#"class name="Button""#, 5);
        b.parse(&mut result, ElementKind::Class, &Attrs::from_start(input, &e, 0).unwrap())
            .unwrap();

        for name in ["Buildable", "Atk.ImplementorIface"] {
            let i = BytesStart::from_content(format!(r#"implements name="{name}""#), 10);
            let d = b
                .start_child(
                    &mut result,
                    ElementKind::Implements,
                    &Attrs::from_start(input, &i, 0).unwrap(),
                )
                .unwrap();
            assert_eq!(d, Dispatch::Inline);
            b.end_inline(&mut result, ElementKind::Implements, Ctx::new(input, 0))
                .unwrap();
        }

        let Finished::Object(blob) = b.finish(&mut result) else {
            panic!("expected object blob");
        };
        assert_eq!(blob.interfaces.count, 2);
        assert!(blob.is_buildable);
        let first = &result.crossrefs()[blob.interfaces.base as usize];
        assert_eq!(result.string(first.qname), Some("Gtk.Buildable"));
        assert_eq!(first.kind_hint, BlobKind::Class);
    }

    #[test]
    fn implements_rejects_children() {
        let input = b"<class/>";
        let mut result = result_with_namespace("Gtk");
        let mut b = ClassBuilder::default();
        let e = BytesStart::from_content(r#"class name="Button""#, 5);
        b.parse(&mut result, ElementKind::Class, &Attrs::from_start(input, &e, 0).unwrap())
            .unwrap();

        let i = BytesStart::from_content(r#"implements name="Buildable""#, 10);
        b.start_child(
            &mut result,
            ElementKind::Implements,
            &Attrs::from_start(input, &i, 0).unwrap(),
        )
        .unwrap();

        let t = BytesStart::from_content("type", 4);
        let err = b
            .start_child(
                &mut result,
                ElementKind::Type,
                &Attrs::from_start(input, &t, 0).unwrap(),
            )
            .unwrap_err();
        assert!(err.to_string().contains("<implements>"), "{err}");
    }

    #[test]
    fn methods_buffer_until_finish() {
        let input = b"<class/>";
        let mut result = result_with_namespace("Gtk");
        let mut b = ClassBuilder::default();
        let e = BytesStart::from_content(r#"class name="Widget""#, 5);
        b.parse(&mut result, ElementKind::Class, &Attrs::from_start(input, &e, 0).unwrap())
            .unwrap();

        for name in ["show", "hide"] {
            let mut f = FunctionBuilder::default();
            let fe = BytesStart::from_content(format!(r#"method name="{name}""#), 6);
            f.parse(&mut result, ElementKind::Method, &Attrs::from_start(input, &fe, 0).unwrap())
                .unwrap();
            let finished = f.finish(&mut result);
            b.child_finished(&mut result, ElementKind::Method, finished, Ctx::new(input, 0))
                .unwrap();
            assert!(result.functions().is_empty());
        }

        let Finished::Object(blob) = b.finish(&mut result) else {
            panic!("expected object blob");
        };
        assert_eq!(blob.functions.count, 2);
        assert_eq!(result.functions().len(), 2);
        assert_eq!(
            result.string(result.functions()[blob.functions.base as usize].common.name),
            Some("show"),
        );
    }

    #[test]
    fn index_publishes_name_and_gtype() {
        let input = b"<class/>";
        let mut result = result_with_namespace("Gtk");
        let mut b = ClassBuilder::default();
        let e = BytesStart::from_content(
            r#"class name="Button" glib:type-name="GtkButton""#,
            5,
        );
        b.parse(&mut result, ElementKind::Class, &Attrs::from_start(input, &e, 0).unwrap())
            .unwrap();
        let Finished::Object(blob) = b.finish(&mut result) else {
            panic!("expected object blob");
        };
        let position = result.add_object(blob);
        b.index(&mut result, position);

        let entries = result.object_index().lookup("Button").unwrap();
        assert_eq!(entries[0].kind, BlobKind::Class);
        let global = result.global_index();
        assert_eq!(global.len(), 1);
        assert_eq!(global[0].name, "GtkButton");
        assert!(!global[0].is_buildable);
    }
}
