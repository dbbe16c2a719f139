//! `<enumeration>` und `<bitfield>`.
//!
//! Members und eingebettete Funktionen werden lokal gesammelt und erst
//! bei `finish` als zwei zusammenhängende Läufe verbucht.

use crate::attrs::Attrs;
use crate::blob::{BlobKind, EnumBlob, FunctionBlob, PrefixKind, ValueBlob};
use crate::element::{ElementKind, mask};
use crate::error::Result;
use crate::result::ParserResult;

use super::{Ctx, Dispatch, DocState, ElementBuilder, Finished, collect_common, flush_run};

#[derive(Default)]
pub struct EnumBuilder {
    blob: EnumBlob,
    doc: DocState,
    values: Vec<ValueBlob>,
    functions: Vec<FunctionBlob>,
}

impl ElementBuilder for EnumBuilder {
    fn parse(
        &mut self,
        result: &mut ParserResult,
        kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<()> {
        self.blob.common = collect_common(result, attrs, BlobKind::Enum)?;
        self.blob.is_flags = kind == ElementKind::Bitfield;
        self.blob.c_type = attrs.intern(result.strings_mut(), "c:type");
        self.blob.g_type_name = attrs.intern(result.strings_mut(), "glib:type-name");
        self.blob.g_get_type = attrs.intern(result.strings_mut(), "glib:get-type");
        self.blob.error_domain = attrs.intern(result.strings_mut(), "glib:error-domain");
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
            k => Dispatch::masked(mask::ENUM, k),
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
            Finished::Value(blob) => self.values.push(blob),
            Finished::Function(blob) => self.functions.push(blob),
            Finished::Doc(piece) => self.doc.absorb(result, piece),
            _ => {}
        }
        Ok(None)
    }

    fn finish(&mut self, result: &mut ParserResult) -> Finished {
        self.blob.common.doc = self.doc.finish(result);
        self.blob.values = flush_run(result, &mut self.values, |r, b| r.add_value(b));
        self.blob.functions = flush_run(result, &mut self.functions, |r, b| r.add_function(b));
        Finished::Enum(self.blob)
    }

    fn index(&self, result: &mut ParserResult, position: u32) {
        if let Some(name) = result.string(self.blob.common.name)
            && !name.is_empty()
        {
            let name = name.to_owned();
            result.add_object_index(&name, BlobKind::Enum, position);
        }
        if let Some(g_type) = result.string(self.blob.g_type_name)
            && !g_type.is_empty()
        {
            let g_type = g_type.to_owned();
            result.add_global_index(&g_type, position, PrefixKind::GType, BlobKind::Enum, false);
        }
    }

    fn reset(&mut self) {
        self.blob = EnumBlob::default();
        self.doc.reset();
        self.values.clear();
        self.functions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ValueBuilder;
    use quick_xml::events::BytesStart;

    fn push_member(b: &mut EnumBuilder, result: &mut ParserResult, name: &str, value: i64) {
        let input = b"<member/>";
        let mut child = ValueBuilder::default();
        let e = BytesStart::from_content(format!(r#"member name="{name}" value="{value}""#), 6);
        let attrs = Attrs::from_start(input, &e, 0).unwrap();
        child.parse(result, ElementKind::Member, &attrs).unwrap();
        let finished = child.finish(result);
        b.child_finished(result, ElementKind::Member, finished, Ctx::new(input, 0))
            .unwrap();
    }

    #[test]
    fn members_flush_in_document_order() {
        let input = b"<enumeration/>";
        let mut result = ParserResult::new("t.gir");
        let mut b = EnumBuilder::default();
        let e = BytesStart::from_content(
            r#"enumeration name="Orientation" glib:type-name="GtkOrientation""#,
            11,
        );
        let attrs = Attrs::from_start(input, &e, 0).unwrap();
        b.parse(&mut result, ElementKind::Enumeration, &attrs).unwrap();

        push_member(&mut b, &mut result, "horizontal", 0);
        push_member(&mut b, &mut result, "vertical", 1);

        let Finished::Enum(blob) = b.finish(&mut result) else {
            panic!("expected enum blob");
        };
        assert!(!blob.is_flags);
        assert_eq!(blob.values.count, 2);
        let values = result.values();
        assert_eq!(
            result.string(values[blob.values.base as usize].common.name),
            Some("horizontal"),
        );
        assert_eq!(values[blob.values.base as usize + 1].value, 1);
    }

    #[test]
    fn bitfield_sets_flags() {
        let input = b"<bitfield/>";
        let mut result = ParserResult::new("t.gir");
        let mut b = EnumBuilder::default();
        let e = BytesStart::from_content(r#"bitfield name="StateFlags""#, 8);
        let attrs = Attrs::from_start(input, &e, 0).unwrap();
        b.parse(&mut result, ElementKind::Bitfield, &attrs).unwrap();
        let Finished::Enum(blob) = b.finish(&mut result) else {
            panic!("expected enum blob");
        };
        assert!(blob.is_flags);
    }

    #[test]
    fn index_publishes_gtype() {
        let input = b"<enumeration/>";
        let mut result = ParserResult::new("t.gir");
        let mut b = EnumBuilder::default();
        let e = BytesStart::from_content(
            r#"enumeration name="Orientation" glib:type-name="GtkOrientation""#,
            11,
        );
        let attrs = Attrs::from_start(input, &e, 0).unwrap();
        b.parse(&mut result, ElementKind::Enumeration, &attrs).unwrap();
        let Finished::Enum(blob) = b.finish(&mut result) else {
            panic!("expected enum blob");
        };
        let position = result.add_enum(blob);
        b.index(&mut result, position);

        let entries = result.object_index().lookup("Orientation").unwrap();
        assert_eq!(entries[0].kind, BlobKind::Enum);
        assert_eq!(entries[0].offset, position);
        let global = result.global_index();
        assert_eq!(global.len(), 1);
        assert_eq!(global[0].prefix, PrefixKind::GType);
        assert_eq!(global[0].name, "GtkOrientation");
        assert_eq!(global[0].object_offset, position);
    }
}
