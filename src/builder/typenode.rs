//! `<type>` und `<array>` Knoten.
//!
//! Beide Schreibweisen teilen sich einen Builder; verschachtelte
//! Typ-Parameter (Listen-Element, Map-Key/Value) werden sofort verbucht
//! und als [`TypeRef`] in den äußeren Knoten eingetragen.

use crate::attrs::Attrs;
use crate::blob::{ArrayBlob, BasicType, TypeBlob};
use crate::element::{ElementKind, mask};
use crate::error::Result;
use crate::result::ParserResult;

use super::{Ctx, Dispatch, ElementBuilder, Finished, store_type_child};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Mode {
    #[default]
    Plain,
    Array,
}

#[derive(Default)]
pub struct TypeBuilder {
    mode: Mode,
    type_blob: TypeBlob,
    array_blob: ArrayBlob,
}

impl ElementBuilder for TypeBuilder {
    fn parse(
        &mut self,
        result: &mut ParserResult,
        kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<()> {
        if kind == ElementKind::Array {
            self.mode = Mode::Array;
            let kind = match BasicType::from_gir_name(attrs.get("name").unwrap_or("")) {
                k @ (BasicType::GArray | BasicType::GPtrArray | BasicType::GByteArray) => k,
                _ => BasicType::CArray,
            };
            self.array_blob.array_kind = kind;
            self.array_blob.zero_terminated = attrs.boolean("zero-terminated", false);
            let size = attrs.int64("fixed-size", -1)?;
            self.array_blob.has_size = size >= 0;
            self.array_blob.size = size.max(0) as u32;
            let length = attrs.int64("length", -1)?;
            self.array_blob.has_length = length >= 0;
            self.array_blob.length = length.max(0) as u32;
            self.array_blob.c_type = attrs.intern(result.strings_mut(), "c:type");
        } else {
            self.mode = Mode::Plain;
            self.type_blob.basic = BasicType::from_gir_name(attrs.get("name").unwrap_or(""));
            self.type_blob.name = attrs.intern(result.strings_mut(), "name");
            self.type_blob.c_type = attrs.intern(result.strings_mut(), "c:type");
        }
        Ok(())
    }

    fn start_child(
        &mut self,
        _result: &mut ParserResult,
        kind: ElementKind,
        _attrs: &Attrs<'_>,
    ) -> Result<Dispatch> {
        Ok(Dispatch::masked(mask::TYPE, kind))
    }

    fn child_finished(
        &mut self,
        result: &mut ParserResult,
        _kind: ElementKind,
        finished: Finished,
        ctx: Ctx<'_>,
    ) -> Result<Option<u32>> {
        match self.mode {
            Mode::Array => {
                store_type_child(result, &mut self.array_blob.element, finished, ctx)?;
            }
            Mode::Plain => {
                let reference = match finished {
                    Finished::Type(blob) => result.add_type(blob),
                    Finished::Array(blob) => result.add_array(blob),
                    _ => return Ok(None),
                };
                let n = self.type_blob.n_inner as usize;
                if n < self.type_blob.inner.len() {
                    self.type_blob.inner[n] = reference;
                    self.type_blob.n_inner += 1;
                } else {
                    log::warn!("<type> with more than two inner types, extra one dropped");
                }
            }
        }
        Ok(None)
    }

    fn finish(&mut self, _result: &mut ParserResult) -> Finished {
        match self.mode {
            Mode::Plain => Finished::Type(self.type_blob),
            Mode::Array => Finished::Array(self.array_blob),
        }
    }

    fn reset(&mut self) {
        self.mode = Mode::Plain;
        self.type_blob = TypeBlob::default();
        self.array_blob = ArrayBlob::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::Attrs;
    use crate::blob::TypeRef;
    use quick_xml::events::BytesStart;

    fn attrs<'a>(e: &'a BytesStart<'a>, input: &'a [u8]) -> Attrs<'a> {
        Attrs::from_start(input, e, 0).unwrap()
    }

    #[test]
    fn fundamental_type() {
        let mut result = ParserResult::new("t.gir");
        let mut b = TypeBuilder::default();
        let e = BytesStart::from_content(r#"type name="utf8" c:type="gchar*""#, 4);
        b.parse(&mut result, ElementKind::Type, &attrs(&e, b"<x/>"))
            .unwrap();
        let Finished::Type(blob) = b.finish(&mut result) else {
            panic!("expected type blob");
        };
        assert_eq!(blob.basic, BasicType::Utf8);
        assert_eq!(result.string(blob.name), Some("utf8"));
        assert_eq!(result.string(blob.c_type), Some("gchar*"));
    }

    /// Nicht-fundamentale Typen bleiben benannt; aufgelöst wird später
    /// über den Namen.
    #[test]
    fn named_type() {
        let mut result = ParserResult::new("t.gir");
        let mut b = TypeBuilder::default();
        let e = BytesStart::from_content(r#"type name="Gdk.Pixbuf""#, 4);
        b.parse(&mut result, ElementKind::Type, &attrs(&e, b"<x/>"))
            .unwrap();
        let Finished::Type(blob) = b.finish(&mut result) else {
            panic!("expected type blob");
        };
        assert_eq!(blob.basic, BasicType::Named);
        assert_eq!(result.string(blob.name), Some("Gdk.Pixbuf"));
    }

    #[test]
    fn array_collects_attributes() {
        let mut result = ParserResult::new("t.gir");
        let mut b = TypeBuilder::default();
        let e = BytesStart::from_content(
            r#"array zero-terminated="1" length="2" c:type="gchar**""#,
            5,
        );
        b.parse(&mut result, ElementKind::Array, &attrs(&e, b"<x/>"))
            .unwrap();
        let Finished::Array(blob) = b.finish(&mut result) else {
            panic!("expected array blob");
        };
        assert_eq!(blob.array_kind, BasicType::CArray);
        assert!(blob.zero_terminated);
        assert!(blob.has_length);
        assert_eq!(blob.length, 2);
        assert!(!blob.has_size);
    }

    #[test]
    fn array_element_type_set_once() {
        let input = b"<array><type name=\"utf8\"/><type name=\"gint\"/></array>";
        let mut result = ParserResult::new("t.gir");
        let mut b = TypeBuilder::default();
        let e = BytesStart::from_content("array", 5);
        b.parse(&mut result, ElementKind::Array, &attrs(&e, input))
            .unwrap();

        let mut child = TypeBuilder::default();
        let t = BytesStart::from_content(r#"type name="utf8""#, 4);
        child
            .parse(&mut result, ElementKind::Type, &attrs(&t, input))
            .unwrap();
        let finished = child.finish(&mut result);
        b.child_finished(&mut result, ElementKind::Type, finished, Ctx::new(input, 7))
            .unwrap();

        let mut second = TypeBuilder::default();
        second
            .parse(&mut result, ElementKind::Type, &attrs(&t, input))
            .unwrap();
        let finished = second.finish(&mut result);
        let err = b
            .child_finished(&mut result, ElementKind::Type, finished, Ctx::new(input, 26))
            .unwrap_err();
        assert!(err.to_string().contains("type_ref already set"), "{err}");

        let Finished::Array(blob) = b.finish(&mut result) else {
            panic!("expected array blob");
        };
        assert_ne!(blob.element, TypeRef::NONE);
        assert_eq!(blob.element.kind, BasicType::Utf8);
    }

    /// GLib.List\<utf8\> artige Typen: innere Parameter, höchstens zwei.
    #[test]
    fn plain_type_keeps_two_inner_parameters() {
        let input = b"<type/>";
        let mut result = ParserResult::new("t.gir");
        let mut b = TypeBuilder::default();
        let e = BytesStart::from_content(r#"type name="GLib.HashTable""#, 4);
        b.parse(&mut result, ElementKind::Type, &attrs(&e, input))
            .unwrap();

        for name in ["utf8", "gint", "gdouble"] {
            let mut child = TypeBuilder::default();
            let t = BytesStart::from_content(format!(r#"type name="{name}""#), 4);
            child
                .parse(&mut result, ElementKind::Type, &attrs(&t, input))
                .unwrap();
            let finished = child.finish(&mut result);
            b.child_finished(&mut result, ElementKind::Type, finished, Ctx::new(input, 0))
                .unwrap();
        }

        let Finished::Type(blob) = b.finish(&mut result) else {
            panic!("expected type blob");
        };
        assert_eq!(blob.n_inner, 2);
        assert_eq!(blob.inner[0].kind, BasicType::Utf8);
        assert_eq!(blob.inner[1].kind, BasicType::Int);
    }
}
