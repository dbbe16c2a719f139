//! `<repository>` samt `<namespace>`, `<include>`, `<c:include>` und
//! `<package>`.
//!
//! Der Header-Builder ist der Wurzel-Builder einer Datei: er sammelt
//! die Metadaten in den Header-Pool und reicht jedes Namespace-Kind an
//! dessen Builder weiter. Der Header wird schon beim Namespace-Start
//! gesetzt, weil die Kinder auf Namespace-Name und Version zugreifen.
//!
//! Einige Bibliotheken (Rygel) legen Enumerationen und Konstanten
//! direkt unter `<repository>` ab; die werden geparst, aber nicht
//! verbucht.

use crate::attrs::Attrs;
use crate::blob::{BlobKind, HeaderBlob, PrefixKind};
use crate::element::{ElementKind, mask};
use crate::error::Result;
use crate::result::ParserResult;

use super::{Ctx, Dispatch, ElementBuilder, Finished};

#[derive(Default)]
pub struct HeaderBuilder {
    blob: HeaderBlob,
    includes: String,
    c_includes: String,
    packages: String,
    in_namespace: bool,
}

/// Strikte Versions-Zerlegung: "major[.minor[.micro]]", jede Komponente
/// unter 256, kein Rest danach.
fn parse_version(version: &str) -> Option<(u16, u16, u16)> {
    let mut parts = version.splitn(3, '.');
    let major: u16 = parts.next()?.parse().ok().filter(|&c| c < 0x100)?;
    let minor = match parts.next() {
        None => 0,
        Some(p) => p.parse().ok().filter(|&c| c < 0x100)?,
    };
    let micro = match parts.next() {
        None => 0,
        Some(p) => p.parse().ok().filter(|&c| c < 0x100)?,
    };
    Some((major, minor, micro))
}

fn comma_append(buffer: &mut String, part: &str) {
    if !buffer.is_empty() {
        buffer.push(',');
    }
    buffer.push_str(part);
}

impl HeaderBuilder {
    fn parse_namespace(&mut self, result: &mut ParserResult, attrs: &Attrs<'_>) {
        let nsversion = attrs.get("version").unwrap_or("");
        if let Some((major, minor, _)) = parse_version(nsversion) {
            self.blob.nsversion_major = major as u8;
            self.blob.nsversion_minor = minor as u8;
        } else if !nsversion.is_empty() {
            log::warn!("unparsable namespace version {nsversion:?}");
        }

        self.blob.namespace = attrs.intern(result.header_strings_mut(), "name");
        self.blob.nsversion = attrs.intern(result.header_strings_mut(), "version");
        self.blob.shared_library = attrs.intern(result.header_strings_mut(), "shared-library");
        self.blob.c_symbol_prefixes =
            attrs.intern(result.header_strings_mut(), "c:symbol-prefixes");

        let identifier_prefixes = attrs.get("c:identifier-prefixes").unwrap_or("");
        let c_prefix = attrs.get("c:prefix").unwrap_or("");
        let joined = match (identifier_prefixes.is_empty(), c_prefix.is_empty()) {
            (true, true) => None,
            (false, true) => Some(identifier_prefixes.to_owned()),
            (true, false) => Some(c_prefix.to_owned()),
            (false, false) => Some(format!("{identifier_prefixes},{c_prefix}")),
        };
        self.blob.c_identifier_prefixes = match joined {
            Some(prefixes) => result.add_header_string(&prefixes),
            None => 0,
        };

        // Unvollständig, aber die Kinder brauchen Namespace und Version
        // schon während des Parsens.
        result.set_header(self.blob);
        self.in_namespace = true;
    }

    fn parse_include(&mut self, kind: ElementKind, attrs: &Attrs<'_>) {
        let name = attrs.get("name").unwrap_or("");
        if kind == ElementKind::CInclude {
            comma_append(&mut self.c_includes, name);
        } else {
            let version = attrs.get("version").unwrap_or("");
            comma_append(&mut self.includes, &format!("{name}:{version}"));
        }
    }
}

impl ElementBuilder for HeaderBuilder {
    fn parse(
        &mut self,
        _result: &mut ParserResult,
        _kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<()> {
        let version = attrs.get("version").unwrap_or("");
        if let Some((major, minor, _)) = parse_version(version) {
            self.blob.repository_major = major;
            self.blob.repository_minor = minor;
        } else if !version.is_empty() {
            log::warn!("unparsable repository version {version:?}");
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
        if self.in_namespace {
            return Ok(Dispatch::masked(mask::NAMESPACE, kind));
        }
        Ok(match kind {
            K::Include | K::CInclude => {
                self.parse_include(kind, attrs);
                Dispatch::Inline
            }
            K::Package => {
                comma_append(&mut self.packages, attrs.get("name").unwrap_or(""));
                Dispatch::Inline
            }
            K::Namespace => {
                self.parse_namespace(result, attrs);
                Dispatch::Inline
            }
            // Rygel legt Enumerationen und Konstanten direkt unter
            // <repository> ab; geparst, aber nie verbucht.
            k => Dispatch::masked(mask::REPOSITORY, k),
        })
    }

    fn end_inline(
        &mut self,
        _result: &mut ParserResult,
        kind: ElementKind,
        _ctx: Ctx<'_>,
    ) -> Result<()> {
        if kind == ElementKind::Namespace {
            self.in_namespace = false;
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
        if !self.in_namespace {
            return Ok(None);
        }
        let offset = match finished {
            Finished::Alias(blob) => result.add_alias(blob),
            Finished::Callback(blob) => result.add_callback(blob).offset,
            Finished::Constant(blob) => result.add_constant(blob),
            Finished::Enum(blob) => result.add_enum(blob),
            Finished::Function(blob) => result.add_function(blob),
            Finished::Object(blob) => result.add_object(blob),
            Finished::Record(blob) => result.add_record(blob),
            Finished::Union(blob) => result.add_union(blob),
            _ => return Ok(None),
        };
        Ok(Some(offset))
    }

    fn finish(&mut self, result: &mut ParserResult) -> Finished {
        if !self.c_includes.is_empty() {
            self.blob.c_includes = result.add_header_string(&self.c_includes);
        }
        if !self.includes.is_empty() {
            self.blob.includes = result.add_header_string(&self.includes);
        }
        if !self.packages.is_empty() {
            self.blob.packages = result.add_header_string(&self.packages);
        }
        Finished::Header(self.blob)
    }

    fn index(&self, result: &mut ParserResult, position: u32) {
        if let Some(namespace) = result.header_string(self.blob.namespace)
            && !namespace.is_empty()
        {
            let namespace = namespace.to_owned();
            result.add_global_index(
                &namespace,
                position,
                PrefixKind::Namespace,
                BlobKind::Header,
                false,
            );
        }
        for (offset, prefix) in [
            (self.blob.packages, PrefixKind::Package),
            (self.blob.c_symbol_prefixes, PrefixKind::Symbol),
            (self.blob.c_identifier_prefixes, PrefixKind::Identifier),
        ] {
            let Some(joined) = result.header_string(offset) else {
                continue;
            };
            let parts: Vec<String> = joined
                .split(',')
                .filter(|p| !p.is_empty())
                .map(str::to_owned)
                .collect();
            for part in parts {
                result.add_global_index(&part, position, prefix, BlobKind::Header, false);
            }
        }
    }

    fn reset(&mut self) {
        self.blob = HeaderBlob::default();
        self.includes.clear();
        self.c_includes.clear();
        self.packages.clear();
        self.in_namespace = false;
    }
}
