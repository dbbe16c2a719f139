//! Accumulated output of one .gir parse.
//!
//! Der [`ParserResult`] sammelt alles, was ein Scan eines Dokuments
//! produziert: die vier String-Pools, sechzehn Blob-Tabellen, den
//! Objekt-Index, den globalen Namens-Index und die Liste unaufgeloester
//! Querverweise. Er validiert nichts und loest nichts auf; beides ist
//! Sache spaeterer Passes. Alle `add_*` geben den Offset des neuen
//! Eintrags zurueck, Offsets wachsen strikt monoton.

use core::mem::size_of;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::blob::{
    AliasBlob, ArrayBlob, BasicType, BlobKind, CallbackBlob, ConstantBlob, CrossRef, DocBlob,
    DocOffset, EnumBlob, FieldBlob, FunctionBlob, HeaderBlob, NsTable, ObjectBlob, ParameterBlob,
    PrefixKind, PropertyBlob, RecordBlob, SignalBlob, StringOffset, TypeBlob, TypeRef, UnionBlob,
    ValueBlob,
};
use crate::radix_tree::RadixTree;
use crate::string_pool::StringPool;

/// Payload des Objekt-Index: wo ein Namespace-Objekt abgelegt wurde.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRef {
    pub kind: BlobKind,
    pub offset: u32,
}

/// One entry of the namespace-global name index; merged into a shared
/// lookup structure by downstream tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalIndexEntry {
    pub name: String,
    pub object_offset: u32,
    pub prefix: PrefixKind,
    pub kind: BlobKind,
    pub is_buildable: bool,
}

#[derive(Debug)]
pub struct ParserResult {
    file: PathBuf,

    header_strings: StringPool,
    strings: StringPool,
    doc_strings: StringPool,
    annotation_strings: StringPool,

    aliases: Vec<AliasBlob>,
    arrays: Vec<ArrayBlob>,
    callbacks: Vec<CallbackBlob>,
    constants: Vec<ConstantBlob>,
    docs: Vec<DocBlob>,
    enums: Vec<EnumBlob>,
    fields: Vec<FieldBlob>,
    functions: Vec<FunctionBlob>,
    objects: Vec<ObjectBlob>,
    parameters: Vec<ParameterBlob>,
    properties: Vec<PropertyBlob>,
    records: Vec<RecordBlob>,
    signals: Vec<SignalBlob>,
    types: Vec<TypeBlob>,
    unions: Vec<UnionBlob>,
    values: Vec<ValueBlob>,

    header: Option<HeaderBlob>,
    object_index: RadixTree<ObjectRef>,
    global_index: Vec<GlobalIndexEntry>,
    crossrefs: Vec<CrossRef>,
    unhandled: Vec<String>,
}

impl ParserResult {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            header_strings: StringPool::new(),
            strings: StringPool::new(),
            doc_strings: StringPool::new(),
            annotation_strings: StringPool::new(),
            aliases: Vec::new(),
            arrays: Vec::new(),
            callbacks: Vec::new(),
            constants: Vec::new(),
            docs: Vec::new(),
            enums: Vec::new(),
            fields: Vec::new(),
            functions: Vec::new(),
            objects: Vec::new(),
            parameters: Vec::new(),
            properties: Vec::new(),
            records: Vec::new(),
            signals: Vec::new(),
            types: Vec::new(),
            unions: Vec::new(),
            values: Vec::new(),
            header: None,
            object_index: RadixTree::new(),
            global_index: Vec::new(),
            crossrefs: Vec::new(),
            unhandled: Vec::new(),
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    // ---- String-Pools --------------------------------------------------

    pub fn add_string(&mut self, s: &str) -> StringOffset {
        self.strings.add(s)
    }

    pub fn add_header_string(&mut self, s: &str) -> StringOffset {
        self.header_strings.add(s)
    }

    pub fn add_doc_string(&mut self, s: &str) -> StringOffset {
        self.doc_strings.add(s)
    }

    pub fn add_annotation_string(&mut self, s: &str) -> StringOffset {
        self.annotation_strings.add(s)
    }

    pub fn string(&self, offset: StringOffset) -> Option<&str> {
        self.strings.get(offset)
    }

    pub fn header_string(&self, offset: StringOffset) -> Option<&str> {
        self.header_strings.get(offset)
    }

    pub fn doc_string(&self, offset: StringOffset) -> Option<&str> {
        self.doc_strings.get(offset)
    }

    pub fn annotation_string(&self, offset: StringOffset) -> Option<&str> {
        self.annotation_strings.get(offset)
    }

    /// Direkter Pool-Zugriff fuer das Internieren beim Attribut-Einsammeln.
    pub fn strings_mut(&mut self) -> &mut StringPool {
        &mut self.strings
    }

    pub fn header_strings_mut(&mut self) -> &mut StringPool {
        &mut self.header_strings
    }

    pub fn doc_strings_mut(&mut self) -> &mut StringPool {
        &mut self.doc_strings
    }

    // ---- Header --------------------------------------------------------

    /// Wird gesetzt, sobald `<namespace>` oeffnet, damit verschachtelte
    /// Builder ueber [`Self::namespace`] qualifizieren koennen.
    pub fn set_header(&mut self, header: HeaderBlob) {
        self.header = Some(header);
    }

    pub fn header(&self) -> Option<&HeaderBlob> {
        self.header.as_ref()
    }

    pub fn namespace(&self) -> &str {
        self.header
            .as_ref()
            .and_then(|h| self.header_strings.get(h.namespace))
            .unwrap_or("")
    }

    /// "Widget" -> "Gtk.Widget". Namen mit Punkt sind schon qualifiziert.
    pub fn qualify(&self, name: &str) -> String {
        let ns = self.namespace();
        if ns.is_empty() || name.contains('.') {
            name.to_owned()
        } else {
            format!("{ns}.{name}")
        }
    }

    // ---- Blob-Tabellen -------------------------------------------------

    pub fn add_alias(&mut self, blob: AliasBlob) -> u32 {
        push(&mut self.aliases, blob)
    }

    /// Liefert gleich die [`TypeRef`], unter der Eltern-Knoten das Array
    /// referenzieren.
    pub fn add_array(&mut self, blob: ArrayBlob) -> TypeRef {
        let kind = blob.array_kind;
        let offset = push(&mut self.arrays, blob);
        TypeRef { kind, offset }
    }

    pub fn add_callback(&mut self, blob: CallbackBlob) -> TypeRef {
        let offset = push(&mut self.callbacks, blob);
        TypeRef {
            kind: BasicType::Callback,
            offset,
        }
    }

    pub fn add_constant(&mut self, blob: ConstantBlob) -> u32 {
        push(&mut self.constants, blob)
    }

    pub fn add_doc(&mut self, blob: DocBlob) -> DocOffset {
        push(&mut self.docs, blob) as DocOffset
    }

    pub fn add_enum(&mut self, blob: EnumBlob) -> u32 {
        push(&mut self.enums, blob)
    }

    pub fn add_field(&mut self, blob: FieldBlob) -> u32 {
        push(&mut self.fields, blob)
    }

    pub fn add_function(&mut self, blob: FunctionBlob) -> u32 {
        push(&mut self.functions, blob)
    }

    pub fn add_object(&mut self, blob: ObjectBlob) -> u32 {
        push(&mut self.objects, blob)
    }

    pub fn add_parameter(&mut self, blob: ParameterBlob) -> u32 {
        push(&mut self.parameters, blob)
    }

    pub fn add_property(&mut self, blob: PropertyBlob) -> u32 {
        push(&mut self.properties, blob)
    }

    pub fn add_record(&mut self, blob: RecordBlob) -> u32 {
        push(&mut self.records, blob)
    }

    pub fn add_signal(&mut self, blob: SignalBlob) -> u32 {
        push(&mut self.signals, blob)
    }

    pub fn add_type(&mut self, blob: TypeBlob) -> TypeRef {
        let kind = blob.basic;
        let offset = push(&mut self.types, blob);
        TypeRef { kind, offset }
    }

    pub fn add_union(&mut self, blob: UnionBlob) -> u32 {
        push(&mut self.unions, blob)
    }

    pub fn add_value(&mut self, blob: ValueBlob) -> u32 {
        push(&mut self.values, blob)
    }

    pub fn aliases(&self) -> &[AliasBlob] {
        &self.aliases
    }

    pub fn arrays(&self) -> &[ArrayBlob] {
        &self.arrays
    }

    pub fn callbacks(&self) -> &[CallbackBlob] {
        &self.callbacks
    }

    pub fn constants(&self) -> &[ConstantBlob] {
        &self.constants
    }

    pub fn docs(&self) -> &[DocBlob] {
        &self.docs
    }

    pub fn enums(&self) -> &[EnumBlob] {
        &self.enums
    }

    pub fn fields(&self) -> &[FieldBlob] {
        &self.fields
    }

    pub fn functions(&self) -> &[FunctionBlob] {
        &self.functions
    }

    pub fn objects(&self) -> &[ObjectBlob] {
        &self.objects
    }

    pub fn parameters(&self) -> &[ParameterBlob] {
        &self.parameters
    }

    pub fn properties(&self) -> &[PropertyBlob] {
        &self.properties
    }

    pub fn records(&self) -> &[RecordBlob] {
        &self.records
    }

    pub fn signals(&self) -> &[SignalBlob] {
        &self.signals
    }

    pub fn types(&self) -> &[TypeBlob] {
        &self.types
    }

    pub fn unions(&self) -> &[UnionBlob] {
        &self.unions
    }

    pub fn values(&self) -> &[ValueBlob] {
        &self.values
    }

    // ---- Querverweise und Indizes --------------------------------------

    /// `qname` muss qualifiziert sein ("Ns.Name"); der Name wird in den
    /// General-Pool interniert, zurueck kommt der Crossref-Index.
    pub fn add_crossref(&mut self, kind_hint: BlobKind, qname: &str, is_local: bool) -> u32 {
        debug_assert!(qname.contains('.'), "unqualified crossref {qname:?}");
        let offset = self.crossrefs.len() as u32;
        let qname = self.strings.add(qname);
        self.crossrefs.push(CrossRef {
            kind_hint,
            qname,
            is_local,
        });
        offset
    }

    pub fn crossrefs(&self) -> &[CrossRef] {
        &self.crossrefs
    }

    pub fn add_object_index(&mut self, name: &str, kind: BlobKind, offset: u32) {
        debug_assert!(!name.is_empty());
        self.object_index.insert(name, ObjectRef { kind, offset });
    }

    pub fn object_index(&self) -> &RadixTree<ObjectRef> {
        &self.object_index
    }

    pub fn add_global_index(
        &mut self,
        name: &str,
        object_offset: u32,
        prefix: PrefixKind,
        kind: BlobKind,
        is_buildable: bool,
    ) {
        debug_assert!(!name.is_empty());
        self.global_index.push(GlobalIndexEntry {
            name: name.to_owned(),
            object_offset,
            prefix,
            kind,
            is_buildable,
        });
    }

    pub fn global_index(&self) -> &[GlobalIndexEntry] {
        &self.global_index
    }

    /// Nicht zugeordnete Element-Namen samt Unterbaum uebersprungen;
    /// hier nur protokolliert, die Datei gilt weiter als brauchbar.
    pub fn record_unhandled(&mut self, element: &str) {
        self.unhandled.push(element.to_owned());
    }

    pub fn unhandled_elements(&self) -> &[String] {
        &self.unhandled
    }

    // ---- Statistik -----------------------------------------------------

    pub fn stats(&self) -> Stats {
        let mut rows = Vec::new();
        for table in NsTable::ALL {
            let (nb, size) = self.table_size(table);
            if nb > 0 {
                rows.push(StatsRow {
                    label: table.name(),
                    nb,
                    size,
                });
            }
        }
        let tables_total: usize = rows.iter().map(|r| r.size).sum();

        rows.push(StatsRow {
            label: "crossrefs",
            nb: self.crossrefs.len(),
            size: self.crossrefs.len() * size_of::<CrossRef>(),
        });
        rows.push(StatsRow {
            label: "strings",
            nb: self.strings.count() as usize,
            size: self.strings.byte_len(),
        });
        rows.push(StatsRow {
            label: "doc strings",
            nb: self.doc_strings.count() as usize,
            size: self.doc_strings.byte_len(),
        });
        rows.push(StatsRow {
            label: "annotation strings",
            nb: self.annotation_strings.count() as usize,
            size: self.annotation_strings.byte_len(),
        });

        Stats {
            file: self.file.clone(),
            namespace: self.namespace().to_owned(),
            total: tables_total
                + self.crossrefs.len() * size_of::<CrossRef>()
                + self.strings.byte_len()
                + self.doc_strings.byte_len()
                + self.annotation_strings.byte_len(),
            tables_total,
            rows,
        }
    }

    fn table_size(&self, table: NsTable) -> (usize, usize) {
        fn m<T>(v: &[T]) -> (usize, usize) {
            (v.len(), v.len() * size_of::<T>())
        }
        match table {
            NsTable::Alias => m(&self.aliases),
            NsTable::Array => m(&self.arrays),
            NsTable::Callback => m(&self.callbacks),
            NsTable::Constant => m(&self.constants),
            NsTable::Doc => m(&self.docs),
            NsTable::Enum => m(&self.enums),
            NsTable::Field => m(&self.fields),
            NsTable::Function => m(&self.functions),
            NsTable::Object => m(&self.objects),
            NsTable::Parameter => m(&self.parameters),
            NsTable::Property => m(&self.properties),
            NsTable::Record => m(&self.records),
            NsTable::Signal => m(&self.signals),
            NsTable::Type => m(&self.types),
            NsTable::Union => m(&self.unions),
            NsTable::Value => m(&self.values),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatsRow {
    pub label: &'static str,
    pub nb: usize,
    pub size: usize,
}

/// Groessenaufstellung eines Resultats, formatiert wie ein Tabellen-Dump:
/// eine Zeile pro nicht-leerer Tabelle plus Crossrefs und Pools.
#[derive(Debug, Clone)]
pub struct Stats {
    pub file: PathBuf,
    pub namespace: String,
    pub total: usize,
    pub tables_total: usize,
    pub rows: Vec<StatsRow>,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = |size: usize| {
            if self.total == 0 {
                0.0
            } else {
                size as f64 / self.total as f64 * 100.0
            }
        };
        writeln!(f, "file:{}", self.file.display())?;
        writeln!(f, "namespace:{}", self.namespace)?;
        writeln!(
            f,
            "total size:{} tables size:{} ({:.2}%)",
            self.total,
            self.tables_total,
            pct(self.tables_total)
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<20} nb:{:>6} size:{:>6} ({:>5.2}%)",
                row.label,
                row.nb,
                row.size,
                pct(row.size)
            )?;
        }
        Ok(())
    }
}

fn push<T>(table: &mut Vec<T>, blob: T) -> u32 {
    let offset = table.len() as u32;
    table.push(blob);
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::CommonBlob;

    fn result() -> ParserResult {
        ParserResult::new("Gtk-4.0.gir")
    }

    #[test]
    fn pools_are_independent() {
        let mut r = result();
        let a = r.add_string("show");
        let b = r.add_doc_string("show");
        assert_eq!(a, 1);
        assert_eq!(b, 1);
        assert_eq!(r.string(a), Some("show"));
        assert_eq!(r.doc_string(b), Some("show"));
        assert_eq!(r.annotation_string(1), None);
    }

    #[test]
    fn namespace_resolves_through_header_pool() {
        let mut r = result();
        assert_eq!(r.namespace(), "");
        let ns = r.add_header_string("Gtk");
        r.set_header(HeaderBlob {
            namespace: ns,
            ..HeaderBlob::default()
        });
        assert_eq!(r.namespace(), "Gtk");
        assert_eq!(r.qualify("Widget"), "Gtk.Widget");
        // Bereits qualifizierte Namen bleiben unangetastet.
        assert_eq!(r.qualify("GObject.Object"), "GObject.Object");
    }

    #[test]
    fn table_offsets_grow_monotonically() {
        let mut r = result();
        let first = r.add_function(FunctionBlob::default());
        let second = r.add_function(FunctionBlob::default());
        assert_eq!((first, second), (0, 1));
        assert_eq!(r.functions().len(), 2);
    }

    #[test]
    fn add_type_returns_a_typed_ref() {
        let mut r = result();
        let blob = TypeBlob {
            basic: BasicType::Utf8,
            ..TypeBlob::default()
        };
        let typeref = r.add_type(blob);
        assert_eq!(typeref.kind, BasicType::Utf8);
        assert_eq!(typeref.offset, 0);
        let cb = r.add_callback(CallbackBlob::default());
        assert_eq!(cb.kind, BasicType::Callback);
    }

    #[test]
    fn crossref_interns_the_qualified_name() {
        let mut r = result();
        let first = r.add_crossref(BlobKind::Unknown, "GObject.Object", true);
        let second = r.add_crossref(BlobKind::Class, "Gtk.Widget", false);
        assert_eq!((first, second), (0, 1));
        let refs = r.crossrefs();
        assert_eq!(r.string(refs[0].qname), Some("GObject.Object"));
        assert!(refs[0].is_local);
        assert!(!refs[1].is_local);
    }

    #[test]
    fn object_index_lookup() {
        let mut r = result();
        r.add_object_index("Widget", BlobKind::Class, 7);
        let payloads = r.object_index().lookup("Widget").unwrap();
        assert_eq!(
            payloads,
            &[ObjectRef {
                kind: BlobKind::Class,
                offset: 7
            }]
        );
    }

    #[test]
    fn stats_lists_only_populated_tables() {
        let mut r = result();
        r.add_object(ObjectBlob {
            common: CommonBlob::default(),
            ..ObjectBlob::default()
        });
        let stats = r.stats();
        let labels: Vec<&str> = stats.rows.iter().map(|row| row.label).collect();
        assert!(labels.contains(&"object"));
        assert!(!labels.contains(&"alias"));
        // Crossrefs und Pools stehen immer drin.
        assert!(labels.contains(&"crossrefs"));
        let text = format!("{stats}");
        assert!(text.contains("namespace:"), "{text}");
    }
}
