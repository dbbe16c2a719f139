//! Blob model: fixed-layout records, one shape per gir concept, plus the
//! small closed attribute enums and their canonical name tables.
//!
//! Blobs werden by-value in wachsenden Tabellen abgelegt; Querbezuege sind
//! ausschliesslich Integer-Offsets ([`StringOffset`], Tabellen-Offsets,
//! [`TypeRef`]), nie Zeiger. Innerhalb eines Parses sind alle Tabellen
//! append-only, Offsets damit stabil.

/// Byte-Offset in einen der vier String-Pools. Offset 0 ist immer der
/// leere String.
pub type StringOffset = u32;

/// Offset in die Doc-Tabelle, -1 = kein Doc-Blob.
pub type DocOffset = i32;

/// Contiguous run of child blobs in a shared per-kind table:
/// `base..base + count`. An empty run is all zeroes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Run {
    pub base: u32,
    pub count: u32,
}

impl Run {
    pub const fn is_empty(self) -> bool {
        self.count == 0
    }
}

/// Stability classification of an API element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stability {
    #[default]
    Stable,
    Unstable,
    Private,
}

impl Stability {
    /// Case-insensitive: reale .gir-Dateien schreiben "Stable" wie "stable".
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("stable") {
            Some(Self::Stable)
        } else if s.eq_ignore_ascii_case("unstable") {
            Some(Self::Unstable)
        } else if s.eq_ignore_ascii_case("private") {
            Some(Self::Private)
        } else {
            None
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Unstable => "unstable",
            Self::Private => "private",
        }
    }
}

/// Lifetime scope of a callback parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    Call,
    Async,
    Notified,
}

impl Scope {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "call" => Some(Self::Call),
            "async" => Some(Self::Async),
            "notified" => Some(Self::Notified),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Async => "async",
            Self::Notified => "notified",
        }
    }
}

/// Parameter direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    In,
    Out,
    InOut,
}

impl Direction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(Self::In),
            "out" => Some(Self::Out),
            "inout" | "in-out" => Some(Self::InOut),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::InOut => "in-out",
        }
    }
}

/// Ownership transfer of a value crossing the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferOwnership {
    #[default]
    None,
    Container,
    Full,
    Floating,
}

impl TransferOwnership {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "container" => Some(Self::Container),
            "full" => Some(Self::Full),
            "floating" => Some(Self::Floating),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Container => "container",
            Self::Full => "full",
            Self::Floating => "floating",
        }
    }
}

/// When a signal handler runs relative to the default handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalWhen {
    /// Nicht angegeben.
    #[default]
    None,
    First,
    Last,
    Cleanup,
}

impl SignalWhen {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "first" => Some(Self::First),
            "last" => Some(Self::Last),
            "cleanup" => Some(Self::Cleanup),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::First => "first",
            Self::Last => "last",
            Self::Cleanup => "cleanup",
        }
    }
}

/// Fundamental type classification of a `<type>`/`<array>` node.
///
/// Container- und Callback-Varianten tragen in einer [`TypeRef`] einen
/// Offset in die Array- bzw. Callback-Tabelle; nicht-fundamentale Typen
/// werden `Named` und behalten ihren Namens-Offset im TypeBlob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BasicType {
    #[default]
    None,
    Boolean,
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    SSize,
    Size,
    Pointer,
    IntPtr,
    UIntPtr,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Double,
    GType,
    Utf8,
    Filename,
    Unichar,
    CArray,
    GArray,
    GPtrArray,
    GByteArray,
    Varargs,
    Callback,
    /// Nicht-fundamentaler Typ, nur ueber seinen Namen referenziert.
    Named,
}

impl BasicType {
    /// Klassifiziert den `name`-Attributwert eines `<type>`/`<array>`
    /// Elements. Nicht-fundamentale Typen ergeben `Named`, der Name
    /// selbst bleibt im Blob.
    pub fn from_gir_name(name: &str) -> Self {
        match name {
            "" => Self::None,
            "none" => Self::None,
            "gboolean" => Self::Boolean,
            "gchar" => Self::Char,
            "guchar" => Self::UChar,
            "gshort" => Self::Short,
            "gushort" => Self::UShort,
            "gint" => Self::Int,
            "guint" => Self::UInt,
            "glong" => Self::Long,
            "gulong" => Self::ULong,
            "gssize" => Self::SSize,
            "gsize" => Self::Size,
            "gpointer" => Self::Pointer,
            "gintptr" => Self::IntPtr,
            "guintptr" => Self::UIntPtr,
            "gint8" => Self::Int8,
            "guint8" => Self::UInt8,
            "gint16" => Self::Int16,
            "guint16" => Self::UInt16,
            "gint32" => Self::Int32,
            "guint32" => Self::UInt32,
            "gint64" => Self::Int64,
            "guint64" => Self::UInt64,
            "gfloat" => Self::Float,
            "gdouble" => Self::Double,
            "GType" => Self::GType,
            "utf8" => Self::Utf8,
            "filename" => Self::Filename,
            "gunichar" => Self::Unichar,
            "GLib.Array" => Self::GArray,
            "GLib.PtrArray" => Self::GPtrArray,
            "GLib.ByteArray" => Self::GByteArray,
            _ => Self::Named,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Boolean => "boolean",
            Self::Char => "gchar",
            Self::UChar => "guchar",
            Self::Short => "gshort",
            Self::UShort => "gushort",
            Self::Int => "gint",
            Self::UInt => "guint",
            Self::Long => "glong",
            Self::ULong => "gulong",
            Self::SSize => "gssize",
            Self::Size => "gsize",
            Self::Pointer => "gpointer",
            Self::IntPtr => "gintptr",
            Self::UIntPtr => "guintptr",
            Self::Int8 => "gint8",
            Self::UInt8 => "guint8",
            Self::Int16 => "gint16",
            Self::UInt16 => "guint16",
            Self::Int32 => "gint32",
            Self::UInt32 => "guint32",
            Self::Int64 => "gint64",
            Self::UInt64 => "guint64",
            Self::Float => "gfloat",
            Self::Double => "gdouble",
            Self::GType => "GType",
            Self::Utf8 => "gutf8",
            Self::Filename => "filename",
            Self::Unichar => "gunichar",
            Self::CArray => "c array",
            Self::GArray => "GArray",
            Self::GPtrArray => "GPtrArray",
            Self::GByteArray => "GByteArray",
            Self::Varargs => "varargs",
            Self::Callback => "callback",
            Self::Named => "named",
        }
    }
}

/// Discriminates every blob shape; object blobs keep class vs. interface
/// apart and function blobs their four spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlobKind {
    #[default]
    Unknown,
    Alias,
    Array,
    Boxed,
    Callback,
    Class,
    Constant,
    Constructor,
    Doc,
    Enum,
    Field,
    Function,
    Header,
    Interface,
    Method,
    Parameter,
    Property,
    Record,
    Signal,
    Type,
    Union,
    Value,
    Vfunc,
}

impl BlobKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Alias => "alias",
            Self::Array => "array",
            Self::Boxed => "boxed",
            Self::Callback => "callback",
            Self::Class => "class",
            Self::Constant => "constant",
            Self::Constructor => "constructor",
            Self::Doc => "doc",
            Self::Enum => "enum",
            Self::Field => "field",
            Self::Function => "function",
            Self::Header => "header",
            Self::Interface => "interface",
            Self::Method => "method",
            Self::Parameter => "parameter",
            Self::Property => "property",
            Self::Record => "record",
            Self::Signal => "signal",
            Self::Type => "type",
            Self::Union => "union",
            Self::Value => "value",
            Self::Vfunc => "vfunc",
        }
    }
}

impl core::fmt::Display for BlobKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Origin of a GlobalIndex entry name, one bit each so downstream lookups
/// can filter on several origins at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PrefixKind {
    Namespace = 1 << 0,
    Symbol = 1 << 1,
    Identifier = 1 << 2,
    GType = 1 << 3,
    Package = 1 << 4,
}

impl PrefixKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::Symbol => "symbol",
            Self::Identifier => "identifier",
            Self::GType => "GType",
            Self::Package => "package",
        }
    }
}

/// Die 16 Blob-Tabellen eines Namespaces, in Ablage-Reihenfolge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NsTable {
    Alias,
    Array,
    Callback,
    Constant,
    Doc,
    Enum,
    Field,
    Function,
    Object,
    Parameter,
    Property,
    Record,
    Signal,
    Type,
    Union,
    Value,
}

impl NsTable {
    pub const ALL: [NsTable; 16] = [
        Self::Alias,
        Self::Array,
        Self::Callback,
        Self::Constant,
        Self::Doc,
        Self::Enum,
        Self::Field,
        Self::Function,
        Self::Object,
        Self::Parameter,
        Self::Property,
        Self::Record,
        Self::Signal,
        Self::Type,
        Self::Union,
        Self::Value,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Alias => "alias",
            Self::Array => "array",
            Self::Callback => "callback",
            Self::Constant => "constant",
            Self::Doc => "doc",
            Self::Enum => "enum",
            Self::Field => "field",
            Self::Function => "function",
            Self::Object => "object",
            Self::Parameter => "parameter",
            Self::Property => "property",
            Self::Record => "record",
            Self::Signal => "signal",
            Self::Type => "type",
            Self::Union => "union",
            Self::Value => "value",
        }
    }
}

/// Reference to a `<type>`/`<array>`/`<callback>` node: the kind selects
/// the table the offset addresses; plain fundamental kinds carry no
/// meaningful offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeRef {
    pub kind: BasicType,
    pub offset: u32,
}

impl TypeRef {
    pub const NONE: Self = Self {
        kind: BasicType::None,
        offset: 0,
    };

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

/// Shared head of most blobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonBlob {
    pub kind: BlobKind,
    pub name: StringOffset,
    /// -1 solange kein Doc-Blob angelegt wurde.
    pub doc: DocOffset,
    pub deprecated: bool,
    pub deprecated_version: StringOffset,
    pub version: StringOffset,
    pub stability: Stability,
    pub introspectable: bool,
}

impl Default for CommonBlob {
    fn default() -> Self {
        Self {
            kind: BlobKind::Unknown,
            name: 0,
            doc: -1,
            deprecated: false,
            deprecated_version: 0,
            version: 0,
            stability: Stability::Stable,
            introspectable: false,
        }
    }
}

/// `<repository>` + `<namespace>` head data. All string offsets address the
/// header pool; includes/packages/prefixes are comma-joined lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderBlob {
    pub namespace: StringOffset,
    pub nsversion: StringOffset,
    pub nsversion_major: u8,
    pub nsversion_minor: u8,
    pub repository_major: u16,
    pub repository_minor: u16,
    pub shared_library: StringOffset,
    pub c_symbol_prefixes: StringOffset,
    pub c_identifier_prefixes: StringOffset,
    pub includes: StringOffset,
    pub c_includes: StringOffset,
    pub packages: StringOffset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AliasBlob {
    pub common: CommonBlob,
    pub c_type: StringOffset,
    pub target: TypeRef,
}

/// `<array>` node. `array_kind` is one of CArray/GArray/GPtrArray/
/// GByteArray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArrayBlob {
    pub array_kind: BasicType,
    pub zero_terminated: bool,
    pub has_size: bool,
    /// `fixed-size` Attribut.
    pub size: u32,
    pub has_length: bool,
    /// Index des Laengen-Parameters in der Parameterliste.
    pub length: u32,
    pub c_type: StringOffset,
    pub element: TypeRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallbackBlob {
    pub common: CommonBlob,
    pub c_type: StringOffset,
    pub throws: bool,
    pub parameters: Run,
    /// Offset in die Parameter-Tabelle, -1 ohne `<return-value>`.
    pub return_value: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConstantBlob {
    pub common: CommonBlob,
    pub c_type: StringOffset,
    pub c_identifier: StringOffset,
    pub value: StringOffset,
    pub typeref: TypeRef,
}

/// Die vier doc-Texte plus der Annotation-Run. Text-Offsets zeigen in den
/// Doc-Pool, `annotations` in den Annotation-Pool (n aufeinanderfolgende
/// "name=value" Strings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocBlob {
    pub body: StringOffset,
    pub deprecated: StringOffset,
    pub stability: StringOffset,
    pub version: StringOffset,
    pub annotations: StringOffset,
    pub n_annotations: u32,
}

/// `<enumeration>` / `<bitfield>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnumBlob {
    pub common: CommonBlob,
    /// Bitfield statt Enumeration.
    pub is_flags: bool,
    pub g_type_name: StringOffset,
    pub g_get_type: StringOffset,
    pub c_type: StringOffset,
    pub error_domain: StringOffset,
    pub values: Run,
    pub functions: Run,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldBlob {
    pub common: CommonBlob,
    pub readable: bool,
    pub writable: bool,
    pub private: bool,
    /// Bitfeld-Breite, 0 = kein Bitfeld.
    pub bits: u8,
    pub typeref: TypeRef,
}

/// `<constructor>` / `<function>` / `<method>` / `<virtual-method>`;
/// the spelling lives in `common.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FunctionBlob {
    pub common: CommonBlob,
    pub c_identifier: StringOffset,
    pub shadows: StringOffset,
    pub shadowed_by: StringOffset,
    pub moved_to: StringOffset,
    /// `invoker` einer virtual-method.
    pub invoker: StringOffset,
    pub throws: bool,
    pub parameters: Run,
    pub return_value: i32,
}

/// `<class>` / `<interface>`; the two share one table and one shape, the
/// spelling lives in `common.kind`. For interfaces the `interfaces` run
/// holds the prerequisites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectBlob {
    pub common: CommonBlob,
    pub is_abstract: bool,
    pub fundamental: bool,
    /// Implementiert (oder setzt voraus) Gtk.Buildable.
    pub is_buildable: bool,
    pub has_parent: bool,
    /// Crossref-Index des Parents, gueltig wenn `has_parent`.
    pub parent: u32,
    pub g_type_name: StringOffset,
    pub g_get_type: StringOffset,
    pub g_type_struct: StringOffset,
    pub g_ref_func: StringOffset,
    pub g_unref_func: StringOffset,
    pub g_set_value_func: StringOffset,
    pub g_get_value_func: StringOffset,
    pub c_type: StringOffset,
    pub c_symbol_prefix: StringOffset,
    /// Crossref-Run der implements/prerequisite Eintraege.
    pub interfaces: Run,
    pub callbacks: Run,
    pub constants: Run,
    pub fields: Run,
    pub functions: Run,
    pub properties: Run,
    pub records: Run,
    pub signals: Run,
    pub unions: Run,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterBlob {
    pub name: StringOffset,
    pub doc: DocOffset,
    pub nullable: bool,
    pub allow_none: bool,
    pub optional: bool,
    pub skip: bool,
    pub introspectable: bool,
    pub caller_allocates: bool,
    pub instance_parameter: bool,
    pub return_value: bool,
    pub varargs: bool,
    pub has_closure: bool,
    pub has_destroy: bool,
    pub scope: Scope,
    pub direction: Direction,
    pub transfer: TransferOwnership,
    /// Index des closure-Parameters, -1 ohne closure.
    pub closure: i32,
    /// Index des destroy-Parameters, -1 ohne destroy.
    pub destroy: i32,
    pub typeref: TypeRef,
}

impl Default for ParameterBlob {
    fn default() -> Self {
        Self {
            name: 0,
            doc: -1,
            nullable: false,
            allow_none: false,
            optional: false,
            skip: false,
            introspectable: false,
            caller_allocates: false,
            instance_parameter: false,
            return_value: false,
            varargs: false,
            has_closure: false,
            has_destroy: false,
            scope: Scope::Call,
            direction: Direction::In,
            transfer: TransferOwnership::None,
            closure: -1,
            destroy: -1,
            typeref: TypeRef::NONE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropertyBlob {
    pub common: CommonBlob,
    pub readable: bool,
    pub writable: bool,
    pub construct: bool,
    pub construct_only: bool,
    pub transfer: TransferOwnership,
    pub typeref: TypeRef,
}

/// `<record>` / `<glib:boxed>`; the spelling lives in `common.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordBlob {
    pub common: CommonBlob,
    pub disguised: bool,
    pub foreign: bool,
    pub g_type_name: StringOffset,
    pub g_get_type: StringOffset,
    pub c_type: StringOffset,
    pub c_symbol_prefix: StringOffset,
    /// `glib:is-gtype-struct-for` Attribut.
    pub gtype_struct_for: StringOffset,
    pub callbacks: Run,
    pub fields: Run,
    pub functions: Run,
    pub properties: Run,
    pub unions: Run,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignalBlob {
    pub common: CommonBlob,
    pub when: SignalWhen,
    pub action: bool,
    pub detailed: bool,
    pub no_hooks: bool,
    pub no_recurse: bool,
    pub parameters: Run,
    pub return_value: i32,
}

/// `<type>` node. Nicht-fundamentale Typen tragen `basic = Named` und
/// ihren Namen; bis zu zwei innere Typ-Parameter (Listen-Element bzw.
/// Map-Key/Value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeBlob {
    pub basic: BasicType,
    pub name: StringOffset,
    pub c_type: StringOffset,
    pub n_inner: u8,
    pub inner: [TypeRef; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnionBlob {
    pub common: CommonBlob,
    pub c_type: StringOffset,
    pub c_symbol_prefix: StringOffset,
    pub g_type_name: StringOffset,
    pub g_get_type: StringOffset,
    pub fields: Run,
    pub functions: Run,
    pub records: Run,
}

/// `<member>` of an enumeration/bitfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValueBlob {
    pub common: CommonBlob,
    pub c_identifier: StringOffset,
    /// `glib:nick` Attribut.
    pub nick: StringOffset,
    pub value: i64,
}

/// Deferred reference to a type that may live in another namespace;
/// resolved by a later linking pass outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossRef {
    pub kind_hint: BlobKind,
    /// Offset des qualifizierten Namens im General-Pool.
    pub qname: StringOffset,
    pub is_local: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Die Canonical-Namen muessen mit parse() round-trippen.
    #[test]
    fn stability_round_trip() {
        for s in [Stability::Stable, Stability::Unstable, Stability::Private] {
            assert_eq!(Stability::parse(s.name()), Some(s));
        }
    }

    #[test]
    fn stability_parse_is_case_insensitive() {
        assert_eq!(Stability::parse("Stable"), Some(Stability::Stable));
        assert_eq!(Stability::parse("PRIVATE"), Some(Stability::Private));
        assert_eq!(Stability::parse("experimental"), None);
    }

    #[test]
    fn scope_round_trip() {
        for s in [Scope::Call, Scope::Async, Scope::Notified] {
            assert_eq!(Scope::parse(s.name()), Some(s));
        }
        assert_eq!(Scope::parse("forever"), None);
    }

    #[test]
    fn direction_round_trip() {
        for d in [Direction::In, Direction::Out, Direction::InOut] {
            assert_eq!(Direction::parse(d.name()), Some(d));
        }
        // gir-1.2 schreibt "inout", aeltere Dateien "in-out".
        assert_eq!(Direction::parse("inout"), Some(Direction::InOut));
    }

    #[test]
    fn transfer_round_trip() {
        for t in [
            TransferOwnership::None,
            TransferOwnership::Container,
            TransferOwnership::Full,
            TransferOwnership::Floating,
        ] {
            assert_eq!(TransferOwnership::parse(t.name()), Some(t));
        }
    }

    #[test]
    fn signal_when_round_trip() {
        for w in [
            SignalWhen::None,
            SignalWhen::First,
            SignalWhen::Last,
            SignalWhen::Cleanup,
        ] {
            assert_eq!(SignalWhen::parse(w.name()), Some(w));
        }
    }

    #[test]
    fn basic_type_classifies_fundamentals() {
        assert_eq!(BasicType::from_gir_name("gboolean"), BasicType::Boolean);
        assert_eq!(BasicType::from_gir_name("utf8"), BasicType::Utf8);
        assert_eq!(BasicType::from_gir_name("GType"), BasicType::GType);
        assert_eq!(BasicType::from_gir_name("GLib.PtrArray"), BasicType::GPtrArray);
        // Benannte Typen tragen ihren Namen im Blob weiter.
        assert_eq!(BasicType::from_gir_name("Gtk.Widget"), BasicType::Named);
        assert_eq!(BasicType::from_gir_name(""), BasicType::None);
    }

    /// Default-Common: kein Doc (-1), stable, nicht ausdruecklich introspektierbar.
    #[test]
    fn common_blob_defaults() {
        let c = CommonBlob::default();
        assert_eq!(c.doc, -1);
        assert_eq!(c.stability, Stability::Stable);
        assert!(!c.introspectable);
        assert!(!c.deprecated);
        assert_eq!(c.kind, BlobKind::Unknown);
    }

    #[test]
    fn parameter_blob_defaults() {
        let p = ParameterBlob::default();
        assert_eq!(p.closure, -1);
        assert_eq!(p.destroy, -1);
        assert_eq!(p.direction, Direction::In);
        assert_eq!(p.scope, Scope::Call);
        assert_eq!(p.transfer, TransferOwnership::None);
        assert!(!p.introspectable);
    }

    #[test]
    fn run_empty() {
        assert!(Run::default().is_empty());
        assert!(!Run { base: 3, count: 1 }.is_empty());
    }

    #[test]
    fn ns_table_names_cover_all() {
        assert_eq!(NsTable::ALL.len(), 16);
        for table in NsTable::ALL {
            assert!(!table.name().is_empty());
        }
    }
}
