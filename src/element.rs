//! Element-type registry: gir tag names to single-bit kinds and back.
//!
//! Jede Element-Art belegt genau ein Bit eines `u64`, damit Accept-Masken
//! der Composite-Builder als einfache Bit-ODER entstehen. Die Maske ist ein
//! Implementierungsdetail; Identitaet ist immer der [`ElementKind`] selbst.

use std::sync::OnceLock;

use crate::FastHashMap;

/// One kind per gir-1.2 tag this pipeline understands.
///
/// Prefixed tags (`c:include`, `glib:boxed`, `glib:signal`) are matched on
/// their literal qualified name; the source format never rebinds those
/// prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u64)]
pub enum ElementKind {
    Alias = 1 << 0,
    Annotation = 1 << 1,
    Array = 1 << 2,
    Attributes = 1 << 3,
    Bitfield = 1 << 4,
    /// `glib:boxed`, im Namespace als Record abgelegt.
    Boxed = 1 << 5,
    CInclude = 1 << 6,
    Callback = 1 << 7,
    Class = 1 << 8,
    Constant = 1 << 9,
    Constructor = 1 << 10,
    Doc = 1 << 11,
    DocDeprecated = 1 << 12,
    DocStability = 1 << 13,
    DocVersion = 1 << 14,
    Enumeration = 1 << 15,
    Field = 1 << 16,
    Function = 1 << 17,
    Implements = 1 << 18,
    Include = 1 << 19,
    InstanceParameter = 1 << 20,
    Interface = 1 << 21,
    Member = 1 << 22,
    Method = 1 << 23,
    Namespace = 1 << 24,
    Package = 1 << 25,
    Parameter = 1 << 26,
    Parameters = 1 << 27,
    Prerequisite = 1 << 28,
    Property = 1 << 29,
    Record = 1 << 30,
    Repository = 1 << 31,
    ReturnValue = 1 << 32,
    Signal = 1 << 33,
    Type = 1 << 34,
    Union = 1 << 35,
    Varargs = 1 << 36,
    VirtualMethod = 1 << 37,
}

/// Tag-Name ↔ Kind, eine Zeile pro Element der gir-1.2 Teilmenge.
const NAMES: [(&str, ElementKind); 38] = [
    ("alias", ElementKind::Alias),
    ("annotation", ElementKind::Annotation),
    ("array", ElementKind::Array),
    ("attributes", ElementKind::Attributes),
    ("bitfield", ElementKind::Bitfield),
    ("glib:boxed", ElementKind::Boxed),
    ("c:include", ElementKind::CInclude),
    ("callback", ElementKind::Callback),
    ("class", ElementKind::Class),
    ("constant", ElementKind::Constant),
    ("constructor", ElementKind::Constructor),
    ("doc", ElementKind::Doc),
    ("doc-deprecated", ElementKind::DocDeprecated),
    ("doc-stability", ElementKind::DocStability),
    ("doc-version", ElementKind::DocVersion),
    ("enumeration", ElementKind::Enumeration),
    ("field", ElementKind::Field),
    ("function", ElementKind::Function),
    ("implements", ElementKind::Implements),
    ("include", ElementKind::Include),
    ("instance-parameter", ElementKind::InstanceParameter),
    ("interface", ElementKind::Interface),
    ("member", ElementKind::Member),
    ("method", ElementKind::Method),
    ("namespace", ElementKind::Namespace),
    ("package", ElementKind::Package),
    ("parameter", ElementKind::Parameter),
    ("parameters", ElementKind::Parameters),
    ("prerequisite", ElementKind::Prerequisite),
    ("property", ElementKind::Property),
    ("record", ElementKind::Record),
    ("repository", ElementKind::Repository),
    ("return-value", ElementKind::ReturnValue),
    ("glib:signal", ElementKind::Signal),
    ("type", ElementKind::Type),
    ("union", ElementKind::Union),
    ("varargs", ElementKind::Varargs),
    ("virtual-method", ElementKind::VirtualMethod),
];

/// Prozessweite Registry, einmalig hinter `OnceLock` aufgebaut.
/// Nach der Initialisierung nur noch lesend, parallel nutzbar ueber
/// unabhaengige Parses hinweg.
fn registry() -> &'static FastHashMap<&'static str, ElementKind> {
    static REGISTRY: OnceLock<FastHashMap<&'static str, ElementKind>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut map = FastHashMap::with_capacity_and_hasher(NAMES.len(), Default::default());
        for (name, kind) in NAMES {
            map.insert(name, kind);
        }
        map
    })
}

impl ElementKind {
    /// Liefert den Kind zum qualifizierten Tag-Namen, `None` fuer alles
    /// ausserhalb der bekannten Teilmenge.
    pub fn from_name(name: &str) -> Option<Self> {
        registry().get(name).copied()
    }

    /// Der kanonische Tag-Name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Alias => "alias",
            Self::Annotation => "annotation",
            Self::Array => "array",
            Self::Attributes => "attributes",
            Self::Bitfield => "bitfield",
            Self::Boxed => "glib:boxed",
            Self::CInclude => "c:include",
            Self::Callback => "callback",
            Self::Class => "class",
            Self::Constant => "constant",
            Self::Constructor => "constructor",
            Self::Doc => "doc",
            Self::DocDeprecated => "doc-deprecated",
            Self::DocStability => "doc-stability",
            Self::DocVersion => "doc-version",
            Self::Enumeration => "enumeration",
            Self::Field => "field",
            Self::Function => "function",
            Self::Implements => "implements",
            Self::Include => "include",
            Self::InstanceParameter => "instance-parameter",
            Self::Interface => "interface",
            Self::Member => "member",
            Self::Method => "method",
            Self::Namespace => "namespace",
            Self::Package => "package",
            Self::Parameter => "parameter",
            Self::Parameters => "parameters",
            Self::Prerequisite => "prerequisite",
            Self::Property => "property",
            Self::Record => "record",
            Self::Repository => "repository",
            Self::ReturnValue => "return-value",
            Self::Signal => "glib:signal",
            Self::Type => "type",
            Self::Union => "union",
            Self::Varargs => "varargs",
            Self::VirtualMethod => "virtual-method",
        }
    }

    const fn bit(self) -> u64 {
        self as u64
    }
}

impl core::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// OR-Menge von [`ElementKind`]s. Beantwortet ausschliesslich
/// Mitgliedschaftstests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementMask(u64);

impl ElementMask {
    pub const EMPTY: Self = Self(0);

    pub const fn of(kinds: &[ElementKind]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < kinds.len() {
            bits |= kinds[i].bit();
            i += 1;
        }
        Self(bits)
    }

    pub const fn contains(self, kind: ElementKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Accept-Masken der Composite-Builder: welche Kind-Elemente ein Builder an
/// einen gepoolten Unter-Builder delegiert. Inline verarbeitete Elemente
/// (`implements`, `include`, ...) stehen bewusst nicht in diesen Masken.
pub mod mask {
    use super::{ElementKind as K, ElementMask};

    /// doc / doc-deprecated / doc-stability / doc-version.
    pub const DOC: ElementMask = ElementMask::of(&[
        K::Doc,
        K::DocDeprecated,
        K::DocStability,
        K::DocVersion,
    ]);

    /// Die vier Funktions-Schreibweisen, die alle im Funktions-Table landen.
    pub const FUNCTIONS: ElementMask = ElementMask::of(&[
        K::Constructor,
        K::Function,
        K::Method,
        K::VirtualMethod,
    ]);

    pub const CLASS: ElementMask = DOC.union(FUNCTIONS).union(ElementMask::of(&[
        K::Callback,
        K::Constant,
        K::Field,
        K::Property,
        K::Record,
        K::Signal,
        K::Union,
    ]));

    pub const INTERFACE: ElementMask = DOC.union(ElementMask::of(&[
        K::Callback,
        K::Constant,
        K::Field,
        K::Function,
        K::Method,
        K::Property,
        K::Signal,
        K::VirtualMethod,
    ]));

    pub const RECORD: ElementMask = DOC.union(ElementMask::of(&[
        K::Callback,
        K::Constructor,
        K::Field,
        K::Function,
        K::Method,
        K::Property,
        K::Union,
    ]));

    pub const UNION: ElementMask = DOC.union(ElementMask::of(&[
        K::Constructor,
        K::Field,
        K::Function,
        K::Method,
        K::Record,
    ]));

    pub const ENUM: ElementMask = DOC.union(ElementMask::of(&[K::Member, K::Function]));

    pub const FUNCTION: ElementMask =
        DOC.union(ElementMask::of(&[K::Parameters, K::ReturnValue]));

    pub const CALLBACK: ElementMask = FUNCTION;

    pub const SIGNAL: ElementMask = FUNCTION;

    /// Direkte Kinder von `<parameters>`.
    pub const PARAMETERS: ElementMask =
        ElementMask::of(&[K::Parameter, K::InstanceParameter, K::ReturnValue]);

    /// Innerhalb von `<parameter>`: Typ- und Doku-Kinder.
    pub const PARAMETER: ElementMask = DOC.union(ElementMask::of(&[K::Type, K::Array]));

    pub const PROPERTY: ElementMask = DOC.union(ElementMask::of(&[K::Type, K::Array]));

    pub const CONSTANT: ElementMask = DOC.union(ElementMask::of(&[K::Type, K::Array]));

    pub const FIELD: ElementMask =
        DOC.union(ElementMask::of(&[K::Type, K::Array, K::Callback]));

    /// Aliase auf Array-Typen kommen vor, GLibs `Strv` zum Beispiel.
    pub const ALIAS: ElementMask = DOC.union(ElementMask::of(&[K::Type, K::Array]));

    pub const MEMBER: ElementMask = DOC;

    /// Verschachtelte Typ-Parameter von `<type>`/`<array>`.
    pub const TYPE: ElementMask = ElementMask::of(&[K::Type, K::Array]);

    pub const NAMESPACE: ElementMask = ElementMask::of(&[
        K::Alias,
        K::Bitfield,
        K::Boxed,
        K::Callback,
        K::Class,
        K::Constant,
        K::Enumeration,
        K::Function,
        K::Interface,
        K::Record,
        K::Union,
    ]);

    /// Direkt unter `<repository>` tolerierte Definitionen, so von Rygel
    /// .gir-Dateien ausgeliefert.
    pub const REPOSITORY: ElementMask = ElementMask::of(&[K::Enumeration, K::Constant]);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Jeder Tabellen-Eintrag muss ueber die Registry und zurueck
    /// round-trippen.
    #[test]
    fn from_name_round_trips_all_kinds() {
        for (name, kind) in NAMES {
            assert_eq!(ElementKind::from_name(name), Some(kind), "{name}");
            assert_eq!(kind.name(), name);
        }
    }

    #[test]
    fn from_name_rejects_unknown() {
        assert_eq!(ElementKind::from_name("docsection"), None);
        assert_eq!(ElementKind::from_name(""), None);
        // Unqualifizierte Variante eines Prefix-Tags ist nicht dasselbe Tag.
        assert_eq!(ElementKind::from_name("signal"), None);
    }

    /// Alle 38 Kinds belegen paarweise verschiedene Einzel-Bits.
    #[test]
    fn kinds_are_distinct_single_bits() {
        let mut seen = 0u64;
        for (_, kind) in NAMES {
            let bit = kind as u64;
            assert_eq!(bit.count_ones(), 1);
            assert_eq!(seen & bit, 0);
            seen |= bit;
        }
        assert_eq!(seen.count_ones(), 38);
    }

    #[test]
    fn mask_membership() {
        assert!(mask::CLASS.contains(ElementKind::Method));
        assert!(mask::CLASS.contains(ElementKind::DocDeprecated));
        assert!(!mask::CLASS.contains(ElementKind::Prerequisite));
        assert!(!mask::CLASS.contains(ElementKind::Implements));
        assert!(mask::INTERFACE.contains(ElementKind::Signal));
        assert!(!mask::INTERFACE.contains(ElementKind::Union));
        assert!(mask::ALIAS.contains(ElementKind::Array));
        assert!(mask::REPOSITORY.contains(ElementKind::Constant));
        assert!(mask::NAMESPACE.contains(ElementKind::Boxed));
    }

    #[test]
    fn empty_mask_contains_nothing() {
        for (_, kind) in NAMES {
            assert!(!ElementMask::EMPTY.contains(kind));
        }
    }
}
