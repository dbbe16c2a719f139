//! girpack – GObject-Introspection .gir-Dateien zu offset-adressierten
//! Blob-Tabellen.
//!
//! Ein [`Parser`] fährt einen Streaming-Scan über ein .gir-Dokument und
//! baut daraus ein [`ParserResult`]: pro Blob-Art eine wachsende
//! Tabelle, vier String-Pools, ein Objekt- und ein Globalindex sowie
//! die Liste unaufgelöster Querverweise für einen späteren
//! Verknüpfungslauf. Alle Verweise zwischen Blobs sind Integer-Offsets,
//! stabil für die Lebensdauer eines Resultats.
//!
//! # Beispiel
//!
//! ```
//! let gir = br#"<repository version="1.2">
//!   <namespace name="Demo" version="1.0">
//!     <class name="Widget" parent="Object">
//!       <method name="show"/>
//!     </class>
//!   </namespace>
//! </repository>"#;
//!
//! let mut parser = girpack::Parser::new();
//! let result = parser.parse_bytes(gir, "Demo-1.0.gir").unwrap();
//!
//! let class = &result.objects()[0];
//! assert_eq!(result.string(class.common.name), Some("Widget"));
//! assert_eq!(class.functions.count, 1);
//! assert!(class.has_parent);
//! ```

pub mod attrs;
pub mod blob;
pub mod builder;
pub mod element;
pub mod error;
pub mod gir;
pub mod parser;
pub mod pool;
pub mod radix_tree;
pub mod result;
pub mod string_pool;

pub use error::{Error, Result, TextPos};

/// HashMap mit ahash (schnell, nicht DoS-resistent; nur für interne
/// Datenstrukturen).
pub(crate) type FastHashMap<K, V> = hashbrown::HashMap<K, V, ahash::RandomState>;

// Public API: Parser
pub use parser::Parser;
pub use pool::Pool;

// Public API: Resultat
pub use result::{GlobalIndexEntry, ObjectRef, ParserResult, Stats, StatsRow};

// Public API: Grundtypen
pub use blob::{BlobKind, CrossRef, PrefixKind};
pub use element::ElementKind;
pub use radix_tree::RadixTree;
