//! Element-Builder für die gir-Unterbäume.
//!
//! Jedes akzeptierte Element wird von genau einem Builder in einen Blob
//! übersetzt. Der Parser reicht Start-Tags an den aktiven Builder weiter;
//! der entscheidet per [`Dispatch`], ob er das Kind selbst konsumiert,
//! einen Kind-Builder aus dem Pool anfordert oder das Element samt
//! Unterbaum überspringen lässt. Auf dem End-Tag liefert `finish()` den
//! fertigen Blob an den Eltern-Builder zurück, der ihn entweder puffert
//! (zusammenhängende Läufe pro Kategorie) oder sofort in eine Tabelle
//! des [`ParserResult`] schreibt.

mod alias;
mod callback;
mod class;
mod constant;
mod doc;
mod enumeration;
mod field;
mod function;
mod header;
mod interface;
mod parameters;
mod property;
mod record;
mod signal;
mod typenode;
mod union;
mod value;

pub use doc::DocPiece;
pub(crate) use doc::DocState;

pub use alias::AliasBuilder;
pub use callback::CallbackBuilder;
pub use class::ClassBuilder;
pub use constant::ConstantBuilder;
pub use doc::DocBuilder;
pub use enumeration::EnumBuilder;
pub use field::FieldBuilder;
pub use function::FunctionBuilder;
pub use header::HeaderBuilder;
pub use interface::InterfaceBuilder;
pub use parameters::ParametersBuilder;
pub use property::PropertyBuilder;
pub use record::RecordBuilder;
pub use signal::SignalBuilder;
pub use typenode::TypeBuilder;
pub use union::UnionBuilder;
pub use value::ValueBuilder;

use crate::attrs::Attrs;
use crate::blob::{
    AliasBlob, ArrayBlob, BlobKind, CallbackBlob, CommonBlob, ConstantBlob, EnumBlob, FieldBlob,
    FunctionBlob, HeaderBlob, ObjectBlob, ParameterBlob, PropertyBlob, RecordBlob, Run, SignalBlob,
    Stability, TypeBlob, TypeRef, UnionBlob, ValueBlob,
};
use crate::element::{ElementKind, ElementMask};
use crate::error::{Error, Result, TextPos};
use crate::result::ParserResult;

/// Lebenszyklus eines Builders. `finish` ist nur in `Parsing` gültig,
/// alles andere wird protokolliert und ignoriert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Idle,
    Parsing,
    Finished,
}

/// Positions-Kontext für End-Tags. Zeile/Spalte werden erst im
/// Fehlerfall aus dem Byte-Offset errechnet.
#[derive(Clone, Copy)]
pub struct Ctx<'xml> {
    input: &'xml [u8],
    offset: usize,
}

impl<'xml> Ctx<'xml> {
    pub fn new(input: &'xml [u8], offset: usize) -> Self {
        Self { input, offset }
    }

    pub fn text_pos(&self) -> TextPos {
        TextPos::from_offset(self.input, self.offset)
    }

    /// Positionierter Strukturfehler an dieser Stelle.
    pub fn structural(&self, message: impl Into<String>) -> Error {
        Error::structural(message.into(), self.text_pos())
    }
}

/// Entscheidung des aktiven Builders über ein Kind-Start-Tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Vom Builder selbst konsumiert, kein eigener Kind-Builder.
    Inline,
    /// Ein Kind-Builder dieser Art übernimmt den Unterbau.
    Delegate(BuilderKind),
    /// Nicht Teil der akzeptierten Kinder; Unterbaum wird übersprungen
    /// und protokolliert.
    Unhandled,
}

impl Dispatch {
    /// Delegation nach Accept-Maske: Elemente der Maske gehen an ihren
    /// Builder aus dem Pool, alles andere wird übersprungen.
    pub fn masked(mask: ElementMask, kind: ElementKind) -> Self {
        if !mask.contains(kind) {
            return Self::Unhandled;
        }
        match BuilderKind::for_element(kind) {
            Some(builder) => Self::Delegate(builder),
            None => Self::Unhandled,
        }
    }
}

/// Pool-Schlüssel. Mehrere Element-Schreibweisen teilen sich einen
/// Builder, constructor/function/method/virtual-method zum Beispiel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuilderKind {
    Alias,
    Callback,
    Class,
    Constant,
    Doc,
    Enum,
    Field,
    Function,
    Header,
    Interface,
    Parameters,
    Property,
    Record,
    Signal,
    Type,
    Union,
    Value,
}

impl BuilderKind {
    /// Element → zuständiger Builder. `None` für Elemente, die immer
    /// inline vom umschließenden Builder verarbeitet werden.
    pub fn for_element(kind: ElementKind) -> Option<Self> {
        use ElementKind as K;
        match kind {
            K::Alias => Some(Self::Alias),
            K::Callback => Some(Self::Callback),
            K::Class => Some(Self::Class),
            K::Constant => Some(Self::Constant),
            K::Doc | K::DocDeprecated | K::DocStability | K::DocVersion => Some(Self::Doc),
            K::Enumeration | K::Bitfield => Some(Self::Enum),
            K::Field => Some(Self::Field),
            K::Constructor | K::Function | K::Method | K::VirtualMethod => Some(Self::Function),
            K::Repository => Some(Self::Header),
            K::Interface => Some(Self::Interface),
            K::Parameters | K::ReturnValue => Some(Self::Parameters),
            K::Property => Some(Self::Property),
            K::Record | K::Boxed => Some(Self::Record),
            K::Signal => Some(Self::Signal),
            K::Type | K::Array => Some(Self::Type),
            K::Union => Some(Self::Union),
            K::Member => Some(Self::Value),
            _ => None,
        }
    }
}

/// Fertiger Blob eines Builders, auf dem End-Tag an den Eltern-Builder
/// gereicht.
#[derive(Debug, Clone)]
pub enum Finished {
    Alias(AliasBlob),
    Array(ArrayBlob),
    Callback(CallbackBlob),
    Constant(ConstantBlob),
    Doc(DocPiece),
    Enum(EnumBlob),
    Field(FieldBlob),
    Function(FunctionBlob),
    Header(HeaderBlob),
    Object(ObjectBlob),
    Parameters(Run),
    Property(PropertyBlob),
    Record(RecordBlob),
    /// Unverbuchter Return-Parameter; der Eltern-Builder schreibt ihn in
    /// die Parameter-Tabelle.
    ReturnValue(ParameterBlob),
    Signal(SignalBlob),
    Type(TypeBlob),
    Union(UnionBlob),
    Value(ValueBlob),
}

/// Gemeinsame Schnittstelle der konkreten Builder. Die Hooks ohne
/// Implementierung hier entsprechen Buildern, die den jeweiligen Fall
/// nie sehen.
pub trait ElementBuilder {
    /// Start-Tag des eigenen Elements: Attribute einsammeln, Zustand
    /// aufsetzen.
    fn parse(
        &mut self,
        result: &mut ParserResult,
        kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<()>;

    /// Entscheidet über ein Kind-Start-Tag; Inline-Kinder werden hier
    /// gleich konsumiert.
    fn start_child(
        &mut self,
        result: &mut ParserResult,
        kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<Dispatch>;

    /// End-Tag eines inline konsumierten Kindes.
    fn end_inline(
        &mut self,
        _result: &mut ParserResult,
        _kind: ElementKind,
        _ctx: Ctx<'_>,
    ) -> Result<()> {
        Ok(())
    }

    /// Zeichendaten innerhalb des Elements.
    fn text(&mut self, _text: &str) {}

    /// Ein delegierter Kind-Builder ist fertig. `Some(offset)` heißt,
    /// das Kind wurde sofort verbucht und sein `index` soll laufen.
    fn child_finished(
        &mut self,
        _result: &mut ParserResult,
        _kind: ElementKind,
        _finished: Finished,
        _ctx: Ctx<'_>,
    ) -> Result<Option<u32>> {
        Ok(None)
    }

    /// Schließt das eigene Element ab und liefert den fertigen Blob.
    fn finish(&mut self, result: &mut ParserResult) -> Finished;

    /// Veröffentlicht Index-Einträge für den bei `position` verbuchten
    /// Blob. Läuft nach `finish`, der Builder behält dafür seine Kopie.
    fn index(&self, _result: &mut ParserResult, _position: u32) {}

    /// Setzt den Builder für die Wiederverwendung zurück.
    fn reset(&mut self);
}

enum Inner {
    Alias(AliasBuilder),
    Callback(CallbackBuilder),
    Class(ClassBuilder),
    Constant(ConstantBuilder),
    Doc(DocBuilder),
    Enum(EnumBuilder),
    Field(FieldBuilder),
    Function(FunctionBuilder),
    Header(HeaderBuilder),
    Interface(InterfaceBuilder),
    Parameters(ParametersBuilder),
    Property(PropertyBuilder),
    Record(RecordBuilder),
    Signal(SignalBuilder),
    Type(TypeBuilder),
    Union(UnionBuilder),
    Value(ValueBuilder),
}

macro_rules! each_builder {
    ($inner:expr, $b:ident => $body:expr) => {
        match $inner {
            Inner::Alias($b) => $body,
            Inner::Callback($b) => $body,
            Inner::Class($b) => $body,
            Inner::Constant($b) => $body,
            Inner::Doc($b) => $body,
            Inner::Enum($b) => $body,
            Inner::Field($b) => $body,
            Inner::Function($b) => $body,
            Inner::Header($b) => $body,
            Inner::Interface($b) => $body,
            Inner::Parameters($b) => $body,
            Inner::Property($b) => $body,
            Inner::Record($b) => $body,
            Inner::Signal($b) => $body,
            Inner::Type($b) => $body,
            Inner::Union($b) => $body,
            Inner::Value($b) => $body,
        }
    };
}

/// Ein poolbarer Builder mit zentral geführtem Lebenszyklus. Die
/// Zustandsprüfungen liegen hier, die konkreten Builder kennen nur ihre
/// Blob-Logik.
pub struct Builder {
    state: State,
    inner: Inner,
}

impl Builder {
    pub fn new(kind: BuilderKind) -> Self {
        let inner = match kind {
            BuilderKind::Alias => Inner::Alias(AliasBuilder::default()),
            BuilderKind::Callback => Inner::Callback(CallbackBuilder::default()),
            BuilderKind::Class => Inner::Class(ClassBuilder::default()),
            BuilderKind::Constant => Inner::Constant(ConstantBuilder::default()),
            BuilderKind::Doc => Inner::Doc(DocBuilder::default()),
            BuilderKind::Enum => Inner::Enum(EnumBuilder::default()),
            BuilderKind::Field => Inner::Field(FieldBuilder::default()),
            BuilderKind::Function => Inner::Function(FunctionBuilder::default()),
            BuilderKind::Header => Inner::Header(HeaderBuilder::default()),
            BuilderKind::Interface => Inner::Interface(InterfaceBuilder::default()),
            BuilderKind::Parameters => Inner::Parameters(ParametersBuilder::default()),
            BuilderKind::Property => Inner::Property(PropertyBuilder::default()),
            BuilderKind::Record => Inner::Record(RecordBuilder::default()),
            BuilderKind::Signal => Inner::Signal(SignalBuilder::default()),
            BuilderKind::Type => Inner::Type(TypeBuilder::default()),
            BuilderKind::Union => Inner::Union(UnionBuilder::default()),
            BuilderKind::Value => Inner::Value(ValueBuilder::default()),
        };
        Self {
            state: State::Idle,
            inner,
        }
    }

    pub fn kind(&self) -> BuilderKind {
        match &self.inner {
            Inner::Alias(_) => BuilderKind::Alias,
            Inner::Callback(_) => BuilderKind::Callback,
            Inner::Class(_) => BuilderKind::Class,
            Inner::Constant(_) => BuilderKind::Constant,
            Inner::Doc(_) => BuilderKind::Doc,
            Inner::Enum(_) => BuilderKind::Enum,
            Inner::Field(_) => BuilderKind::Field,
            Inner::Function(_) => BuilderKind::Function,
            Inner::Header(_) => BuilderKind::Header,
            Inner::Interface(_) => BuilderKind::Interface,
            Inner::Parameters(_) => BuilderKind::Parameters,
            Inner::Property(_) => BuilderKind::Property,
            Inner::Record(_) => BuilderKind::Record,
            Inner::Signal(_) => BuilderKind::Signal,
            Inner::Type(_) => BuilderKind::Type,
            Inner::Union(_) => BuilderKind::Union,
            Inner::Value(_) => BuilderKind::Value,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn parse(
        &mut self,
        result: &mut ParserResult,
        kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<()> {
        debug_assert_eq!(self.state, State::Idle);
        self.state = State::Parsing;
        each_builder!(&mut self.inner, b => b.parse(result, kind, attrs))
    }

    pub fn start_child(
        &mut self,
        result: &mut ParserResult,
        kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<Dispatch> {
        each_builder!(&mut self.inner, b => b.start_child(result, kind, attrs))
    }

    pub fn end_inline(
        &mut self,
        result: &mut ParserResult,
        kind: ElementKind,
        ctx: Ctx<'_>,
    ) -> Result<()> {
        each_builder!(&mut self.inner, b => b.end_inline(result, kind, ctx))
    }

    pub fn text(&mut self, text: &str) {
        each_builder!(&mut self.inner, b => b.text(text))
    }

    pub fn child_finished(
        &mut self,
        result: &mut ParserResult,
        kind: ElementKind,
        finished: Finished,
        ctx: Ctx<'_>,
    ) -> Result<Option<u32>> {
        each_builder!(&mut self.inner, b => b.child_finished(result, kind, finished, ctx))
    }

    /// Liefert den fertigen Blob, genau einmal. Jeder weitere Aufruf
    /// wird protokolliert und liefert `None`.
    pub fn finish(&mut self, result: &mut ParserResult) -> Option<Finished> {
        if self.state != State::Parsing {
            log::warn!("finish on {:?} builder in state {:?}", self.kind(), self.state);
            return None;
        }
        self.state = State::Finished;
        Some(each_builder!(&mut self.inner, b => b.finish(result)))
    }

    pub fn index(&self, result: &mut ParserResult, position: u32) {
        each_builder!(&self.inner, b => b.index(result, position))
    }

    pub fn reset(&mut self) {
        self.state = State::Idle;
        each_builder!(&mut self.inner, b => b.reset())
    }
}

/// Sammelt die allen benannten Elementen gemeinsamen Attribute ein.
/// Alles ist optional, die Defaults entsprechen dem Nullzustand.
pub(crate) fn collect_common(
    result: &mut ParserResult,
    attrs: &Attrs<'_>,
    kind: BlobKind,
) -> Result<CommonBlob> {
    Ok(CommonBlob {
        kind,
        name: attrs.intern(result.strings_mut(), "name"),
        doc: -1,
        deprecated: attrs.boolean("deprecated", false),
        deprecated_version: attrs.intern(result.strings_mut(), "deprecated-version"),
        version: attrs.intern(result.strings_mut(), "version"),
        stability: attrs.stability("stability", Stability::Stable)?,
        introspectable: attrs.boolean("introspectable", false),
    })
}

/// Übernimmt das Ergebnis eines `<type>`/`<array>` Kindes in den
/// Typ-Slot eines Eltern-Blobs. Ein zweiter Typ am selben Knoten ist
/// ein Strukturfehler.
pub(crate) fn store_type_child(
    result: &mut ParserResult,
    slot: &mut TypeRef,
    finished: Finished,
    ctx: Ctx<'_>,
) -> Result<()> {
    if !slot.is_none() {
        return Err(ctx.structural("type_ref already set"));
    }
    match finished {
        Finished::Type(blob) => *slot = result.add_type(blob),
        Finished::Array(blob) => *slot = result.add_array(blob),
        _ => {}
    }
    Ok(())
}

/// Leert einen Kategorie-Puffer als zusammenhängenden Lauf in eine
/// Tabelle: `base` ist der Offset des ersten Blobs, `count` die Anzahl.
pub(crate) fn flush_run<T>(
    result: &mut ParserResult,
    items: &mut Vec<T>,
    mut add: impl FnMut(&mut ParserResult, T) -> u32,
) -> Run {
    let mut run = Run::default();
    for (i, item) in items.drain(..).enumerate() {
        let offset = add(result, item);
        if i == 0 {
            run.base = offset;
        }
        run.count += 1;
    }
    run
}
