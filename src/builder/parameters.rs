//! `<parameters>` und `<return-value>`.
//!
//! Ein Builder für beide Einstiege: unter einem Callable sammelt er die
//! Parameterliste, direkt als `<return-value>` gestartet beschreibt er
//! den Rückgabewert. Die einzelnen `<parameter>`-Kinder sind keine
//! eigenen Builder, ihr Zustand lebt hier, bis das End-Tag sie in den
//! Puffer übergibt. Erst `finish` schreibt den Puffer als einen
//! zusammenhängenden Lauf in die Parametertabelle.

use crate::attrs::Attrs;
use crate::blob::{Direction, ParameterBlob, Scope, TransferOwnership};
use crate::element::{ElementKind, mask};
use crate::error::Result;
use crate::result::ParserResult;

use super::{Ctx, Dispatch, DocState, ElementBuilder, Finished, flush_run};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Mode {
    #[default]
    List,
    Return,
}

#[derive(Default)]
pub struct ParametersBuilder {
    mode: Mode,
    blob: ParameterBlob,
    doc: DocState,
    buffered: Vec<ParameterBlob>,
    /// Zwischen `<parameter>` und seinem End-Tag.
    in_parameter: bool,
    in_varargs: bool,
}

impl ParametersBuilder {
    fn collect_parameter(&mut self, result: &mut ParserResult, attrs: &Attrs<'_>) -> Result<()> {
        let blob = &mut self.blob;
        blob.name = attrs.intern(result.strings_mut(), "name");
        blob.nullable = attrs.boolean("nullable", false);
        blob.allow_none = attrs.boolean("allow-none", false);
        blob.introspectable = attrs.boolean("introspectable", false);
        blob.caller_allocates = attrs.boolean("caller-allocates", false);
        blob.optional = attrs.boolean("optional", false);
        blob.skip = attrs.boolean("skip", false);
        blob.scope = attrs.scope("scope", Scope::Call)?;
        blob.direction = attrs.direction("direction", Direction::In)?;
        blob.transfer = attrs.transfer("transfer-ownership", TransferOwnership::None)?;
        blob.closure = attrs.int64("closure", -1)? as i32;
        blob.destroy = attrs.int64("destroy", -1)? as i32;
        blob.has_closure = blob.closure > -1;
        blob.has_destroy = blob.destroy > -1;
        Ok(())
    }

    /// `<instance-parameter>` kennt nur eine Teilmenge der Attribute.
    fn collect_instance(&mut self, result: &mut ParserResult, attrs: &Attrs<'_>) -> Result<()> {
        let blob = &mut self.blob;
        blob.name = attrs.intern(result.strings_mut(), "name");
        blob.nullable = attrs.boolean("nullable", false);
        blob.allow_none = attrs.boolean("allow-none", false);
        blob.caller_allocates = attrs.boolean("caller-allocates", false);
        blob.direction = attrs.direction("direction", Direction::In)?;
        blob.transfer = attrs.transfer("transfer-ownership", TransferOwnership::None)?;
        blob.instance_parameter = true;
        Ok(())
    }

    fn collect_return(&mut self, result: &mut ParserResult, attrs: &Attrs<'_>) -> Result<()> {
        let blob = &mut self.blob;
        blob.name = attrs.intern(result.strings_mut(), "name");
        blob.nullable = attrs.boolean("nullable", false);
        blob.allow_none = attrs.boolean("allow-none", false);
        blob.introspectable = attrs.boolean("introspectable", false);
        blob.skip = attrs.boolean("skip", false);
        blob.scope = attrs.scope("scope", Scope::Call)?;
        blob.transfer = attrs.transfer("transfer-ownership", TransferOwnership::None)?;
        blob.closure = attrs.int64("closure", -1)? as i32;
        blob.destroy = attrs.int64("destroy", -1)? as i32;
        blob.has_closure = blob.closure > -1;
        blob.has_destroy = blob.destroy > -1;
        blob.return_value = true;
        Ok(())
    }

    /// End-Tag eines Parameters: Doku einfrieren, Blob puffern.
    fn commit_parameter(&mut self, result: &mut ParserResult) {
        self.blob.doc = self.doc.finish(result);
        self.buffered.push(self.blob);
        self.blob = ParameterBlob::default();
        self.doc.reset();
        self.in_parameter = false;
    }
}

impl ElementBuilder for ParametersBuilder {
    fn parse(
        &mut self,
        result: &mut ParserResult,
        kind: ElementKind,
        attrs: &Attrs<'_>,
    ) -> Result<()> {
        if kind == ElementKind::ReturnValue {
            self.mode = Mode::Return;
            self.in_parameter = true;
            self.collect_return(result, attrs)?;
        } else {
            self.mode = Mode::List;
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
        if self.in_varargs {
            return Err(attrs.structural("We should not have sub-elements in <varargs>"));
        }
        if self.in_parameter {
            return Ok(match kind {
                K::Annotation | K::Attributes => {
                    self.doc.annotate(attrs);
                    Dispatch::Inline
                }
                K::Varargs => {
                    self.in_varargs = true;
                    Dispatch::Inline
                }
                k => Dispatch::masked(mask::PARAMETER, k),
            });
        }
        if !mask::PARAMETERS.contains(kind) {
            return Ok(Dispatch::Unhandled);
        }
        match kind {
            K::Parameter => {
                self.collect_parameter(result, attrs)?;
                self.in_parameter = true;
                Ok(Dispatch::Inline)
            }
            K::InstanceParameter => {
                self.collect_instance(result, attrs)?;
                self.in_parameter = true;
                Ok(Dispatch::Inline)
            }
            K::ReturnValue => {
                self.collect_return(result, attrs)?;
                self.in_parameter = true;
                Ok(Dispatch::Inline)
            }
            _ => Ok(Dispatch::Unhandled),
        }
    }

    fn end_inline(
        &mut self,
        result: &mut ParserResult,
        kind: ElementKind,
        _ctx: Ctx<'_>,
    ) -> Result<()> {
        use ElementKind as K;
        match kind {
            K::Varargs => {
                self.in_varargs = false;
                self.blob.varargs = true;
            }
            K::Parameter | K::InstanceParameter | K::ReturnValue => {
                self.commit_parameter(result);
            }
            _ => {}
        }
        Ok(())
    }

    fn child_finished(
        &mut self,
        result: &mut ParserResult,
        _kind: ElementKind,
        finished: Finished,
        ctx: Ctx<'_>,
    ) -> Result<Option<u32>> {
        match finished {
            Finished::Type(_) | Finished::Array(_) => {
                super::store_type_child(result, &mut self.blob.typeref, finished, ctx)?;
            }
            Finished::Doc(piece) => self.doc.absorb(result, piece),
            _ => {}
        }
        Ok(None)
    }

    fn finish(&mut self, result: &mut ParserResult) -> Finished {
        match self.mode {
            Mode::List => {
                let run = flush_run(result, &mut self.buffered, |r, b| r.add_parameter(b));
                Finished::Parameters(run)
            }
            Mode::Return => {
                self.blob.doc = self.doc.finish(result);
                Finished::ReturnValue(self.blob)
            }
        }
    }

    fn reset(&mut self) {
        self.mode = Mode::List;
        self.blob = ParameterBlob::default();
        self.doc.reset();
        self.buffered.clear();
        self.in_parameter = false;
        self.in_varargs = false;
    }
}
