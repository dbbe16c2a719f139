//! Builder-Pool mit Freiliste und offenem Element-Stack.
//!
//! Pro `BuilderKind` wird eine Freiliste zurückgesetzter Instanzen
//! geführt, so dass tiefe Dokumente nicht für jedes Element neu
//! allozieren. Der Wiederverwendungs-Modus wird einmal bei der
//! Konstruktion gewählt; ohne ihn wird jede Instanz nach Gebrauch
//! verworfen.
//!
//! Der Stack bildet die offenen Elemente mit eigenem Builder ab, Kopf
//! ist das aktuell innerste. Inline verarbeitete Elemente tauchen hier
//! nicht auf, die verwaltet der Parser selbst.

use crate::FastHashMap;
use crate::builder::{Builder, BuilderKind};

pub struct Pool {
    reuse: bool,
    free: FastHashMap<BuilderKind, Vec<Builder>>,
    stack: Vec<Builder>,
}

impl Pool {
    pub fn new(reuse: bool) -> Self {
        Self {
            reuse,
            free: FastHashMap::default(),
            stack: Vec::new(),
        }
    }

    /// Holt einen Builder aus der Freiliste oder alloziert einen neuen
    /// und legt ihn als innersten auf den Stack.
    pub fn get_object(&mut self, kind: BuilderKind) -> &mut Builder {
        let builder = self
            .free
            .get_mut(&kind)
            .and_then(Vec::pop)
            .unwrap_or_else(|| Builder::new(kind));
        self.stack.push(builder);
        let top = self.stack.len() - 1;
        &mut self.stack[top]
    }

    /// Nimmt den innersten Builder vom Stack. Der Aufrufer schließt ihn
    /// ab und gibt ihn mit [`Pool::recycle`] zurück.
    pub fn release_object(&mut self) -> Option<Builder> {
        self.stack.pop()
    }

    /// Setzt den Builder zurück und stellt ihn in seine Freiliste; ohne
    /// Wiederverwendungs-Modus wird er verworfen.
    pub fn recycle(&mut self, mut builder: Builder) {
        if !self.reuse {
            return;
        }
        builder.reset();
        self.free.entry(builder.kind()).or_default().push(builder);
    }

    pub fn current_mut(&mut self) -> Option<&mut Builder> {
        self.stack.last_mut()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
