//! Compressed radix tree keyed by byte strings.
//!
//! Traegt den Objekt-Index eines Namespaces: Wort -> beliebig viele
//! Payloads. Kanten speichern Byte-Fragmente (Splits duerfen mitten in
//! einem UTF-8-Codepoint liegen), vollstaendige Woerter sind immer
//! gueltiges UTF-8, weil sie als `&str` eingefuegt wurden.

use core::mem;

pub struct RadixTree<T> {
    root: Node<T>,
    len: usize,
}

struct Node<T> {
    prefix: Vec<u8>,
    payloads: Vec<T>,
    children: Vec<Node<T>>,
}

impl<T> Node<T> {
    fn empty() -> Self {
        Self {
            prefix: Vec::new(),
            payloads: Vec::new(),
            children: Vec::new(),
        }
    }

    fn leaf(prefix: &[u8], payload: T) -> Self {
        Self {
            prefix: prefix.to_vec(),
            payloads: vec![payload],
            children: Vec::new(),
        }
    }

    /// true wenn das Wort neu war.
    fn insert(&mut self, key: &[u8], payload: T) -> bool {
        if key.is_empty() {
            let fresh = self.payloads.is_empty();
            self.payloads.push(payload);
            return fresh;
        }
        for child in &mut self.children {
            let common = common_prefix(&child.prefix, key);
            if common == 0 {
                continue;
            }
            if common < child.prefix.len() {
                child.split(common);
            }
            return child.insert(&key[common..], payload);
        }
        self.children.push(Node::leaf(key, payload));
        true
    }

    /// Teilt die Kante: `self` behaelt die ersten `at` Bytes, der Rest
    /// wandert in ein neues Kind samt Payloads und Unterbaum.
    fn split(&mut self, at: usize) {
        let tail = self.prefix.split_off(at);
        let moved = Node {
            prefix: tail,
            payloads: mem::take(&mut self.payloads),
            children: mem::take(&mut self.children),
        };
        self.children.push(moved);
    }

    fn lookup(&self, key: &[u8]) -> Option<&[T]> {
        if key.is_empty() {
            return (!self.payloads.is_empty()).then_some(self.payloads.as_slice());
        }
        for child in &self.children {
            if key.starts_with(&child.prefix) {
                return child.lookup(&key[child.prefix.len()..]);
            }
        }
        None
    }

    fn visit<'s>(&'s self, path: &mut Vec<u8>, f: &mut dyn FnMut(&str, &'s [T])) {
        path.extend_from_slice(&self.prefix);
        if !self.payloads.is_empty()
            && let Ok(word) = str::from_utf8(path)
        {
            f(word, &self.payloads);
        }
        for child in &self.children {
            child.visit(path, f);
        }
        path.truncate(path.len() - self.prefix.len());
    }

    fn count_nodes(&self) -> usize {
        1 + self.children.iter().map(Node::count_nodes).sum::<usize>()
    }
}

fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

impl<T> RadixTree<T> {
    pub fn new() -> Self {
        Self {
            root: Node::empty(),
            len: 0,
        }
    }

    /// Fuegt `payload` unter `word` ein. Mehrfaches Einfuegen desselben
    /// Worts sammelt alle Payloads in Einfuege-Reihenfolge.
    pub fn insert(&mut self, word: &str, payload: T) {
        if self.root.insert(word.as_bytes(), payload) {
            self.len += 1;
        }
    }

    /// Exakte Suche.
    pub fn lookup(&self, word: &str) -> Option<&[T]> {
        self.root.lookup(word.as_bytes())
    }

    /// Besucht alle Woerter in DFS-Reihenfolge.
    pub fn for_each<'s>(&'s self, mut f: impl FnMut(&str, &'s [T])) {
        let mut path = Vec::new();
        self.root.visit(&mut path, &mut f);
    }

    /// Alle Woerter, die mit `prefix` beginnen.
    pub fn complete(&self, prefix: &str) -> Vec<(String, &[T])> {
        let mut out = Vec::new();
        self.for_each(|word, payloads| {
            if word.as_bytes().starts_with(prefix.as_bytes()) {
                out.push((word.to_owned(), payloads));
            }
        });
        out
    }

    /// Anzahl unterschiedlicher Woerter.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }
}

impl<T> Default for RadixTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for RadixTree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        self.for_each(|word, payloads| {
            map.entry(&word, &payloads);
        });
        map.finish()
    }
}
