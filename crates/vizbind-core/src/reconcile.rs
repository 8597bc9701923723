// File: crates/vizbind-core/src/reconcile.rs
// Summary: Keyed enter/update/exit reconciliation of visual elements against items.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::error::{ChartError, Result};
use crate::mark::{Attributes, ShapeKind};
use crate::record::{ElementKey, Record};
use crate::transition::{Transition, TransitionSpec};

/// How items become marks: identity plus placement under the current scales.
pub trait MarkLayout<T> {
    fn key(&self, index: usize, item: &T) -> ElementKey;
    fn place(&self, index: usize, item: &T) -> Result<Attributes>;
    /// Starting attributes for an entering element; `None` appears at the target directly.
    fn enter_from(&self, _target: &Attributes) -> Option<Attributes> {
        None
    }
}

/// Key function for record-backed layouts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeySelector {
    /// Position in the dataset; only for data without a natural key.
    Index,
    /// Value of a field (e.g. a year or category).
    Field(usize),
}

impl KeySelector {
    pub fn key(&self, index: usize, record: &Record) -> ElementKey {
        match self {
            KeySelector::Index => ElementKey::Index(index),
            KeySelector::Field(f) => record
                .get(*f)
                .map(|v| v.to_key())
                .unwrap_or(ElementKey::Index(index)),
        }
    }
}

/// One rendered mark bound to exactly one item.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualElement {
    pub key: ElementKey,
    /// Index of the bound item in the last reconciled slice.
    pub item: usize,
    /// Logical state; updated immediately, independent of animation.
    pub attributes: Attributes,
    transition: Option<Transition>,
}

impl VisualElement {
    /// Attributes as displayed at `at`.
    pub fn current(&self, at: Duration) -> Attributes {
        match &self.transition {
            Some(t) => t.sample(at),
            None => self.attributes.clone(),
        }
    }

    pub fn is_animating(&self, at: Duration) -> bool {
        self.transition.as_ref().map(|t| !t.is_finished(at)).unwrap_or(false)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
    Enter,
    Update,
    Exit,
}

/// Declarative instruction for a render target.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderCommand {
    pub key: ElementKey,
    pub change: Change,
    pub kind: ShapeKind,
    /// Target attributes (for exits, the last ones).
    pub attributes: Attributes,
    pub transition: Option<TransitionSpec>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReconcileReport {
    pub commands: Vec<RenderCommand>,
}

impl ReconcileReport {
    fn keys(&self, change: Change) -> impl Iterator<Item = &ElementKey> {
        self.commands.iter().filter(move |c| c.change == change).map(|c| &c.key)
    }
    pub fn entered(&self) -> impl Iterator<Item = &ElementKey> { self.keys(Change::Enter) }
    pub fn updated(&self) -> impl Iterator<Item = &ElementKey> { self.keys(Change::Update) }
    pub fn exited(&self) -> impl Iterator<Item = &ElementKey> { self.keys(Change::Exit) }

    pub fn count(&self, change: Change) -> usize {
        self.keys(change).count()
    }

    /// No element was created or removed.
    pub fn is_stable(&self) -> bool {
        self.count(Change::Enter) == 0 && self.count(Change::Exit) == 0
    }
}

/// Owns the element set of one layer, keyed by element key.
#[derive(Clone, Debug, Default)]
pub struct Reconciler {
    elements: HashMap<ElementKey, VisualElement>,
    order: Vec<ElementKey>,
    spec: TransitionSpec,
}

impl Reconciler {
    pub fn new(spec: TransitionSpec) -> Self {
        Self { elements: HashMap::new(), order: Vec::new(), spec }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, key: &ElementKey) -> Option<&VisualElement> {
        self.elements.get(key)
    }

    /// Elements in item order.
    pub fn elements(&self) -> impl DoubleEndedIterator<Item = &VisualElement> {
        self.order.iter().filter_map(|k| self.elements.get(k))
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.order.clear();
    }

    /// Synchronize elements with `items`.
    ///
    /// All placements are computed before anything changes, so a failing item leaves the
    /// previous element set untouched. An update whose target differs from the current one
    /// replaces any in-flight transition, starting from the value displayed at `at`.
    pub fn reconcile<T, L>(&mut self, items: &[T], layout: &L, at: Duration) -> Result<ReconcileReport>
    where
        L: MarkLayout<T> + ?Sized,
    {
        let spec = self.spec;
        self.reconcile_with(items, layout, at, spec)
    }

    /// `reconcile` with a transition other than the layer's own for this pass only.
    pub fn reconcile_with<T, L>(&mut self, items: &[T], layout: &L, at: Duration, spec: TransitionSpec) -> Result<ReconcileReport>
    where
        L: MarkLayout<T> + ?Sized,
    {
        let mut placed = Vec::with_capacity(items.len());
        let mut seen = HashSet::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let key = layout.key(i, item);
            if !seen.insert(key.clone()) {
                return Err(ChartError::DuplicateKey(key.to_string()));
            }
            placed.push((key, i, layout.place(i, item)?));
        }

        let mut report = ReconcileReport::default();
        for old in &self.order {
            if !seen.contains(old) {
                if let Some(el) = self.elements.remove(old) {
                    report.commands.push(RenderCommand {
                        key: el.key,
                        change: Change::Exit,
                        kind: el.attributes.kind(),
                        attributes: el.attributes,
                        transition: None,
                    });
                }
            }
        }

        let mut order = Vec::with_capacity(placed.len());
        for (key, item, target) in placed {
            let kind = target.kind();
            let (change, transition) = match self.elements.get_mut(&key) {
                Some(el) => {
                    el.item = item;
                    let mut started = None;
                    if el.attributes != target {
                        let from = el.current(at);
                        el.transition = (!spec.is_instant())
                            .then(|| Transition::new(from, target.clone(), at, spec));
                        el.attributes = target.clone();
                        started = el.transition.as_ref().map(Transition::spec);
                    }
                    (Change::Update, started)
                }
                None => {
                    let transition = layout
                        .enter_from(&target)
                        .filter(|_| !spec.is_instant())
                        .map(|from| Transition::new(from, target.clone(), at, spec));
                    let started = transition.as_ref().map(Transition::spec);
                    self.elements.insert(
                        key.clone(),
                        VisualElement { key: key.clone(), item, attributes: target.clone(), transition },
                    );
                    (Change::Enter, started)
                }
            };
            report.commands.push(RenderCommand { key: key.clone(), change, kind, attributes: target, transition });
            order.push(key);
        }
        self.order = order;

        log::debug!(
            "reconcile: {} entered, {} updated, {} exited",
            report.count(Change::Enter),
            report.count(Change::Update),
            report.count(Change::Exit)
        );
        Ok(report)
    }
}
