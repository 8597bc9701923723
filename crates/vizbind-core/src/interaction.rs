// File: crates/vizbind-core/src/interaction.rs
// Summary: Pointer-to-record resolution: direct hit tests and nearest-x bisection.

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};
use crate::reconcile::{Reconciler, VisualElement};
use crate::record::{Dataset, ElementKey};
use crate::scale::{LinearScale, ScaleTransform};
use crate::types::Point;

/// Pointer input in render-target coordinates, delivered in arrival order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Enter(Point),
    Move(Point),
    Leave,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverStrategy {
    /// The record bound to the element under the pointer.
    #[default]
    DirectHit,
    /// The record whose key is nearest to the inverted pointer x.
    NearestX,
    /// `NearestX`, but only while the pointer is over a mark (e.g. a stacked area).
    NearestXOverMark,
}

impl HoverStrategy {
    /// Whether nearest-x lookups need a sorted key column.
    pub fn uses_keys(&self) -> bool {
        !matches!(self, HoverStrategy::DirectHit)
    }
}

/// Ascending key column, validated once so queries can bisect.
#[derive(Clone, Debug, PartialEq)]
pub struct SortedKeys {
    keys: Vec<f64>,
}

impl SortedKeys {
    pub fn new(keys: Vec<f64>, field: &str) -> Result<Self> {
        for (i, k) in keys.iter().enumerate() {
            let bad = !k.is_finite() || (i > 0 && keys[i - 1] > *k);
            if bad {
                return Err(ChartError::UnsortedDataset { field: field.to_string(), index: i });
            }
        }
        Ok(Self { keys })
    }

    /// Key column of `dataset`; every record must carry a numeric or temporal key.
    pub fn from_dataset(dataset: &Dataset, field: &str) -> Result<Self> {
        let idx = dataset.field(field)?;
        if let Some(row) = dataset.records().iter().position(|r| r.number(idx).is_none()) {
            return Err(ChartError::parse(row + 1, field, "missing key value"));
        }
        dataset.check_sorted(field)?;
        Self::new(dataset.numbers(idx).collect(), field)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.keys
    }

    /// First index whose key is `>= value`.
    pub fn bisect_left(&self, value: f64) -> usize {
        self.keys.partition_point(|k| *k < value)
    }

    /// Index of the key closest to `value`; ties go to the lower index.
    pub fn nearest(&self, value: f64) -> Option<usize> {
        if self.keys.is_empty() || value.is_nan() {
            return None;
        }
        let i = self.bisect_left(value);
        if i == 0 {
            return Some(0);
        }
        if i == self.keys.len() {
            return Some(i - 1);
        }
        let before = value - self.keys[i - 1];
        let after = self.keys[i] - value;
        Some(if before > after { i } else { i - 1 })
    }
}

/// Element under the pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct HitElement {
    pub layer: usize,
    pub key: ElementKey,
    pub item: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hover {
    pub element: Option<HitElement>,
    /// Record index from nearest-x resolution.
    pub nearest: Option<usize>,
    /// Domain value at the pointer x, when resolved by bisection.
    pub domain: Option<f64>,
}

impl Hover {
    fn is_empty(&self) -> bool {
        self.element.is_none() && self.nearest.is_none()
    }
}

/// Single active hover target plus the last pointer position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
    pub hovered: Option<Hover>,
    pub pointer: Option<Point>,
}

/// Topmost element containing `p`: later layers, then later elements, win.
pub fn hit_test<'a>(layers: &'a [Reconciler], p: Point) -> Option<(usize, &'a VisualElement)> {
    layers.iter().enumerate().rev().find_map(|(li, layer)| {
        layer
            .elements()
            .rev()
            .find(|el| el.attributes.shape.contains(p))
            .map(|el| (li, el))
    })
}

#[derive(Clone, Debug, Default)]
pub struct InteractionResolver {
    strategy: HoverStrategy,
    keys: Option<SortedKeys>,
    state: InteractionState,
}

impl InteractionResolver {
    pub fn new(strategy: HoverStrategy) -> Self {
        Self { strategy, keys: None, state: InteractionState::default() }
    }

    pub fn strategy(&self) -> HoverStrategy {
        self.strategy
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Install the key column for nearest-x lookups (replaced on every data change).
    pub fn set_keys(&mut self, keys: Option<SortedKeys>) {
        self.keys = keys;
    }

    pub fn keys(&self) -> Option<&SortedKeys> {
        self.keys.as_ref()
    }

    /// Pure lookup: what is under / nearest to `p`.
    pub fn resolve_at(&self, p: Point, layers: &[Reconciler], x: Option<&LinearScale>) -> Option<Hover> {
        let element = hit_test(layers, p).map(|(layer, el)| HitElement {
            layer,
            key: el.key.clone(),
            item: el.item,
        });
        let mut hover = Hover { element, ..Hover::default() };
        let bisect = match self.strategy {
            HoverStrategy::DirectHit => false,
            HoverStrategy::NearestX => true,
            HoverStrategy::NearestXOverMark => hover.element.is_some(),
        };
        if bisect {
            if let (Some(keys), Some(x)) = (&self.keys, x) {
                let value = x.invert(p.x);
                hover.nearest = keys.nearest(value);
                hover.domain = Some(value);
            }
        }
        (!hover.is_empty()).then_some(hover)
    }

    /// Apply one pointer event and return the resulting hover (if any).
    pub fn handle(&mut self, event: PointerEvent, layers: &[Reconciler], x: Option<&LinearScale>) -> Option<&Hover> {
        match event {
            PointerEvent::Enter(p) | PointerEvent::Move(p) => {
                self.state.pointer = Some(p);
                self.state.hovered = self.resolve_at(p, layers, x);
            }
            PointerEvent::Leave => {
                self.state = InteractionState::default();
            }
        }
        self.state.hovered.as_ref()
    }

    pub fn clear(&mut self) {
        self.state = InteractionState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsorted_keys_rejected() {
        let err = SortedKeys::new(vec![1.0, 3.0, 2.0], "Years").unwrap_err();
        assert_eq!(err, ChartError::UnsortedDataset { field: "Years".into(), index: 2 });
        assert!(SortedKeys::new(vec![1.0, f64::NAN], "Years").is_err());
    }

    #[test]
    fn dataset_keys_must_be_present_and_ascending() {
        use crate::record::{Field, FieldValue};
        let ds = |vals: Vec<FieldValue>| {
            Dataset::from_rows(vec![Field::numeric("Years")], vals.into_iter().map(|v| vec![v]).collect()).unwrap()
        };
        let unsorted = ds(vec![FieldValue::Number(2001.0), FieldValue::Number(2000.0)]);
        assert!(matches!(
            SortedKeys::from_dataset(&unsorted, "Years"),
            Err(ChartError::UnsortedDataset { index: 1, .. })
        ));
        let gap = ds(vec![FieldValue::Number(2000.0), FieldValue::Missing]);
        assert!(matches!(SortedKeys::from_dataset(&gap, "Years"), Err(ChartError::Parse { row: 2, .. })));
        let ok = ds(vec![FieldValue::Number(2000.0), FieldValue::Number(2005.0)]);
        assert_eq!(SortedKeys::from_dataset(&ok, "Years").unwrap().as_slice(), &[2000.0, 2005.0]);
    }

    #[test]
    fn nearest_clamps_to_ends() {
        let k = SortedKeys::new(vec![2000.0, 2005.0, 2010.0], "Years").unwrap();
        assert_eq!(k.nearest(1990.0), Some(0));
        assert_eq!(k.nearest(2030.0), Some(2));
        assert_eq!(k.nearest(2005.0), Some(1));
        let empty = SortedKeys::new(Vec::new(), "Years").unwrap();
        assert_eq!(empty.nearest(1.0), None);
    }
}
