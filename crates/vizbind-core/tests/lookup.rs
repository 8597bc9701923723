// File: crates/vizbind-core/tests/lookup.rs
// Purpose: Scale boundaries, nearest-x bisection, silhouette stacking and superseded transitions.

use std::time::Duration;

use vizbind_core::domain::linear_from_values;
use vizbind_core::stack::stack_columns;
use vizbind_core::{
    Attributes, DomainPolicy, ElementKey, LinearScale, MarkLayout, Reconciler, Result, ScaleTransform, Shape,
    SortedKeys, StackOffset, TransitionSpec,
};

#[test]
fn linear_scale_maps_domain_ends_to_range_ends() {
    let y = LinearScale::new((0.0, 15.0), (500.0, 0.0));
    assert_eq!(y.map(0.0), 500.0);
    assert_eq!(y.map(15.0), 0.0);
    assert!((y.invert(250.0) - 7.5).abs() < 1e-9);
}

#[test]
fn fixed_domain_clamps_outliers() {
    let y = linear_from_values("Rate", [1.0, 30.0], DomainPolicy::Fixed { min: 0.0, max: 15.0 }, (500.0, 0.0)).unwrap();
    assert_eq!(y.domain(), (0.0, 15.0));
    assert_eq!(y.map(30.0), 0.0);
    assert_eq!(y.map(-4.0), 500.0);
}

#[test]
fn nearest_x_picks_closer_key() {
    let keys = SortedKeys::new(vec![2000.0, 2005.0, 2010.0], "Years").unwrap();
    assert_eq!(keys.nearest(2006.0), Some(1));
    assert_eq!(keys.nearest(2008.0), Some(2));
    assert_eq!(keys.bisect_left(2005.0), 1);
}

#[test]
fn nearest_x_tie_goes_to_lower_key() {
    let keys = SortedKeys::new(vec![2000.0, 2005.0, 2010.0], "Years").unwrap();
    assert_eq!(keys.nearest(2002.5), Some(0));
    assert_eq!(keys.nearest(2007.5), Some(1));
}

#[test]
fn silhouette_is_symmetric_about_zero() {
    let keys = vec!["A".to_string(), "B".to_string()];
    let stacked = stack_columns(&keys, &[vec![3.0, 10.0], vec![1.0, 0.0]], StackOffset::Silhouette);

    let (a, b) = (&stacked[0].bands[0], &stacked[1].bands[0]);
    assert_eq!((a.lower, a.upper), (-2.0, 1.0));
    assert_eq!((b.lower, b.upper), (1.0, 2.0));

    for j in 0..2 {
        let low = stacked.first().unwrap().bands[j].lower;
        let high = stacked.last().unwrap().bands[j].upper;
        assert_eq!(low, -high);
    }
}

struct Heights;

impl MarkLayout<(i64, f32)> for Heights {
    fn key(&self, _index: usize, item: &(i64, f32)) -> ElementKey {
        ElementKey::Int(item.0)
    }

    fn place(&self, _index: usize, item: &(i64, f32)) -> Result<Attributes> {
        Ok(Attributes::new(Shape::Rect { x: 0.0, y: 0.0, width: 10.0, height: item.1 }))
    }
}

fn height_at(r: &Reconciler, at: Duration) -> f32 {
    match r.get(&ElementKey::Int(1)).unwrap().current(at).shape {
        Shape::Rect { height, .. } => height,
        other => panic!("unexpected shape {other:?}"),
    }
}

#[test]
fn newer_update_supersedes_transition_in_flight() {
    let ms = Duration::from_millis;
    let mut r = Reconciler::new(TransitionSpec::millis(1000));
    r.reconcile(&[(1, 0.0)], &Heights, ms(0)).unwrap();
    r.reconcile(&[(1, 100.0)], &Heights, ms(0)).unwrap();
    assert_eq!(height_at(&r, ms(500)), 50.0);

    // retarget mid-flight: starts from what is displayed, not from either endpoint
    r.reconcile(&[(1, 0.0)], &Heights, ms(500)).unwrap();
    assert_eq!(height_at(&r, ms(500)), 50.0);
    assert_eq!(height_at(&r, ms(1000)), 25.0);
    assert_eq!(height_at(&r, ms(1500)), 0.0);
    assert!(!r.get(&ElementKey::Int(1)).unwrap().is_animating(ms(1500)));
}

#[test]
fn reconcile_twice_is_stable() {
    let mut r = Reconciler::new(TransitionSpec::millis(1000));
    let items = [(1, 5.0), (2, 7.0)];
    r.reconcile(&items, &Heights, Duration::ZERO).unwrap();
    let report = r.reconcile(&items, &Heights, Duration::from_millis(5)).unwrap();
    assert!(report.is_stable());
    assert_eq!(report.updated().count(), 2);
    assert!(report.commands.iter().all(|c| c.transition.is_none()));
    assert!(r.elements().all(|e| !e.is_animating(Duration::from_millis(5))));
}
