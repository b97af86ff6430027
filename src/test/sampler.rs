use crate::road::{CategoricalSampler, NodeId};

#[test]
fn pick_maps_uniform_draw_onto_cumulative_table() {
    let edges = [(NodeId(1), 0.5), (NodeId(2), 0.25), (NodeId(3), 0.25)];
    let s = CategoricalSampler::new(&edges);

    assert_eq!(s.pick(0.0), Some(NodeId(1)));
    assert_eq!(s.pick(0.49), Some(NodeId(1)));
    assert_eq!(s.pick(0.5), Some(NodeId(2)));
    assert_eq!(s.pick(0.74), Some(NodeId(2)));
    assert_eq!(s.pick(0.75), Some(NodeId(3)));
    assert_eq!(s.pick(0.999_999), Some(NodeId(3)));
    // 上界之外的输入落在最后一项
    assert_eq!(s.pick(1.0), Some(NodeId(3)));
}

#[test]
fn zero_probability_edges_are_never_selected() {
    let edges = [(NodeId(1), 0.0), (NodeId(2), 1.0), (NodeId(3), 0.0)];
    let s = CategoricalSampler::new(&edges);

    for i in 0..1_000 {
        let u = i as f64 / 1_000.0;
        assert_eq!(s.pick(u), Some(NodeId(2)));
    }
}

#[test]
fn empty_table_yields_none() {
    let s = CategoricalSampler::new(&[] as &[(NodeId, f64)]);
    assert!(s.is_empty());
    assert_eq!(s.pick(0.3), None);

    let only_zero = CategoricalSampler::new(&[(NodeId(7), 0.0)]);
    assert!(only_zero.is_empty());
    assert_eq!(only_zero.pick(0.3), None);
}

#[test]
fn frequencies_follow_weights() {
    let edges = [(NodeId(1), 0.7), (NodeId(2), 0.3)];
    let s = CategoricalSampler::new(&edges);

    let n = 10_000;
    let ones = (0..n)
        .filter(|i| s.pick((*i as f64 + 0.5) / n as f64) == Some(NodeId(1)))
        .count();
    assert_eq!(ones, 7_000);
}
