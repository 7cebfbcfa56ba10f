use ctw_uct::context_tree::ContextTree;
use ctw_uct::symbol::{parse_symbols, Symbol};
use rand::rngs::StdRng;
use rand::SeedableRng;

const TOLERANCE: f64 = 1e-9;

fn bits(s: &str) -> Vec<Symbol> {
    parse_symbols(s).unwrap()
}

/// Every node with its context, counts and cached log-probabilities
fn snapshot(tree: &ContextTree) -> Vec<(Vec<Symbol>, [u64; 2], f64, f64)> {
    tree.contexts()
        .into_iter()
        .map(|(context, node)| (context, node.counts(), node.log_kt(), node.log_probability()))
        .collect()
}

fn assert_same_state(actual: &ContextTree, expected: &ContextTree) {
    assert_eq!(actual.size(), expected.size(), "sizes differ");
    assert_eq!(actual.history(), expected.history(), "histories differ");

    let (actual, expected) = (snapshot(actual), snapshot(expected));
    assert_eq!(actual.len(), expected.len(), "node sets differ");

    for (a, e) in actual.iter().zip(expected.iter()) {
        assert_eq!(a.0, e.0, "contexts differ");
        assert_eq!(a.1, e.1, "counts differ at context {:?}", a.0);
        assert!((a.2 - e.2).abs() < TOLERANCE, "log_kt differs at context {:?}", a.0);
        assert!((a.3 - e.3).abs() < TOLERANCE, "log_prob differs at context {:?}", a.0);
    }
}

#[test]
fn test_kt_estimate_after_three_zeros() {
    let mut tree = ContextTree::new(0);
    tree.update(&bits("000"));

    assert!((tree.predict(&[Symbol::One]) - 0.125).abs() < TOLERANCE);
    assert!((tree.predict(&[Symbol::Zero]) - 0.875).abs() < TOLERANCE);
}

#[test]
fn test_uniform_prediction_without_enough_context() {
    let mut tree = ContextTree::new(3);

    assert_eq!(tree.predict(&bits("01")), 0.25);
    assert_eq!(tree.size(), 1, "a uniform prediction must not touch the tree");
    assert!(tree.history().is_empty());
}

#[test]
fn test_predictions_sum_to_one() {
    let mut tree = ContextTree::new(3);
    let sequence = bits("0110100110010110");

    for (i, symbol) in sequence.iter().enumerate() {
        let total = tree.predict(&[Symbol::Zero]) + tree.predict(&[Symbol::One]);
        assert!((total - 1.0).abs() < TOLERANCE, "sum {} after {} symbols", total, i);
        tree.update(&[*symbol]);
    }
}

#[test]
fn test_predictions_sum_to_one_once_history_exceeds_depth() {
    let mut tree = ContextTree::new(2);
    tree.update(&bits("010"));

    let zero = tree.predict(&[Symbol::Zero]);
    let one = tree.predict(&[Symbol::One]);
    assert!((zero + one - 1.0).abs() < TOLERANCE, "P(0) = {}, P(1) = {}", zero, one);
}

#[test]
fn test_block_predictions_sum_to_one_across_the_depth_boundary() {
    let blocks = ["00", "01", "10", "11"];

    for history in ["", "0", "01", "011"] {
        let mut tree = ContextTree::new(2);
        tree.update(&bits(history));

        let total: f64 = blocks.iter().map(|block| tree.predict(&bits(block))).sum();
        assert!(
            (total - 1.0).abs() < TOLERANCE,
            "blocks sum to {} after history {:?}",
            total,
            history
        );
    }
}

#[test]
fn test_block_prediction_chains_single_symbol_predictions() {
    let mut tree = ContextTree::new(2);
    tree.update(&bits("010"));

    let block = tree.predict(&bits("10"));
    let first = tree.predict(&bits("1"));
    tree.update(&bits("1"));
    let second = tree.predict(&bits("0"));

    assert!((block - first * second).abs() < TOLERANCE);
}

#[test]
fn test_prediction_leaves_no_trace() {
    let mut tree = ContextTree::new(4);
    tree.update(&bits("1101001"));
    let mut reference = ContextTree::new(4);
    reference.update(&bits("1101001"));

    tree.predict(&bits("0110"));
    assert_same_state(&tree, &reference);
}

#[test]
fn test_update_then_revert_restores_everything() {
    let mut tree = ContextTree::new(3);
    tree.update(&bits("10011"));
    let mut reference = ContextTree::new(3);
    reference.update(&bits("10011"));

    tree.update(&bits("0111010"));
    tree.revert(7);
    assert_same_state(&tree, &reference);
}

#[test]
fn test_revert_matches_shorter_history() {
    let mut tree = ContextTree::new(2);
    tree.update(&bits("01010"));
    tree.revert(2);

    let mut fresh = ContextTree::new(2);
    fresh.update(&bits("010"));

    assert_eq!(tree.size(), fresh.size());
    assert!((tree.root_log_probability() - fresh.root_log_probability()).abs() < TOLERANCE);
    assert_same_state(&tree, &fresh);
}

#[test]
fn test_size_matches_traversal() {
    let mut tree = ContextTree::new(4);
    let steps: [(&str, usize); 5] = [("0110", 1), ("111", 4), ("0001", 0), ("10", 3), ("1", 2)];

    for (update, revert) in steps {
        tree.update(&bits(update));
        assert_eq!(tree.size(), tree.count_nodes());
        tree.revert(revert);
        assert_eq!(tree.size(), tree.count_nodes());
    }
}

#[test]
fn test_depth_zero_uses_only_the_root() {
    let mut tree = ContextTree::new(0);
    tree.update(&bits("0101101"));

    assert_eq!(tree.size(), 1);
    assert_eq!(tree.root().counts(), [3, 4]);
    assert_eq!(tree.root_log_probability(), tree.root().log_kt());
}

#[test]
fn test_generating_symbols_without_update_leaves_tree_unchanged() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut tree = ContextTree::new(3);
    tree.update(&bits("001011101"));
    let mut reference = ContextTree::new(3);
    reference.update(&bits("001011101"));

    let symbols = tree.generate_random_symbols(6, &mut rng);
    assert_eq!(symbols.len(), 6);
    assert_same_state(&tree, &reference);
}

#[test]
fn test_generating_symbols_with_update_records_them() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut tree = ContextTree::new(3);
    tree.update(&bits("0010"));

    let symbols = tree.generate_random_symbols_and_update(5, &mut rng);
    assert_eq!(tree.history_len(), 9);
    assert_eq!(&tree.history()[4..], symbols.as_slice());
}

#[test]
fn test_generation_follows_a_deterministic_source() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut tree = ContextTree::new(2);
    tree.update(&bits(&"0".repeat(200)));

    let symbols = tree.generate_random_symbols(20, &mut rng);
    let ones = symbols.iter().filter(|s| s.is_set()).count();
    assert!(ones < 10, "expected mostly zeros, got {} ones", ones);
}

#[test]
fn test_clear_resets_to_a_single_root() {
    let mut tree = ContextTree::new(3);
    tree.update(&bits("0110101"));
    tree.clear();

    assert_eq!(tree.size(), 1);
    assert_eq!(tree.history_len(), 0);
    assert_eq!(tree.root().visits(), 0);
    assert_eq!(tree.root_log_probability(), 0.0);
}

#[test]
fn test_history_only_symbols_shape_context_without_learning() {
    let mut tree = ContextTree::new(1);
    tree.update(&bits("00"));
    tree.update_history(&bits("1"));

    assert_eq!(tree.root().visits(), 1);
    assert_eq!(tree.history(), bits("001").as_slice());

    // The next update is learned in context "1"
    tree.update(&bits("0"));
    assert_eq!(tree.node_at(&[Symbol::One]).map(|n| n.counts()), Some([1, 0]));
}

#[test]
#[should_panic(expected = "cannot revert")]
fn test_reverting_past_the_history_panics() {
    let mut tree = ContextTree::new(2);
    tree.update(&bits("01"));
    tree.revert(3);
}

#[test]
fn test_display_renders_nested_contexts() {
    let mut tree = ContextTree::new(1);
    tree.update(&bits("011"));

    let text = tree.to_string();
    assert!(text.starts_with("root"));
    assert_eq!(text.lines().count(), tree.size());
}
