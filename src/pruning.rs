use rand::Rng;

/// Decide which of a node's `branch_factor` children are pruned.
///
/// Trials only run when pruning display is on, the node actually branches
/// and `depth` has an entry in `survival_prob`; otherwise every child
/// survives and the random source is left untouched. Child `i` is pruned
/// when its uniform draw is not below the survival probability.
pub fn prune_children<R: Rng + ?Sized>(
    depth: u32,
    branch_factor: u32,
    show_pruning: bool,
    survival_prob: &[f64],
    rng: &mut R,
) -> Vec<bool> {
    let n = branch_factor as usize;
    let probability = match survival_prob.get(depth as usize) {
        Some(&p) if show_pruning && branch_factor > 1 => p,
        _ => return vec![false; n],
    };

    (0..n).map(|_| rng.gen::<f64>() >= probability).collect()
}
