//! Built-in synthetic data for the `demo` command
//!
//! Generates grouped, typed samples without needing an input file. Each group
//! draws a home type; a `purity` share of its samples carry that type and the
//! rest get a uniformly random one.

use rand::prelude::*;

/// Synthetic grouped dataset, one entry per sample
pub struct GroupedData {
    pub groups: Vec<String>,
    pub group_types: Vec<String>,
}

/// Generate `n_samples` rows spread over `n_groups` groups and `n_types` types
///
/// Every group receives at least one sample, and home types cycle through the
/// type labels so each type owns roughly `n_groups / n_types` groups.
pub fn generate_grouped_data(
    n_groups: usize,
    n_samples: usize,
    n_types: usize,
    purity: f64,
    seed: u64,
) -> GroupedData {
    let mut rng = StdRng::seed_from_u64(seed);
    let n_types = n_types.max(1);
    let n_samples = n_samples.max(n_groups);
    let purity = purity.clamp(0.0, 1.0);

    let type_labels: Vec<String> = (0..n_types).map(type_label).collect();
    let group_labels: Vec<String> = (0..n_groups).map(|g| format!("g{:02}", g)).collect();

    // First pass gives every group a sample, the rest land anywhere
    let mut membership: Vec<usize> = (0..n_groups).collect();
    membership.extend((n_groups..n_samples).map(|_| rng.gen_range(0..n_groups)));
    membership.sort_unstable();

    let mut groups = Vec::with_capacity(n_samples);
    let mut group_types = Vec::with_capacity(n_samples);
    for g in membership {
        let t = if rng.gen_bool(purity) {
            g % n_types
        } else {
            rng.gen_range(0..n_types)
        };
        groups.push(group_labels[g].clone());
        group_types.push(type_labels[t].clone());
    }

    GroupedData { groups, group_types }
}

/// A, B, ..., Z, T26, T27, ...
fn type_label(i: usize) -> String {
    if i < 26 {
        char::from(b'A' + i as u8).to_string()
    } else {
        format!("T{}", i)
    }
}
