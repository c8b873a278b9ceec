//! Group-type balanced folds on a synthetic trial dataset
//!
//! Builds 30 trials of three trial types with varying sample counts, splits
//! them into 5 folds and prints the per-fold type proportions.
//!
//! Run with: cargo run -p typefold-core --example grouped_folds

use rand::prelude::*;

use typefold_core::folds::{AssignStrategy, GroupTypeKFold, SplitReport};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let trial_types = ["go", "nogo", "stop"];
    let mut rng = StdRng::seed_from_u64(2024);

    // One row per sample: (trial id, trial type)
    let mut trials = Vec::new();
    let mut types = Vec::new();
    for trial in 0..30u32 {
        let trial_type = trial_types[trial as usize % trial_types.len()];
        let n_samples = rng.gen_range(20..80);
        for _ in 0..n_samples {
            trials.push(trial);
            types.push(trial_type);
        }
    }

    println!("Loaded {} samples in 30 trials", trials.len());
    println!();

    for strategy in [AssignStrategy::Balanced, AssignStrategy::RoundRobin] {
        let kfold = GroupTypeKFold::new(5).with_strategy(strategy).with_seed(7);
        let folds = kfold.split(&trials, &types)?;
        let report = SplitReport::build(&folds, &types, strategy, 0.15);

        println!("Strategy: {}", strategy);
        for fold in &report.folds {
            let props: Vec<String> = fold
                .proportions
                .iter()
                .map(|p| format!("{}={:.2}", p.label, p.test))
                .collect();
            println!(
                "  fold {}: {:>3} test rows, {} trials, {}  (dev {:.3})",
                fold.fold,
                fold.test_samples,
                fold.test_groups,
                props.join(" "),
                fold.test_deviation
            );
        }
        println!("  {}", report.summary());
        println!();
    }

    Ok(())
}
