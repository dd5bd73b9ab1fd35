//! Basic usage: one table, then a batch.
//!
//! Run with: `cargo run --example simple`

use fast_fisher::prelude::*;

fn main() -> Result<()> {
    let table = [3_u64, 5, 4, 50];
    let (odds_ratio, p_value) = fishers_exact_with_odds_ratio(&table, Alternative::Less)?;
    println!("table {table:?}: odds ratio {odds_ratio}, p value {p_value}");

    let all = fishers_exact_all(&table)?;
    println!(
        "  less {:.6}  greater {:.6}  two-sided {:.6}",
        all.less, all.greater, all.two_sided
    );
    println!();

    let a = [1_u64, 3, 0, 12];
    let b = [2_u64, 5, 0, 4];
    let c = [1_u64, 4, 7, 2];
    let d = [5_u64, 50, 9, 30];
    let (odds, p) = exact_with_odds_ratios(&a, &b, &c, &d, "greater")?;
    println!("batch, alternative = greater");
    for i in 0..a.len() {
        println!(
            "  [[{}, {}], [{}, {}]]  odds ratio {:>8.4}  p {:.6}",
            a[i], b[i], c[i], d[i], odds[i], p[i]
        );
    }
    Ok(())
}
