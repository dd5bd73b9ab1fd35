//! Error Handling Examples
//!
//! This example demonstrates the failures a batch call can report.
//!
//! Run with: `cargo run --example error_handling`

use fast_fisher::prelude::*;

fn main() {
    println!("=== Error Handling Examples ===");
    println!();

    // Example 1: Unequal input lengths
    println!("1. Shape Mismatch:");
    match exact(&[1_u64, 3], &[2, 5], &[1, 4], &[5, 50, 7], "less") {
        Ok(_) => println!("   Unexpected success"),
        Err(Error::ShapeMismatch {
            input,
            expected,
            actual,
        }) => {
            println!("   Caught ShapeMismatch error (expected)");
            println!("   Details: `{input}` has {actual} elements, `a` has {expected}");
            println!("   Fix: Pass four sequences of the same length");
        }
        Err(e) => println!("   Unexpected error: {e}"),
    }
    println!();

    // Example 2: Unknown alternative
    println!("2. Invalid Alternative:");
    match exact(&[1_u64], &[2], &[1], &[5], "two_sided") {
        Ok(_) => println!("   Unexpected success"),
        Err(Error::InvalidAlternative { value }) => {
            println!("   Caught InvalidAlternative error (expected)");
            println!("   Details: '{value}' is not recognized");
            println!("   Fix: Use one of {:?}", Alternative::ALL.map(Alternative::as_str));
        }
        Err(e) => println!("   Unexpected error: {e}"),
    }
    println!();

    // Example 3: Negative count
    println!("3. Negative Count:");
    match exact(&[1_i64, 2], &[2, -2], &[1, 4], &[5, 50], Alternative::Greater) {
        Ok(_) => println!("   Unexpected success"),
        Err(Error::InvalidMargins { index, reason }) => {
            println!("   Caught InvalidMargins error (expected)");
            println!("   Details: table {index:?}: {reason}");
            println!("   Fix: Counts must be non-negative");
        }
        Err(e) => println!("   Unexpected error: {e}"),
    }
    println!();

    // Example 4: Output buffer too small
    println!("4. Buffer Too Small:");
    let mut out = [0.0; 1];
    match exact_into(&[1_u64, 3], &[2, 5], &[1, 4], &[5, 50], "less", &mut out) {
        Ok(_) => println!("   Unexpected success"),
        Err(Error::BufferTooSmall { required, actual }) => {
            println!("   Caught BufferTooSmall error (expected)");
            println!("   Details: need {required} slots, got {actual}");
        }
        Err(e) => println!("   Unexpected error: {e}"),
    }
    println!();

    // Example 5: Degenerate tables are not errors
    println!("5. Degenerate Table:");
    match fishers_exact_with_odds_ratio(&[0_u64, 0, 0, 0], "two-sided") {
        Ok((odds, p)) => println!("   odds ratio {odds}, p value {p} (defined boundary values)"),
        Err(e) => println!("   Unexpected error: {e}"),
    }
}
