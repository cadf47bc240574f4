//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `tallybook_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("tallybook_core version={}", tallybook_core::core_version());
    println!(
        "tallybook_core snapshot_version={}",
        tallybook_core::snapshot::SNAPSHOT_VERSION
    );
}
