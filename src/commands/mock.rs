//! `mock` command: generate a deterministic sample review file

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;

use trendigest::source::MockReviewSource;

pub fn mock(
    start: NaiveDate,
    days: usize,
    per_day: usize,
    seed: u64,
    output: PathBuf,
) -> Result<()> {
    let reviews = MockReviewSource::new(seed).review_stream(start, days, per_day);

    let json = serde_json::to_string_pretty(&reviews)?;
    std::fs::write(&output, json)
        .with_context(|| format!("failed to write reviews to {}", output.display()))?;

    println!(
        "Wrote {} mock reviews ({} days from {start}, seed {seed}) to {}",
        reviews.len(),
        days,
        output.display()
    );
    Ok(())
}
