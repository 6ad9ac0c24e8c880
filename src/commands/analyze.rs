//! `analyze` command: run the trend pipeline over a review file

use anyhow::{Context, Result};
use std::path::PathBuf;

use trendigest::config::Config;
use trendigest::pipeline::TrendPipeline;
use trendigest::source;

pub async fn analyze(config: Config, input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    println!("Review Trend Analysis");
    println!("=====================");
    println!("App:    {}", config.app.id);
    println!("Window: {} days", config.window.days);

    let loaded = source::load_reviews(&input)
        .with_context(|| format!("failed to load reviews from {}", input.display()))?;
    println!(
        "Loaded {} reviews from {} ({} malformed records dropped)",
        loaded.reviews.len(),
        input.display(),
        loaded.malformed
    );

    let mut pipeline = TrendPipeline::with_keyword_classifier(&config)?;
    pipeline.record_malformed(loaded.malformed);
    let report = pipeline.run(loaded.reviews).await?;

    println!(
        "\nWindow {} .. {} ({} days held)",
        report.window_start,
        report.window_end,
        report.snapshots.len()
    );
    println!(
        "Topics tracked: {}  Total mentions: {}",
        report.topics_tracked(),
        report.total_mentions()
    );

    println!("\nTop movers:");
    for record in report.top(10) {
        println!(
            "  {:<9} {:<35} {:>4} -> {:<4} (delta {:+}, sentiment {:.2})",
            record.direction.as_str(),
            record.topic.as_str(),
            record.previous_count,
            record.current_count,
            record.delta,
            record.avg_sentiment,
        );
    }

    let summary = &report.summary;
    println!(
        "\nRun summary: {} reviews seen, {} skipped (bad timestamp), {} malformed, {} classification failures, {} invalid topic labels",
        summary.reviews_seen,
        summary.reviews_skipped,
        summary.reviews_malformed,
        summary.classification_failures.len(),
        summary.invalid_topics,
    );

    if let Some(path) = output {
        std::fs::write(&path, report.to_json()?)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}
