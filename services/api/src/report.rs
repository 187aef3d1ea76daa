use crate::infra::resolve_scoring_config;
use chrono::Local;
use clap::Args;
use critique_grader::config::AppConfig;
use critique_grader::error::AppError;
use critique_grader::grading::{
    snapshot_digest, MatchRequest, ScoreRequest, ScoringEngine, ScoringResult,
};
use critique_grader::telemetry;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON snapshot with `annotations`, `rubricItems` and `textLength`
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// JSON scoring config overriding thresholds and caps
    #[arg(long)]
    pub(crate) scoring_config: Option<PathBuf>,
    /// Print the full result as JSON instead of the report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// JSON snapshot with `annotations` and `rubricItems`
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// JSON scoring config overriding thresholds and caps
    #[arg(long)]
    pub(crate) scoring_config: Option<PathBuf>,
}

fn engine_for(scoring_config: Option<&Path>) -> Result<ScoringEngine, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let scoring = resolve_scoring_config(scoring_config, config.scoring)?;
    Ok(ScoringEngine::new(scoring))
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let engine = engine_for(args.scoring_config.as_deref())?;
    let raw = fs::read_to_string(&args.input)?;
    let request: ScoreRequest = serde_json::from_str(&raw)?;

    let result = engine.score(
        &request.annotations,
        &request.rubric_items,
        request.text_length,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let digest = snapshot_digest(
            &request.annotations,
            &request.rubric_items,
            request.text_length,
        );
        render_score_report(&args.input, &digest, &result);
    }
    Ok(())
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let engine = engine_for(args.scoring_config.as_deref())?;
    let raw = fs::read_to_string(&args.input)?;
    let request: MatchRequest = serde_json::from_str(&raw)?;

    let matches = engine.match_annotations(&request.annotations, &request.rubric_items)?;
    println!("{}", serde_json::to_string_pretty(&matches)?);
    Ok(())
}

fn render_score_report(input: &Path, digest: &str, result: &ScoringResult) {
    println!("Critique score report");
    println!("Snapshot: {} ({})", input.display(), &digest[..12]);
    println!("Scored at: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("\n{}", result.summary());

    println!("\nTiers");
    println!("  Issues caught:       {:>6.1}", result.tier1_raw);
    println!("  Issues missed:       {:>6.1}", result.tier2_deductions);
    println!("  Beyond the rubric:   {:>6.1}", result.tier3_bonus);
    println!("  Coverage:            {:>5}%", result.coverage_score);
    println!("  Composite (raw):     {:>6.1}", result.composite_raw);
    println!("  Final:               {:>6.1}", result.normalized_final);

    if result.matches.is_empty() {
        println!("\nMatches: none");
    } else {
        println!("\nMatches");
        for found in &result.matches {
            println!(
                "- {} -> {} (quality {:.1}, {:?} confidence)",
                found.annotation_id,
                found.rubric_item_id,
                found.match_quality,
                found.match_confidence
            );
        }
    }

    if !result.missed_items.is_empty() {
        println!("\nMissed rubric items");
        for id in &result.missed_items {
            println!("- {id}");
        }
    }

    if !result.beyond_rubric_annotations.is_empty() {
        println!("\nBeyond the rubric");
        for id in &result.beyond_rubric_annotations {
            println!("- {id}");
        }
    }
}
