//! # heart-cli
//!
//! Reads a document snapshot, recovers omitted relations and prints the
//! resolved timeline as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use heart_core::config::HeartConfig;
use heart_core::models::DocumentSnapshot;
use heart_core::AnnotationGraph;
use heart_recovery::recover_all;
use heart_timeline::{TimelineDocument, TimelineEngine};

/// Project an annotated clinical document onto its timeline
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "heart")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Document snapshot (JSON)
    pub snapshot: PathBuf,

    /// Document creation time, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub dct: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Skip omission recovery
    #[arg(long)]
    pub no_recover: bool,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<HeartConfig> {
    let Some(path) = path else {
        return Ok(HeartConfig::default());
    };
    let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    HeartConfig::from_toml(&raw).with_context(|| format!("parsing config {}", path.display()))
}

/// Run recovery (unless disabled) and the timeline engine over one snapshot.
pub fn process_snapshot(
    json: &str,
    config: HeartConfig,
    dct: Option<&str>,
    recover: bool,
) -> anyhow::Result<TimelineDocument> {
    let snapshot = DocumentSnapshot::from_json(json).context("decoding document snapshot")?;
    let mut graph = AnnotationGraph::from_snapshot(snapshot).context("building annotation graph")?;

    if recover {
        let report = recover_all(&mut graph, &config.recovery).context("recovering omitted relations")?;
        tracing::info!(
            relations_added = report.relations_added,
            attributes_set = report.attributes_set,
            "omission recovery done"
        );
    }

    TimelineEngine::new(config)
        .process(&mut graph, dct, None)
        .context("building timeline")
}

pub fn run(args: &Args) -> anyhow::Result<String> {
    let config = load_config(args.config.as_deref())?;
    let json = fs::read_to_string(&args.snapshot)
        .with_context(|| format!("reading snapshot {}", args.snapshot.display()))?;
    let document = process_snapshot(&json, config, args.dct.as_deref(), !args.no_recover)?;
    document.to_json().context("encoding timeline")
}
