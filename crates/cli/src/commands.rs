//! Subcommands.
//!
//! Report files are JSON arrays of `{ "source": "host:port", "nodes": [...] }`
//! entries; their order is the first-seen order used for tie-breaks. Snapshot
//! files are plain JSON arrays of node descriptors.

use anyhow::Context;
use clap::Subcommand;
use consensus::{classify, majority_threshold, Resolution, StrategyKind};
use corelib::{TopologyReportSet, TopologySnapshot};
use serde_json::json;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Group reports by the member set they agree on
    Classify {
        /// JSON report set
        #[arg(long)]
        reports: PathBuf,
    },

    /// Choose the topology a client would adopt
    Resolve {
        /// JSON report set
        #[arg(long)]
        reports: PathBuf,

        /// Previously adopted snapshot (empty if omitted)
        #[arg(long)]
        current: Option<PathBuf>,

        #[arg(long, default_value_t = StrategyKind::KnownMajority)]
        strategy: StrategyKind,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

/// Rendered command output.
#[derive(Debug)]
pub struct CommandResult {
    pub output: String,
}

impl Command {
    pub fn execute(&self) -> anyhow::Result<CommandResult> {
        let output = match self {
            Command::Classify { reports } => render_classes(&load_reports(reports)?),
            Command::Resolve {
                reports,
                current,
                strategy,
                json,
            } => {
                let current = match current {
                    Some(path) => load_snapshot(path)?,
                    None => TopologySnapshot::empty(),
                };
                let current = Arc::new(current);
                let reports = load_reports(reports)?;
                debug!(
                    %strategy,
                    current = current.len(),
                    reports = reports.len(),
                    "resolving report set"
                );
                let resolution = strategy.build().resolve(&current, &reports);
                debug!(
                    outcome = %resolution.outcome,
                    members = resolution.snapshot.len(),
                    "resolution finished"
                );
                if *json {
                    render_resolution_json(*strategy, &resolution)?
                } else {
                    render_resolution(*strategy, &current, &resolution)
                }
            }
        };
        Ok(CommandResult { output })
    }
}

pub fn load_reports(path: &Path) -> anyhow::Result<TopologyReportSet> {
    debug!(path = %path.display(), "loading report set");
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading report set {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing report set {}", path.display()))
}

pub fn load_snapshot(path: &Path) -> anyhow::Result<TopologySnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing snapshot {}", path.display()))
}

fn member_list(snapshot: &TopologySnapshot) -> String {
    snapshot
        .iter()
        .map(|n| n.id().as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_classes(reports: &TopologyReportSet) -> String {
    let classes = classify(reports);
    let mut out = format!("{} reports, {} classes\n", reports.len(), classes.len());

    for (i, class) in classes.iter().enumerate() {
        let sources: Vec<String> = class.sources().iter().map(ToString::to_string).collect();
        let _ = writeln!(
            out,
            "#{} known-size={} votes={} sources=[{}]\n   members=[{}]",
            i + 1,
            class.known_size(),
            class.votes(),
            sources.join(", "),
            member_list(class.representative()),
        );
    }
    out.trim_end().to_string()
}

pub fn render_resolution(
    strategy: StrategyKind,
    current: &TopologySnapshot,
    resolution: &Resolution,
) -> String {
    format!(
        "strategy: {}\nthreshold: {}\noutcome: {}\nmembers ({}): [{}]",
        strategy,
        majority_threshold(current.len()),
        resolution.outcome,
        resolution.snapshot.len(),
        member_list(&resolution.snapshot),
    )
}

pub fn render_resolution_json(
    strategy: StrategyKind,
    resolution: &Resolution,
) -> anyhow::Result<String> {
    let snapshot: &TopologySnapshot = &resolution.snapshot;
    let value = json!({
        "strategy": strategy,
        "outcome": resolution.outcome,
        "snapshot": snapshot,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}
