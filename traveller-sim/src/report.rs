use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::time::Duration;

use traveller_game::numbers::i64_to_f64;
use traveller_game::{AgentKind, Standing};

/// Final standings of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run: u32,
    pub seed: u64,
    pub steps: u32,
    pub standings: Vec<Standing>,
}

impl RunRecord {
    fn top_money(&self) -> Option<i64> {
        self.standings.iter().map(|standing| standing.money).max()
    }
}

/// One agent's results across every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub name: String,
    pub kind: AgentKind,
    pub runs: u32,
    /// Runs finished with the most money, ties included.
    pub wins: u32,
    pub average_money: f64,
    pub best_money: i64,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    runs: &'a [RunRecord],
    summary: &'a [AgentSummary],
}

/// Fold per-run standings into per-agent summaries, best average first.
pub fn summarize(records: &[RunRecord]) -> Vec<AgentSummary> {
    let mut summaries: Vec<AgentSummary> = Vec::new();
    let mut totals: Vec<i64> = Vec::new();
    for record in records {
        let top = record.top_money();
        for standing in &record.standings {
            let index = if let Some(index) = summaries
                .iter()
                .position(|summary| summary.name == standing.name)
            {
                index
            } else {
                summaries.push(AgentSummary {
                    name: standing.name.clone(),
                    kind: standing.kind,
                    runs: 0,
                    wins: 0,
                    average_money: 0.0,
                    best_money: standing.money,
                });
                totals.push(0);
                summaries.len() - 1
            };
            let summary = &mut summaries[index];
            summary.runs += 1;
            if top == Some(standing.money) {
                summary.wins += 1;
            }
            summary.best_money = summary.best_money.max(standing.money);
            totals[index] += standing.money;
        }
    }
    for (summary, total) in summaries.iter_mut().zip(&totals) {
        summary.average_money = i64_to_f64(*total) / f64::from(summary.runs.max(1));
    }
    summaries.sort_by(|a, b| {
        b.average_money
            .total_cmp(&a.average_money)
            .then_with(|| a.name.cmp(&b.name))
    });
    summaries
}

pub fn generate_console_report(
    out: &mut dyn Write,
    records: &[RunRecord],
    summaries: &[AgentSummary],
    total_duration: Duration,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Standings".bright_cyan().bold())?;
    writeln!(out, "{}", "============".cyan())?;

    for record in records {
        writeln!(
            out,
            "Run {} (seed {}, {} steps)",
            record.run.to_string().bold(),
            record.seed,
            record.steps
        )?;
        let top = record.top_money();
        for (place, standing) in record.standings.iter().enumerate() {
            let money = if top == Some(standing.money) {
                standing.money.to_string().green()
            } else {
                standing.money.to_string().normal()
            };
            writeln!(out, "   {}. {:<15} {money}", place + 1, standing.name)?;
        }
    }

    if records.len() > 1 {
        writeln!(out)?;
        writeln!(out, "{}", "Averages".bright_yellow().bold())?;
        for summary in summaries {
            writeln!(
                out,
                "   {:<15} avg {:>9.1}  best {:>6}  wins {}/{}",
                summary.name, summary.average_money, summary.best_money, summary.wins, summary.runs
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "🏁 Total time: {total_duration:?}")
}

pub fn generate_json_report(
    out: &mut dyn Write,
    records: &[RunRecord],
    summaries: &[AgentSummary],
) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(
        &mut *out,
        &JsonReport {
            runs: records,
            summary: summaries,
        },
    )?;
    writeln!(out).map_err(serde_json::Error::io)
}
