//! Model output intake: per-token label distributions and competence.
//!
//! The model answers with one line per token, tab-separated
//! `label probability` fields, and a single tab-separated competence line
//! with one scalar per roster column. Both files are read strictly: a label
//! outside the tag set or a probability that does not parse is an error,
//! and a competence line whose width differs from the roster is fatal for
//! the batch.

use std::fs;
use std::path::Path;

use crowd_anno::{FrozenRoster, Stance};
use serde::Serialize;

use crate::bio::BioTag;
use crate::errors::{MaceError, MaceResult};

/// Probability mass one token received per tag class.
///
/// Stanceful and plain classes are kept apart so the decoder can pick a
/// stance after it has picked a class; major-claim batches only ever fill
/// the plain fields.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TokenDistribution {
    pub outside: f64,
    pub begin_support: f64,
    pub begin_attack: f64,
    pub begin_plain: f64,
    pub inside_support: f64,
    pub inside_attack: f64,
    pub inside_plain: f64,
}

impl TokenDistribution {
    /// Total mass on span-opening tags.
    pub fn begin_mass(&self) -> f64 {
        self.begin_support + self.begin_attack + self.begin_plain
    }

    /// Total mass on span-continuing tags.
    pub fn inside_mass(&self) -> f64 {
        self.inside_support + self.inside_attack + self.inside_plain
    }

    /// Stance of a span opened at this token: whichever stance holds more
    /// `B` mass, support on a tie. `None` when all the mass is plain.
    pub fn begin_stance(&self) -> Option<Stance> {
        if self.begin_support == 0.0 && self.begin_attack == 0.0 {
            return None;
        }
        if self.begin_support >= self.begin_attack {
            Some(Stance::Support)
        } else {
            Some(Stance::Attack)
        }
    }

    /// Stance of a span continuing over this token. Pools `B` and `I` mass
    /// per stance, because a demoted opener keeps arguing for its stance.
    pub fn inside_stance(&self) -> Option<Stance> {
        let support = self.inside_support + self.begin_support;
        let attack = self.inside_attack + self.begin_attack;
        if support == 0.0 && attack == 0.0 {
            return None;
        }
        if support >= attack {
            Some(Stance::Support)
        } else {
            Some(Stance::Attack)
        }
    }
}

/// Parse a prediction file: one line per token, each line a tab-separated
/// list of `label probability` fields. Blank lines are ignored; repeated
/// labels accumulate.
pub fn parse_predictions(content: &str) -> MaceResult<Vec<TokenDistribution>> {
    let mut distributions = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let number = idx + 1;
        let mut dist = TokenDistribution::default();
        for field in line.split('\t') {
            let field = field.trim();
            if field.is_empty() {
                continue;
            }
            let mut parts = field.split_whitespace();
            let label = match parts.next() {
                Some(label) => label,
                None => continue,
            };
            let tag = BioTag::parse(label).ok_or_else(|| MaceError::UnknownLabel {
                label: label.to_string(),
                line: number,
            })?;
            let value = parts.next().unwrap_or("");
            let probability: f64 = value.parse().map_err(|_| MaceError::BadProbability {
                value: value.to_string(),
                line: number,
            })?;
            match tag {
                BioTag::Outside => dist.outside += probability,
                BioTag::Begin(None) => dist.begin_plain += probability,
                BioTag::Begin(Some(Stance::Support)) => dist.begin_support += probability,
                BioTag::Begin(Some(Stance::Attack)) => dist.begin_attack += probability,
                BioTag::Inside(None) => dist.inside_plain += probability,
                BioTag::Inside(Some(Stance::Support)) => dist.inside_support += probability,
                BioTag::Inside(Some(Stance::Attack)) => dist.inside_attack += probability,
            }
        }
        distributions.push(dist);
    }
    Ok(distributions)
}

pub fn read_predictions(path: &Path) -> MaceResult<Vec<TokenDistribution>> {
    let content = fs::read_to_string(path).map_err(|e| MaceError::Load {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_predictions(&content)
}

/// Parse the competence line: one tab-separated scalar per roster column,
/// in roster order. The width must match the roster exactly, otherwise
/// every downstream worker association would silently shift.
pub fn parse_competence(content: &str, roster: &FrozenRoster) -> MaceResult<Vec<f64>> {
    let fields: Vec<&str> = content.trim_end().split('\t').collect();
    if fields.len() != roster.len() {
        return Err(MaceError::CompetenceMismatch {
            expected: roster.len(),
            got: fields.len(),
        });
    }
    fields
        .into_iter()
        .map(|field| {
            let field = field.trim();
            field.parse::<f64>().map_err(|_| MaceError::BadProbability {
                value: field.to_string(),
                line: 1,
            })
        })
        .collect()
}

pub fn read_competence(path: &Path, roster: &FrozenRoster) -> MaceResult<Vec<f64>> {
    let content = fs::read_to_string(path).map_err(|e| MaceError::Load {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_competence(&content, roster)
}

/// One worker's pooled competence across model runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerCompetence {
    pub worker: String,
    pub competence: f64,
}

/// Competence collected over several model runs of the same roster.
///
/// Each task level runs the model once; the overall per-worker competence
/// report is the mean over all runs a worker was part of.
#[derive(Debug)]
pub struct CompetenceTable {
    workers: Vec<String>,
    runs: Vec<Vec<f64>>,
}

impl CompetenceTable {
    pub fn new(roster: &FrozenRoster) -> CompetenceTable {
        CompetenceTable {
            workers: roster.iter().map(|(_, name)| name.to_string()).collect(),
            runs: Vec::new(),
        }
    }

    /// Record one run's competence values, in roster order.
    pub fn add_run(&mut self, values: Vec<f64>) -> MaceResult<()> {
        if values.len() != self.workers.len() {
            return Err(MaceError::CompetenceMismatch {
                expected: self.workers.len(),
                got: values.len(),
            });
        }
        self.runs.push(values);
        Ok(())
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Per-worker means in roster order; empty until the first run lands.
    pub fn means(&self) -> Vec<WorkerCompetence> {
        if self.runs.is_empty() {
            return Vec::new();
        }
        self.workers
            .iter()
            .enumerate()
            .map(|(idx, worker)| {
                let total: f64 = self.runs.iter().map(|run| run[idx]).sum();
                WorkerCompetence {
                    worker: worker.clone(),
                    competence: total / self.runs.len() as f64,
                }
            })
            .collect()
    }
}
