use chrono::{DateTime, Utc};

use crate::github::CheckRun;

pub trait Selector {
    fn select<'a>(&self, runs: &'a [CheckRun]) -> Option<&'a CheckRun>;
}

#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// first check-run in response order
    #[default]
    First,
    /// check-run completed most recently
    LatestCompleted,
}

impl Selector for Strategy {
    fn select<'a>(&self, runs: &'a [CheckRun]) -> Option<&'a CheckRun> {
        match self {
            Strategy::First => runs.first(),
            Strategy::LatestCompleted => {
                let mut latest: Option<(DateTime<Utc>, &'a CheckRun)> = None;
                for run in runs {
                    let Some(time) = completed_at(run) else {
                        continue;
                    };
                    // strictly later, ties keep the earlier entry
                    if latest.map_or(true, |(best, _)| time > best) {
                        latest = Some((time, run));
                    }
                }
                latest.map(|(_, run)| run).or_else(|| runs.first())
            }
        }
    }
}

fn completed_at(run: &CheckRun) -> Option<DateTime<Utc>> {
    let raw = run.completed_at.as_deref()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
