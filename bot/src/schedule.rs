//! Fixed-count polling schedule.
//!
//! Each cycle is independent: a failure is logged and the next cycle still
//! runs after the usual pause. No pause follows the last cycle.

use crate::cycle::CycleOutcome;
use crate::error::Result;
use log::{error, info};
use std::time::Duration;

/// Tally of a schedule run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleSummary {
    /// Cycles that published new versions.
    pub published: u32,
    /// Cycles that found nothing new.
    pub unchanged: u32,
    /// Cycles that failed.
    pub failed: u32,
}

/// Run `cycle` `cycles` times, calling `sleep(interval)` between runs.
pub fn run_schedule(
    cycles: u32,
    interval: Duration,
    mut sleep: impl FnMut(Duration),
    mut cycle: impl FnMut() -> Result<CycleOutcome>,
) -> ScheduleSummary {
    let mut summary = ScheduleSummary::default();
    for index in 0..cycles {
        info!("cycle {} of {cycles}", index + 1);
        match cycle() {
            Ok(CycleOutcome::Published { message, .. }) => {
                info!("published: {message}");
                summary.published += 1;
            }
            Ok(CycleOutcome::NoNewUpdates) => summary.unchanged += 1,
            Err(e) => {
                error!("{e}");
                summary.failed += 1;
            }
        }
        if index + 1 < cycles {
            info!("sleeping for {} seconds", interval.as_secs());
            sleep(interval);
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BotError;
    use crate::publish::PublishReport;

    #[test]
    fn failures_do_not_stop_the_schedule() {
        let mut sleeps = Vec::new();
        let mut results = vec![
            Ok(CycleOutcome::NoNewUpdates),
            Ok(CycleOutcome::Published {
                message: "1.0 (Release)".to_owned(),
                report: PublishReport::default(),
            }),
            Err(BotError::Git {
                operation: "fetch",
                message: "offline".to_owned(),
            }),
        ]
        .into_iter();

        let summary = run_schedule(
            3,
            Duration::from_secs(600),
            |d| sleeps.push(d),
            || results.next().expect("scripted result"),
        );

        assert_eq!(
            summary,
            ScheduleSummary {
                published: 1,
                unchanged: 1,
                failed: 1
            }
        );
        assert_eq!(sleeps, vec![Duration::from_secs(600); 2]);
    }

    #[test]
    fn zero_cycles_do_nothing() {
        let summary = run_schedule(
            0,
            Duration::ZERO,
            |_| panic!("no sleep expected"),
            || panic!("no cycle expected"),
        );
        assert_eq!(summary, ScheduleSummary::default());
    }
}
