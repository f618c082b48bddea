//! "Time together" counter.
//!
//! Years, months and days are a calendar difference with month-length
//! borrowing. Hours, minutes and seconds are remainders of the raw elapsed
//! time (mod 24/60/60), so they never accumulate past a day.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::fmt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Elapsed {
    pub years: i32,
    pub months: i32,
    pub days: i32,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}y {}m {}d {}h {}m {}s",
            self.years, self.months, self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Number of days in `month` (1-12) of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 30,
    }
}

fn month_before(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

/// Elapsed time from `start` to `now`. Everything is zero if `now` is earlier.
pub fn elapsed_between(start: NaiveDateTime, now: NaiveDateTime) -> Elapsed {
    let diff_ms = (now - start).num_milliseconds();
    if diff_ms < 0 {
        return Elapsed::default();
    }

    let seconds = diff_ms / 1000 % 60;
    let minutes = diff_ms / (1000 * 60) % 60;
    let hours = diff_ms / (1000 * 60 * 60) % 24;

    let mut years = now.year() - start.year();
    let mut months = now.month() as i32 - start.month() as i32;
    let mut days = now.day() as i32 - start.day() as i32;

    // Borrow from the months preceding `now` until the day count is
    // non-negative. One borrow is enough unless a short month (February)
    // sits right before `now`.
    let (mut borrow_year, mut borrow_month) = month_before(now.year(), now.month());
    while days < 0 {
        months -= 1;
        days += days_in_month(borrow_year, borrow_month) as i32;
        (borrow_year, borrow_month) = month_before(borrow_year, borrow_month);
    }
    while months < 0 {
        years -= 1;
        months += 12;
    }

    Elapsed {
        years,
        months,
        days,
        hours,
        minutes,
        seconds,
    }
}

/// Recurring task that recomputes the counter and hands the formatted string
/// to `on_tick`. The first value is produced immediately.
///
/// Stopping (or dropping) the handle cancels the task.
pub struct ElapsedClock {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ElapsedClock {
    pub fn start<N, T>(since: NaiveDateTime, period: Duration, now: N, on_tick: T) -> Self
    where
        N: Fn() -> NaiveDateTime + Send + 'static,
        T: Fn(String) + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            log::debug!("[CLOCK] Started (since {})", since);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        on_tick(elapsed_between(since, now()).to_string());
                    }
                }
            }

            log::debug!("[CLOCK] Stopped");
        });

        Self {
            cancel,
            task: Some(task),
        }
    }

    /// Cancel the ticker and wait for the task to finish.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                log::warn!("[CLOCK] Ticker task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for ElapsedClock {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
