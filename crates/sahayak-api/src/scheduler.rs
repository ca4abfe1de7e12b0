use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use tokio::sync::broadcast;

use crate::config::ResetConfig;
use crate::reset::QuotaResetJob;

/// Lower bound on each wait so a schedule that resolves to "now" cannot spin
const MIN_SLEEP: Duration = Duration::from_millis(100);

/// Cron expression evaluated in a fixed time zone
#[derive(Debug, Clone)]
pub struct ZonedSchedule {
    schedule: Schedule,
    timezone: Tz,
}

impl ZonedSchedule {
    pub fn parse(expression: &str, timezone: &str) -> anyhow::Result<Self> {
        let schedule = Schedule::from_str(expression)
            .with_context(|| format!("Invalid cron expression: {expression}"))?;
        let timezone = timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("Invalid time zone {timezone}: {e}"))?;
        Ok(Self { schedule, timezone })
    }

    pub fn from_config(config: &ResetConfig) -> anyhow::Result<Self> {
        Self::parse(&config.schedule, &config.timezone)
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// First firing strictly after `after`
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule
            .after(&after.with_timezone(&self.timezone))
            .next()
            .map(|next| next.with_timezone(&Utc))
    }
}

/// Runs the reset job on every tick until `shutdown` fires.
///
/// A missed tick (process down at the time) is not caught up.
pub async fn run_reset_schedule(
    schedule: ZonedSchedule,
    job: Arc<QuotaResetJob>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        let now = Utc::now();
        let Some(next) = schedule.next_after(now) else {
            tracing::warn!("Reset schedule has no upcoming run; scheduler stopping");
            return;
        };
        let wait = (next - now).to_std().unwrap_or(MIN_SLEEP).max(MIN_SLEEP);

        tracing::info!(
            next_run = %next.with_timezone(&schedule.timezone()),
            "Next free-tier reset scheduled"
        );

        tokio::select! {
            _ = tokio::time::sleep(wait) => {
                job.run_logged().await;
            }
            _ = shutdown.recv() => {
                tracing::info!("Reset scheduler shutting down");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sahayak_persist::InMemoryPersistenceClient;

    #[test]
    fn test_daily_midnight_in_kathmandu() {
        let schedule = ZonedSchedule::parse("0 0 0 * * *", "Asia/Kathmandu").unwrap();

        // 2024-03-10 12:00 UTC is 17:45 in Kathmandu (UTC+05:45)
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let next = schedule.next_after(now).unwrap();

        // Local midnight of the 11th is 18:15 UTC on the 10th
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 3, 10, 18, 15, 0).unwrap());
    }

    #[test]
    fn test_next_is_strictly_after() {
        let schedule = ZonedSchedule::parse("0 0 0 * * *", "UTC").unwrap();
        let midnight = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(
            schedule.next_after(midnight),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(ZonedSchedule::parse("every day", "UTC").is_err());
        assert!(ZonedSchedule::parse("0 0 0 * * *", "Mars/Olympus").is_err());
    }

    #[tokio::test]
    async fn test_scheduler_stops_on_shutdown() {
        let schedule = ZonedSchedule::parse("0 0 0 * * *", "Asia/Kathmandu").unwrap();
        let job = Arc::new(QuotaResetJob::new(Arc::new(InMemoryPersistenceClient::new()), 100));
        let (tx, rx) = broadcast::channel(1);

        let handle = tokio::spawn(run_reset_schedule(schedule, job, rx));
        tokio::time::sleep(Duration::from_millis(10)).await;
        tx.send(()).unwrap();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("scheduler did not stop")
            .unwrap();
    }
}
