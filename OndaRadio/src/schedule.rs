//! Weekly relay schedule
//!
//! One cron slot per weekday, read from the `schedule` section of the
//! configuration. Slots are validated at startup; an empty or malformed
//! expression is logged and skipped, never fatal. A single spawned task
//! sleeps until the earliest upcoming occurrence across all slots and
//! starts a relay session there. A slot firing while a session is still
//! running is ignored by the session controller.

use chrono::{DateTime, Local};
use cron::Schedule;
use ondacast::CastConnection;
use ondaplayer::SessionController;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// One validated weekday slot
pub struct ScheduleSlot {
    pub day: String,
    pub expression: String,
    schedule: Schedule,
}

impl ScheduleSlot {
    /// Next occurrence of this slot, strictly in the future
    pub fn next_occurrence(&self) -> Option<DateTime<Local>> {
        self.schedule.upcoming(Local).next()
    }
}

/// Slots are configured in the 5-field form (minute hour day month
/// weekday); the parser wants an explicit seconds field in front.
fn normalize_expression(expression: &str) -> String {
    if expression.split_whitespace().count() == 5 {
        format!("0 {expression}")
    } else {
        expression.to_string()
    }
}

/// Read and validate the weekday slots from the configuration
///
/// Invalid slots are logged and dropped; an empty result just means the
/// relay only runs on manual triggers.
pub fn load_slots(config: &ondaconfig::Config) -> Vec<ScheduleSlot> {
    let mut slots = Vec::new();
    for day in WEEKDAYS {
        let expression = match config.get_value(&["schedule", day]) {
            Ok(serde_yaml::Value::String(s)) if !s.trim().is_empty() => s,
            _ => {
                info!(day, "No schedule slot configured");
                continue;
            }
        };
        match Schedule::from_str(&normalize_expression(&expression)) {
            Ok(schedule) => {
                info!(day, expression = %expression, "Schedule slot registered");
                slots.push(ScheduleSlot {
                    day: day.to_string(),
                    expression,
                    schedule,
                });
            }
            Err(e) => {
                warn!(day, expression = %expression, error = %e, "Invalid schedule slot, skipping");
            }
        }
    }
    slots
}

/// Earliest upcoming occurrence across all slots
pub fn next_occurrence(slots: &[ScheduleSlot]) -> Option<(&ScheduleSlot, DateTime<Local>)> {
    slots
        .iter()
        .filter_map(|slot| slot.next_occurrence().map(|at| (slot, at)))
        .min_by_key(|(_, at)| *at)
}

/// Run the schedule until the process exits
pub fn spawn(
    controller: Arc<SessionController>,
    slots: Vec<ScheduleSlot>,
    duration_minutes: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if slots.is_empty() {
            info!("No valid schedule slots, relay runs on manual triggers only");
            return;
        }
        loop {
            let Some((slot, at)) = next_occurrence(&slots) else {
                warn!("No upcoming schedule occurrence, scheduler stopping");
                return;
            };
            info!(day = %slot.day, at = %at, "Next scheduled relay session");

            let wait = (at - Local::now()).to_std().unwrap_or(Duration::ZERO);
            tokio::time::sleep(wait).await;

            info!(day = %slot.day, "Schedule slot fired, starting relay session");
            let connection = CastConnection::new();
            if let Err(e) = controller.start_stream(connection, duration_minutes).await {
                warn!(error = %e, "Scheduled session failed to start");
            }
            // Never fire twice inside the same slot minute
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn five_field_expressions_get_a_seconds_field() {
        assert_eq!(normalize_expression("0 14 * * MON"), "0 0 14 * * MON");
        assert_eq!(normalize_expression("0 0 14 * * MON"), "0 0 14 * * MON");
    }

    #[test]
    fn default_slots_all_parse() {
        let dir = TempDir::new().unwrap();
        let config = ondaconfig::Config::load_config(dir.path().to_str().unwrap()).unwrap();
        let slots = load_slots(&config);
        assert_eq!(slots.len(), 7);
        for slot in &slots {
            assert!(slot.next_occurrence().is_some(), "slot {} has no upcoming", slot.day);
        }
    }

    #[test]
    fn invalid_slot_is_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.yaml"),
            "schedule:\n  monday: \"not a cron line\"\n  tuesday: \"\"\n",
        )
        .unwrap();
        let config = ondaconfig::Config::load_config(dir.path().to_str().unwrap()).unwrap();
        let slots = load_slots(&config);
        assert_eq!(slots.len(), 5);
        assert!(slots.iter().all(|s| s.day != "monday" && s.day != "tuesday"));
    }

    #[test]
    fn next_occurrence_picks_the_earliest_slot() {
        let dir = TempDir::new().unwrap();
        let config = ondaconfig::Config::load_config(dir.path().to_str().unwrap()).unwrap();
        let slots = load_slots(&config);
        let (_, at) = next_occurrence(&slots).unwrap();
        assert!(at > Local::now());
        // With one slot per weekday the earliest is never a week out
        assert!(at - Local::now() <= chrono::Duration::days(2));
    }
}
