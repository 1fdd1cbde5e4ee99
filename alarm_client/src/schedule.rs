use crate::settings::AlarmToggles;
use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, Utc};
use shared::prayer_times::{Prayer, PrayerTimeRecord, parse_time_of_day};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAlarm {
    pub prayer: Prayer,
    pub at: DateTime<FixedOffset>,
}

/// Alarms for the enabled prayers of `date` that are still ahead of `now`.
///
/// Times are read as wall-clock times at `offset`. Slots whose value does not
/// start with `HH:MM` are skipped.
pub fn plan_alarms(
    record: &PrayerTimeRecord,
    date: NaiveDate,
    toggles: &AlarmToggles,
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> Vec<PlannedAlarm> {
    Prayer::ALL
        .into_iter()
        .filter(|prayer| toggles.is_enabled(*prayer))
        .filter_map(|prayer| {
            let Some(time) = parse_time_of_day(record.time_for(prayer)) else {
                debug!(name: "alarm.unparseable", %prayer, value = record.time_for(prayer), "skipping alarm");
                return None;
            };
            let at = date.and_time(time).and_local_timezone(offset).single()?;
            (at > now).then_some(PlannedAlarm { prayer, at })
        })
        .collect()
}

/// Start of the next local day at `offset`.
pub fn next_local_midnight(now: DateTime<Utc>, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    now.with_timezone(&offset)
        .date_naive()
        .checked_add_days(Days::new(1))?
        .and_time(NaiveTime::MIN)
        .and_local_timezone(offset)
        .single()
}
