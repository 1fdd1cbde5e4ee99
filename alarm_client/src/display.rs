use crate::scheduler::AlarmEvent;
use crate::settings::{ClientSettings, Ringtone};
use chrono::NaiveDate;
use shared::prayer_times::{DATE_FORMAT, Prayer, PrayerTimeRecord};
use std::fmt::Write;

pub const NOT_AVAILABLE: &str = "N/A";

const RESET: &str = "\x1b[0m";
const ACCENT_LIGHT: &str = "\x1b[32m";
const ACCENT_DARK: &str = "\x1b[92m";

/// The `HH:MM` part of a slot, dropping any timezone suffix. Empty slots
/// render as `N/A`.
pub fn display_time(value: &str) -> &str {
    value.split_whitespace().next().unwrap_or(NOT_AVAILABLE)
}

/// Daily schedule table. Without a record every slot renders as `N/A`.
pub fn render_schedule(
    date: NaiveDate,
    record: Option<&PrayerTimeRecord>,
    settings: &ClientSettings,
) -> String {
    let accent = if settings.dark_mode {
        ACCENT_DARK
    } else {
        ACCENT_LIGHT
    };

    let source = match record {
        Some(r) if r.is_manual => "set by mosque",
        Some(_) => "calculated",
        None => "unavailable",
    };

    let mut out = format!("Prayer times for {} ({source})\n", date.format(DATE_FORMAT));
    for prayer in Prayer::ALL {
        let time = record.map_or(NOT_AVAILABLE, |r| display_time(r.time_for(prayer)));
        let alarm = if settings.alarms.is_enabled(prayer) {
            "alarm on"
        } else {
            "alarm off"
        };
        let _ = writeln!(
            out,
            "  {:<8} {accent}{time:>5}{RESET}  [{alarm}]",
            prayer.display_name()
        );
    }
    out
}

pub fn alarm_banner(event: &AlarmEvent, ringtone: Ringtone) -> String {
    format!(
        "Time for {} Prayer ({} at {})",
        event.prayer.display_name(),
        ringtone.description(),
        event.scheduled_for.format("%H:%M")
    )
}
