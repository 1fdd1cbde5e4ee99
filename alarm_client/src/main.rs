mod api;
mod display;
mod schedule;
mod scheduler;
mod settings;

use crate::api::PrayerTimesClient;
use crate::display::{alarm_banner, render_schedule};
use crate::schedule::{next_local_midnight, plan_alarms};
use crate::scheduler::{AlarmEvent, AlarmScheduler};
use crate::settings::{Ringtone, SettingsStore};
use anyhow::Context;
use chrono::Utc;
use shared::{init_tracing, shutdown_listener};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const FALLBACK_DAY: Duration = Duration::from_secs(24 * 60 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let store = SettingsStore::from_env();
    let settings = store
        .load_or_init()
        .with_context(|| format!("could not load {}", store.path().display()))?;
    info!(
        name: "settings.loaded",
        path = %store.path().display(),
        api_base_url = %settings.api_base_url,
        "settings loaded"
    );

    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_listener(Some(shutdown.clone())));

    let http = reqwest::Client::new();
    let (mut scheduler, mut events) = AlarmScheduler::new(shutdown.clone());

    loop {
        // Re-read every day so edits to the file apply without a restart.
        let settings = store.load()?;
        let Some(mosque_id) = settings.mosque_id.as_deref() else {
            warn!(
                name: "settings.mosque.missing",
                path = %store.path().display(),
                "no mosque selected, set mosque_id and restart"
            );
            return Ok(());
        };

        let offset = settings.offset();
        let now = Utc::now();
        let today = now.with_timezone(&offset).date_naive();

        let client = PrayerTimesClient::new(http.clone(), &settings.api_base_url)
            .with_context(|| format!("check api_base_url in {}", store.path().display()))?;
        let record = match client.fetch(mosque_id, today).await {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(name: "prayer_times.fetch.failed", error = ?e, %today, "could not fetch prayer times");
                None
            }
        };

        println!("{}", render_schedule(today, record.as_ref(), &settings));
        // The fetch can be slow; plan against the clock as it is now.
        let now = Utc::now();
        match &record {
            Some(record) => {
                scheduler.register(plan_alarms(record, today, &settings.alarms, offset, now));
            }
            None => scheduler.cancel_all(),
        }

        let wait = next_local_midnight(now, offset)
            .and_then(|midnight| (midnight.with_timezone(&Utc) - now).to_std().ok())
            .unwrap_or(FALLBACK_DAY);
        info!(
            name: "client.waiting",
            remaining = %humantime::format_duration(Duration::from_secs(wait.as_secs())),
            "waiting for the next day"
        );

        let day_end = tokio::time::sleep(wait);
        tokio::pin!(day_end);
        loop {
            tokio::select! {
                () = &mut day_end => break,
                () = shutdown.cancelled() => {
                    scheduler.cancel_all();
                    info!(name: "client.shutdown", "pending alarms cancelled");
                    return Ok(());
                }
                Some(event) = events.recv() => ring(&event, settings.ringtone),
            }
        }
    }
}

fn ring(event: &AlarmEvent, ringtone: Ringtone) {
    info!(name: "alarm.fired", prayer = %event.prayer, ringtone = ?ringtone, "alarm fired");
    println!("\x07{}", alarm_banner(event, ringtone));
}
