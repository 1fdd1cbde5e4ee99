use crate::schedule::PlannedAlarm;
use chrono::{DateTime, FixedOffset, Utc};
use shared::prayer_times::Prayer;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmEvent {
    pub prayer: Prayer,
    pub scheduled_for: DateTime<FixedOffset>,
}

/// One tokio timer per registered alarm. Each registration replaces the
/// previous one, and cancelling the parent token stops every pending timer.
pub struct AlarmScheduler {
    events: mpsc::UnboundedSender<AlarmEvent>,
    parent: CancellationToken,
    generation: CancellationToken,
}

impl AlarmScheduler {
    pub fn new(parent: CancellationToken) -> (Self, mpsc::UnboundedReceiver<AlarmEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let generation = parent.child_token();
        (
            Self {
                events,
                parent,
                generation,
            },
            rx,
        )
    }

    /// Cancels everything armed before, then arms `alarms`. Delays are measured
    /// from the clock at arming time, and alarms already due are dropped.
    /// Returns how many timers were armed.
    pub fn register(&mut self, alarms: Vec<PlannedAlarm>) -> usize {
        self.cancel_all();
        let now = Utc::now();
        let generation = self.parent.child_token();
        self.generation = generation.clone();

        let mut armed = 0;
        for alarm in alarms {
            let Ok(delay) = (alarm.at.with_timezone(&Utc) - now).to_std() else {
                debug!(name: "alarm.skipped", prayer = %alarm.prayer, at = %alarm.at, "alarm already passed");
                continue;
            };
            if delay.is_zero() {
                continue;
            }

            let token = generation.clone();
            let events = self.events.clone();
            tokio::spawn(async move {
                tokio::select! {
                    biased;
                    () = token.cancelled() => {}
                    () = tokio::time::sleep(delay) => {
                        let event = AlarmEvent {
                            prayer: alarm.prayer,
                            scheduled_for: alarm.at,
                        };
                        if events.send(event).is_err() {
                            debug!(name: "alarm.dropped", prayer = %alarm.prayer, "no listener for alarm");
                        }
                    }
                }
            });
            armed += 1;
        }

        info!(name: "alarms.registered", count = armed, "registered alarms");
        armed
    }

    pub fn cancel_all(&mut self) {
        self.generation.cancel();
    }
}
