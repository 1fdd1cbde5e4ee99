use crate::api::resolution::TimingsProvider;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use shared::aladhan::ProviderError;
use shared::mosques::{Coordinates, Mosque};
use shared::prayer_times::DailyTimings;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Barrier;

pub fn mosque(id: &str, latitude: Option<f64>, longitude: Option<f64>) -> Mosque {
    Mosque {
        id: id.to_string(),
        name: format!("Mosque {id}"),
        phone: None,
        alternate_phone: None,
        address: "1 Main Street".to_string(),
        district: None,
        city: "Makkah".to_string(),
        state: None,
        country: "Saudi Arabia".to_string(),
        latitude,
        longitude,
        created_at: Utc::now(),
    }
}

pub fn override_timings() -> DailyTimings {
    DailyTimings {
        fajr: "05:10".into(),
        dhuhr: "12:30".into(),
        asr: "16:00".into(),
        maghrib: "19:15".into(),
        isha: "20:45".into(),
    }
}

enum Behaviour {
    Succeed,
    Fail,
    WaitFor(Arc<Barrier>),
}

/// Records every request and answers with fixed timings.
pub struct FakeProvider {
    behaviour: Behaviour,
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, Coordinates)>>,
}

impl FakeProvider {
    fn with(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::with(Behaviour::Succeed)
    }

    pub fn failing() -> Self {
        Self::with(Behaviour::Fail)
    }

    /// Every call waits on `barrier` before answering.
    pub fn gated(barrier: Arc<Barrier>) -> Self {
        Self::with(Behaviour::WaitFor(barrier))
    }

    pub fn timings() -> DailyTimings {
        DailyTimings {
            fajr: "04:12 (+03)".into(),
            dhuhr: "12:19 (+03)".into(),
            asr: "15:38 (+03)".into(),
            maghrib: "19:01 (+03)".into(),
            isha: "20:31 (+03)".into(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(String, Coordinates)> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl TimingsProvider for FakeProvider {
    async fn fetch_timings(
        &self,
        date: &str,
        coordinates: Coordinates,
    ) -> Result<DailyTimings, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push((date.to_string(), coordinates));

        match &self.behaviour {
            Behaviour::Succeed => Ok(Self::timings()),
            Behaviour::Fail => Err(ProviderError::Deserialize(
                serde_json::from_str::<serde_json::Value>("<html>502</html>").unwrap_err(),
            )),
            Behaviour::WaitFor(barrier) => {
                barrier.wait().await;
                Ok(Self::timings())
            }
        }
    }
}
