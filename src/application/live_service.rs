// Live reading feed - pushes freshly normalized readings on a poll cadence
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::application::polling::PollingController;
use crate::application::sensor_gateway::SensorGateway;
use crate::domain::reading::CanonicalReading;

#[derive(Clone)]
pub struct LiveFeedService {
    gateway: Arc<dyn SensorGateway>,
    default_interval: Duration,
}

impl LiveFeedService {
    pub fn new(gateway: Arc<dyn SensorGateway>, default_interval: Duration) -> Self {
        Self {
            gateway,
            default_interval,
        }
    }

    /// Start polling `city` and return the receiving end of the feed. Each
    /// tick fetches and pushes one normalized reading; failed ticks log and
    /// skip, the session self-heals on the next tick. The polling session
    /// is torn down as soon as the receiver is dropped.
    pub fn stream_city(
        &self,
        city: &str,
        interval: Option<Duration>,
    ) -> mpsc::Receiver<CanonicalReading> {
        let interval = interval.unwrap_or(self.default_interval);
        let (tx, rx) = mpsc::channel(16);

        let gateway = self.gateway.clone();
        let feed = tx.clone();
        let mut controller = PollingController::new();
        controller.start(city.to_string(), interval, move |target| {
            let gateway = gateway.clone();
            let feed = feed.clone();
            async move {
                match gateway.reading_for_city(&target).await {
                    Ok(Some(reading)) => {
                        let _ = feed.send(reading).await;
                    }
                    Ok(None) => tracing::warn!("no data for {target} on this tick"),
                    Err(e) => tracing::warn!("live fetch for {target} failed: {e}"),
                }
            }
        });

        // The controller moves into a watchdog that stops polling once the
        // consumer goes away.
        tokio::spawn(async move {
            tx.closed().await;
            controller.stop();
        });

        rx
    }
}
