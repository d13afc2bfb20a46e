// Repeating-fetch scheduler for live sensor data
use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// One active repeating-fetch cycle targeting a specific city at a specific
/// interval. The ticker task handle is owned exclusively by the session and
/// aborted only by the controller that created it.
#[derive(Debug)]
struct PollingSession {
    target: String,
    interval: Duration,
    ticker: JoinHandle<()>,
}

/// Drives a caller-supplied fetch on a fixed cadence. At most one session
/// is active per controller; starting again replaces the previous session.
///
/// Ticks are scheduled by wall-clock time: each fetch runs as its own task,
/// so a slow response never delays the next tick and overlapping fetches
/// are possible. `stop` only prevents future ticks - an in-flight fetch
/// still resolves.
#[derive(Debug, Default)]
pub struct PollingController {
    session: Option<PollingSession>,
}

impl PollingController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop any existing session, fetch `target` once immediately, then on
    /// every `interval` tick until [`stop`](Self::stop). Must be called
    /// from within a tokio runtime.
    pub fn start<F, Fut>(&mut self, target: impl Into<String>, interval: Duration, mut fetch: F)
    where
        F: FnMut(String) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.stop();

        // tokio intervals reject a zero period
        let interval = interval.max(Duration::from_millis(1));
        let target = target.into();
        let tick_target = target.clone();

        let ticker = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                tokio::spawn(fetch(tick_target.clone()));
            }
        });

        self.session = Some(PollingSession {
            target,
            interval,
            ticker,
        });
    }

    /// Cancel the pending ticker if one exists. Idempotent; in-flight
    /// fetches are not aborted.
    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            session.ticker.abort();
            tracing::debug!("stopped polling {}", session.target);
        }
    }

    pub fn is_polling(&self) -> bool {
        self.session.is_some()
    }

    pub fn target(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.target.as_str())
    }

    pub fn interval(&self) -> Option<Duration> {
        self.session.as_ref().map(|s| s.interval)
    }
}

impl Drop for PollingController {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type CallLog = Arc<Mutex<Vec<String>>>;

    fn recorder(log: &CallLog) -> impl FnMut(String) -> std::future::Ready<()> + Send + 'static {
        let log = log.clone();
        move |target| {
            log.lock().unwrap().push(target);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_immediately_then_on_interval() {
        let log: CallLog = Arc::default();
        let mut controller = PollingController::new();

        controller.start("morelia", Duration::from_millis(1000), recorder(&log));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(log.lock().unwrap().len(), 1);

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(log.lock().unwrap().len(), 4);
        assert_eq!(controller.target(), Some("morelia"));
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_the_previous_session() {
        let log: CallLog = Arc::default();
        let mut controller = PollingController::new();

        controller.start("a", Duration::from_millis(1000), recorder(&log));
        tokio::time::sleep(Duration::from_millis(10)).await;

        controller.start("b", Duration::from_millis(2000), recorder(&log));
        tokio::time::sleep(Duration::from_millis(5000)).await;

        let calls = log.lock().unwrap();
        // "a" got exactly the one immediate fetch; every later call is "b"
        assert_eq!(calls.iter().filter(|t| t.as_str() == "a").count(), 1);
        assert!(calls.iter().filter(|t| t.as_str() == "b").count() >= 2);
        drop(calls);

        assert_eq!(controller.interval(), Some(Duration::from_millis(2000)));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_future_ticks() {
        let log: CallLog = Arc::default();
        let mut controller = PollingController::new();

        controller.start("morelia", Duration::from_millis(1000), recorder(&log));
        tokio::time::sleep(Duration::from_millis(10)).await;
        controller.stop();

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(log.lock().unwrap().len(), 1);
        assert!(!controller.is_polling());
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let mut controller = PollingController::new();
        controller.stop();
        controller.stop();
        assert!(!controller.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetches_do_not_delay_the_schedule() {
        let log: CallLog = Arc::default();
        let sink = log.clone();
        let mut controller = PollingController::new();

        controller.start("morelia", Duration::from_millis(1000), move |target| {
            let sink = sink.clone();
            async move {
                sink.lock().unwrap().push(target);
                // Outlive several ticks; the cadence must not stretch.
                tokio::time::sleep(Duration::from_millis(2500)).await;
            }
        });

        tokio::time::sleep(Duration::from_millis(2010)).await;
        assert_eq!(log.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_controller_stops_polling() {
        let log: CallLog = Arc::default();
        let mut controller = PollingController::new();

        controller.start("morelia", Duration::from_millis(1000), recorder(&log));
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(controller);

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(log.lock().unwrap().len(), 1);
    }
}
