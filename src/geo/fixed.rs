//! Fixed-coordinate geolocation source
//!
//! Reports one known location on every `start`. Used when the caller already
//! knows where to center the picker (explicit coordinates or a geocoded name).

use crate::geo::{GeolocationSource, LocationEvent, LocationUpdate};
use crate::place::Coordinates;
use tokio::sync::mpsc;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct FixedLocation {
    update: LocationUpdate,
    running: bool,
}

impl FixedLocation {
    pub fn new(coordinate: Coordinates, accuracy_meters: f64) -> Self {
        Self {
            update: LocationUpdate {
                coordinate,
                accuracy_meters,
            },
            running: false,
        }
    }

    /// A perfectly accurate fix at `coordinate`
    pub fn exact(coordinate: Coordinates) -> Self {
        Self::new(coordinate, 0.0)
    }
}

impl GeolocationSource for FixedLocation {
    fn start(&mut self, events: mpsc::Sender<LocationEvent>) {
        if self.running {
            return;
        }
        self.running = true;
        if let Err(e) = events.try_send(LocationEvent::Update(self.update)) {
            warn!("fixed location update dropped: {}", e);
        }
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_sends_one_update() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut source = FixedLocation::exact(Coordinates::new(10.0, 20.0));

        source.start(tx.clone());
        source.start(tx);
        assert!(source.is_running());

        match rx.recv().await {
            Some(LocationEvent::Update(update)) => {
                assert_eq!(update.coordinate, Coordinates::new(10.0, 20.0));
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_restart_after_stop_sends_again() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut source = FixedLocation::new(Coordinates::new(0.0, 0.0), 50.0);

        source.start(tx.clone());
        source.stop();
        source.stop();
        assert!(!source.is_running());
        source.start(tx);

        assert!(matches!(rx.recv().await, Some(LocationEvent::Update(_))));
        assert!(matches!(rx.recv().await, Some(LocationEvent::Update(_))));
    }
}
