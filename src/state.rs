use dashmap::DashMap;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::engine::dispatch::DispatchEvent;
use crate::engine::notify::Notification;
use crate::models::account::Account;
use crate::models::document::Document;
use crate::models::review::Review;
use crate::models::shipment::Shipment;
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub accounts: DashMap<Uuid, Account>,
    pub shipments: DashMap<Uuid, Shipment>,
    pub documents: DashMap<Uuid, Document>,
    /// Keyed by shipment id: at most one review per shipment, enforced by
    /// the vacant-entry insert in the rating engine.
    pub reviews: DashMap<Uuid, Review>,
    /// Tracking code -> shipment id.
    pub tracking_index: DashMap<String, Uuid>,
    pub notify_tx: mpsc::Sender<Notification>,
    pub dispatch_events_tx: broadcast::Sender<DispatchEvent>,
    pub internal_api_key: String,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(
        notify_queue_size: usize,
        event_buffer_size: usize,
        internal_api_key: impl Into<String>,
    ) -> (Self, mpsc::Receiver<Notification>) {
        let (notify_tx, notify_rx) = mpsc::channel(notify_queue_size);
        let (dispatch_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        (
            Self {
                accounts: DashMap::new(),
                shipments: DashMap::new(),
                documents: DashMap::new(),
                reviews: DashMap::new(),
                tracking_index: DashMap::new(),
                notify_tx,
                dispatch_events_tx,
                internal_api_key: internal_api_key.into(),
                metrics: Metrics::new(),
            },
            notify_rx,
        )
    }
}
