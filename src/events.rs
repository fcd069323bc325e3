//! Fire-and-forget analytics events.
//!
//! The order core writes events and never reads them back. Recording an event
//! cannot fail from the caller's point of view; a sink that cannot deliver
//! drops the event.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    OrderPlaced,
    StockDecreased,
    OrderCancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsEvent {
    pub kind: EventKind,
    pub payload: Value,
    pub recorded_at: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn new(kind: EventKind, payload: Value) -> Self {
        Self {
            kind,
            payload,
            recorded_at: Utc::now(),
        }
    }

    pub fn order_placed(code: &str, product_name: &str, quantity: u32, user_id: Option<&str>) -> Self {
        Self::new(
            EventKind::OrderPlaced,
            json!({
                "code": code,
                "product_name": product_name,
                "quantity": quantity,
                "user_id": user_id,
            }),
        )
    }

    pub fn stock_decreased(restaurant_id: &str, new_amount: u32, available: bool) -> Self {
        Self::new(
            EventKind::StockDecreased,
            json!({
                "restaurant_id": restaurant_id,
                "new_amount": new_amount,
                "available": available,
            }),
        )
    }

    pub fn order_cancelled(user_id: &str, order_id: &str) -> Self {
        Self::new(
            EventKind::OrderCancelled,
            json!({ "user_id": user_id, "order_id": order_id }),
        )
    }
}

/// Write-only destination for analytics events.
pub trait EventSink: Send + Sync {
    fn record(&self, event: AnalyticsEvent);
}

/// Logs every event at `info`.
#[derive(Debug, Clone, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn record(&self, event: AnalyticsEvent) {
        info!(kind = ?event.kind, payload = %event.payload, "Analytics event");
    }
}

/// Forwards events to a consumer task over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    sender: mpsc::UnboundedSender<AnalyticsEvent>,
}

impl ChannelEventSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AnalyticsEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelEventSink {
    fn record(&self, event: AnalyticsEvent) {
        if self.sender.send(event).is_err() {
            debug!("Analytics consumer gone, event dropped");
        }
    }
}
