use chrono::NaiveDate;
use metrics::counter;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Handle for publishing domain events. Cloned into every service.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event, waiting for channel capacity.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Publishes without waiting. A full or closed channel is logged and the event dropped;
    /// the durable change it describes has already been committed.
    pub fn send_or_log(&self, event: Event) {
        if let Err(e) = self.sender.try_send(event) {
            counter!("counter_pos_events.dropped", 1);
            warn!("Failed to publish event: {}", e);
        }
    }
}

/// Durable transitions of orders and held bills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    OrderCommitted {
        bill_number: i32,
        kot: i32,
        date: NaiveDate,
        price: Decimal,
    },
    OrderMerged {
        bill_number: i32,
        price_delta: Decimal,
    },
    OrderEdited {
        bill_number: i32,
        price: Decimal,
    },
    OrderDeleted {
        bill_number: i32,
        reason: String,
    },
    BillHeld(i32),
    HeldOrderResumed(i32),
    HeldOrderDeleted(i32),
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::OrderCommitted { .. } => "order_committed",
            Event::OrderMerged { .. } => "order_merged",
            Event::OrderEdited { .. } => "order_edited",
            Event::OrderDeleted { .. } => "order_deleted",
            Event::BillHeld(_) => "bill_held",
            Event::HeldOrderResumed(_) => "held_order_resumed",
            Event::HeldOrderDeleted(_) => "held_order_deleted",
        }
    }
}

/// Drains the event channel until every sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        counter!("counter_pos_events.processed", 1, "event" => event.name());

        match &event {
            Event::OrderCommitted {
                bill_number,
                kot,
                date,
                price,
            } => {
                info!(
                    bill_number,
                    kot,
                    %date,
                    %price,
                    "Kitchen ticket ready"
                );
            }
            Event::OrderDeleted { bill_number, reason } => {
                info!(bill_number, reason = %reason, "Order archived");
            }
            other => {
                info!(event = other.name(), "Processed event: {:?}", other);
            }
        }
    }

    info!("Event channel closed; event processing loop stopped");
}
