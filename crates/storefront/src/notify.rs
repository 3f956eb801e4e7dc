//! User-facing notifications (toasts).
//!
//! Cart operations never notify on their own; they return a result and the
//! caller turns it into a [`Notification`] with [`Notification::for_outcome`]
//! and hands it to a [`NotificationSink`].

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use rocket_shoes_core::{Cart, CartRejection};
use serde::Serialize;

use crate::cart::{CartError, CartOperation};

/// Upper bound on queued flash messages; the oldest are dropped first.
const MAX_PENDING: usize = 20;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

/// A message to show the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.level, Level::Error)
    }

    /// The notification the shopper sees for an operation's outcome.
    ///
    /// Only a successful add is announced; removals and amount updates
    /// succeed silently. Stock rejections get a dedicated message, every
    /// other failure a generic per-operation one.
    #[must_use]
    pub fn for_outcome(operation: CartOperation, outcome: &Result<Cart, CartError>) -> Option<Self> {
        match outcome {
            Ok(_) => match operation {
                CartOperation::Add => Some(Self::success("Added to cart")),
                CartOperation::Remove | CartOperation::Update => None,
            },
            Err(CartError::Rejected(CartRejection::OutOfStock { .. })) => {
                Some(Self::error("Requested amount is out of stock"))
            }
            Err(_) => Some(Self::error(match operation {
                CartOperation::Add => "Failed to add product",
                CartOperation::Remove => "Failed to remove product",
                CartOperation::Update => "Failed to update product amount",
            })),
        }
    }
}

/// Fire-and-forget notification display.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Sink that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Success => tracing::info!(message = %notification.message, "notification"),
            Level::Error => tracing::warn!(message = %notification.message, "notification"),
        }
    }
}

/// Sink that logs and queues messages until the next page render drains them.
#[derive(Debug, Default)]
pub struct FlashSink {
    pending: Mutex<VecDeque<Notification>>,
}

impl FlashSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }
}

impl NotificationSink for FlashSink {
    fn notify(&self, notification: Notification) {
        TracingSink.notify(notification.clone());

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if pending.len() == MAX_PENDING {
            pending.pop_front();
        }
        pending.push_back(notification);
    }
}
