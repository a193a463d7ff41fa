use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::models::Session;

const CHANNEL_CAPACITY: usize = 16;

/// Session-change notification
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}

/// Publisher side of session-change notifications, owned by a backend
#[derive(Debug, Clone)]
pub struct AuthEvents {
    sender: broadcast::Sender<AuthEvent>,
}

impl Default for AuthEvents {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }
}

impl AuthEvents {
    pub fn emit(&self, event: AuthEvent) {
        // No subscriber is not an error
        let delivered = self.sender.send(event).unwrap_or(0);
        tracing::debug!("Auth event delivered to {} subscriber(s)", delivered);
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Handle to an active subscription; dropping it unsubscribes
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<AuthEvent>,
}

impl Subscription {
    /// Next pending event without waiting
    pub fn try_next(&mut self) -> Option<AuthEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("Dropped {} auth events", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    pub fn unsubscribe(self) {
        tracing::debug!("Auth subscription released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribe_and_release() {
        let events = AuthEvents::default();
        let mut sub = events.subscribe();
        assert_eq!(events.subscriber_count(), 1);

        events.emit(AuthEvent::SignedOut);
        assert_eq!(sub.try_next(), Some(AuthEvent::SignedOut));
        assert_eq!(sub.try_next(), None);

        sub.unsubscribe();
        assert_eq!(events.subscriber_count(), 0);
    }

    #[test]
    fn test_emit_without_subscribers() {
        let events = AuthEvents::default();
        events.emit(AuthEvent::SignedOut);
        assert_eq!(events.subscriber_count(), 0);
    }
}
