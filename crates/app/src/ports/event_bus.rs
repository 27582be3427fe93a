//! Event bus port: fan-out of live events to connected clients.

use std::future::Future;

use sitehub_domain::error::SiteError;
use sitehub_domain::event::LiveEvent;

/// Publishes live events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: LiveEvent) -> impl Future<Output = Result<(), SiteError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: LiveEvent) -> impl Future<Output = Result<(), SiteError>> + Send {
        (**self).publish(event)
    }
}
