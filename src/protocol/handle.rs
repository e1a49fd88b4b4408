//! Single-assignment response handles
//!
//! A transport hands out a `ResponseHandle` when it accepts a frame and keeps
//! the paired `ResponseSender`. The sender completes exactly once; dropping
//! it resolves the handle as a transport failure.

use tokio::sync::oneshot;

use super::response::Response;
use super::transport::TransportError;
use crate::error::DriverResult;

type Delivery = Result<Response, TransportError>;

/// Pending response for one in-flight frame
#[derive(Debug)]
pub struct ResponseHandle {
    rx: oneshot::Receiver<Delivery>,
}

/// Transport-side half of a `ResponseHandle`
#[derive(Debug)]
pub struct ResponseSender {
    tx: oneshot::Sender<Delivery>,
}

impl ResponseHandle {
    /// Create a connected sender/handle pair
    pub fn channel() -> (ResponseSender, ResponseHandle) {
        let (tx, rx) = oneshot::channel();
        (ResponseSender { tx }, ResponseHandle { rx })
    }

    /// A handle that is already resolved
    pub fn ready(response: Response) -> Self {
        let (sender, handle) = Self::channel();
        sender.complete(response);
        handle
    }

    /// A handle that resolves to a transport failure
    pub fn failed(error: TransportError) -> Self {
        let (sender, handle) = Self::channel();
        sender.fail(error);
        handle
    }

    /// Wait for the response. Consumes the handle.
    pub async fn resolve(self) -> DriverResult<Response> {
        match self.rx.await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(error)) => Err(error.into()),
            Err(_) => Err(TransportError::closed().into()),
        }
    }
}

impl ResponseSender {
    /// Deliver the response. Returns false if the handle was dropped.
    pub fn complete(self, response: Response) -> bool {
        self.tx.send(Ok(response)).is_ok()
    }

    /// Deliver a transport failure. Returns false if the handle was dropped.
    pub fn fail(self, error: TransportError) -> bool {
        self.tx.send(Err(error)).is_ok()
    }

    /// True once the waiting handle has been dropped
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }
}
