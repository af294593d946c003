use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::{EtcdError, EtcdResponse, Result};

/// Caller-facing handle for an in-flight request.
///
/// Created once per [`crate::EtcdClient::send`] call and completed
/// exactly once, no matter how many connection attempts the transport
/// makes underneath. Dropping the handle does not stop the in-flight
/// work; awaiting it is the only way to observe the outcome.
#[derive(Debug)]
pub struct ResponseFuture {
    receiver: oneshot::Receiver<Result<EtcdResponse>>,
}

/// Completion side of a [`ResponseFuture`]. Consumed on completion, so
/// a second terminal transition is unrepresentable.
#[derive(Debug)]
pub(crate) struct Completion {
    sender: oneshot::Sender<Result<EtcdResponse>>,
}

impl ResponseFuture {
    pub(crate) fn channel() -> (Self, Completion) {
        let (sender, receiver) = oneshot::channel();
        (Self { receiver }, Completion { sender })
    }
}

impl Completion {
    /// Resolves the future. A no-op when the caller dropped the handle.
    pub(crate) fn complete(self, outcome: Result<EtcdResponse>) {
        let _ = self.sender.send(outcome);
    }
}

impl Future for ResponseFuture {
    type Output = Result<EtcdResponse>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            // Completion dropped without resolving: the driver task was
            // torn down with the runtime.
            Poll::Ready(Err(_)) => Poll::Ready(Err(EtcdError::Closed)),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ResponseFuture;
    use crate::{EtcdError, EtcdResponse};

    #[tokio::test]
    async fn resolves_with_completed_outcome() {
        let (future, completion) = ResponseFuture::channel();
        completion.complete(Ok(EtcdResponse::Version("2.3.8".to_owned())));

        let outcome = future.await.expect("must resolve ok");
        assert_eq!(outcome, EtcdResponse::Version("2.3.8".to_owned()));
    }

    #[tokio::test]
    async fn dropped_completion_resolves_closed() {
        let (future, completion) = ResponseFuture::channel();
        drop(completion);

        let err = future.await.expect_err("must resolve err");
        assert!(matches!(err, EtcdError::Closed));
    }
}
