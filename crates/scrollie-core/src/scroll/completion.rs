use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Settlement {
    Fulfilled,
    Rejected,
}

impl Settlement {
    fn into_result(self) -> Result<()> {
        match self {
            Settlement::Fulfilled => Ok(()),
            Settlement::Rejected => Err(Error::Cancelled),
        }
    }
}

/// Producer half of a [`Completion`]; settling consumes it, so it settles once
#[derive(Debug)]
pub(crate) struct Resolver {
    tx: oneshot::Sender<Settlement>,
}

impl Resolver {
    pub(crate) fn resolve(self) {
        // The caller may have dropped its Completion; nothing to report then
        let _ = self.tx.send(Settlement::Fulfilled);
    }

    pub(crate) fn reject(self) {
        let _ = self.tx.send(Settlement::Rejected);
    }
}

/// Outcome of one scroll animation
///
/// Resolves to `Ok(())` when the animation reaches its target and to
/// `Err(Error::Cancelled)` when it is stopped or superseded. A completion
/// whose animator went away without settling it also reports `Cancelled`.
#[derive(Debug)]
pub struct Completion {
    rx: oneshot::Receiver<Settlement>,
    settled: Option<Settlement>,
}

pub(crate) fn pair() -> (Resolver, Completion) {
    let (tx, rx) = oneshot::channel();
    (
        Resolver { tx },
        Completion {
            rx,
            settled: None,
        },
    )
}

impl Completion {
    /// A completion that is already fulfilled
    pub fn fulfilled() -> Self {
        let (resolver, completion) = pair();
        resolver.resolve();
        completion
    }

    /// Check for an outcome without waiting
    pub fn try_outcome(&mut self) -> Option<Result<()>> {
        if let Some(settled) = self.settled {
            return Some(settled.into_result());
        }
        let settled = match self.rx.try_recv() {
            Ok(settled) => settled,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => Settlement::Rejected,
        };
        self.settled = Some(settled);
        Some(settled.into_result())
    }

    pub fn is_settled(&mut self) -> bool {
        self.try_outcome().is_some()
    }
}

impl Future for Completion {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(settled) = self.settled {
            return Poll::Ready(settled.into_result());
        }
        let settled = match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(settled)) => settled,
            Poll::Ready(Err(_)) => Settlement::Rejected,
            Poll::Pending => return Poll::Pending,
        };
        self.settled = Some(settled);
        Poll::Ready(settled.into_result())
    }
}
