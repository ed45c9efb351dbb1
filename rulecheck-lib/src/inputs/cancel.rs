use tokio::sync::watch;

/// Fires the paired [`CancelSignal`].
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Observed by the collector; once fired, in-flight and pending fetches are abandoned.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

/// Create a connected handle/signal pair.
#[must_use]
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.tx.send_replace(true);
    }
}

impl CancelSignal {
    /// A signal that is never fired.
    #[must_use]
    pub fn never() -> Self {
        cancel_pair().1
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the signal fires. Never resolves if the handle is dropped unfired.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }

            if rx.changed().await.is_err() {
                core::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;

    #[tokio::test]
    async fn test_fired_signal_resolves() {
        let (handle, signal) = cancel_pair();
        assert!(!signal.is_cancelled());

        handle.cancel();

        assert!(signal.is_cancelled());
        tokio::time::timeout(Duration::from_secs(1), signal.cancelled()).await.unwrap();
    }

    #[tokio::test]
    async fn test_signal_fired_while_waiting() {
        let (handle, signal) = cancel_pair();
        let waiter = signal.clone();

        let wait = tokio::spawn(async move { waiter.cancelled().await });
        tokio::task::yield_now().await;
        handle.cancel();

        tokio::time::timeout(Duration::from_secs(1), wait).await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_signal_does_not_resolve() {
        let signal = CancelSignal::never();
        assert!(!signal.is_cancelled());

        let result = tokio::time::timeout(Duration::from_secs(60), signal.cancelled()).await;
        assert!(result.is_err());
    }
}
