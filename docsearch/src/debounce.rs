//! Input debouncing.

use std::pin::Pin;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Sleep;

/// Forwards the latest value from `input` once it has been quiet for `delay`.
///
/// Every new value restarts the delay and replaces the pending one. The
/// returned receiver closes after `input` closes; a value still pending at
/// that point is dropped.
pub fn debounce<T>(delay: Duration, mut input: mpsc::UnboundedReceiver<T>) -> mpsc::UnboundedReceiver<T>
where
    T: Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut pending: Option<T> = None;
        let mut timer: Option<Pin<Box<Sleep>>> = None;

        loop {
            tokio::select! {
                maybe = input.recv() => {
                    let Some(value) = maybe else {
                        break;
                    };
                    pending = Some(value);
                    timer = Some(Box::pin(tokio::time::sleep(delay)));
                }
                () = async {
                    if let Some(sleep) = timer.as_mut() {
                        sleep.await;
                    }
                }, if timer.is_some() => {
                    timer = None;
                    if let Some(value) = pending.take() {
                        if tx.send(value).is_err() {
                            break;
                        }
                    }
                }
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_burst_collapses_to_last_value() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut out = debounce(Duration::from_millis(50), rx);

        for value in ["s", "sa", "san", "sand"] {
            tx.send(value).unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert_eq!(out.recv().await, Some("sand"));
        drop(tx);
        assert_eq!(out.recv().await, None);
    }

    #[tokio::test]
    async fn test_quiet_gaps_emit_each_value() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut out = debounce(Duration::from_millis(10), rx);

        tx.send(1).unwrap();
        assert_eq!(out.recv().await, Some(1));
        tx.send(2).unwrap();
        assert_eq!(out.recv().await, Some(2));
    }

    #[tokio::test]
    async fn test_nothing_emitted_before_delay() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut out = debounce(Duration::from_millis(200), rx);

        tx.send("boot").unwrap();
        let early = tokio::time::timeout(Duration::from_millis(20), out.recv()).await;
        assert!(early.is_err());
        assert_eq!(out.recv().await, Some("boot"));
    }
}
