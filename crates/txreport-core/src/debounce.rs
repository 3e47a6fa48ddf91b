//! Quiescence-window debouncing for search input
//!
//! Values pushed into a [`Debouncer`] are held until no new value has
//! arrived for the configured window; the latest one is then emitted on the
//! receiver, unless it equals the previously emitted value. A value applied
//! through another path can be reported with [`Debouncer::settle`], which
//! drops anything pending and counts as the last emission.

use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug)]
enum Input {
    Push(String),
    Settle(String),
}

/// Handle for pushing raw input values
#[derive(Debug, Clone)]
pub struct Debouncer {
    input: mpsc::UnboundedSender<Input>,
}

impl Debouncer {
    /// Spawn the debouncing task. Must be called inside a tokio runtime.
    pub fn new(window: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        tokio::spawn(run(window, input_rx, output_tx));
        (Self { input: input_tx }, output_rx)
    }

    /// Push a new value, restarting the window. Returns `false` once the task has stopped.
    pub fn push(&self, value: impl Into<String>) -> bool {
        self.input.send(Input::Push(value.into())).is_ok()
    }

    /// Record `value` as already applied: a pending value is dropped and
    /// `value` becomes the last emission.
    pub fn settle(&self, value: impl Into<String>) -> bool {
        self.input.send(Input::Settle(value.into())).is_ok()
    }
}

async fn run(
    window: Duration,
    mut input: mpsc::UnboundedReceiver<Input>,
    output: mpsc::UnboundedSender<String>,
) {
    let mut last_emitted: Option<String> = None;
    let mut pending: Option<String> = None;

    loop {
        let Some(value) = pending.take() else {
            match input.recv().await {
                Some(Input::Push(value)) => pending = Some(value),
                Some(Input::Settle(applied)) => last_emitted = Some(applied),
                None => break,
            }
            continue;
        };

        tokio::select! {
            next = input.recv() => match next {
                Some(Input::Push(newer)) => pending = Some(newer),
                Some(Input::Settle(applied)) => last_emitted = Some(applied),
                None => {
                    // all handles dropped: flush what we have and stop
                    emit(&output, &mut last_emitted, value);
                    break;
                }
            },
            _ = tokio::time::sleep(window) => {
                if !emit(&output, &mut last_emitted, value) {
                    break;
                }
            }
        }
    }
}

/// Send `value` unless it repeats the last emission. Returns `false` when the receiver is gone.
fn emit(output: &mpsc::UnboundedSender<String>, last: &mut Option<String>, value: String) -> bool {
    if last.as_deref() == Some(value.as_str()) {
        return true;
    }
    *last = Some(value.clone());
    output.send(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(200);

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_only_last_value() {
        let (debouncer, mut settled) = Debouncer::new(WINDOW);

        debouncer.push("a");
        tokio::time::sleep(Duration::from_millis(50)).await;
        debouncer.push("al");
        tokio::time::sleep(Duration::from_millis(50)).await;
        debouncer.push("alp");

        assert_eq!(settled.recv().await.as_deref(), Some("alp"));
        assert!(settled.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_emit_separately() {
        let (debouncer, mut settled) = Debouncer::new(WINDOW);

        debouncer.push("beta");
        tokio::time::sleep(Duration::from_millis(500)).await;
        debouncer.push("gamma");

        assert_eq!(settled.recv().await.as_deref(), Some("beta"));
        assert_eq!(settled.recv().await.as_deref(), Some("gamma"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_value_is_suppressed() {
        let (debouncer, mut settled) = Debouncer::new(WINDOW);

        debouncer.push("cash");
        tokio::time::sleep(Duration::from_millis(500)).await;
        debouncer.push("cas");
        debouncer.push("cash");
        tokio::time::sleep(Duration::from_millis(500)).await;
        drop(debouncer);

        assert_eq!(settled.recv().await.as_deref(), Some("cash"));
        assert_eq!(settled.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_value_flushed_on_drop() {
        let (debouncer, mut settled) = Debouncer::new(WINDOW);

        debouncer.push("rent");
        drop(debouncer);

        assert_eq!(settled.recv().await.as_deref(), Some("rent"));
        assert_eq!(settled.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_drops_pending_value() {
        let (debouncer, mut settled) = Debouncer::new(WINDOW);

        debouncer.push("rent");
        debouncer.settle("groceries");
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(settled.try_recv().is_err());

        // already applied, so not emitted again
        debouncer.push("groceries");
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(settled.try_recv().is_err());

        debouncer.push("rent");
        assert_eq!(settled.recv().await.as_deref(), Some("rent"));
    }
}
