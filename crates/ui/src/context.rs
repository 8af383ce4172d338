//! The single execution context the quiz mutates state on.
//!
//! Everything that reaches the controller (user input, source replies, timers) is posted
//! as a [`UiEvent`] onto one channel and handled in order by one task.

use std::time::Duration;

use services::{SourceEvent, SourceReply, Ticket};
use tokio::sync::mpsc;

/// Follow-up actions offered by results and error screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    PlayAgain,
    RetryLoad,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Start,
    Answer(bool),
    Action(UiAction),
    Source(SourceEvent),
    FeedbackElapsed { ticket: Ticket },
    Shutdown,
}

pub type UiReceiver = mpsc::UnboundedReceiver<UiEvent>;

/// Cloneable handle for posting work onto the UI context.
#[derive(Debug, Clone)]
pub struct UiContext {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl UiContext {
    /// Create a context and the receiver its events are drained from.
    #[must_use]
    pub fn channel() -> (Self, UiReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue `event`. Returns false once the receiving side is gone.
    pub fn post(&self, event: UiEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Queue `event` after `delay`.
    ///
    /// The timer only holds a weak handle, so it neither keeps the context alive nor fails
    /// if the controller was torn down in the meantime. Outside a tokio runtime the event
    /// is posted right away.
    pub fn post_after(&self, delay: Duration, event: UiEvent) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(?delay, "no runtime for delayed event; posting immediately");
            self.post(event);
            return;
        };

        let weak = self.tx.downgrade();
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            match weak.upgrade() {
                Some(tx) => {
                    let _ = tx.send(event);
                }
                None => tracing::debug!("ui context closed before delayed event fired"),
            }
        });
    }

    /// A source reply whose result is posted back onto this context.
    #[must_use]
    pub fn reply(&self, ticket: Ticket) -> SourceReply {
        let tx = self.tx.clone();
        SourceReply::new(ticket, move |event| {
            if tx.send(UiEvent::Source(event)).is_err() {
                tracing::debug!(%ticket, "ui context closed before source replied");
            }
        })
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_arrive_as_source_events() {
        let (ctx, mut rx) = UiContext::channel();
        ctx.reply(Ticket::new(5)).question(None);

        assert_eq!(
            rx.recv().await,
            Some(UiEvent::Source(SourceEvent::Question {
                ticket: Ticket::new(5),
                question: None,
            }))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_events_wait_for_their_delay() {
        let (ctx, mut rx) = UiContext::channel();
        let started = tokio::time::Instant::now();
        ctx.post_after(Duration::from_secs(1), UiEvent::Answer(true));

        assert!(rx.try_recv().is_err());
        assert_eq!(rx.recv().await, Some(UiEvent::Answer(true)));
        assert!(started.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_event_after_teardown_is_dropped() {
        let (ctx, rx) = UiContext::channel();
        ctx.post_after(Duration::from_secs(1), UiEvent::Start);
        drop(rx);
        drop(ctx);

        tokio::time::sleep(Duration::from_secs(2)).await;
    }

    #[test]
    fn post_reports_a_closed_context() {
        let (ctx, rx) = UiContext::channel();
        assert!(ctx.post(UiEvent::Start));
        drop(rx);
        assert!(!ctx.post(UiEvent::Start));
        assert!(ctx.is_closed());
    }
}
