use tokio::sync::mpsc;
use tracing::warn;

/// Buffer size for the notification channel.
/// 32 messages is far more than a user can read before the UI drains it.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Sink for user-facing error messages raised by the request pipeline.
/// Every failed request produces exactly one notification; successful
/// requests produce none.
pub trait Notifier: Send + Sync {
    fn notify_error(&self, message: &str);
}

/// Notifier that forwards messages over a channel drained by the UI loop
/// into the status line.
pub struct ChannelNotifier {
    tx: mpsc::Sender<String>,
}

impl ChannelNotifier {
    pub fn channel() -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify_error(&self, message: &str) {
        if self.tx.try_send(message.to_string()).is_err() {
            warn!(message, "Notification channel full, dropping message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_arrive_in_order() {
        let (notifier, mut rx) = ChannelNotifier::channel();
        notifier.notify_error("first");
        notifier.notify_error("second");

        assert_eq!(rx.try_recv().unwrap(), "first");
        assert_eq!(rx.try_recv().unwrap(), "second");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_full_channel_drops_instead_of_blocking() {
        let (notifier, mut rx) = ChannelNotifier::channel();
        for i in 0..100 {
            notifier.notify_error(&format!("message {}", i));
        }

        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, CHANNEL_BUFFER_SIZE);
    }
}
