//! Best-effort event notifications.
//!
//! Notifications belong to the surrounding workflow, not to rendering:
//! nothing in [`crate::license`] calls them. Delivery is fire-and-forget;
//! failures are logged and dropped, never retried.

use serde::{Deserialize, Serialize};

/// Event name sent after a license has been rendered.
pub const LICENSE_RENDERED: &str = "license_rendered";

/// One event with an arbitrary JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Event name
    pub event: String,
    /// Event payload
    pub data: serde_json::Value,
}

impl NotificationEvent {
    /// Create an event.
    pub fn new(event: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// `license_rendered` event for a finished document.
    pub fn license_rendered(file_number: &str, file_name: &str, size: usize) -> Self {
        Self::new(
            LICENSE_RENDERED,
            serde_json::json!({
                "file_number": file_number,
                "file_name": file_name,
                "size": size,
            }),
        )
    }
}

/// Sends events somewhere without blocking the caller.
pub trait Notifier: Send + Sync {
    /// Dispatch `event`. Must return promptly and never fail.
    fn notify(&self, event: NotificationEvent);

    /// Wait for dispatched events to finish, e.g. before a process exits.
    fn flush(&self) {}
}

/// Writes events to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: NotificationEvent) {
        log::info!("Event {}: {}", event.event, event.data);
    }
}

#[cfg(feature = "webhook")]
pub use webhook::WebhookNotifier;

#[cfg(feature = "webhook")]
mod webhook {
    use super::{NotificationEvent, Notifier};
    use std::sync::Mutex;
    use std::thread::JoinHandle;
    use std::time::Duration;

    /// Request timeout for webhook posts.
    pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(1);

    /// Posts events as JSON to a webhook URL from a detached thread.
    #[derive(Debug)]
    pub struct WebhookNotifier {
        url: String,
        pending: Mutex<Vec<JoinHandle<()>>>,
    }

    impl WebhookNotifier {
        /// Post to `url`.
        pub fn new(url: impl Into<String>) -> Self {
            Self {
                url: url.into(),
                pending: Mutex::new(Vec::new()),
            }
        }

        /// Target URL.
        pub fn url(&self) -> &str {
            &self.url
        }
    }

    impl Notifier for WebhookNotifier {
        fn notify(&self, event: NotificationEvent) {
            let url = self.url.clone();
            let handle = std::thread::spawn(move || {
                let client = match reqwest::blocking::Client::builder()
                    .timeout(WEBHOOK_TIMEOUT)
                    .user_agent(concat!("license_press/", env!("CARGO_PKG_VERSION")))
                    .build()
                {
                    Ok(client) => client,
                    Err(e) => {
                        log::warn!("Webhook client unavailable: {}", e);
                        return;
                    },
                };
                match client.post(&url).json(&event).send() {
                    Ok(response) => log::debug!("Webhook {} answered {}", url, response.status()),
                    Err(e) => log::warn!("Webhook {} failed: {}", url, e),
                }
            });
            if let Ok(mut pending) = self.pending.lock() {
                pending.retain(|h| !h.is_finished());
                pending.push(handle);
            }
        }

        fn flush(&self) {
            let handles = match self.pending.lock() {
                Ok(mut pending) => std::mem::take(&mut *pending),
                Err(_) => return,
            };
            // Each post is bounded by WEBHOOK_TIMEOUT
            for handle in handles {
                let _ = handle.join();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Collecting(Mutex<Vec<NotificationEvent>>);

    impl Notifier for Arc<Collecting> {
        fn notify(&self, event: NotificationEvent) {
            if let Ok(mut events) = self.0.lock() {
                events.push(event);
            }
        }
    }

    #[test]
    fn test_event_body() {
        let event = NotificationEvent::license_rendered("EXP-0001", "license-exp-0001.pdf", 2048);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "license_rendered");
        assert_eq!(json["data"]["file_number"], "EXP-0001");
        assert_eq!(json["data"]["size"], 2048);
    }

    #[test]
    fn test_notifier_as_trait_object() {
        let sink = Arc::new(Collecting::default());
        let notifiers: Vec<Box<dyn Notifier>> = vec![Box::new(LogNotifier), Box::new(sink.clone())];
        for notifier in &notifiers {
            notifier.notify(NotificationEvent::new("ping", serde_json::Value::Null));
        }
        assert_eq!(sink.0.lock().unwrap().len(), 1);
    }

    #[cfg(feature = "webhook")]
    #[test]
    fn test_webhook_failure_is_swallowed() {
        // Nothing listens on port 9 of localhost; the call must still return
        let notifier = WebhookNotifier::new("http://127.0.0.1:9/hook");
        notifier.notify(NotificationEvent::new("ping", serde_json::Value::Null));
        notifier.flush();
        assert_eq!(notifier.url(), "http://127.0.0.1:9/hook");
    }
}
