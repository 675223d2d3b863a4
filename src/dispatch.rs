//! Event dispatch
//!
//! Routes a decoded [`Event`] to its handler(s) by the value of the `event`
//! field. Side effects go through the [`Actions`] seam so tests can observe
//! them; production wiring uses [`crate::actions::SystemActions`].
//!
//! Dispatches are independent of one another: the supervisor hands each
//! event to a fire-and-forget task, so two events arriving back-to-back may
//! execute their side effects in overlapping, non-deterministic order.

use std::sync::Arc;

use tracing::info;

use crate::config::ServerEndpoint;
use crate::event::Event;

/// Local side effects a dispatched event can trigger.
///
/// Implementations must never escalate failures; a handler that cannot
/// perform its effect logs and returns.
pub trait Actions: Send + Sync {
    /// Open a URL with the platform browser.
    fn open_url(&self, url: &str);

    /// Start playback of a remote audio resource.
    fn play(&self, url: &str);
}

/// Maps event discriminators to actions.
pub struct Dispatcher {
    endpoint: ServerEndpoint,
    actions: Arc<dyn Actions>,
}

impl Dispatcher {
    pub fn new(endpoint: ServerEndpoint, actions: Arc<dyn Actions>) -> Self {
        Self { endpoint, actions }
    }

    /// Route one event. Consumes the event; nothing is retained afterward.
    ///
    /// Discriminator matching is exact and case-sensitive. A missing
    /// required field skips the action with a log entry; an unrecognized
    /// discriminator (including the empty event a malformed frame decodes
    /// to) is logged and has no side effect.
    pub fn dispatch(&self, event: Event) {
        match event.kind() {
            Some("browser_backend") => match event.get("url") {
                Some(url) => self.actions.open_url(&self.endpoint.http_url(url)),
                None => info!("browser_backend event without url field, skipping"),
            },
            Some("browser_raw") => match event.get("url") {
                Some(url) => self.actions.open_url(url),
                None => info!("browser_raw event without url field, skipping"),
            },
            Some("song") => match event.get("url") {
                Some(url) => self.actions.play(&self.endpoint.http_url(url)),
                None => info!("song event without url field, skipping"),
            },
            Some("combination") => {
                // Each branch keys on its own field's presence but reads the
                // `url` value; the url_raw branch opening the `url` value
                // (not the url_raw value) is longstanding controller-facing
                // behavior and is kept as-is.
                if event.get("audio").is_some() {
                    let url = event.get("url").unwrap_or_default();
                    self.actions.play(&self.endpoint.http_url(url));
                }
                if let Some(url) = event.get("url") {
                    self.actions.open_url(&self.endpoint.http_url(url));
                }
                if event.get("url_raw").is_some() {
                    self.actions.open_url(event.get("url").unwrap_or_default());
                }
            }
            _ => info!("Unrecognized event: {:?}", event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingActions {
        opened: Mutex<Vec<String>>,
        played: Mutex<Vec<String>>,
    }

    impl Actions for RecordingActions {
        fn open_url(&self, url: &str) {
            self.opened.lock().unwrap().push(url.to_string());
        }
        fn play(&self, url: &str) {
            self.played.lock().unwrap().push(url.to_string());
        }
    }

    fn event(pairs: &[(&str, &str)]) -> Event {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
            .into()
    }

    fn dispatcher() -> (Dispatcher, Arc<RecordingActions>) {
        let actions = Arc::new(RecordingActions::default());
        let endpoint = ServerEndpoint::parse_override("host:1234").unwrap();
        (Dispatcher::new(endpoint, actions.clone()), actions)
    }

    #[test]
    fn browser_backend_opens_absolutized_url() {
        let (dispatcher, actions) = dispatcher();
        dispatcher.dispatch(event(&[("event", "browser_backend"), ("url", "/x")]));
        assert_eq!(*actions.opened.lock().unwrap(), vec!["http://host:1234/x"]);
        assert!(actions.played.lock().unwrap().is_empty());
    }

    #[test]
    fn browser_raw_opens_url_verbatim() {
        let (dispatcher, actions) = dispatcher();
        dispatcher.dispatch(event(&[("event", "browser_raw"), ("url", "https://example.com/")]));
        assert_eq!(*actions.opened.lock().unwrap(), vec!["https://example.com/"]);
    }

    #[test]
    fn song_requests_playback_of_absolutized_url() {
        let (dispatcher, actions) = dispatcher();
        dispatcher.dispatch(event(&[("event", "song"), ("url", "/sounds/a.mp3")]));
        assert_eq!(
            *actions.played.lock().unwrap(),
            vec!["http://host:1234/sounds/a.mp3"]
        );
        assert!(actions.opened.lock().unwrap().is_empty());
    }

    #[test]
    fn combination_url_raw_branch_opens_url_value() {
        let (dispatcher, actions) = dispatcher();
        dispatcher.dispatch(event(&[
            ("event", "combination"),
            ("url", "/a"),
            ("url_raw", "/b"),
        ]));
        // The url branch absolutizes /a; the url_raw branch opens the `url`
        // value verbatim, not /b.
        assert_eq!(
            *actions.opened.lock().unwrap(),
            vec!["http://host:1234/a", "/a"]
        );
        assert!(actions.played.lock().unwrap().is_empty());
    }

    #[test]
    fn combination_audio_branch_plays_url_value() {
        let (dispatcher, actions) = dispatcher();
        dispatcher.dispatch(event(&[
            ("event", "combination"),
            ("audio", "1"),
            ("url", "/clip.mp3"),
        ]));
        assert_eq!(
            *actions.played.lock().unwrap(),
            vec!["http://host:1234/clip.mp3"]
        );
        assert_eq!(
            *actions.opened.lock().unwrap(),
            vec!["http://host:1234/clip.mp3"]
        );
    }

    #[test]
    fn unknown_discriminator_has_no_side_effect() {
        let (dispatcher, actions) = dispatcher();
        dispatcher.dispatch(event(&[("event", "reboot"), ("url", "/x")]));
        assert!(actions.opened.lock().unwrap().is_empty());
        assert!(actions.played.lock().unwrap().is_empty());
    }

    #[test]
    fn empty_event_from_malformed_frame_has_no_side_effect() {
        let (dispatcher, actions) = dispatcher();
        dispatcher.dispatch(crate::event::decode_frame("{broken"));
        assert!(actions.opened.lock().unwrap().is_empty());
        assert!(actions.played.lock().unwrap().is_empty());
    }

    #[test]
    fn missing_required_field_skips_action() {
        let (dispatcher, actions) = dispatcher();
        dispatcher.dispatch(event(&[("event", "browser_backend")]));
        dispatcher.dispatch(event(&[("event", "song")]));
        assert!(actions.opened.lock().unwrap().is_empty());
        assert!(actions.played.lock().unwrap().is_empty());
    }
}
