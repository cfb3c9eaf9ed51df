//! Effects and notices accumulated while handling one event.

use std::time::Duration;

use crate::api::ApiRequest;
use crate::notify::Severity;

use super::event::{Effect, Event};

#[derive(Debug, Default)]
pub(crate) struct Outbox {
    pub(crate) effects: Vec<Effect>,
    pub(crate) notices: Vec<(String, Severity)>,
}

impl Outbox {
    pub(crate) fn request(&mut self, request: ApiRequest) {
        tracing::debug!(endpoint = %request.endpoint(), "queueing request");
        self.effects.push(Effect::Request(request));
    }

    pub(crate) fn schedule(&mut self, after: Duration, event: Event) {
        self.effects.push(Effect::Schedule { after, event });
    }

    pub(crate) fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.notices.push((message.into(), severity));
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.notify(message, Severity::Error);
    }

    pub(crate) fn success(&mut self, message: impl Into<String>) {
        self.notify(message, Severity::Success);
    }
}
