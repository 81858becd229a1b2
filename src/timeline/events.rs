/// Lifecycle notifications emitted by the sequencer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationEvent {
    /// A run began from `Idle`/`Stopped` (or was restarted by a resize).
    Started,
    /// The run ended: repeat limit reached or cancelled.
    Stopped,
    /// The collapse phase finished naturally.
    Collapsed,
    /// The explode phase finished naturally.
    Exploded,
}

/// Host-side receiver for [`AnimationEvent`]s. Every method defaults to a no-op.
///
/// Any `FnMut(AnimationEvent)` closure is a listener as well.
pub trait AnimationListener {
    fn on_started(&mut self) {}
    fn on_stopped(&mut self) {}
    fn on_collapsed(&mut self) {}
    fn on_exploded(&mut self) {}

    fn on_event(&mut self, event: AnimationEvent) {
        match event {
            AnimationEvent::Started => self.on_started(),
            AnimationEvent::Stopped => self.on_stopped(),
            AnimationEvent::Collapsed => self.on_collapsed(),
            AnimationEvent::Exploded => self.on_exploded(),
        }
    }
}

impl<F> AnimationListener for F
where
    F: FnMut(AnimationEvent),
{
    fn on_event(&mut self, event: AnimationEvent) {
        self(event)
    }
}

/// Holds at most one listener; a missing listener silently drops events.
#[derive(Default)]
pub struct EventSink {
    listener: Option<Box<dyn AnimationListener>>,
}

impl EventSink {
    /// Replaces any previously registered listener.
    pub fn set(&mut self, listener: Box<dyn AnimationListener>) {
        self.listener = Some(listener);
    }

    pub fn clear(&mut self) {
        self.listener = None;
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    pub fn emit(&mut self, event: AnimationEvent) {
        tracing::debug!(?event, "animation event");
        if let Some(listener) = self.listener.as_mut() {
            listener.on_event(event);
        }
    }
}

impl std::fmt::Debug for EventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSink")
            .field("has_listener", &self.has_listener())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/events.rs"]
mod tests;
