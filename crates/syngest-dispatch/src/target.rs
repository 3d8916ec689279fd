use syngest_input::{InputEvent, InputSource};

/// Sink receiving the input events a gesture produces.
///
/// The controller never inspects events; it only hands the target to the
/// gesture currently stepping. Target methods run inside that step, while
/// the controller's queue is borrowed, so they must not call back into the
/// controller.
pub trait GestureTarget {
    fn dispatch_input_event(&mut self, event: InputEvent);

    /// Source substituted for events that leave theirs as `Default`.
    fn default_input_source(&self) -> InputSource {
        InputSource::Touch
    }

    fn supports_source(&self, _source: InputSource) -> bool {
        true
    }
}

impl<T: GestureTarget + ?Sized> GestureTarget for Box<T> {
    fn dispatch_input_event(&mut self, event: InputEvent) {
        (**self).dispatch_input_event(event);
    }

    fn default_input_source(&self) -> InputSource {
        (**self).default_input_source()
    }

    fn supports_source(&self, source: InputSource) -> bool {
        (**self).supports_source(source)
    }
}
