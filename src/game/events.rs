/// Observer list for a single event type.
///
/// Callers decide when a value actually changed; `emit` fires every
/// subscriber unconditionally.
pub struct Notifier<E> {
    subscribers: Vec<Box<dyn FnMut(&E)>>,
}

impl<E> Notifier<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&E) + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    pub fn emit(&mut self, event: &E) {
        for subscriber in &mut self.subscribers {
            subscriber(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<E> Default for Notifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// A tile switched between open and closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenStateChanged {
    pub tile_index: usize,
    pub open: bool,
}

/// The spelled answer or its validity changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerChanged {
    pub word: String,
    pub valid: bool,
}

/// New running total after a score change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreChanged {
    pub total: i32,
}
