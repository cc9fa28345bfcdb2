// ABOUTME: Events emitted by the wizard state manager and the listener registry
// Handlers run synchronously on the emitting call, in subscription order

use std::fmt;

use super::data::StepData;
use super::step::LogicalStep;

#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    StepChanged { current_step: usize },
    StepDataUpdated { step: LogicalStep, data: StepData },
    WizardCompleted { result_id: String },
    WizardCancelled,
}

impl WizardEvent {
    pub fn kind(&self) -> WizardEventKind {
        match self {
            Self::StepChanged { .. } => WizardEventKind::StepChanged,
            Self::StepDataUpdated { .. } => WizardEventKind::StepDataUpdated,
            Self::WizardCompleted { .. } => WizardEventKind::WizardCompleted,
            Self::WizardCancelled => WizardEventKind::WizardCancelled,
        }
    }
}

/// Event names a listener can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardEventKind {
    StepChanged,
    StepDataUpdated,
    WizardCompleted,
    WizardCancelled,
}

/// Handle returned by a subscription, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Handler = Box<dyn FnMut(&WizardEvent)>;

struct Listener {
    id: ListenerId,
    kind: WizardEventKind,
    handler: Handler,
}

#[derive(Default)]
pub struct EventListeners {
    listeners: Vec<Listener>,
    next_id: u64,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: WizardEventKind, handler: impl FnMut(&WizardEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            kind,
            handler: Box::new(handler),
        });
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: &WizardEvent) {
        let kind = event.kind();
        for listener in self.listeners.iter_mut().filter(|l| l.kind == kind) {
            (listener.handler)(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}
