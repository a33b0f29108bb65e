// Event-system data model shared with the engine's C API
//
// The event type and sub-ID flags are opaque engine enumerations; the bridge
// passes them through unmodified. Only the flag-update rule is engine-defined
// behavior the stub backend has to reproduce.

use std::ffi::c_void;

use crate::status::Status;

/// Opaque engine event-type enumerator.
///
/// The engine owns the meaning of each value; the bridge never interprets it.
/// A few well-known slots are named for the diagnostic tooling and tests.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventType(pub u32);

impl EventType {
    pub const SYSTEM: EventType = EventType(0);
    pub const INPUT: EventType = EventType(1);
    pub const OBJECT: EventType = EventType(2);
    pub const RENDER: EventType = EventType(3);
    pub const PHYSICS: EventType = EventType(4);
    pub const SOUND: EventType = EventType(5);
}

/// Bit-mask selecting which sub-event IDs of a type a handler receives.
///
/// Bit `n` set means sub-ID `n` is delivered. A freshly registered handler
/// starts with [`EventIdFlags::ALL`].
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventIdFlags(pub u32);

impl EventIdFlags {
    pub const NONE: EventIdFlags = EventIdFlags(0);
    pub const ALL: EventIdFlags = EventIdFlags(u32::MAX);

    /// Engine flag-update rule: clear the `remove` bits first, then set the
    /// `add` bits. Additions win when a bit appears in both masks.
    #[must_use]
    pub fn apply(self, add: EventIdFlags, remove: EventIdFlags) -> EventIdFlags {
        EventIdFlags((self.0 & !remove.0) | add.0)
    }

    /// Whether a sub-event ID passes this filter. IDs outside the mask width
    /// are never delivered.
    pub fn accepts(self, event_id: u32) -> bool {
        match 1u32.checked_shl(event_id) {
            Some(bit) => self.0 & bit != 0,
            None => false,
        }
    }
}

/// Event record delivered by the engine to registered handlers.
///
/// Layout matches the engine's C event struct. The sender, recipient,
/// payload and context pointers are owned by the engine for the duration of
/// the handler call; the bridge neither allocates nor frees them.
#[repr(C)]
#[derive(Debug)]
pub struct EngineEvent {
    pub event_type: EventType,
    pub id: u32,
    pub sender: *mut c_void,
    pub recipient: *mut c_void,
    pub payload: *mut c_void,
    pub context: *mut c_void,
}

impl EngineEvent {
    /// Build an event with no sender, recipient, payload or context.
    pub fn new(event_type: EventType, id: u32) -> Self {
        Self {
            event_type,
            id,
            sender: std::ptr::null_mut(),
            recipient: std::ptr::null_mut(),
            payload: std::ptr::null_mut(),
            context: std::ptr::null_mut(),
        }
    }

    /// Whether this event carries the given type and sub-ID.
    pub fn matches(&self, event_type: EventType, id: u32) -> bool {
        self.event_type == event_type && self.id == id
    }
}

/// Handler invoked by the engine for each delivered event.
pub type EventHandlerFn = extern "C" fn(event: *const EngineEvent) -> Status;
