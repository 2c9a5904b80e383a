/// Keys a table reacts to while it has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Home,
    End,
    Enter,
    Escape,
    Space,
    Char(char),
}

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { ctrl: false, shift: false, alt: false };
    pub const CTRL: Modifiers = Modifiers { ctrl: true, shift: false, alt: false };
    pub const SHIFT: Modifiers = Modifiers { ctrl: false, shift: true, alt: false };
}

/// Input delivered to a table by the host, in the table's client space.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    /// Primary button pressed and released at `(x, y)`.
    Click { x: i32, y: i32, modifiers: Modifiers },
    DoubleClick { x: i32, y: i32 },
    KeyPress { key: Key, modifiers: Modifiers },
    /// Mouse wheel, in rows. Positive scrolls down.
    ScrollWheel { delta: i32 },
    /// The overlay edit control lost keyboard focus.
    EditorFocusLost,
    /// The user dragged a header divider.
    ColumnResized { column: usize, width: i32 },
}

/// Result returned by [`Ui::table_event`](crate::Ui::table_event).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was handled; the host should not process it further.
    Consumed,
    /// Event was not handled; let the host apply its default behaviour.
    Ignored,
}

impl EventResult {
    #[inline]
    pub fn is_consumed(self) -> bool {
        self == EventResult::Consumed
    }
}
