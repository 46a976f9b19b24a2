//! # Keymap
//!
//! Immutable table from paint commands to the input that triggers them, and a
//! pure lookup over it. Hosts translate their own events into [`InputEvent`].
//!
//! A trigger only checks the modifiers it names: a binding without a `ctrl`
//! requirement matches whether or not ctrl is held. Keys bound to several
//! commands therefore pin the modifier that tells them apart.

use crate::stroke::StrokePoint;

/// Physical inputs the paint tools respond to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Left mouse button
    LeftMouse,
    /// Right mouse button
    RightMouse,
    /// Pointer motion without a button change
    MouseMove,
    /// Escape
    Esc,
    /// Return
    Return,
    /// Keypad enter
    NumpadEnter,
    /// Space bar
    Space,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// X
    X,
    /// Y
    Y,
    /// Z
    Z,
    /// C
    C,
    /// 1
    One,
    /// 2
    Two,
    /// 3
    Three,
    /// 4
    Four,
    /// G
    G,
    /// F
    F,
    /// R
    R,
    /// T
    T,
    /// Anything else
    Other,
}

/// Key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyValue {
    /// Key went down
    Press,
    /// Key went up
    Release,
    /// No transition (pointer motion)
    Nothing,
}

/// One host input event
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent {
    /// Input that changed
    pub key: Key,
    /// Transition
    pub value: KeyValue,
    /// Shift held
    pub shift: bool,
    /// Ctrl held
    pub ctrl: bool,
    /// Alt held
    pub alt: bool,
    /// Horizontal pointer position, used for drags
    pub mouse_x: f32,
    /// Surface sample under the pointer, if the host's ray hit anything
    pub hit: Option<StrokePoint>,
}

impl InputEvent {
    /// Unmodified event with no surface sample
    pub fn new(key: Key, value: KeyValue) -> Self {
        Self { key, value, shift: false, ctrl: false, alt: false, mouse_x: 0.0, hit: None }
    }

    /// Key press
    pub fn press(key: Key) -> Self {
        Self::new(key, KeyValue::Press)
    }

    /// Key release
    pub fn release(key: Key) -> Self {
        Self::new(key, KeyValue::Release)
    }

    /// Pointer motion to `mouse_x`
    pub fn mouse_move(mouse_x: f32) -> Self {
        Self { mouse_x, ..Self::new(Key::MouseMove, KeyValue::Nothing) }
    }

    /// Set the shift modifier
    pub fn with_shift(mut self, held: bool) -> Self {
        self.shift = held;
        self
    }

    /// Set the ctrl modifier
    pub fn with_ctrl(mut self, held: bool) -> Self {
        self.ctrl = held;
        self
    }

    /// Set the pointer position
    pub fn with_mouse_x(mut self, mouse_x: f32) -> Self {
        self.mouse_x = mouse_x;
        self
    }

    /// Attach the surface sample under the pointer
    pub fn with_hit(mut self, hit: StrokePoint) -> Self {
        self.hit = Some(hit);
        self
    }
}

/// Named actions of the paint tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaintCommand {
    /// Paint while held
    Paint,
    /// Erase while held
    Erase,
    /// Shrink the eraser
    EraserDecrease,
    /// Grow the eraser
    EraserIncrease,
    /// Start a new stroke
    EndStroke,
    /// Abort and roll back
    Cancel,
    /// Commit
    Finish,
    /// Toggle world X axis
    AxisX,
    /// Toggle world Y axis
    AxisY,
    /// Toggle world Z axis
    AxisZ,
    /// Toggle reflect axis
    AxisReflect,
    /// Toggle camera ray visibility
    VisibilityToggleCamera,
    /// Toggle diffuse ray visibility
    VisibilityToggleDiffuse,
    /// Toggle specular ray visibility
    VisibilityToggleSpecular,
    /// Toggle volume ray visibility
    VisibilityToggleVolume,
    /// Drag the offset
    OffsetMode,
    /// Drag the size attribute
    SizeMode,
    /// Drag the power attribute
    PowerMode,
    /// Toggle distance relative power
    RelativePowerToggle,
    /// Toggle hull flattening
    FlattenToggle,
    /// Cycle the light type
    TypeToggle,
}

/// Input pattern for a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    /// Any of these keys
    pub keys: &'static [Key],
    /// Required transition, any when `None`
    pub value: Option<KeyValue>,
    /// Required shift state, any when `None`
    pub shift: Option<bool>,
    /// Required ctrl state, any when `None`
    pub ctrl: Option<bool>,
    /// Required alt state, any when `None`
    pub alt: Option<bool>,
}

impl Trigger {
    const fn on(keys: &'static [Key]) -> Self {
        Self { keys, value: None, shift: None, ctrl: None, alt: None }
    }

    const fn pressed(keys: &'static [Key]) -> Self {
        Self { value: Some(KeyValue::Press), ..Self::on(keys) }
    }

    const fn shift(mut self, held: bool) -> Self {
        self.shift = Some(held);
        self
    }

    const fn ctrl(mut self, held: bool) -> Self {
        self.ctrl = Some(held);
        self
    }

    /// True when `event` satisfies every requirement of this trigger
    pub fn matches(&self, event: &InputEvent) -> bool {
        fn required(requirement: Option<bool>, actual: bool) -> bool {
            requirement.map_or(true, |r| r == actual)
        }

        self.keys.contains(&event.key)
            && self.value.map_or(true, |v| v == event.value)
            && required(self.shift, event.shift)
            && required(self.ctrl, event.ctrl)
            && required(self.alt, event.alt)
    }
}

/// Every binding, in lookup priority order
pub static KEYMAP: &[(PaintCommand, Trigger)] = &[
    (PaintCommand::Paint, Trigger::on(&[Key::LeftMouse]).ctrl(false)),
    (PaintCommand::Erase, Trigger::on(&[Key::LeftMouse]).ctrl(true)),
    (PaintCommand::EraserDecrease, Trigger::on(&[Key::LeftBracket])),
    (PaintCommand::EraserIncrease, Trigger::on(&[Key::RightBracket])),
    (PaintCommand::EndStroke, Trigger::pressed(&[Key::RightMouse])),
    (PaintCommand::Cancel, Trigger::pressed(&[Key::Esc])),
    (PaintCommand::Finish, Trigger::pressed(&[Key::Return, Key::NumpadEnter, Key::Space])),
    (PaintCommand::AxisX, Trigger::pressed(&[Key::X])),
    (PaintCommand::AxisY, Trigger::pressed(&[Key::Y])),
    (PaintCommand::AxisZ, Trigger::pressed(&[Key::Z])),
    (PaintCommand::AxisReflect, Trigger::pressed(&[Key::C])),
    (PaintCommand::VisibilityToggleCamera, Trigger::pressed(&[Key::One])),
    (PaintCommand::VisibilityToggleDiffuse, Trigger::pressed(&[Key::Two])),
    (PaintCommand::VisibilityToggleSpecular, Trigger::pressed(&[Key::Three])),
    (PaintCommand::VisibilityToggleVolume, Trigger::pressed(&[Key::Four])),
    (PaintCommand::OffsetMode, Trigger::pressed(&[Key::G])),
    (PaintCommand::SizeMode, Trigger::pressed(&[Key::F]).shift(false)),
    (PaintCommand::PowerMode, Trigger::on(&[Key::F]).shift(true)),
    (PaintCommand::RelativePowerToggle, Trigger::pressed(&[Key::R])),
    (PaintCommand::FlattenToggle, Trigger::pressed(&[Key::F])),
    (PaintCommand::TypeToggle, Trigger::pressed(&[Key::T])),
];

/// First command bound to `event`
pub fn match_command(event: &InputEvent) -> Option<PaintCommand> {
    matching_commands(event).next()
}

/// Every command bound to `event`, in table order
pub fn matching_commands(event: &InputEvent) -> impl Iterator<Item = PaintCommand> + '_ {
    KEYMAP
        .iter()
        .filter(move |(_, trigger)| trigger.matches(event))
        .map(|(command, _)| *command)
}

/// Whether `event` triggers `command`
pub fn is_event_command(event: &InputEvent, command: PaintCommand) -> bool {
    KEYMAP
        .iter()
        .any(|(bound, trigger)| *bound == command && trigger.matches(event))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_and_erase_split_on_ctrl() {
        let click = InputEvent::press(Key::LeftMouse);
        assert_eq!(match_command(&click), Some(PaintCommand::Paint));
        assert_eq!(match_command(&click.clone().with_ctrl(true)), Some(PaintCommand::Erase));
        // Releases match too, so painting can stop
        assert_eq!(match_command(&InputEvent::release(Key::LeftMouse)), Some(PaintCommand::Paint));
    }

    #[test]
    fn test_press_only_bindings() {
        assert_eq!(match_command(&InputEvent::press(Key::Esc)), Some(PaintCommand::Cancel));
        assert_eq!(match_command(&InputEvent::release(Key::Esc)), None);
        for key in [Key::Return, Key::NumpadEnter, Key::Space] {
            assert_eq!(match_command(&InputEvent::press(key)), Some(PaintCommand::Finish));
        }
    }

    #[test]
    fn test_f_key_bindings() {
        let f = InputEvent::press(Key::F);
        let commands: Vec<_> = matching_commands(&f).collect();
        assert_eq!(commands, vec![PaintCommand::SizeMode, PaintCommand::FlattenToggle]);

        let shift_f = f.with_shift(true);
        assert_eq!(match_command(&shift_f), Some(PaintCommand::PowerMode));
        assert!(is_event_command(&shift_f, PaintCommand::FlattenToggle));
        assert!(!is_event_command(&shift_f, PaintCommand::SizeMode));
    }

    #[test]
    fn test_mouse_motion_matches_nothing() {
        assert_eq!(match_command(&InputEvent::mouse_move(10.0)), None);
    }
}
