//! Symbolic key and button codes plus the translation from winit.
//!
//! The translation is total: every native code the backend can hand us maps
//! to some [`KeyCode`]. Codes without a symbolic counterpart map to
//! [`KeyCode::Unknown`] and are logged, never silently dropped.

bitflags::bitflags! {
    /// Modifier key state carried on key and button events.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Mods: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const SUPER = 0b1000;
    }
}

impl Mods {
    pub(crate) fn from_winit(state: winit::keyboard::ModifiersState) -> Self {
        let mut mods = Mods::empty();
        if state.shift_key() {
            mods |= Mods::SHIFT;
        }
        if state.control_key() {
            mods |= Mods::CTRL;
        }
        if state.alt_key() {
            mods |= Mods::ALT;
        }
        if state.super_key() {
            mods |= Mods::SUPER;
        }
        mods
    }
}

/// Backend-independent mouse button code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

impl MouseButton {
    pub(crate) fn from_winit(button: winit::event::MouseButton) -> Self {
        use winit::event::MouseButton as Wb;
        match button {
            Wb::Left => Self::Left,
            Wb::Right => Self::Right,
            Wb::Middle => Self::Middle,
            Wb::Back => Self::Back,
            Wb::Forward => Self::Forward,
            Wb::Other(code) => Self::Other(code),
        }
    }
}

/// Backend-independent symbolic key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    // Top-row digits
    Key0, Key1, Key2, Key3, Key4, Key5, Key6, Key7, Key8, Key9,
    // Function keys
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    // Navigation
    Up, Down, Left, Right,
    Home, End, PageUp, PageDown,
    // Editing
    Escape, Tab, Backspace, Enter, Space, Insert, Delete,
    CapsLock, NumLock, ScrollLock, PrintScreen, Pause, Menu,
    // Punctuation
    Minus, Equal, LeftBracket, RightBracket, Backslash,
    Semicolon, Apostrophe, Grave, Comma, Period, Slash,
    // Modifiers
    LeftShift, RightShift, LeftCtrl, RightCtrl,
    LeftAlt, RightAlt, LeftSuper, RightSuper,
    // Numpad
    Numpad0, Numpad1, Numpad2, Numpad3, Numpad4,
    Numpad5, Numpad6, Numpad7, Numpad8, Numpad9,
    NumpadAdd, NumpadSubtract, NumpadMultiply, NumpadDivide,
    NumpadDecimal, NumpadEnter,
    /// Sentinel for native codes with no symbolic counterpart.
    Unknown,
}

/// Translate a native physical key to its symbolic code.
pub(crate) fn translate_key(key: winit::keyboard::PhysicalKey) -> KeyCode {
    use winit::keyboard::KeyCode as Wk;
    use winit::keyboard::PhysicalKey;

    let code = match key {
        PhysicalKey::Code(code) => code,
        PhysicalKey::Unidentified(native) => {
            tracing::warn!(?native, "unidentified native key code");
            return KeyCode::Unknown;
        }
    };

    match code {
        Wk::KeyA => KeyCode::A,
        Wk::KeyB => KeyCode::B,
        Wk::KeyC => KeyCode::C,
        Wk::KeyD => KeyCode::D,
        Wk::KeyE => KeyCode::E,
        Wk::KeyF => KeyCode::F,
        Wk::KeyG => KeyCode::G,
        Wk::KeyH => KeyCode::H,
        Wk::KeyI => KeyCode::I,
        Wk::KeyJ => KeyCode::J,
        Wk::KeyK => KeyCode::K,
        Wk::KeyL => KeyCode::L,
        Wk::KeyM => KeyCode::M,
        Wk::KeyN => KeyCode::N,
        Wk::KeyO => KeyCode::O,
        Wk::KeyP => KeyCode::P,
        Wk::KeyQ => KeyCode::Q,
        Wk::KeyR => KeyCode::R,
        Wk::KeyS => KeyCode::S,
        Wk::KeyT => KeyCode::T,
        Wk::KeyU => KeyCode::U,
        Wk::KeyV => KeyCode::V,
        Wk::KeyW => KeyCode::W,
        Wk::KeyX => KeyCode::X,
        Wk::KeyY => KeyCode::Y,
        Wk::KeyZ => KeyCode::Z,
        Wk::Digit0 => KeyCode::Key0,
        Wk::Digit1 => KeyCode::Key1,
        Wk::Digit2 => KeyCode::Key2,
        Wk::Digit3 => KeyCode::Key3,
        Wk::Digit4 => KeyCode::Key4,
        Wk::Digit5 => KeyCode::Key5,
        Wk::Digit6 => KeyCode::Key6,
        Wk::Digit7 => KeyCode::Key7,
        Wk::Digit8 => KeyCode::Key8,
        Wk::Digit9 => KeyCode::Key9,
        Wk::F1 => KeyCode::F1,
        Wk::F2 => KeyCode::F2,
        Wk::F3 => KeyCode::F3,
        Wk::F4 => KeyCode::F4,
        Wk::F5 => KeyCode::F5,
        Wk::F6 => KeyCode::F6,
        Wk::F7 => KeyCode::F7,
        Wk::F8 => KeyCode::F8,
        Wk::F9 => KeyCode::F9,
        Wk::F10 => KeyCode::F10,
        Wk::F11 => KeyCode::F11,
        Wk::F12 => KeyCode::F12,
        Wk::ArrowUp => KeyCode::Up,
        Wk::ArrowDown => KeyCode::Down,
        Wk::ArrowLeft => KeyCode::Left,
        Wk::ArrowRight => KeyCode::Right,
        Wk::Home => KeyCode::Home,
        Wk::End => KeyCode::End,
        Wk::PageUp => KeyCode::PageUp,
        Wk::PageDown => KeyCode::PageDown,
        Wk::Escape => KeyCode::Escape,
        Wk::Tab => KeyCode::Tab,
        Wk::Backspace => KeyCode::Backspace,
        Wk::Enter => KeyCode::Enter,
        Wk::Space => KeyCode::Space,
        Wk::Insert => KeyCode::Insert,
        Wk::Delete => KeyCode::Delete,
        Wk::CapsLock => KeyCode::CapsLock,
        Wk::NumLock => KeyCode::NumLock,
        Wk::ScrollLock => KeyCode::ScrollLock,
        Wk::PrintScreen => KeyCode::PrintScreen,
        Wk::Pause => KeyCode::Pause,
        Wk::ContextMenu => KeyCode::Menu,
        Wk::Minus => KeyCode::Minus,
        Wk::Equal => KeyCode::Equal,
        Wk::BracketLeft => KeyCode::LeftBracket,
        Wk::BracketRight => KeyCode::RightBracket,
        Wk::Backslash => KeyCode::Backslash,
        Wk::Semicolon => KeyCode::Semicolon,
        Wk::Quote => KeyCode::Apostrophe,
        Wk::Backquote => KeyCode::Grave,
        Wk::Comma => KeyCode::Comma,
        Wk::Period => KeyCode::Period,
        Wk::Slash => KeyCode::Slash,
        Wk::ShiftLeft => KeyCode::LeftShift,
        Wk::ShiftRight => KeyCode::RightShift,
        Wk::ControlLeft => KeyCode::LeftCtrl,
        Wk::ControlRight => KeyCode::RightCtrl,
        Wk::AltLeft => KeyCode::LeftAlt,
        Wk::AltRight => KeyCode::RightAlt,
        Wk::SuperLeft => KeyCode::LeftSuper,
        Wk::SuperRight => KeyCode::RightSuper,
        Wk::Numpad0 => KeyCode::Numpad0,
        Wk::Numpad1 => KeyCode::Numpad1,
        Wk::Numpad2 => KeyCode::Numpad2,
        Wk::Numpad3 => KeyCode::Numpad3,
        Wk::Numpad4 => KeyCode::Numpad4,
        Wk::Numpad5 => KeyCode::Numpad5,
        Wk::Numpad6 => KeyCode::Numpad6,
        Wk::Numpad7 => KeyCode::Numpad7,
        Wk::Numpad8 => KeyCode::Numpad8,
        Wk::Numpad9 => KeyCode::Numpad9,
        Wk::NumpadAdd => KeyCode::NumpadAdd,
        Wk::NumpadSubtract => KeyCode::NumpadSubtract,
        Wk::NumpadMultiply => KeyCode::NumpadMultiply,
        Wk::NumpadDivide => KeyCode::NumpadDivide,
        Wk::NumpadDecimal => KeyCode::NumpadDecimal,
        Wk::NumpadEnter => KeyCode::NumpadEnter,
        other => {
            tracing::warn!(code = ?other, "no symbolic mapping for native key code");
            KeyCode::Unknown
        }
    }
}
