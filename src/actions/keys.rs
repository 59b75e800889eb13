//! Keyboard keys accepted by `press_key`.
//!
//! Each logical key is one [`Key`] variant carrying a WebDriver code point.
//! Several keys are also reachable under alternative names (`BACK_SPACE`,
//! `ARROW_LEFT`, `COMMAND`, ...). Aliases are resolved once in
//! [`Key::from_name`]; nothing downstream sees them.

macro_rules! keys {
    (
        canonical { $($variant:ident = $name:literal => $code:literal,)* }
        aliases { $($alias:literal => $target:ident,)* }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Key {
            $($variant,)*
        }

        impl Key {
            /// Every accepted name: canonical names first, then aliases.
            pub const NAMES: &'static [&'static str] = &[$($name,)* $($alias,)*];

            /// Resolve a canonical name or alias.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Self::$variant),)*
                    $($alias => Some(Self::$target),)*
                    _ => None,
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Code point sent through WebDriver `sendKeys`.
            pub fn code(self) -> char {
                match self {
                    $(Self::$variant => $code,)*
                }
            }
        }
    };
}

keys! {
    canonical {
        Null = "NULL" => '\u{E000}',
        Cancel = "CANCEL" => '\u{E001}',
        Help = "HELP" => '\u{E002}',
        Backspace = "BACKSPACE" => '\u{E003}',
        Tab = "TAB" => '\u{E004}',
        Clear = "CLEAR" => '\u{E005}',
        Return = "RETURN" => '\u{E006}',
        Enter = "ENTER" => '\u{E007}',
        Shift = "SHIFT" => '\u{E008}',
        RightShift = "RIGHT_SHIFT" => '\u{E050}',
        Control = "CONTROL" => '\u{E009}',
        RightControl = "RIGHT_CONTROL" => '\u{E051}',
        Alt = "ALT" => '\u{E00A}',
        RightAlt = "RIGHT_ALT" => '\u{E052}',
        Pause = "PAUSE" => '\u{E00B}',
        Escape = "ESCAPE" => '\u{E00C}',
        Space = "SPACE" => '\u{E00D}',
        PageUp = "PAGE_UP" => '\u{E00E}',
        PageDown = "PAGE_DOWN" => '\u{E00F}',
        End = "END" => '\u{E010}',
        Home = "HOME" => '\u{E011}',
        Left = "LEFT" => '\u{E012}',
        Up = "UP" => '\u{E013}',
        Right = "RIGHT" => '\u{E014}',
        Down = "DOWN" => '\u{E015}',
        Insert = "INSERT" => '\u{E016}',
        Delete = "DELETE" => '\u{E017}',
        Semicolon = "SEMICOLON" => '\u{E018}',
        Equals = "EQUALS" => '\u{E019}',
        Numpad0 = "NUMPAD0" => '\u{E01A}',
        Numpad1 = "NUMPAD1" => '\u{E01B}',
        Numpad2 = "NUMPAD2" => '\u{E01C}',
        Numpad3 = "NUMPAD3" => '\u{E01D}',
        Numpad4 = "NUMPAD4" => '\u{E01E}',
        Numpad5 = "NUMPAD5" => '\u{E01F}',
        Numpad6 = "NUMPAD6" => '\u{E020}',
        Numpad7 = "NUMPAD7" => '\u{E021}',
        Numpad8 = "NUMPAD8" => '\u{E022}',
        Numpad9 = "NUMPAD9" => '\u{E023}',
        Multiply = "MULTIPLY" => '\u{E024}',
        Add = "ADD" => '\u{E025}',
        Separator = "SEPARATOR" => '\u{E026}',
        Subtract = "SUBTRACT" => '\u{E027}',
        Decimal = "DECIMAL" => '\u{E028}',
        Divide = "DIVIDE" => '\u{E029}',
        F1 = "F1" => '\u{E031}',
        F2 = "F2" => '\u{E032}',
        F3 = "F3" => '\u{E033}',
        F4 = "F4" => '\u{E034}',
        F5 = "F5" => '\u{E035}',
        F6 = "F6" => '\u{E036}',
        F7 = "F7" => '\u{E037}',
        F8 = "F8" => '\u{E038}',
        F9 = "F9" => '\u{E039}',
        F10 = "F10" => '\u{E03A}',
        F11 = "F11" => '\u{E03B}',
        F12 = "F12" => '\u{E03C}',
        Meta = "META" => '\u{E03D}',
        RightMeta = "RIGHT_META" => '\u{E053}',
        ZenkakuHankaku = "ZENKAKU_HANKAKU" => '\u{E040}',
    }
    aliases {
        "BACK_SPACE" => Backspace,
        "LEFT_SHIFT" => Shift,
        "LEFT_CONTROL" => Control,
        "LEFT_ALT" => Alt,
        "ARROW_LEFT" => Left,
        "ARROW_UP" => Up,
        "ARROW_RIGHT" => Right,
        "ARROW_DOWN" => Down,
        "LEFT_META" => Meta,
        "COMMAND" => Meta,
        "LEFT_COMMAND" => Meta,
        "LEFT_OPTION" => Alt,
        "RIGHT_OPTION" => RightAlt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_advertised_name_resolves() {
        for name in Key::NAMES {
            assert!(Key::from_name(name).is_some(), "{name} does not resolve");
        }
    }

    #[test]
    fn names_are_distinct() {
        let unique: HashSet<_> = Key::NAMES.iter().collect();
        assert_eq!(unique.len(), Key::NAMES.len());
    }

    #[test]
    fn aliases_resolve_to_their_canonical_key() {
        assert_eq!(Key::from_name("BACK_SPACE"), Some(Key::Backspace));
        assert_eq!(Key::from_name("ARROW_LEFT"), Some(Key::Left));
        assert_eq!(Key::from_name("COMMAND"), Some(Key::Meta));
        assert_eq!(Key::from_name("LEFT_COMMAND"), Some(Key::Meta));
        assert_eq!(Key::from_name("RIGHT_OPTION"), Some(Key::RightAlt));
        assert_eq!(Key::from_name("LEFT_OPTION").map(Key::code), Some('\u{E00A}'));
    }

    #[test]
    fn canonical_names_round_trip() {
        let enter = Key::from_name("ENTER").unwrap();
        assert_eq!(enter.name(), "ENTER");
        assert_eq!(enter.code(), '\u{E007}');
        assert_eq!(Key::from_name("LEFT_SHIFT").unwrap().name(), "SHIFT");
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(Key::from_name("enter"), None);
        assert_eq!(Key::from_name("HYPER"), None);
    }
}
