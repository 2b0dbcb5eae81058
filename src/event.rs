use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Modifier state reported by the capture backend, one flag per physical key.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const LCTRL  = 0b0000_0001;
        const RCTRL  = 0b0000_0010;
        const LALT   = 0b0000_0100;
        const RALT   = 0b0000_1000;
        const LSHIFT = 0b0001_0000;
        const RSHIFT = 0b0010_0000;
        const LWIN   = 0b0100_0000;
        const RWIN   = 0b1000_0000;
    }
}

const MODIFIER_PAIRS: [(Modifiers, Modifiers, char); 4] = [
    (Modifiers::LCTRL, Modifiers::RCTRL, '^'),
    (Modifiers::LALT, Modifiers::RALT, '!'),
    (Modifiers::LSHIFT, Modifiers::RSHIFT, '+'),
    (Modifiers::LWIN, Modifiers::RWIN, '#'),
];

impl Modifiers {
    /// Renders the modifier state in key-pattern prefix form.
    ///
    /// A modifier held on one side only gets a `<` or `>` marker. Holding both
    /// sides of the same modifier yields the unsided symbol.
    pub fn to_prefix(self) -> String {
        let mut prefix = String::new();
        for (left, right, symbol) in MODIFIER_PAIRS {
            match (self.contains(left), self.contains(right)) {
                (true, true) => prefix.push(symbol),
                (true, false) => {
                    prefix.push('<');
                    prefix.push(symbol);
                }
                (false, true) => {
                    prefix.push('>');
                    prefix.push(symbol);
                }
                (false, false) => {}
            }
        }
        prefix
    }
}

/// One key or mouse button press as delivered by an [`InputCapture`](crate::InputCapture).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputToken {
    key: String,
    modifiers: Modifiers,
}

impl InputToken {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }

    /// A token whose text is already in pattern-prefix form, e.g. `<^a`.
    pub fn raw(input: impl Into<String>) -> Self {
        Self::new(input, Modifiers::empty())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// The string resolved against chord keys.
    pub fn to_input_string(&self) -> String {
        format!("{}{}", self.modifiers.to_prefix(), self.key)
    }
}

impl fmt::Display for InputToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_input_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_single_side() {
        assert_eq!(Modifiers::LCTRL.to_prefix(), "<^");
        assert_eq!(Modifiers::RALT.to_prefix(), ">!");
        assert_eq!((Modifiers::LSHIFT | Modifiers::RWIN).to_prefix(), "<+>#");
    }

    #[test]
    fn test_prefix_both_sides_is_unsided() {
        assert_eq!((Modifiers::LCTRL | Modifiers::RCTRL).to_prefix(), "^");
        assert_eq!((Modifiers::LCTRL | Modifiers::RCTRL | Modifiers::LALT).to_prefix(), "^<!");
    }

    #[test]
    fn test_input_string() {
        let token = InputToken::new("F5", Modifiers::LCTRL | Modifiers::LSHIFT);
        assert_eq!(token.to_input_string(), "<^<+F5");
        assert_eq!(InputToken::raw(">!x").to_input_string(), ">!x");
        assert_eq!(InputToken::raw("").to_input_string(), "");
    }
}
