//! Minimal key binding type used by the pager key map.

use bubbletea_rs::KeyMsg;
use crossterm::event::KeyCode;

/// A set of key codes that trigger one action, plus its help text.
///
/// # Examples
///
/// ```rust
/// use list_controller::key::Binding;
/// use crossterm::event::KeyCode;
///
/// let next = Binding::new(vec![KeyCode::Right, KeyCode::Char('l')])
///     .with_help("→/l")
///     .with_description("next page");
/// assert_eq!(next.help, "→/l");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Key codes that activate the binding.
    pub keys: Vec<KeyCode>,
    /// Short key label, e.g. `"→/l"`.
    pub help: String,
    /// What the binding does, e.g. `"next page"`.
    pub description: String,
    /// Disabled bindings never match.
    pub enabled: bool,
}

impl Binding {
    /// Creates an enabled binding for the given key codes.
    pub fn new(keys: Vec<KeyCode>) -> Self {
        Self {
            keys,
            help: String::new(),
            description: String::new(),
            enabled: true,
        }
    }

    /// Sets the short key label.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Sets the action description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Enables or disables the binding.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns true if the key message triggers this binding.
    pub fn matches(&self, key_msg: &KeyMsg) -> bool {
        self.enabled && self.keys.contains(&key_msg.key)
    }
}
