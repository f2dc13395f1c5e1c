//! Keyboard page navigation for bubbletea-rs applications.

use bubbletea_rs::{KeyMsg, Msg};
use crossterm::event::KeyCode;

use super::model::ListController;
use super::types::Entity;
use crate::key::Binding;

/// Key bindings for page and lot navigation.
///
/// # Examples
///
/// ```rust
/// use list_controller::{ListController, PagerKeyMap};
/// use list_controller::key::Binding;
/// use crossterm::event::KeyCode;
///
/// let keymap = PagerKeyMap {
///     next_page: Binding::new(vec![KeyCode::Char('n')]).with_help("n"),
///     ..PagerKeyMap::default()
/// };
/// let list: ListController<serde_json::Value> =
///     ListController::canonical().with_keymap(keymap);
/// assert_eq!(list.keymap().next_page.help, "n");
/// ```
#[derive(Debug, Clone)]
pub struct PagerKeyMap {
    /// Previous page. Default keys: Left Arrow, 'h', PageUp
    pub prev_page: Binding,
    /// Next page. Default keys: Right Arrow, 'l', PageDown
    pub next_page: Binding,
    /// Previous lot of pages. Default keys: '[', Home
    pub prev_lot: Binding,
    /// Next lot of pages. Default keys: ']', End
    pub next_lot: Binding,
}

impl Default for PagerKeyMap {
    fn default() -> Self {
        Self {
            prev_page: Binding::new(vec![KeyCode::Left, KeyCode::Char('h'), KeyCode::PageUp])
                .with_help("←/h")
                .with_description("prev page"),
            next_page: Binding::new(vec![KeyCode::Right, KeyCode::Char('l'), KeyCode::PageDown])
                .with_help("→/l")
                .with_description("next page"),
            prev_lot: Binding::new(vec![KeyCode::Char('['), KeyCode::Home])
                .with_help("[")
                .with_description("prev pages"),
            next_lot: Binding::new(vec![KeyCode::Char(']'), KeyCode::End])
                .with_help("]")
                .with_description("next pages"),
        }
    }
}

impl PagerKeyMap {
    /// All bindings, in help order.
    pub fn bindings(&self) -> Vec<&Binding> {
        vec![&self.prev_page, &self.next_page, &self.prev_lot, &self.next_lot]
    }
}

impl<M: Entity> ListController<M> {
    /// The active key bindings.
    pub fn keymap(&self) -> &PagerKeyMap {
        &self.keymap
    }

    /// Mutable access to the key bindings.
    pub fn keymap_mut(&mut self) -> &mut PagerKeyMap {
        &mut self.keymap
    }

    /// Handles a bubbletea-rs message, navigating on matching key presses.
    ///
    /// Returns true if the message was a key press bound to a navigation action.
    /// Forward messages here from your application's `update()`.
    pub fn update(&mut self, msg: &Msg) -> bool {
        let Some(key_msg) = msg.downcast_ref::<KeyMsg>() else {
            return false;
        };

        if self.keymap.next_page.matches(key_msg) {
            self.next();
        } else if self.keymap.prev_page.matches(key_msg) {
            self.previous();
        } else if self.keymap.next_lot.matches(key_msg) {
            self.next_pages();
        } else if self.keymap.prev_lot.matches(key_msg) {
            self.previous_pages();
        } else {
            return false;
        }
        true
    }
}
