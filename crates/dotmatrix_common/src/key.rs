/// Frontend-agnostic keyboard keys.
///
/// Only the keys the Game Boy frontend binds are listed; anything else maps
/// to `Key::None`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Z,
    X,
    A,
    S,
    Return,
    Backspace,
    Escape,
    None,
}
