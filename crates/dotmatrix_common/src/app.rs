use crate::key::Key;

/// A machine that a frontend can drive one video frame at a time.
pub trait App {
    fn init(&mut self);
    /// Run one frame and write it into `screen` as packed RGB24.
    fn update(&mut self, screen: &mut [u8]);
    fn handle_key_event(&mut self, key: Key, is_down: bool);
    fn should_exit(&self) -> bool;
    fn exit(&mut self);

    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn scale(&self) -> u32;
    fn title(&self) -> String;
}
