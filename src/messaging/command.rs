// Command types - communication clock/UI -> audio thread

use crate::sequencer::pattern::ClickRole;

#[derive(Debug, Clone, Copy)]
pub enum Command {
    /// Fire the click bound to this role
    Trigger(ClickRole),
    SetVolume(f32),
    Quit,
}
