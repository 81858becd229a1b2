pub mod events;
pub mod phase;
pub mod pulse;
pub mod sequencer;
