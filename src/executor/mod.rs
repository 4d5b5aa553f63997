//! Simulated mouse and keyboard input.

pub mod input;

pub use input::{click_at, move_and_click, EnigoInput, InputDriver};
