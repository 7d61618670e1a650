pub mod animation;
pub mod counter;
pub mod input;
pub mod time;
