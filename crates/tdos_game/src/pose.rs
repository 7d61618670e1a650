//! Discrete entity states. These key the animation tables.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Stopped,
    Walking,
    Jumping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerState {
    pub facing: Facing,
    pub motion: Motion,
}

impl PlayerState {
    pub const fn new(facing: Facing, motion: Motion) -> Self {
        Self { facing, motion }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(Facing::Right, Motion::Stopped)
    }
}
