pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("move is not legal in the current position")]
pub struct InvalidMoveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("hand and waste are both empty, nothing to draw")]
pub struct NoCardsToDrawError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DrawError {
    #[display("drawing is not allowed in the current position")]
    InvalidDraw(InvalidMoveError),
    #[display("{_0}")]
    NoCardsToDraw(NoCardsToDrawError),
}
