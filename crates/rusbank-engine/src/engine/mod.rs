pub use self::{game::*, replay::*, rng::*, rules::*, state::*};

mod game;
mod replay;
mod rng;
mod rules;
mod state;
