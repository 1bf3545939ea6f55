pub use self::{card::*, location::*, pile::*};

mod card;
mod location;
mod pile;
