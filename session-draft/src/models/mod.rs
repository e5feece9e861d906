//! Reference records served by the practice API.

mod budget;
mod client;
mod goal;
mod session;

pub use budget::{BudgetItem, BudgetSettings};
pub use client::{Ally, Client};
pub use goal::{Goal, Strategy, Subgoal};
pub use session::{NoteStatus, SessionRecord, SessionStatus};
