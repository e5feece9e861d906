//! Command-line interface.

mod args;
mod commands;
mod plan;

pub use args::{Cli, Commands};
pub use commands::execute;
pub use plan::{DraftPlan, PlanGoal, PlanMilestone, PlanProduct, PlanRatings};
