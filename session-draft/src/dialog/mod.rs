//! The "new session" dialog: draft, picker state and reference data for
//! one open dialog.

mod flow;
mod session;

pub use flow::{
    attendee_candidates, goal_candidates, milestone_candidates, product_candidates,
    strategy_candidates, DialogKind, DialogState, FlowError, OpenDialog, SelectionFlow,
};
pub use session::SessionDialog;
