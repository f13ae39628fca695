//! Entry-session logic independent of any terminal or network layer.

pub mod balance;
pub mod clock;
pub mod diagnostics;
pub mod grid;
pub mod navigation;
pub mod submission;

pub use balance::{compute_totals, Totals};
pub use clock::{Clock, FixedClock, SystemClock};
pub use diagnostics::{diagnostics, IssueKind, LineIssue};
pub use grid::{GridResult, GridSession};
pub use navigation::{transition, Focus, GridKey, GridKeyCode, NavAction, Transition};
pub use submission::{
    check_preconditions, group_transactions, submit_session, SessionContext, SubmissionResult,
};
