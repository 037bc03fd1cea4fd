//! Terminal rendering for the dashboard report
//!
//! Plain text for people, JSON for scripts. Both are thin views over
//! [`DashboardReport`](crate::dashboard::DashboardReport).

pub mod report;
pub mod widgets;

pub use report::{json_report, render_text, JsonReport};
