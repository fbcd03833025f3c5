//! Alerts and confirmation prompts.

mod alert;
mod traits;

pub use alert::{Alert, AlertCenter, PendingConfirm, DEFAULT_ALERT_DELAY};
pub use traits::{AlertLevel, ConfirmRequest, Confirmation, Notifier};
