//! Brieflink notification dispatch.
//!
//! - [`NotificationEvent`] -- the closed set of things worth telling the
//!   other side about.
//! - [`plan`] -- pure routing and rendering of an event into deliveries.
//! - [`NotificationDispatcher`] -- detached, time-bounded execution of those
//!   deliveries that never reports failure back to the caller.
//! - [`delivery`] -- outbound channels (SMTP email).

pub mod delivery;
pub mod dispatcher;
pub mod event;
pub mod plan;

pub use delivery::email::{EmailConfig, EmailError, EmailMessage, Mailer, SmtpMailer};
pub use dispatcher::{DispatcherConfig, NotificationDispatcher};
pub use event::{NotificationEvent, ProjectRef, Recipient};
pub use plan::{plan_deliveries, Delivery};
