pub mod classify;
pub mod email;
pub mod logarte;
pub mod markdown;
pub mod models;

// Re-export key types for easier usage
pub use classify::{PayloadFormat, classify};
pub use email::{MailError, Mailer, compose};
pub use logarte::{LogEntry, ParsedLog};
pub use models::{ExtraFields, RenderedEmail, RequestContext, Scalar};
