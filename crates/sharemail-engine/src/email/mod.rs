//! Email composition: the single entry point tying classification, parsing
//! and template assembly together, plus the transport seam.

pub mod assemble;

use crate::classify::{self, PayloadFormat};
use crate::logarte;
use crate::markdown::subject;
use crate::models::{ExtraFields, RenderedEmail, RequestContext};

/// Transport failure reported by a [`Mailer`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport refused message to {to}: {reason}")]
    Transport { to: String, reason: String },
}

/// The email-sending collaborator. The engine composes messages; it never
/// implements transport. Failures are reported to the caller, not handled
/// here.
pub trait Mailer {
    fn send_html(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        ctx: &RequestContext,
    ) -> Result<(), MailError>;

    fn send_plain(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        ctx: &RequestContext,
    ) -> Result<(), MailError>;
}

/// Renders one payload into a subject and a full HTML document.
///
/// Pure function of its inputs: no I/O, no state across calls, safe to
/// invoke concurrently. Total over arbitrary Unicode input.
pub fn compose(text: &str, ctx: &RequestContext, extra_fields: &ExtraFields) -> RenderedEmail {
    match classify::classify(text) {
        PayloadFormat::StructuredLog => {
            let parsed = logarte::parse(text);
            let html = assemble::log_html(&parsed, ctx);
            RenderedEmail {
                subject: parsed.subject,
                html,
            }
        }
        PayloadFormat::Generic => {
            let subject = subject::extract_subject(text);
            let html = assemble::generic_html(text, &subject, ctx, extra_fields);
            RenderedEmail { subject, html }
        }
    }
}

/// Default subject for payloads with no recognizable primary text field.
pub fn fallback_subject(ctx: &RequestContext) -> String {
    format!("Webhook payload {}", ctx.time)
}

/// Plain-text body used when a payload carries no primary text field and
/// nothing can be rendered to HTML: a metadata block followed by the raw
/// body, for [`Mailer::send_plain`].
pub fn plain_fallback(body: &str, content_type: &str, ctx: &RequestContext) -> String {
    format!(
        "Time: {}\nIP: {}\nMethod: POST\nContent-Type: {}\nUser-Agent: {}\n\nBody:\n{}\n",
        ctx.time, ctx.ip, content_type, ctx.user_agent, body
    )
}
