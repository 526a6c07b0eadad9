//! Forwarding envelope construction.

use crate::config::RelayConfig;
use crate::message::ForwardHeaders;

/// Prefix applied to every forwarded subject.
pub const SUBJECT_PREFIX: &str = "[FORWARDED] ";

/// The composed outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Wrap the original headers and selected body in the forwarding format.
pub fn build(headers: &ForwardHeaders, body: &str, config: &RelayConfig) -> Envelope {
    Envelope {
        from: config.from_address.clone(),
        to: config.forward_to.clone(),
        subject: format!("{SUBJECT_PREFIX}{}", headers.subject),
        body: format!(
            "--- Forwarded Message ---\n\
             From: {from}\n\
             To: {to}\n\
             Subject: {subject}\n\
             \n\
             {body}\n\
             \n\
             ---\n\
             This email was automatically forwarded from MacroScope email system.\n",
            from = headers.from,
            to = headers.to,
            subject = headers.subject,
        ),
    }
}
