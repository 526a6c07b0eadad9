//! MIME parsing and plain-text body selection.
//!
//! The relay forwards only a plain-text rendition of the original message:
//! for multipart messages the first `text/plain` part in document order
//! wins, and a message without one forwards with an empty body.

use mail_parser::{Address, Message, MessageParser, MessagePart, MessagePartId, MimeHeaders, PartType};

use crate::error::MessageError;

/// Header defaults used when the original message omits them.
pub const DEFAULT_SUBJECT: &str = "No Subject";
pub const DEFAULT_FROM: &str = "Unknown Sender";
pub const DEFAULT_TO: &str = "Unknown Recipient";

/// The headers carried into the forwarding envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardHeaders {
    pub subject: String,
    pub from: String,
    pub to: String,
}

/// Parse raw message bytes.
pub fn parse(raw: &[u8]) -> Result<Message<'_>, MessageError> {
    MessageParser::default()
        .parse(raw)
        .ok_or(MessageError::Parse)
}

/// Extract Subject/From/To, substituting defaults for absent headers.
pub fn extract_headers(msg: &Message<'_>) -> ForwardHeaders {
    ForwardHeaders {
        subject: msg.subject().unwrap_or(DEFAULT_SUBJECT).to_string(),
        from: format_address(msg.from()).unwrap_or_else(|| DEFAULT_FROM.to_string()),
        to: format_address(msg.to()).unwrap_or_else(|| DEFAULT_TO.to_string()),
    }
}

/// Select the representative plain-text body.
///
/// Multipart: depth-first walk in document order, first `text/plain` part
/// wins; none found yields the empty string, not an error. Non-multipart:
/// the single payload decoded as UTF-8, where a decode failure is an error.
pub fn select_body(msg: &Message<'_>) -> Result<String, MessageError> {
    let root = msg.root_part();
    match &root.body {
        PartType::Multipart(children) => Ok(walk_for_plain_text(msg, children).unwrap_or_default()),
        _ => decode_single_part(root),
    }
}

fn format_address(addr: Option<&Address<'_>>) -> Option<String> {
    let first = addr?.first()?;
    match (first.name(), first.address()) {
        (Some(name), Some(email)) => Some(format!("{name} <{email}>")),
        (None, Some(email)) => Some(email.to_string()),
        (Some(name), None) => Some(name.to_string()),
        (None, None) => None,
    }
}

/// Depth-first search over a multipart tree for the first `text/plain` part.
fn walk_for_plain_text(msg: &Message<'_>, part_ids: &[MessagePartId]) -> Option<String> {
    for &id in part_ids {
        let Some(part) = msg.part(id) else { continue };
        match &part.body {
            PartType::Multipart(children) => {
                if let Some(text) = walk_for_plain_text(msg, children) {
                    return Some(text);
                }
            }
            PartType::Message(nested) => {
                if let Some(text) = first_plain_text_in_message(nested) {
                    return Some(text);
                }
            }
            PartType::Text(text) if is_plain_text(part) => return Some(text.to_string()),
            _ => {}
        }
    }
    None
}

/// Descend into an embedded message (message/rfc822) looking for a
/// `text/plain` part.
fn first_plain_text_in_message(msg: &Message<'_>) -> Option<String> {
    let root = msg.root_part();
    match &root.body {
        PartType::Multipart(children) => walk_for_plain_text(msg, children),
        PartType::Message(nested) => first_plain_text_in_message(nested),
        PartType::Text(text) if is_plain_text(root) => Some(text.to_string()),
        _ => None,
    }
}

/// A part with no explicit content type counts as `text/plain`.
fn is_plain_text(part: &MessagePart<'_>) -> bool {
    match part.content_type() {
        Some(ct) => {
            ct.ctype().eq_ignore_ascii_case("text")
                && ct.subtype().is_some_and(|s| s.eq_ignore_ascii_case("plain"))
        }
        None => true,
    }
}

/// Decode a non-multipart payload as UTF-8 text, whatever its content type.
fn decode_single_part(part: &MessagePart<'_>) -> Result<String, MessageError> {
    match &part.body {
        PartType::Text(text) | PartType::Html(text) => {
            if part.is_encoding_problem {
                return Err(MessageError::BodyDecode(
                    "text payload contains invalid byte sequences".to_string(),
                ));
            }
            Ok(text.to_string())
        }
        PartType::Binary(bytes) | PartType::InlineBinary(bytes) => std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|e| MessageError::BodyDecode(e.to_string())),
        PartType::Message(_) | PartType::Multipart(_) => std::str::from_utf8(part.contents())
            .map(str::to_string)
            .map_err(|e| MessageError::BodyDecode(e.to_string())),
    }
}
