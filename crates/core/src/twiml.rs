//! Minimal TwiML rendering for webhook replies.

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Escape the five XML special characters.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// A `<Response>` containing a single `<Message>` reply.
pub fn message_response(body: &str) -> String {
    format!(
        "{XML_HEADER}<Response><Message>{}</Message></Response>",
        escape_xml(body)
    )
}
