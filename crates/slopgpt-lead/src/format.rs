//! Human-readable renderings of a lead for notification channels.

use serde_json::{json, Value};
use slopgpt_core::{or_placeholder, LeadRecord};

/// Slack section text fields are capped at 3000 characters.
const CHATOPS_TEXT_LIMIT: usize = 2900;

/// Email subject line.
pub fn email_subject(lead: &LeadRecord) -> String {
    format!(
        "New Lead: {} - {}",
        lead.name(),
        or_placeholder(&lead.event_type, "Event Inquiry")
    )
}

/// Plain-text email body.
pub fn email_text(lead: &LeadRecord) -> String {
    let rows = lead.summary_rows();
    let (contact, event) = rows.split_at(3);

    let mut out = String::from("New Lead from SlopGPT Chat\n\n");
    out.push_str("Contact Information:\n--------------------\n");
    for (label, value) in contact {
        out.push_str(&format!("{}: {}\n", label, value));
    }
    out.push_str("\nEvent Details:\n--------------\n");
    for (label, value) in event {
        out.push_str(&format!("{}: {}\n", label, value));
    }
    out.push_str("\nConversation Summary:\n--------------------\n");
    out.push_str(&or_placeholder(
        &lead.conversation_summary,
        "No summary available",
    ));
    out.push_str("\n\n---\nThis lead was captured via the SlopGPT chat assistant.");
    out
}

/// HTML email body with the details as a table.
pub fn email_html(lead: &LeadRecord) -> String {
    let mut out = String::from("<h2>New Lead from SlopGPT Chat</h2>\n<table>\n");
    for (label, value) in lead.summary_rows() {
        out.push_str(&format!(
            "<tr><th align=\"left\">{}</th><td>{}</td></tr>\n",
            label,
            escape_html(&value)
        ));
    }
    out.push_str("</table>\n<h3>Conversation Summary</h3>\n<pre>");
    out.push_str(&escape_html(&or_placeholder(
        &lead.conversation_summary,
        "No summary available",
    )));
    out.push_str("</pre>\n<p>This lead was captured via the SlopGPT chat assistant.</p>");
    out
}

/// Slack-compatible incoming-webhook payload.
pub fn chatops_payload(lead: &LeadRecord) -> Value {
    let fields: Vec<Value> = lead
        .summary_rows()
        .into_iter()
        // Slack allows at most 10 fields per section.
        .take(10)
        .map(|(label, value)| {
            json!({ "type": "mrkdwn", "text": format!("*{}:*\n{}", label, value) })
        })
        .collect();

    let summary = or_placeholder(&lead.conversation_summary, "No summary available");

    json!({
        "text": format!(
            "New lead: {} ({})",
            lead.name(),
            or_placeholder(&lead.event_type, "Event Inquiry")
        ),
        "blocks": [
            {
                "type": "header",
                "text": { "type": "plain_text", "text": format!("New lead: {}", lead.name()) }
            },
            { "type": "section", "fields": fields },
            {
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": format!(
                        "*Conversation:*\n```{}```",
                        truncate(&summary, CHATOPS_TEXT_LIMIT)
                    )
                }
            }
        ]
    })
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
