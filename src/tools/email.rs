//! Email drafting: LLM-backed with a deterministic template fallback.
//!
//! Drafts are rendered and validated as RFC 5322 MIME via `lettre`'s message
//! builder. Nothing is ever sent; the draft (and its MIME form when the
//! addresses validate) is returned for the user to review. An invalid
//! recipient degrades to the plain-text template, not an error.

use std::sync::Arc;

use crate::llm::LlmClient;
use crate::tools::{ToolReport, ToolResult};

/// Address drafts are rendered from when building the MIME preview.
const DRAFT_SENDER: &str = "assistant@localhost";

/// Produces professional email drafts.
#[derive(Debug)]
pub struct EmailDrafter {
    llm: Arc<LlmClient>,
}

impl EmailDrafter {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self { llm }
    }

    /// Draft an email from explicit fields.
    pub fn draft(&self, subject: &str, recipient: &str, body: &str) -> ToolResult {
        if let Some(draft) = self.llm_draft(subject, recipient, body) {
            return Ok(self.report(draft, subject, recipient, "llm"));
        }

        let draft = format!(
            "Subject: {subject}\n\nTo: {recipient}\n\nDear Team,\n\n{body}\n\n\
             Best regards,\nYour Desktop Assistant\n\n---\n\
             This is a draft email. Please review before sending."
        );
        Ok(self.report(draft, subject, recipient, "template"))
    }

    /// Draft a complete email from a free-text request. Used when a step
    /// arrives with only a body and no subject or recipient.
    pub fn draft_from_prompt(&self, request: &str) -> ToolResult {
        if self.llm.is_available() {
            let prompt = format!(
                "Based on the following request, generate a complete professional \
                 email draft with a subject line, greeting, body, and closing. \
                 Use team@company.com as the recipient if none is specified.\n\
                 Request: \"{request}\""
            );
            if let Ok(draft) = self.llm.generate(&prompt, None) {
                return Ok(self.report(draft.trim().to_string(), "AI-Generated Email", "team@company.com", "llm"));
            }
        }

        self.draft(
            "Follow-up from our conversation",
            "team@company.com",
            &format!("As per our discussion: {request}. Looking forward to your response."),
        )
    }

    fn llm_draft(&self, subject: &str, recipient: &str, body: &str) -> Option<String> {
        if !self.llm.is_available() {
            return None;
        }
        let prompt = format!(
            "Create a professional email draft.\nSubject: {subject}\nRecipient: {recipient}\n\
             Body content: {body}\n\nFormat it with an appropriate greeting and closing. \
             Keep it concise and professional. Return only the email text."
        );
        match self.llm.generate(&prompt, None) {
            Ok(draft) => Some(draft.trim().to_string()),
            Err(e) => {
                tracing::debug!(error = %e, "LLM email drafting failed, using template");
                None
            }
        }
    }

    fn report(&self, draft: String, subject: &str, recipient: &str, generated_with: &str) -> ToolReport {
        let mut report = ToolReport::ok()
            .friendly(format!("📧 Email draft ready for {recipient}"))
            .with("email_draft", draft.clone())
            .with("subject", subject)
            .with("recipient", recipient)
            .with("generated_with", generated_with);
        if let Some(mime) = render_mime(recipient, subject, &draft) {
            report = report.with("mime", mime);
        }
        report
    }
}

/// Render the draft as an RFC 5322 message. `None` when an address does not
/// parse — the plain-text draft stands on its own in that case.
fn render_mime(recipient: &str, subject: &str, body: &str) -> Option<String> {
    use lettre::message::{Mailbox, Message};

    let to: Mailbox = recipient.parse().ok()?;
    let from: Mailbox = DRAFT_SENDER.parse().ok()?;
    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .body(body.to_string())
        .ok()?;
    Some(String::from_utf8_lossy(&message.formatted()).into_owned())
}
