//! Plain-text rendering of lists for the terminal.

use std::fmt::Write;

use crmdesk_core::{
    Audience, CampaignDraft, Classification, ClassificationKind, Contact, EntityKind,
    ListSummary, Notice, Quote, Severity, Tone,
};

/// Renders a badge as `[label:token]`, or `(label:token)` for soft badges.
fn badge(label: &str, kind: ClassificationKind) -> String {
    let style = Classification::of(kind, label);
    match style.tone {
        Tone::Solid => format!("[{label}:{}]", style.token),
        Tone::Soft => format!("({label}:{})", style.token),
    }
}

/// Renders the filtered contact table with its summary line.
#[must_use]
pub fn contacts(rows: &[&Contact], total: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", ListSummary::new(EntityKind::Contact, rows.len(), total));
    for contact in rows {
        let _ = writeln!(
            out,
            "{:<4} {:<3} {:<18} {:<26} {:<20} {:<22} {} {}",
            contact.id,
            contact.initials(),
            contact.name,
            contact.email,
            contact.company,
            badge(contact.status.as_str(), ClassificationKind::ContactStatus),
            contact.last_contact,
            contact.tags.join(", "),
        );
    }
    out
}

/// Renders the filtered quote table with its summary line.
#[must_use]
pub fn quotes(rows: &[&Quote], total: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", ListSummary::new(EntityKind::Quote, rows.len(), total));
    for quote in rows {
        let _ = writeln!(
            out,
            "{:<7} {:<20} {:<20} {:>9} {:<22} {:<24} {}",
            quote.id,
            quote.client,
            quote.service,
            quote.value,
            badge(quote.priority.as_str(), ClassificationKind::Priority),
            badge(quote.status.as_str(), ClassificationKind::QuoteStatus),
            quote.date,
        );
    }
    out
}

/// Renders the audience picker.
#[must_use]
pub fn audiences(audiences: &[Audience]) -> String {
    let mut out = String::new();
    for audience in audiences {
        let _ = writeln!(
            out,
            "{:<10} {:<18} {:>6} recipients",
            audience.id, audience.name, audience.count
        );
    }
    out
}

/// Renders the reach preview under the audience picker.
#[must_use]
pub fn reach(draft: &CampaignDraft, audience: Option<&Audience>) -> String {
    match (draft.audience_id.as_deref(), audience) {
        (_, Some(audience)) => format!(
            "This newsletter will be sent to {} recipients",
            audience.count
        ),
        (Some(id), None) => format!("Unknown audience: {id}"),
        (None, None) => "No audience selected".to_string(),
    }
}

/// Renders a toast.
#[must_use]
pub fn notice(notice: &Notice) -> String {
    let marker = match notice.severity {
        Severity::Info => "✓",
        Severity::Destructive => "✗",
    };
    format!("{marker} {}: {}", notice.title, notice.description)
}
