use super::record::JobPosting;

/// Renders the Markdown card announced on the channel.
///
/// The header line is `*{title}* at *{company}*`. A non-empty summary follows
/// after a blank line and is separated from the bullets by another one. Without
/// a summary the bullets start on the line after the header.
pub fn format_card(posting: &JobPosting, summary: &str) -> String {
    let mut card = format!("*{}* at *{}*\n", posting.title, posting.company);

    let summary = summary.trim_end();
    if !summary.is_empty() {
        card.push('\n');
        card.push_str(summary);
        card.push_str("\n\n");
    }

    for (label, value) in [
        ("Location", &posting.location),
        ("Salary", &posting.salary),
        ("Experience", &posting.experience),
        ("Details", &posting.description),
        ("Contact", &posting.contact),
    ] {
        if !value.is_empty() {
            card.push_str(&format!("• {}: {}\n", label, value));
        }
    }

    card.trim_end().to_string()
}
