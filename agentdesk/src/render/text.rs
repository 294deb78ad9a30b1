use chrono::{DateTime, Local};

use crate::models::{ContentKind, ContentLength};

const RULE_WIDTH: usize = 50;

/// Prefixes generated prose with a header block:
///
/// ```text
/// Article: Rust
/// ==================================================
/// Generated: 2024-05-01 12:00:00
/// Length: medium
/// ==================================================
///
/// <body>
/// ```
pub fn render_text_document(
    kind: &ContentKind,
    topic: &str,
    length: ContentLength,
    generated_at: DateTime<Local>,
    body: &str,
) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "{}: {}\n{rule}\nGenerated: {}\nLength: {}\n{rule}\n\n{}\n",
        kind.title(),
        topic,
        generated_at.format("%Y-%m-%d %H:%M:%S"),
        length,
        body.trim_end(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn header_precedes_body() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let doc = render_text_document(
            &ContentKind::Report,
            "Solar power",
            ContentLength::Short,
            at,
            "Body text.\n\n",
        );

        let lines: Vec<&str> = doc.lines().collect();
        assert_eq!(lines[0], "Report: Solar power");
        assert_eq!(lines[1], "=".repeat(50));
        assert_eq!(lines[2], "Generated: 2024-05-01 12:00:00");
        assert_eq!(lines[3], "Length: short");
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "Body text.");
        assert!(doc.ends_with("Body text.\n"));
    }
}
