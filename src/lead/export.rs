use chrono::{ DateTime, Local, SecondsFormat };

use super::Lead;

pub const CSV_CONTENT_TYPE: &str = "text/csv";
const CSV_HEADER: [&str; 4] = ["captured_at", "phone", "normalized_phone", "source_excerpt"];

pub fn export_filename(now: DateTime<Local>) -> String {
    format!("leads-{}.csv", now.format("%Y%m%d-%H%M"))
}

/// Renders leads as RFC 4180 CSV with a header row and CRLF line endings.
pub fn leads_to_csv<'a>(leads: impl IntoIterator<Item = &'a Lead>) -> String {
    let mut out = String::new();
    push_row(&mut out, &CSV_HEADER);
    for lead in leads {
        let captured_at = lead.captured_at.to_rfc3339_opts(SecondsFormat::Secs, true);
        push_row(
            &mut out,
            &[
                captured_at.as_str(),
                lead.phone.as_str(),
                lead.normalized_phone.as_str(),
                lead.source_excerpt.as_str(),
            ]
        );
    }
    out
}

fn push_row(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(field));
    }
    out.push_str("\r\n");
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
