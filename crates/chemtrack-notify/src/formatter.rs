//! Alert message composition.

use chrono::NaiveDate;

use chemtrack_entity::{AlertCondition, AlertKind, AlertMessage};

/// Date format used in alert bodies.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Composes the consolidated alert for one organization.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertFormatter;

impl AlertFormatter {
    /// Build one message from an organization's conditions.
    ///
    /// Conditions are rendered in the order given, one block each. Returns
    /// `None` when there is nothing to report.
    pub fn compose(&self, organization: &str, conditions: &[AlertCondition]) -> Option<AlertMessage> {
        if conditions.is_empty() {
            return None;
        }

        let html_body: String = conditions.iter().map(render_block).collect();
        let subject = format!("Chemical Alert Report for {organization}");

        Some(AlertMessage {
            organization: organization.to_string(),
            push_title: subject.clone(),
            subject,
            html_body,
            push_body: summarize(conditions),
        })
    }
}

fn render_block(condition: &AlertCondition) -> String {
    let cas = escape_html(&condition.cas_number);
    let school = escape_html(&condition.organization);

    match condition.kind {
        AlertKind::LowStock => format!(
            "🔴 LOW STOCK ALERT\n<br>\
             - CAS Number: {cas}\n<br>\
             - School: {school}\n<br>\
             - Status: Low Stock\n\n<br><br>"
        ),
        AlertKind::Expired => format!(
            "⚠️ EXPIRED CHEMICAL ALERT\n<br>\
             - CAS Number: {cas}\n<br>\
             - School: {school}\n<br>\
             - Expiration Date: {}\n<br>\
             - Status: Expired\n\n<br><br>",
            format_date(condition.expiration_date)
        ),
        AlertKind::ExpiringSoon => format!(
            "🟡 EXPIRATION WARNING\n<br>\
             - CAS Number: {cas}\n<br>\
             - School: {school}\n<br>\
             - Expiration Date: {}\n<br>\
             - Status: Will Expire Soon\n\n<br><br>",
            format_date(condition.expiration_date)
        ),
    }
}

fn summarize(conditions: &[AlertCondition]) -> String {
    let count = |kind: AlertKind| conditions.iter().filter(|c| c.kind == kind).count();
    let total = conditions.len();

    format!(
        "{total} {}: {} low stock, {} expired, {} expiring soon",
        if total == 1 { "alert" } else { "alerts" },
        count(AlertKind::LowStock),
        count(AlertKind::Expired),
        count(AlertKind::ExpiringSoon),
    )
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
