use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Classification of a reported security event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Reuse,
    DomHash,
    UserReport,
    FalsePositive,
    PersonalPassword,
    /// Any type this server does not know about. Accepted rather than
    /// rejected so an older server still surfaces alerts from newer clients.
    #[serde(other)]
    Unknown,
}

/// Submission timestamp, echoed into messages exactly as provided.
///
/// Deployments send either an ISO-8601 string or epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Text(String),
    EpochMillis(i64),
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Text(value) => f.write_str(value),
            Timestamp::EpochMillis(value) => write!(f, "{value}"),
        }
    }
}

/// One inbound alert submission. Lives for the duration of a single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertReport {
    /// Usernames associated with the reporting browser, JSON-encoded into
    /// one string by the client.
    pub username: String,
    /// URL the alert fired on.
    pub url: String,
    /// Submitted pre-shared key. Compared against the configured secret,
    /// never logged and never forwarded.
    pub psk: String,
    /// Referrer of the page, when the client had one.
    #[serde(default)]
    pub referrer: Option<String>,
    #[serde(rename = "alertType")]
    pub alert_type: AlertKind,
    pub date: Timestamp,
    /// Installation identifier, sent by newer clients.
    #[serde(rename = "clientId", default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Account the client suspects was targeted, sent by newer clients.
    #[serde(
        rename = "suspectedUsername",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub suspected_username: Option<String>,
    #[serde(
        rename = "suspectedHost",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub suspected_host: Option<String>,
}

/// Renders the chat message for a report.
///
/// Deterministic: the output depends only on the report fields and the
/// peer address. A missing referrer renders as the literal `None`.
pub fn format_message(report: &AlertReport, client_ip: IpAddr) -> String {
    let names = &report.username;
    let url = &report.url;
    let referrer = report.referrer.as_deref().unwrap_or("None");
    let ts = &report.date;

    let mut message = match report.alert_type {
        AlertKind::Reuse => format!(
            "A user with associated usernames {names} reused their password on {url}! Referrer: {referrer}. Timestamp: {ts}. Request IP: {client_ip}."
        ),
        AlertKind::DomHash => format!(
            "{url} triggered a dom hash alert for a user with associated usernames {names}. Timestamp: {ts}. Request IP: {client_ip}."
        ),
        AlertKind::UserReport => format!(
            "A user with associated usernames {names} reported {url} as a phishing page. Referrer: {referrer}. Timestamp: {ts}. Request IP: {client_ip}."
        ),
        AlertKind::FalsePositive => format!(
            "A user with associated usernames {names} reported a false positive alert on {url}. Referrer: {referrer}. Timestamp: {ts}. Request IP: {client_ip}."
        ),
        AlertKind::PersonalPassword => format!(
            "A user with associated usernames {names} reported that the system alerted on a personal password at {url}. Referrer: {referrer}. Timestamp: {ts}. Request IP: {client_ip}."
        ),
        AlertKind::Unknown => format!(
            "A user with associated usernames {names} fired an unknown alert on {url}! Referrer: {referrer}. Timestamp: {ts}. Request IP: {client_ip}. Is the sending client up to date?"
        ),
    };

    if let (Some(account), Some(host)) = (
        non_empty(&report.suspected_username),
        non_empty(&report.suspected_host),
    ) {
        message.push_str(&format!(" Suspected account: {account} on {host}."));
    }

    if let Some(client_id) = non_empty(&report.client_id) {
        message.push_str(&format!(" Client ID: {client_id}."));
    }

    message
}

// Clients send "" for fields they have no value for.
fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}
