use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmailType {
    #[default]
    General,
    SessionNotification,
}

impl EmailType {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::SessionNotification => "session_notification",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s {
            "session_notification" => Self::SessionNotification,
            _ => Self::General,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmailStatus {
    #[default]
    Pending,
    Sent,
    Failed,
}

impl EmailStatus {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s {
            "sent" => Self::Sent,
            "failed" => Self::Failed,
            _ => Self::Pending,
        }
    }
}

/// Maximal längd på sparad brödtext-förhandsvisning
const PREVIEW_MAX_CHARS: usize = 100;

/// Logg över skickad kommunikation. Brödtexten sparas aldrig i sin
/// helhet, endast en förhandsvisning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailLog {
    pub id: Option<i64>,
    pub sender_location_id: i64,
    pub receiver_member_id: Option<i64>,
    pub receiver_email: String,
    pub subject: String,
    pub body_preview: String,
    pub email_type: EmailType,
    pub status: EmailStatus,
    pub session_id: Option<i64>,
    pub sent_at: Option<String>,
}

impl EmailLog {
    pub fn new(sender_location_id: i64, receiver_email: String, subject: String) -> Self {
        Self {
            id: None,
            sender_location_id,
            receiver_member_id: None,
            receiver_email,
            subject,
            body_preview: String::new(),
            email_type: EmailType::General,
            status: EmailStatus::Pending,
            session_id: None,
            sent_at: None,
        }
    }

    /// Klipp en brödtext till förhandsvisningslängd
    pub fn preview_of(body: &str) -> String {
        if body.chars().count() <= PREVIEW_MAX_CHARS {
            return body.to_string();
        }
        let truncated: String = body.chars().take(PREVIEW_MAX_CHARS).collect();
        format!("{}...", truncated.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncation() {
        let short = "Välkommen till klubben!";
        assert_eq!(EmailLog::preview_of(short), short);

        let long = "x".repeat(250);
        let preview = EmailLog::preview_of(&long);
        assert_eq!(preview.chars().count(), PREVIEW_MAX_CHARS + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_status_roundtrip() {
        for s in [EmailStatus::Pending, EmailStatus::Sent, EmailStatus::Failed] {
            assert_eq!(EmailStatus::from_db_str(s.as_db_str()), s);
        }
    }
}
