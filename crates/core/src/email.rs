//! The email at the centre of the walkthrough.
//!
//! A student sends an assignment to a teacher. The composing screen shows the
//! draft, and the delivered screen shows the same email as received.

/// A file attached to the email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub size_bytes: u64,
}

/// A fixed, read-only email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment: Attachment,
}

impl Email {
    /// The student's assignment email.
    pub fn assignment() -> Self {
        Self {
            from: "rafael@school.edu".to_string(),
            to: "andreia@school.edu".to_string(),
            subject: "Assignment 4 - Programming Logic".to_string(),
            body: "Hello Professor Andreia, attached is Assignment 4 for the Programming Logic course."
                .to_string(),
            attachment: Attachment {
                file_name: "assignment4.py".to_string(),
                size_bytes: 2560,
            },
        }
    }

    /// Single-line rendering used as the seed message when the email is sent.
    pub fn to_message(&self) -> String {
        format!(
            "To: {} | Subject: {} | {} [{}]",
            self.to, self.subject, self.body, self.attachment.file_name
        )
    }
}

impl Default for Email {
    fn default() -> Self {
        Self::assignment()
    }
}

impl Attachment {
    /// Human-readable size, e.g. "2.5 KB".
    pub fn size_label(&self) -> String {
        if self.size_bytes < 1024 {
            format!("{} B", self.size_bytes)
        } else {
            format!("{:.1} KB", self.size_bytes as f64 / 1024.0)
        }
    }
}
