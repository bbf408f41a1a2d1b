#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Neutral,
    Success,
    Error,
}

impl Severity {
    /// Label color as RGB.
    pub fn color(self) -> [u8; 3] {
        match self {
            Severity::Neutral => [64, 64, 64],
            Severity::Success => [26, 102, 26],
            Severity::Error => [255, 0, 0],
        }
    }
}

/// Outcome of the most recent refresh or save, as shown in the status label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub severity: Severity,
}

impl Status {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn no_image() -> Self {
        Self::new("[No image]", Severity::Neutral)
    }

    pub fn not_saved() -> Self {
        Self::new("[Not saved]", Severity::Neutral)
    }

    pub fn saved(file_name: &str) -> Self {
        Self::new(format!("Saved to: {}", file_name), Severity::Success)
    }

    pub fn save_failed(reason: &str, file_name: &str) -> Self {
        Self::new(
            format!("({}) Failed to save to: {}", reason, file_name),
            Severity::Error,
        )
    }
}

/// Until the first refresh the clipboard is assumed empty.
impl Default for Status {
    fn default() -> Self {
        Self::no_image()
    }
}
