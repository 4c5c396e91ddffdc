// File: glowbot-common/src/models/intent.rs

/// What the router decided a chat message should cause. Routing produces
/// intents; the dispatcher turns them into side effects. Keeping the two
/// apart means routing stays a pure function.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Intent {
    /// Light the plaque registered for this display name.
    TriggerPlaque { display_name: String },
    /// Read the text aloud.
    Speak { text: String },
    /// Run a command-table entry.
    Execute {
        command: String,
        invoked_by: String,
        is_superchat: bool,
    },
}

impl Intent {
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::TriggerPlaque { .. } => "trigger_plaque",
            Intent::Speak { .. } => "speak",
            Intent::Execute { .. } => "execute",
        }
    }
}
