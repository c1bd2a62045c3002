/// Feedback submission lifecycle
///
/// A linear state machine: Editing -> Submitting -> Submitted. There are
/// no reverse transitions except the failure path, which returns to
/// Editing with the draft preserved so the sender can retry. Submitted
/// is terminal for the page instance.
use super::data::FeedbackMessage;

#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackFlow {
    /// Draft in progress; submission is disabled while the text is blank
    Editing {
        draft: String,
        error: Option<String>,
    },
    /// Exactly one create request is in flight
    Submitting { draft: String },
    /// The store accepted the message; no further interaction
    Submitted { reply: FeedbackMessage },
}

impl Default for FeedbackFlow {
    fn default() -> Self {
        Self::Editing {
            draft: String::new(),
            error: None,
        }
    }
}

impl FeedbackFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        match self {
            Self::Editing { draft, .. } | Self::Submitting { draft } => draft,
            Self::Submitted { .. } => "",
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Editing { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted { .. })
    }

    /// Whether the current draft may be submitted
    pub fn can_submit(&self) -> bool {
        matches!(self, Self::Editing { draft, .. } if !draft.trim().is_empty())
    }

    /// Update the draft. Ignored once submission has started.
    pub fn edit(&mut self, text: String) {
        if let Self::Editing { draft, error } = self {
            *draft = text;
            error.take();
        }
    }

    /// Start a submission. Returns the trimmed text to send to the
    /// store, or None when nothing may be submitted: blank draft,
    /// a submission already in flight, or a terminal flow.
    pub fn begin_submit(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }
        let draft = self.draft().to_owned();
        let text = draft.trim().to_owned();
        *self = Self::Submitting { draft };
        Some(text)
    }

    /// Apply the store's verdict to an in-flight submission.
    ///
    /// Success is terminal. Failure returns to Editing with the draft
    /// preserved and the error visible.
    pub fn resolve(&mut self, result: Result<FeedbackMessage, String>) {
        *self = match std::mem::take(self) {
            Self::Submitting { draft } => match result {
                Ok(reply) => Self::Submitted { reply },
                Err(error) => Self::Editing {
                    draft,
                    error: Some(error),
                },
            },
            // No submission in flight; a stray result changes nothing.
            other => other,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reply(text: &str) -> FeedbackMessage {
        FeedbackMessage {
            id: 1,
            message: text.to_owned(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_blank_draft_cannot_submit() {
        let mut flow = FeedbackFlow::new();
        assert!(!flow.can_submit());
        assert_eq!(flow.begin_submit(), None);

        flow.edit("   \n\t ".to_owned());
        assert!(!flow.can_submit());
        assert_eq!(flow.begin_submit(), None);
        assert!(!flow.is_submitting());
    }

    #[test]
    fn test_submission_trims_and_goes_in_flight() {
        let mut flow = FeedbackFlow::new();
        flow.edit("  Happy birthday!  ".to_owned());

        let text = flow.begin_submit().unwrap();
        assert_eq!(text, "Happy birthday!");
        assert!(flow.is_submitting());
    }

    #[test]
    fn test_at_most_one_in_flight() {
        let mut flow = FeedbackFlow::new();
        flow.edit("hello".to_owned());

        assert!(flow.begin_submit().is_some());
        // A second submit while one is pending must be ignored.
        assert_eq!(flow.begin_submit(), None);
        assert!(flow.is_submitting());
    }

    #[test]
    fn test_edits_are_ignored_while_submitting() {
        let mut flow = FeedbackFlow::new();
        flow.edit("hello".to_owned());
        flow.begin_submit();

        flow.edit("changed".to_owned());
        assert_eq!(flow.draft(), "hello");
    }

    #[test]
    fn test_success_is_terminal() {
        let mut flow = FeedbackFlow::new();
        flow.edit("hello".to_owned());
        flow.begin_submit();
        flow.resolve(Ok(reply("hello")));

        assert!(flow.is_submitted());
        assert_eq!(flow.begin_submit(), None);
        flow.edit("more".to_owned());
        assert!(flow.is_submitted());
    }

    #[test]
    fn test_failure_preserves_draft_and_surfaces_error() {
        let mut flow = FeedbackFlow::new();
        flow.edit("dear friend".to_owned());
        flow.begin_submit();
        flow.resolve(Err("guest book unreachable".to_owned()));

        assert!(!flow.is_submitting());
        assert!(!flow.is_submitted());
        assert_eq!(flow.draft(), "dear friend");
        assert_eq!(flow.error(), Some("guest book unreachable"));

        // The flow is retryable and editing clears the error.
        flow.edit("dear friend!".to_owned());
        assert_eq!(flow.error(), None);
        assert!(flow.can_submit());
    }

    #[test]
    fn test_resolve_without_in_flight_submission_is_ignored() {
        let mut flow = FeedbackFlow::new();
        flow.resolve(Ok(reply("stray")));
        assert!(matches!(flow, FeedbackFlow::Editing { .. }));
    }
}
