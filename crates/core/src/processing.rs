//! Per-field AI processing status: the state machine each derived-content
//! field moves through, and the reconciliation rule applied when an
//! enrichment run aborts.
//!
//! Status values are persisted as TEXT columns, so [`ProcessingState`]
//! round-trips through its string form.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle position of one derived-content field.
///
/// Transitions: `Pending -> Processing -> {Completed | Failed}`. Completed
/// and Failed are terminal for a run; a fresh enrichment run resets the map
/// and starts over from the transcript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingState {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ProcessingState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Terminal state for a content field, derived purely from whether the
    /// field holds content.
    ///
    /// Single source of truth for both the normal completion path and
    /// failure reconciliation, so the two cannot drift apart.
    pub fn for_content(non_empty: bool) -> Self {
        if non_empty {
            Self::Completed
        } else {
            Self::Failed
        }
    }
}

impl fmt::Display for ProcessingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four status-tracked derived-content fields of a video record, in
/// pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentStep {
    Transcript,
    Summary,
    Chapters,
    Quiz,
}

impl EnrichmentStep {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transcript => "transcript",
            Self::Summary => "summary",
            Self::Chapters => "chapters",
            Self::Quiz => "quiz",
        }
    }
}

impl fmt::Display for EnrichmentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field processing status map persisted on every video record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingStatus {
    pub transcript: ProcessingState,
    pub summary: ProcessingState,
    pub chapters: ProcessingState,
    pub quiz: ProcessingState,
}

impl ProcessingStatus {
    pub fn get(&self, step: EnrichmentStep) -> ProcessingState {
        match step {
            EnrichmentStep::Transcript => self.transcript,
            EnrichmentStep::Summary => self.summary,
            EnrichmentStep::Chapters => self.chapters,
            EnrichmentStep::Quiz => self.quiz,
        }
    }

    pub fn is_fully_completed(&self) -> bool {
        [self.transcript, self.summary, self.chapters, self.quiz]
            .iter()
            .all(|s| *s == ProcessingState::Completed)
    }

    pub fn any_processing(&self) -> bool {
        [self.transcript, self.summary, self.chapters, self.quiz]
            .iter()
            .any(|s| *s == ProcessingState::Processing)
    }
}

/// Which derived-content fields of a record currently hold content.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentPresence {
    pub transcript: bool,
    pub summary: bool,
    pub chapters: bool,
    pub quiz: bool,
}

/// Reconcile the status map after an aborted enrichment run.
///
/// A pure function of content-field emptiness: every field that already
/// holds content reports `Completed`, everything else `Failed`. Re-examines
/// all four fields regardless of which step threw, and applying it twice
/// yields the same map.
pub fn reconcile(content: ContentPresence) -> ProcessingStatus {
    ProcessingStatus {
        transcript: ProcessingState::for_content(content.transcript),
        summary: ProcessingState::for_content(content.summary),
        chapters: ProcessingState::for_content(content.chapters),
        quiz: ProcessingState::for_content(content.quiz),
    }
}
