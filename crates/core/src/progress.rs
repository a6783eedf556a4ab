//! Pure progress-tracking logic: completion, quiz scoring, aggregate
//! statistics, and learning milestones.

use serde::{Deserialize, Serialize};

use crate::content::QuizQuestion;
use crate::types::Timestamp;

/// Fraction of a video's duration that must be watched before the video
/// counts as completed.
pub const COMPLETION_THRESHOLD: f64 = 0.9;

/// Completed-video counts that trigger a milestone notification.
pub const FIRST_VIDEO_MILESTONE: i64 = 1;
pub const TEN_VIDEOS_MILESTONE: i64 = 10;

// ---------------------------------------------------------------------------
// Persisted sub-documents
// ---------------------------------------------------------------------------

/// One finished quiz attempt. Append-only on the progress record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttempt {
    /// Score in percent, 0-100.
    pub score: f64,
    pub questions_answered: u32,
    pub correct_answers: u32,
    pub timestamp: Timestamp,
}

/// A learner's note, optionally anchored to a chapter. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub content: String,
    pub chapter_index: u32,
    pub timestamp: Timestamp,
}

/// A bookmarked position in a video. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub title: String,
    /// Seconds from the start of the video.
    pub time_in_video: f64,
    pub note: String,
    pub timestamp: Timestamp,
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Whether the given watch time completes a video of the given duration.
pub fn is_completed(watch_time_secs: f64, duration_secs: f64) -> bool {
    duration_secs > 0.0 && watch_time_secs / duration_secs >= COMPLETION_THRESHOLD
}

/// Watched fraction in whole percent, capped at 100.
pub fn completion_percentage(watch_time_secs: f64, duration_secs: f64) -> u32 {
    if duration_secs <= 0.0 {
        return 0;
    }
    let pct = (watch_time_secs / duration_secs * 100.0).round() as u32;
    pct.min(100)
}

// ---------------------------------------------------------------------------
// Quiz scoring
// ---------------------------------------------------------------------------

/// Result of grading one submission against a video's quiz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuizScore {
    pub score: f64,
    pub total_questions: u32,
    pub correct_answers: u32,
}

/// Grade a submission: `answers[i]` is the chosen option index for
/// question `i`. Missing or out-of-range answers count as wrong.
pub fn score_quiz(quiz: &[QuizQuestion], answers: &[usize]) -> QuizScore {
    let total = quiz.len();
    let correct = answers
        .iter()
        .enumerate()
        .filter(|(i, answer)| quiz.get(*i).is_some_and(|q| **answer == q.correct_answer))
        .count();

    QuizScore {
        score: if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64 * 100.0
        },
        total_questions: total as u32,
        correct_answers: correct as u32,
    }
}

/// Mean of all attempt scores rounded to whole percent, 0 with no attempts.
pub fn average_quiz_score(attempts: &[QuizAttempt]) -> u32 {
    if attempts.is_empty() {
        return 0;
    }
    let total: f64 = attempts.iter().map(|a| a.score).sum();
    (total / attempts.len() as f64).round() as u32
}

// ---------------------------------------------------------------------------
// Milestones
// ---------------------------------------------------------------------------

/// A learning milestone worth congratulating the user on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestone {
    pub title: &'static str,
    pub description: &'static str,
}

impl Milestone {
    /// Milestone reached at exactly this completed-video count, if any.
    ///
    /// This is an exact-match trigger on the live count, not a threshold:
    /// counts 2..=9 and anything past 10 fire nothing.
    pub fn for_completed_count(count: i64) -> Option<Self> {
        match count {
            FIRST_VIDEO_MILESTONE => Some(Self {
                title: "First Video Completed!",
                description: "You've completed your first video. Keep going!",
            }),
            TEN_VIDEOS_MILESTONE => Some(Self {
                title: "10 Videos Milestone!",
                description: "You've completed 10 videos. You're becoming a pro!",
            }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregate statistics
// ---------------------------------------------------------------------------

/// The facts about one progress record needed for aggregate statistics.
#[derive(Debug, Clone, Copy)]
pub struct ProgressFacts {
    pub completed: bool,
    pub watch_time_secs: f64,
    pub average_quiz_score: u32,
    pub note_count: usize,
    pub bookmark_count: usize,
}

/// Aggregate learning statistics across all of a user's progress records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LearnerStats {
    pub total_videos_watched: u32,
    pub total_watch_time_secs: f64,
    /// Mean of the per-video average quiz scores, including videos with
    /// no attempts (which contribute 0).
    pub average_quiz_score: u32,
    pub total_notes: u32,
    pub total_bookmarks: u32,
}

impl LearnerStats {
    pub fn from_records(records: &[ProgressFacts]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let score_sum: u32 = records.iter().map(|r| r.average_quiz_score).sum();

        Self {
            total_videos_watched: records.iter().filter(|r| r.completed).count() as u32,
            total_watch_time_secs: records.iter().map(|r| r.watch_time_secs).sum(),
            average_quiz_score: (f64::from(score_sum) / records.len() as f64).round() as u32,
            total_notes: records.iter().map(|r| r.note_count as u32).sum(),
            total_bookmarks: records.iter().map(|r| r.bookmark_count as u32).sum(),
        }
    }
}
