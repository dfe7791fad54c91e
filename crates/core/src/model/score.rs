use std::collections::HashMap;

use crate::model::{Question, QuestionId};

/// Percent at or above which a finished attempt is celebrated.
pub const CELEBRATION_THRESHOLD: f64 = 80.0;

/// Points-weighted tally of a quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreCard {
    pub earned_points: u64,
    pub total_points: u64,
    pub correct: usize,
    pub answered: usize,
    pub total_questions: usize,
}

impl ScoreCard {
    /// Tally `answers` (question id to selected answer index) against `questions`.
    ///
    /// Answers for ids not in `questions` are ignored.
    #[must_use]
    pub fn tally(questions: &[Question], answers: &HashMap<QuestionId, usize>) -> Self {
        let mut card = Self {
            total_questions: questions.len(),
            ..Self::default()
        };

        for question in questions {
            let points = u64::from(question.points());
            card.total_points = card.total_points.saturating_add(points);

            let Some(&index) = answers.get(question.id()) else {
                continue;
            };
            card.answered += 1;
            if question.is_correct_choice(index) {
                card.correct += 1;
                card.earned_points = card.earned_points.saturating_add(points);
            }
        }

        card
    }

    /// Score in percent; 0 when there are no points to earn.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f64 {
        if self.total_points == 0 {
            return 0.0;
        }
        100.0 * self.earned_points as f64 / self.total_points as f64
    }

    #[must_use]
    pub fn is_celebration(&self) -> bool {
        self.percent() >= CELEBRATION_THRESHOLD
    }
}
