use crate::catalog::{QuizQuestion, VocabularyCategory};
use crate::engine::quiz::{self, Evaluation, QuizCursor};

/// State of the vocabulary quiz page. Owns its own cursor.
pub struct QuizSession {
    pub category: VocabularyCategory,
    questions: Vec<QuizQuestion>,
    cursor: QuizCursor,
    /// Option index chosen for the current question.
    pub selected: Option<usize>,
    pub evaluation: Option<Evaluation>,
    correct_first_try: usize,
    attempted_current: bool,
}

impl QuizSession {
    pub fn new(category: VocabularyCategory, questions: Vec<QuizQuestion>) -> Self {
        let cursor = QuizCursor::new(questions.len());
        Self {
            category,
            questions,
            cursor,
            selected: None,
            evaluation: None,
            correct_first_try: 0,
            attempted_current: false,
        }
    }

    pub fn current(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.cursor.index())
    }

    pub fn position(&self) -> usize {
        self.cursor.index()
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor.is_finished()
    }

    pub fn score(&self) -> usize {
        self.correct_first_try
    }

    /// Pick an option of the current question and evaluate it. Retrying is
    /// allowed; only the first attempt counts toward the score.
    pub fn select(&mut self, option: usize) -> Option<&Evaluation> {
        if self.is_finished() {
            return None;
        }
        let question = self.questions.get(self.cursor.index())?;
        let answer = question.options.get(option)?;
        let evaluation = quiz::evaluate(question, answer);
        if !self.attempted_current && evaluation.correct {
            self.correct_first_try += 1;
        }
        self.attempted_current = true;
        self.selected = Some(option);
        self.evaluation = Some(evaluation);
        self.evaluation.as_ref()
    }

    /// Move on once an option has been chosen. Returns false when nothing
    /// was selected yet.
    pub fn next(&mut self) -> bool {
        if self.selected.is_none() || self.is_finished() {
            return false;
        }
        self.cursor.advance();
        if self.cursor.is_finished() {
            self.evaluation = Some(Evaluation {
                correct: true,
                feedback: "You finished the quiz!".to_string(),
            });
        } else {
            self.selected = None;
            self.evaluation = None;
            self.attempted_current = false;
        }
        true
    }

    /// Share of questions reached, counting the current one.
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        (self.cursor.index() + 1) as f64 / self.questions.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<QuizQuestion> {
        (0..3)
            .map(|i| QuizQuestion {
                question: format!("q{i}"),
                image: None,
                options: vec!["a".into(), "b".into(), "c".into()],
                answer: "b".into(),
            })
            .collect()
    }

    #[test]
    fn next_requires_a_selection() {
        let mut s = QuizSession::new(VocabularyCategory::Main, questions());
        assert!(!s.next());
        assert_eq!(s.position(), 0);
    }

    #[test]
    fn wrong_then_right_scores_nothing() {
        let mut s = QuizSession::new(VocabularyCategory::Main, questions());
        assert!(!s.select(0).unwrap().correct);
        assert!(s.select(1).unwrap().correct);
        assert_eq!(s.score(), 0);
        assert!(s.next());
        assert!(s.select(1).unwrap().correct);
        assert_eq!(s.score(), 1);
    }

    #[test]
    fn finishing_sets_flag_and_keeps_last_question() {
        let mut s = QuizSession::new(VocabularyCategory::Main, questions());
        for _ in 0..3 {
            s.select(1);
            assert!(s.next());
        }
        assert!(s.is_finished());
        assert_eq!(s.position(), 2);
        assert_eq!(s.score(), 3);
        assert!(s.select(1).is_none());
        assert!(!s.next());
        assert!((s.progress() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_option_is_ignored() {
        let mut s = QuizSession::new(VocabularyCategory::Additional, questions());
        assert!(s.select(7).is_none());
        assert!(s.selected.is_none());
    }

    #[test]
    fn empty_quiz_is_inert() {
        let mut s = QuizSession::new(VocabularyCategory::Main, Vec::new());
        assert!(s.current().is_none());
        assert!(s.select(0).is_none());
        assert_eq!(s.progress(), 0.0);
    }
}
