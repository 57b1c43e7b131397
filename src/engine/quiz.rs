use crate::catalog::{Exercise, QuizQuestion};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub correct: bool,
    pub feedback: String,
}

/// Case-insensitive exact comparison. Leading and trailing whitespace is
/// dropped first so a typed chat answer like `"plays "` still counts;
/// whitespace inside the answer must match.
pub fn answers_match(submitted: &str, expected: &str) -> bool {
    submitted.trim().to_lowercase() == expected.trim().to_lowercase()
}

pub fn evaluate(question: &QuizQuestion, submitted: &str) -> Evaluation {
    if answers_match(submitted, &question.answer) {
        Evaluation {
            correct: true,
            feedback: "Correct!".to_string(),
        }
    } else {
        Evaluation {
            correct: false,
            feedback: "Wrong, try again".to_string(),
        }
    }
}

pub fn check_exercise_answer(answer: &str, exercise: &Exercise) -> Evaluation {
    let correct = answers_match(answer, &exercise.correct_answer);
    let mut feedback = if correct {
        "Correct answer!".to_string()
    } else {
        format!(
            "Wrong answer. The correct answer is: \"{}\".",
            exercise.correct_answer
        )
    };
    if !exercise.explanation.is_empty() {
        feedback.push(' ');
        feedback.push_str(&exercise.explanation);
    }
    Evaluation { correct, feedback }
}

/// Next cursor position, saturating at the last question.
pub fn advance(cursor: usize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    (cursor + 1).min(total - 1)
}

/// Position within one quiz. Reaching the end sets `finished` instead of
/// wrapping around.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizCursor {
    index: usize,
    total: usize,
    finished: bool,
}

impl QuizCursor {
    pub fn new(total: usize) -> Self {
        Self {
            index: 0,
            total,
            finished: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_last(&self) -> bool {
        self.total == 0 || self.index + 1 >= self.total
    }

    pub fn advance(&mut self) {
        if self.is_last() {
            self.finished = true;
        } else {
            self.index = advance(self.index, self.total);
        }
    }
}
