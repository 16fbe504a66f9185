// src/services/grading.rs

use crate::models::{form::FormDefinition, submission::Answers};

/// Outcome of grading one answer set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grade {
    pub total_marks: f64,
    pub correct_count: usize,
    pub total_possible_marks: f64,
}

/// Scores `answers` against `form`.
///
/// Question `i` is answered by key `"i"`. Only an exact, case-sensitive string
/// match earns the question's marks. Missing keys, unknown keys and non-string
/// values earn nothing and never fail the grading.
pub fn grade(form: &FormDefinition, answers: &Answers) -> Grade {
    let mut total_marks = 0.0;
    let mut correct_count = 0;

    for (idx, question) in form.questions.iter().enumerate() {
        let given = answers.get(&idx.to_string()).and_then(|v| v.as_str());
        if given == Some(question.correct_answer.as_str()) {
            total_marks += question.marks;
            correct_count += 1;
        }
    }

    Grade {
        total_marks,
        correct_count,
        total_possible_marks: form.total_marks(),
    }
}

/// Score as a percentage of the available marks, or `None` when the form is
/// worth nothing.
pub fn percentage(total_marks: f64, total_possible_marks: f64) -> Option<f64> {
    if total_possible_marks <= 0.0 {
        return None;
    }
    Some(total_marks / total_possible_marks * 100.0)
}
