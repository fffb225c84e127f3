use std::fmt;

use thiserror::Error;

use crate::model::GameMode;
use crate::rules::BATCH_SIZE;

/// Number of options every question offers.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("expected {expected} options, got {actual}")]
    OptionCount { expected: usize, actual: usize },

    #[error("option listed more than once: {0}")]
    DuplicateOption(String),

    #[error("correct answer is not among the options")]
    MissingAnswer,
}

//
// ─── MULTIPLE CHOICE ───────────────────────────────────────────────────────────
//

/// Ordered option set with exactly one correct entry.
///
/// Holds exactly [`OPTION_COUNT`] distinct options, one of which equals the
/// correct answer. The order is whatever the caller shuffled it to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleChoice<T> {
    options: Vec<T>,
    correct: T,
}

impl<T> MultipleChoice<T>
where
    T: PartialEq + fmt::Display,
{
    /// Validate an option set.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::OptionCount` unless there are exactly four options,
    /// `QuestionError::DuplicateOption` if any option repeats, and
    /// `QuestionError::MissingAnswer` if `correct` is not one of them.
    pub fn new(options: Vec<T>, correct: T) -> Result<Self, QuestionError> {
        if options.len() != OPTION_COUNT {
            return Err(QuestionError::OptionCount {
                expected: OPTION_COUNT,
                actual: options.len(),
            });
        }
        for (i, option) in options.iter().enumerate() {
            if options[..i].contains(option) {
                return Err(QuestionError::DuplicateOption(option.to_string()));
            }
        }
        if !options.contains(&correct) {
            return Err(QuestionError::MissingAnswer);
        }
        Ok(Self { options, correct })
    }

    #[must_use]
    pub fn options(&self) -> &[T] {
        &self.options
    }

    #[must_use]
    pub fn correct(&self) -> &T {
        &self.correct
    }

    #[must_use]
    pub fn is_correct(&self, value: &T) -> bool {
        self.correct == *value
    }
}

//
// ─── ANSWERS ───────────────────────────────────────────────────────────────────
//

/// A value the player can pick.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Answer {
    Name(String),
    Episodes(u32),
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Name(name) => f.write_str(name),
            Answer::Episodes(count) => write!(f, "{count}"),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Question {
    /// Portrait of a main character; options are character names.
    Character {
        image_url: String,
        choice: MultipleChoice<String>,
    },
    /// Anime title; options are episode counts.
    Episodes {
        anime_title: String,
        choice: MultipleChoice<u32>,
    },
}

impl Question {
    /// Build a character-guess question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the options break the multiple-choice invariants.
    pub fn character(
        image_url: impl Into<String>,
        options: Vec<String>,
        correct: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        Ok(Self::Character {
            image_url: image_url.into(),
            choice: MultipleChoice::new(options, correct.into())?,
        })
    }

    /// Build an episode-count question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the options break the multiple-choice invariants.
    pub fn episodes(
        anime_title: impl Into<String>,
        options: Vec<u32>,
        correct: u32,
    ) -> Result<Self, QuestionError> {
        Ok(Self::Episodes {
            anime_title: anime_title.into(),
            choice: MultipleChoice::new(options, correct)?,
        })
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        match self {
            Question::Character { .. } => GameMode::Character,
            Question::Episodes { .. } => GameMode::Episodes,
        }
    }

    /// Text shown above the options.
    #[must_use]
    pub fn prompt(&self) -> String {
        match self {
            Question::Character { .. } => "Who is this character?".to_string(),
            Question::Episodes { anime_title, .. } => {
                format!("How many episodes does {anime_title} have?")
            }
        }
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Question::Character { image_url, .. } => Some(image_url),
            Question::Episodes { .. } => None,
        }
    }

    /// Options in display order.
    #[must_use]
    pub fn options(&self) -> Vec<Answer> {
        match self {
            Question::Character { choice, .. } => {
                choice.options().iter().cloned().map(Answer::Name).collect()
            }
            Question::Episodes { choice, .. } => {
                choice.options().iter().copied().map(Answer::Episodes).collect()
            }
        }
    }

    #[must_use]
    pub fn correct_answer(&self) -> Answer {
        match self {
            Question::Character { choice, .. } => Answer::Name(choice.correct().clone()),
            Question::Episodes { choice, .. } => Answer::Episodes(*choice.correct()),
        }
    }

    /// An answer of the other question kind is never correct.
    #[must_use]
    pub fn is_correct(&self, answer: &Answer) -> bool {
        match (self, answer) {
            (Question::Character { choice, .. }, Answer::Name(name)) => choice.is_correct(name),
            (Question::Episodes { choice, .. }, Answer::Episodes(count)) => {
                choice.is_correct(count)
            }
            _ => false,
        }
    }
}

//
// ─── BATCH ─────────────────────────────────────────────────────────────────────
//

/// Questions for one attempt at a level.
///
/// Normally holds [`BATCH_SIZE`] questions; fewer when sampling ran out of attempts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBatch {
    questions: Vec<Question>,
}

impl QuestionBatch {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// True when generation gave up before filling the batch.
    #[must_use]
    pub fn is_short(&self) -> bool {
        self.questions.len() < BATCH_SIZE
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

impl FromIterator<Question> for QuestionBatch {
    fn from_iter<I: IntoIterator<Item = Question>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn character_question_accepts_valid_options() {
        let question = Question::character(
            "https://cdn.example/spike.jpg",
            names(&["Jet", "Spike", "Faye", "Ed"]),
            "Spike",
        )
        .unwrap();

        assert_eq!(question.mode(), GameMode::Character);
        assert_eq!(question.options().len(), OPTION_COUNT);
        assert!(question.is_correct(&Answer::Name("Spike".into())));
        assert!(!question.is_correct(&Answer::Name("Jet".into())));
        assert_eq!(question.image_url(), Some("https://cdn.example/spike.jpg"));
    }

    #[test]
    fn rejects_wrong_option_count() {
        let err = Question::episodes("Cowboy Bebop", vec![26, 27, 25], 26).unwrap_err();
        assert_eq!(
            err,
            QuestionError::OptionCount {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn rejects_duplicates_and_missing_answer() {
        let err = Question::episodes("Cowboy Bebop", vec![26, 27, 27, 30], 26).unwrap_err();
        assert_eq!(err, QuestionError::DuplicateOption("27".into()));

        let err = Question::episodes("Cowboy Bebop", vec![21, 27, 28, 30], 26).unwrap_err();
        assert_eq!(err, QuestionError::MissingAnswer);
    }

    #[test]
    fn answers_of_other_kind_are_wrong() {
        let question = Question::episodes("Frieren", vec![28, 12, 40, 3], 28).unwrap();
        assert!(!question.is_correct(&Answer::Name("28".into())));
        assert!(question.is_correct(&Answer::Episodes(28)));
        assert_eq!(question.correct_answer(), Answer::Episodes(28));
        assert_eq!(question.prompt(), "How many episodes does Frieren have?");
    }

    #[test]
    fn batch_reports_short_rounds() {
        let question = Question::episodes("Frieren", vec![28, 12, 40, 3], 28).unwrap();
        let batch: QuestionBatch = std::iter::repeat_n(question, 3).collect();
        assert!(batch.is_short());
        assert_eq!(batch.len(), 3);
        assert!(QuestionBatch::default().is_empty());
    }
}
