use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::{Category, CategoryId, ContentError, Question};

const EMBEDDED_CONTENT: &str = include_str!("../../content/sorting_hat.json");

#[derive(serde::Deserialize)]
struct RawContent {
    categories: Vec<Category>,
    questions: Vec<Question>,
    thinking_phrases: Vec<String>,
}

/// Validated, read-only quiz content: questions in order, the category
/// catalog in declared order and the phrases shown while the hat "thinks".
#[derive(Debug, Clone)]
pub struct Content {
    categories: Vec<Category>,
    questions: Vec<Question>,
    thinking_phrases: Vec<String>,
}

impl Content {
    pub fn new(
        categories: Vec<Category>,
        questions: Vec<Question>,
        thinking_phrases: Vec<String>,
    ) -> Result<Self, ContentError> {
        if categories.is_empty() {
            return Err(ContentError::EmptyCatalog);
        }

        let mut declared = HashSet::new();
        for category in &categories {
            if !declared.insert(category.id) {
                return Err(ContentError::DuplicateCategory(category.id));
            }
        }

        if questions.is_empty() {
            return Err(ContentError::NoQuestions);
        }

        for question in &questions {
            if question.answers.is_empty() {
                return Err(ContentError::NoAnswers {
                    question: question.id,
                });
            }
            for (answer_idx, answer) in question.answers.iter().enumerate() {
                // A missing category would silently drop its points when scoring
                if let Some(category) = answer.points.keys().find(|c| !declared.contains(*c)) {
                    return Err(ContentError::UnknownCategory {
                        question: question.id,
                        answer: answer_idx,
                        category: *category,
                    });
                }
            }
        }

        if thinking_phrases.is_empty() {
            return Err(ContentError::NoThinkingPhrases);
        }

        Ok(Self {
            categories,
            questions,
            thinking_phrases,
        })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ContentError> {
        let raw: RawContent = serde_json::from_reader(reader)?;
        Self::new(raw.categories, raw.questions, raw.thinking_phrases)
    }

    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let raw: RawContent = serde_json::from_str(json)?;
        Self::new(raw.categories, raw.questions, raw.thinking_phrases)
    }

    /// The content shipped with the bot.
    pub fn embedded() -> Result<Self, ContentError> {
        Self::from_json(EMBEDDED_CONTENT)
    }

    /// Loads content from `path`, or the embedded content when no path is set.
    pub fn load(path: Option<&Path>) -> Result<Self, ContentError> {
        match path {
            Some(path) => {
                log::info!("Loading quiz content from {}", path.display());
                Self::from_reader(BufReader::new(File::open(path)?))
            }
            None => {
                log::info!("Loading embedded quiz content");
                Self::embedded()
            }
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_ids(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.categories.iter().map(|c| c.id)
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    // Never underflows, validation rejects empty question lists
    pub fn last_question_index(&self) -> usize {
        self.questions.len() - 1
    }

    pub fn thinking_phrases(&self) -> &[String] {
        &self.thinking_phrases
    }
}
