pub mod content;
pub mod error;
pub mod resolver;
pub mod scoring;
pub mod session;

use std::collections::BTreeMap;
use std::fmt;

pub use content::Content;
pub use error::{ContentError, SessionError};
pub use scoring::ScoreState;
pub use session::{Phase, ProgressView, Session};

/// One of the five houses a player can be sorted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryId {
    Gryffindor,
    Hufflepuff,
    Ravenclaw,
    Slytherin,
    Promptevrin,
}

impl CategoryId {
    #[cfg(test)]
    pub const ALL: [CategoryId; 5] = [
        CategoryId::Gryffindor,
        CategoryId::Hufflepuff,
        CategoryId::Ravenclaw,
        CategoryId::Slytherin,
        CategoryId::Promptevrin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryId::Gryffindor => "gryffindor",
            CategoryId::Hufflepuff => "hufflepuff",
            CategoryId::Ravenclaw => "ravenclaw",
            CategoryId::Slytherin => "slytherin",
            CategoryId::Promptevrin => "promptevrin",
        }
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Shown when the description has no second sentence
const FALLBACK_SKILL: &str = "Творить настоящую магию";

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub emoji: String,
    pub image: String,
    pub color: String,
    pub gradient: String,
}

impl Category {
    /// The two bullet points of the result card: the first two sentences of
    /// the description.
    pub fn skills(&self) -> [String; 2] {
        let mut sentences = self.description.split('.');
        let first = sentences.next().unwrap_or_default().trim().to_string();
        let second = sentences
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(FALLBACK_SKILL)
            .to_string();

        [format!("{}.", first), format!("{}.", second)]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub answers: Vec<Answer>,
}

impl Question {
    /// Index of the option whose text is exactly `text`.
    pub fn answer_index(&self, text: &str) -> Option<usize> {
        self.answers.iter().position(|a| a.text == text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct Answer {
    pub text: String,
    #[serde(default)]
    pub points: BTreeMap<CategoryId, u32>,
}

impl Answer {
    pub fn points_for(&self, category: CategoryId) -> u32 {
        self.points.get(&category).copied().unwrap_or(0)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use proptest::prelude::*;

    /// Points of one answer option: up to three houses, small weights.
    pub fn points_strategy() -> impl Strategy<Value = BTreeMap<CategoryId, u32>> {
        prop::collection::btree_map(
            prop::sample::select(CategoryId::ALL.to_vec()),
            0u32..10,
            0..4,
        )
    }

    pub fn category(id: CategoryId) -> Category {
        Category {
            id,
            name: id.as_str().to_string(),
            description: format!("{} is brave. {} is kind.", id, id),
            emoji: "🎩".to_string(),
            image: format!("assets/{}.png", id),
            color: "#7F0909".to_string(),
            gradient: "linear-gradient(135deg, #7F0909, #FFC500)".to_string(),
        }
    }

    pub fn catalog() -> Vec<Category> {
        CategoryId::ALL.iter().map(|id| category(*id)).collect()
    }

    pub fn answer(text: &str, points: &[(CategoryId, u32)]) -> Answer {
        Answer {
            text: text.to_string(),
            points: points.iter().copied().collect(),
        }
    }

    pub fn question(id: u32, answers: Vec<Answer>) -> Question {
        Question {
            id,
            text: format!("Question {}?", id),
            answers,
        }
    }

    pub fn content(questions: Vec<Question>) -> Content {
        Content::new(catalog(), questions, vec!["Хм...".to_string()])
            .expect("fixture content must be valid")
    }
}
