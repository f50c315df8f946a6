use super::{Answer, CategoryId};

/// Accumulated points per category, in the catalog's declared order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreState {
    scores: Vec<(CategoryId, u32)>,
}

impl ScoreState {
    pub fn zeroed(categories: impl IntoIterator<Item = CategoryId>) -> Self {
        Self {
            scores: categories.into_iter().map(|c| (c, 0)).collect(),
        }
    }

    /// Scores after choosing `option`. Categories the option does not
    /// mention keep their score. Totals saturate at `u32::MAX`.
    pub fn apply_answer(&self, option: &Answer) -> ScoreState {
        let scores = self
            .scores
            .iter()
            .map(|&(category, score)| (category, score.saturating_add(option.points_for(category))))
            .collect();

        ScoreState { scores }
    }

    #[cfg(test)]
    pub fn get(&self, category: CategoryId) -> Option<u32> {
        self.scores
            .iter()
            .find(|(c, _)| *c == category)
            .map(|&(_, score)| score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CategoryId, u32)> + '_ {
        self.scores.iter().copied()
    }

    pub fn max(&self) -> Option<u32> {
        self.scores.iter().map(|&(_, score)| score).max()
    }
}
