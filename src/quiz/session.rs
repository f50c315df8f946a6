use std::fmt;

use rand::Rng;

use super::{resolver, CategoryId, Content, Question, ScoreState, SessionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    Resolved,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::NotStarted => f.write_str("not started"),
            Phase::InProgress => f.write_str("in progress"),
            Phase::Resolved => f.write_str("resolved"),
        }
    }
}

/// Where the player is in the question sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    /// Option indices chosen so far, one per answered question
    pub answers: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressView {
    pub index: usize,
    pub total: usize,
}

impl ProgressView {
    /// Fill of the progress bar, counting the question on screen as done.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (((self.index + 1) * 100) / self.total) as u32
    }
}

/// One quiz attempt. Every operation returns the next state and leaves
/// `self` untouched, so a failed call never changes anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    NotStarted,
    InProgress {
        progress: Progress,
        scores: ScoreState,
    },
    Resolved {
        winner: CategoryId,
        scores: ScoreState,
        answers: Vec<usize>,
    },
}

impl Session {
    pub fn phase(&self) -> Phase {
        match self {
            Session::NotStarted => Phase::NotStarted,
            Session::InProgress { .. } => Phase::InProgress,
            Session::Resolved { .. } => Phase::Resolved,
        }
    }

    pub fn start(&self, content: &Content) -> Result<Session, SessionError> {
        if !matches!(self, Session::NotStarted) {
            return Err(SessionError::OutOfSequence {
                action: "start",
                phase: self.phase(),
            });
        }

        log::debug!("Quiz started, {} questions", content.question_count());
        Ok(Session::InProgress {
            progress: Progress::default(),
            scores: ScoreState::zeroed(content.category_ids()),
        })
    }

    /// Scores the option at `index` of the current question and moves to the
    /// next question, or resolves the winner after the last one.
    pub fn answer<R: Rng + ?Sized>(
        &self,
        content: &Content,
        index: usize,
        rng: &mut R,
    ) -> Result<Session, SessionError> {
        let (progress, scores) = match self {
            Session::InProgress { progress, scores } => (progress, scores),
            _ => {
                return Err(SessionError::OutOfSequence {
                    action: "answer",
                    phase: self.phase(),
                })
            }
        };

        let question = content
            .question(progress.current)
            .ok_or(SessionError::QuestionMissing {
                progress: progress.current,
                total: content.question_count(),
            })?;
        let option = question
            .answers
            .get(index)
            .ok_or(SessionError::AnswerOutOfRange {
                index,
                available: question.answers.len(),
            })?;

        let scores = scores.apply_answer(option);
        let mut answers = progress.answers.clone();
        answers.push(index);

        if progress.current >= content.last_question_index() {
            let winner = resolver::resolve(&scores, rng).ok_or(SessionError::NoCategories)?;
            log::info!("Quiz resolved to {} with scores {:?}", winner, scores);
            return Ok(Session::Resolved {
                winner,
                scores,
                answers,
            });
        }

        log::debug!(
            "Question {} answered with option {}",
            question.id,
            index
        );
        Ok(Session::InProgress {
            progress: Progress {
                current: progress.current + 1,
                answers,
            },
            scores,
        })
    }

    pub fn restart(&self) -> Session {
        Session::NotStarted
    }

    pub fn current_question<'a>(&self, content: &'a Content) -> Option<&'a Question> {
        match self {
            Session::InProgress { progress, .. } => content.question(progress.current),
            _ => None,
        }
    }

    pub fn progress(&self, content: &Content) -> Option<ProgressView> {
        match self {
            Session::InProgress { progress, .. } => Some(ProgressView {
                index: progress.current,
                total: content.question_count(),
            }),
            _ => None,
        }
    }

    pub fn scores(&self) -> Option<&ScoreState> {
        match self {
            Session::NotStarted => None,
            Session::InProgress { scores, .. } | Session::Resolved { scores, .. } => Some(scores),
        }
    }

    pub fn answers(&self) -> &[usize] {
        match self {
            Session::NotStarted => &[],
            Session::InProgress { progress, .. } => &progress.answers,
            Session::Resolved { answers, .. } => answers,
        }
    }

    pub fn winner(&self) -> Option<CategoryId> {
        match self {
            Session::Resolved { winner, .. } => Some(*winner),
            _ => None,
        }
    }
}
