use async_trait::async_trait;
use log::debug;
use rand::Rng;

use super::{QuizError, QuizRepository, QuizResult};

/// Where answers come from. Asking is the only point where a session waits.
#[async_trait(?Send)]
pub trait AnswerSource {
    async fn ask_question(&mut self, question: &str) -> QuizResult<String>;
}

/// Result notifications emitted while a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    /// `score` is the running total during play and `None` for a single test.
    Correct { score: Option<u32> },
    Incorrect,
    /// `exhausted` is set when every quiz was answered.
    FinalScore { score: u32, exhausted: bool },
}

pub trait Reporter {
    fn report(&mut self, report: Report);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestOutcome {
    pub correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayOutcome {
    pub won: bool,
    pub score: u32,
}

/// Asks the quiz `id` once.
pub async fn run_test<C>(repo: &QuizRepository, id: usize, io: &mut C) -> QuizResult<TestOutcome>
where
    C: AnswerSource + Reporter + ?Sized,
{
    let quiz = repo.get(id)?;
    let answer = io.ask_question(&quiz.question).await?;
    let correct = quiz.is_answered_by(&answer);
    debug!("Test of quiz {} answered, correct: {}", id, correct);

    if correct {
        io.report(Report::Correct { score: None });
    } else {
        io.report(Report::Incorrect);
    }
    Ok(TestOutcome { correct })
}

/// Asks every quiz once in random order until all are answered or one is missed.
pub async fn run_play<C, G>(repo: &QuizRepository, io: &mut C, rng: &mut G) -> QuizResult<PlayOutcome>
where
    C: AnswerSource + Reporter + ?Sized,
    G: Rng + ?Sized,
{
    let mut session = PlaySession::new(repo.count());

    while let Some(id) = session.select(rng)? {
        let quiz = repo.get(id)?;
        let answer = io.ask_question(&quiz.question).await?;
        if session.answer(quiz.is_answered_by(&answer))? {
            io.report(Report::Correct {
                score: Some(session.score()),
            });
        } else {
            io.report(Report::Incorrect);
        }
    }

    let outcome = session
        .outcome()
        .ok_or(QuizError::InvalidState("play loop ended before the session finished"))?;
    io.report(Report::FinalScore {
        score: outcome.score,
        exhausted: outcome.won,
    });
    Ok(outcome)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Selecting,
    /// `slot` is the position of `id` in the pending list.
    AwaitingAnswer { id: usize, slot: usize },
    Finished { won: bool, score: u32 },
}

#[derive(Debug, Clone)]
pub struct PlaySession {
    pending: Vec<usize>,
    score: u32,
    state: PlayState,
}

impl PlaySession {
    /// Starts a session over ids `0..count`.
    pub fn new(count: usize) -> Self {
        Self {
            pending: (0..count).collect(),
            score: 0,
            state: PlayState::Selecting,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    #[cfg(test)]
    pub fn pending(&self) -> &[usize] {
        &self.pending
    }

    pub fn outcome(&self) -> Option<PlayOutcome> {
        match self.state {
            PlayState::Finished { won, score } => Some(PlayOutcome { won, score }),
            _ => None,
        }
    }

    /// Picks the next id to ask, or finishes the session when nothing is left.
    pub fn select<G: Rng + ?Sized>(&mut self, rng: &mut G) -> QuizResult<Option<usize>> {
        match self.state {
            PlayState::Selecting => {}
            PlayState::Finished { .. } => return Ok(None),
            PlayState::AwaitingAnswer { .. } => {
                return Err(QuizError::InvalidState("an answer is still pending"));
            }
        }

        if self.pending.is_empty() {
            debug!("Play session exhausted with score {}", self.score);
            self.state = PlayState::Finished {
                won: true,
                score: self.score,
            };
            return Ok(None);
        }

        let slot = rng.gen_range(0..self.pending.len());
        let id = self.pending[slot];
        debug!("Play session selected quiz {}", id);
        self.state = PlayState::AwaitingAnswer { id, slot };
        Ok(Some(id))
    }

    /// Records whether the pending question was answered correctly and returns it.
    pub fn answer(&mut self, correct: bool) -> QuizResult<bool> {
        let slot = match self.state {
            PlayState::AwaitingAnswer { slot, .. } => slot,
            _ => return Err(QuizError::InvalidState("no question is awaiting an answer")),
        };

        if correct {
            self.score += 1;
            self.pending.swap_remove(slot);
            self.state = PlayState::Selecting;
        } else {
            debug!("Play session lost with score {}", self.score);
            self.state = PlayState::Finished {
                won: false,
                score: self.score,
            };
        }
        Ok(correct)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::quiz::Quiz;

    /// Replies with a fixed list of answers in order, then with the right
    /// answer for any question it knows.
    #[derive(Default)]
    struct ScriptedPlayer {
        by_question: Vec<(String, String)>,
        queue: VecDeque<String>,
        asked: Vec<String>,
        reports: Vec<Report>,
    }

    impl ScriptedPlayer {
        fn knowing(repo: &QuizRepository) -> Self {
            Self {
                by_question: repo
                    .all()
                    .map(|(_, q)| (q.question.clone(), q.answer.clone()))
                    .collect(),
                ..Default::default()
            }
        }

        fn in_order(answers: &[&str]) -> Self {
            Self {
                queue: answers.iter().map(|a| a.to_string()).collect(),
                ..Default::default()
            }
        }
    }

    #[async_trait(?Send)]
    impl AnswerSource for ScriptedPlayer {
        async fn ask_question(&mut self, question: &str) -> QuizResult<String> {
            self.asked.push(question.to_string());
            if let Some(answer) = self.queue.pop_front() {
                return Ok(answer);
            }
            self.by_question
                .iter()
                .find(|(q, _)| q == question)
                .map(|(_, a)| a.clone())
                .ok_or(QuizError::InputClosed)
        }
    }

    impl Reporter for ScriptedPlayer {
        fn report(&mut self, report: Report) {
            self.reports.push(report);
        }
    }

    fn scenario() -> QuizRepository {
        QuizRepository::new(vec![
            Quiz::new("2+2?", "4"),
            Quiz::new("capital of France?", "Paris"),
        ])
    }

    fn numbered(n: usize) -> QuizRepository {
        QuizRepository::new(
            (0..n)
                .map(|i| Quiz::new(format!("question {}", i), format!("answer {}", i)))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_session_reports_correct() {
        let repo = scenario();

        let mut player = ScriptedPlayer::in_order(&["4", "  paris "]);
        let outcome = run_test(&repo, 0, &mut player).await.unwrap();
        assert!(outcome.correct);
        let outcome = run_test(&repo, 1, &mut player).await.unwrap();
        assert!(outcome.correct);

        assert_eq!(player.asked, vec!["2+2?", "capital of France?"]);
        assert_eq!(
            player.reports,
            vec![Report::Correct { score: None }, Report::Correct { score: None }]
        );
    }

    #[tokio::test]
    async fn test_session_reports_incorrect() {
        let repo = scenario();
        let mut player = ScriptedPlayer::in_order(&["5"]);
        let outcome = run_test(&repo, 0, &mut player).await.unwrap();
        assert!(!outcome.correct);
        assert_eq!(player.reports, vec![Report::Incorrect]);
    }

    #[tokio::test]
    async fn test_session_propagates_not_found_without_asking() {
        let repo = scenario();
        let mut player = ScriptedPlayer::in_order(&["4"]);
        let result = run_test(&repo, 5, &mut player).await;
        assert!(matches!(result, Err(QuizError::NotFound(_))));
        assert!(player.asked.is_empty());
        assert!(player.reports.is_empty());
    }

    #[tokio::test]
    async fn play_all_correct_wins() {
        let repo = scenario();
        let mut player = ScriptedPlayer::knowing(&repo);
        let mut rng = StdRng::seed_from_u64(7);

        let outcome = run_play(&repo, &mut player, &mut rng).await.unwrap();
        assert_eq!(outcome, PlayOutcome { won: true, score: 2 });
        assert_eq!(
            player.reports,
            vec![
                Report::Correct { score: Some(1) },
                Report::Correct { score: Some(2) },
                Report::FinalScore {
                    score: 2,
                    exhausted: true
                },
            ]
        );
    }

    #[tokio::test]
    async fn play_first_wrong_answer_loses_with_zero() {
        let repo = scenario();
        let mut player = ScriptedPlayer::in_order(&["wrong"]);
        let mut rng = StdRng::seed_from_u64(3);

        let outcome = run_play(&repo, &mut player, &mut rng).await.unwrap();
        assert_eq!(outcome, PlayOutcome { won: false, score: 0 });
        assert_eq!(player.asked.len(), 1);
        assert_eq!(
            player.reports,
            vec![
                Report::Incorrect,
                Report::FinalScore {
                    score: 0,
                    exhausted: false
                },
            ]
        );
    }

    #[tokio::test]
    async fn play_asks_every_quiz_exactly_once() {
        let repo = numbered(25);
        for seed in 0..10 {
            let mut player = ScriptedPlayer::knowing(&repo);
            let mut rng = StdRng::seed_from_u64(seed);

            let outcome = run_play(&repo, &mut player, &mut rng).await.unwrap();
            assert_eq!(outcome, PlayOutcome { won: true, score: 25 });

            let distinct: HashSet<_> = player.asked.iter().collect();
            assert_eq!(player.asked.len(), 25);
            assert_eq!(distinct.len(), 25);
        }
    }

    #[test]
    fn play_stops_at_first_wrong_answer() {
        let repo = numbered(10);
        let mut session = PlaySession::new(repo.count());
        let mut rng = StdRng::seed_from_u64(11);
        let mut asked = Vec::new();

        // Three correct answers, then a miss.
        for round in 0..4 {
            let id = session.select(&mut rng).unwrap().unwrap();
            asked.push(id);
            session.answer(round < 3).unwrap();
        }

        assert_eq!(session.outcome(), Some(PlayOutcome { won: false, score: 3 }));
        assert_eq!(session.select(&mut rng).unwrap(), None);
        assert_eq!(asked.len(), 4);
        let distinct: HashSet<_> = asked.iter().collect();
        assert_eq!(distinct.len(), 4);
    }

    #[tokio::test]
    async fn play_on_empty_repository_wins_immediately() {
        let repo = QuizRepository::default();
        let mut player = ScriptedPlayer::default();
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = run_play(&repo, &mut player, &mut rng).await.unwrap();
        assert_eq!(outcome, PlayOutcome { won: true, score: 0 });
        assert!(player.asked.is_empty());
        assert_eq!(
            player.reports,
            vec![Report::FinalScore {
                score: 0,
                exhausted: true
            }]
        );
    }

    #[tokio::test]
    async fn play_propagates_closed_input() {
        let repo = scenario();
        let mut player = ScriptedPlayer::default();
        let mut rng = StdRng::seed_from_u64(5);

        let result = run_play(&repo, &mut player, &mut rng).await;
        assert!(matches!(result, Err(QuizError::InputClosed)));
        assert!(player.reports.is_empty());
    }

    #[test]
    fn pending_shrinks_only_on_correct_answers() {
        let mut session = PlaySession::new(3);
        let mut rng = StdRng::seed_from_u64(42);

        let first = session.select(&mut rng).unwrap().unwrap();
        assert!(matches!(session.state(), PlayState::AwaitingAnswer { id, .. } if id == first));
        session.answer(true).unwrap();
        assert_eq!(session.pending().len(), 2);
        assert!(!session.pending().contains(&first));
        assert_eq!(session.state(), PlayState::Selecting);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn misuse_is_rejected_without_changing_state() {
        let mut session = PlaySession::new(2);
        let mut rng = StdRng::seed_from_u64(9);

        assert!(matches!(session.answer(true), Err(QuizError::InvalidState(_))));
        assert_eq!(session.state(), PlayState::Selecting);

        session.select(&mut rng).unwrap();
        let waiting = session.state();
        assert!(matches!(session.select(&mut rng), Err(QuizError::InvalidState(_))));
        assert_eq!(session.state(), waiting);
    }

    #[test]
    fn selection_can_reach_every_pending_id() {
        let mut seen = HashSet::new();
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..200 {
            let mut session = PlaySession::new(4);
            seen.insert(session.select(&mut rng).unwrap().unwrap());
        }
        assert_eq!(seen.len(), 4);
    }
}
