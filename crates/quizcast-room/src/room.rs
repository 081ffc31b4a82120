//! A single quiz room: players, questions, and the round state machine.
//!
//! `Room` is plain data plus transition methods — no locks, no clocks, no
//! I/O. Every transition takes `now: Instant` explicitly so the state
//! machine is fully deterministic under test; only the coordinator reads
//! the real clock. The coordinator serializes access with one
//! `tokio::sync::Mutex` per room, which is what makes these `&mut self`
//! methods safe against concurrent submits and timer callbacks.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use quizcast_protocol::{PlayerView, Question, RoomPin, StateSnapshot};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::{scoring, RoomError, RoomPhase, StateError};

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

/// One player in one room. The name is the sole identity key — a repeat
/// join with the same name is a reconnect, not a new player.
#[derive(Debug, Clone)]
pub struct Player {
    name: String,
    score: u32,
    last_answer_correct: Option<bool>,
    /// Join sequence within the room; the documented leaderboard tiebreak.
    joined_order: u64,
}

impl Player {
    fn new(name: &str, joined_order: u64) -> Self {
        Self {
            name: name.to_string(),
            score: 0,
            last_answer_correct: None,
            joined_order,
        }
    }

    /// The player's accumulated score. Never decreases.
    pub fn score(&self) -> u32 {
        self.score
    }

    fn view(&self) -> PlayerView {
        PlayerView {
            name: self.name.clone(),
            score: self.score,
            last_answer_correct: self.last_answer_correct,
        }
    }
}

// ---------------------------------------------------------------------------
// Operation results
// ---------------------------------------------------------------------------

/// Round bookkeeping returned when a round begins, consumed by the
/// coordinator to schedule the matching auto-lock timer.
#[derive(Debug, Clone, Copy)]
pub struct RoundStart {
    /// Identifies the round; a timer whose captured id no longer matches
    /// the room's is stale and must do nothing.
    pub round_id: u64,
    /// Absolute deadline for this round.
    pub ends_at: Instant,
}

/// Outcome of an accepted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    /// Whether the chosen index matched the question's answer.
    pub correct: bool,
    /// The player's total score after this answer.
    pub score: u32,
    /// Points earned by this answer (0 when incorrect).
    pub bonus: u32,
}

/// Outcome of a host advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceResult {
    /// The current question index after the call.
    pub current_question: usize,
    /// `true` once the room is past its last question. Repeat advances
    /// on a finished room keep reporting `true` without moving the index.
    pub finished: bool,
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub name: String,
    pub score: u32,
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// All state for one room. See the module docs for the locking model.
#[derive(Debug)]
pub struct Room {
    pin: RoomPin,
    host_name: String,
    players: HashMap<String, Player>,
    /// Fixed at creation, never mutated.
    questions: Vec<Question>,
    current_question: usize,
    started: bool,
    question_locked: bool,
    question_ends_at: Option<Instant>,
    /// Names that answered in the current round. Cleared at round start,
    /// only grows within a round.
    answered: HashSet<String>,
    /// Bumped at every round start; stale-timer invalidation token.
    round_id: u64,
    finished: bool,
}

impl Room {
    pub(crate) fn new(
        pin: RoomPin,
        host_name: String,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            pin,
            host_name,
            players: HashMap::new(),
            questions,
            current_question: 0,
            started: false,
            question_locked: false,
            question_ends_at: None,
            answered: HashSet::new(),
            round_id: 0,
            finished: false,
        }
    }

    pub fn pin(&self) -> &RoomPin {
        &self.pin
    }

    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn round_id(&self) -> u64 {
        self.round_id
    }

    pub fn is_locked(&self) -> bool {
        self.question_locked
    }

    /// The derived lifecycle phase.
    pub fn phase(&self) -> RoomPhase {
        if !self.started {
            RoomPhase::Lobby
        } else if self.finished {
            RoomPhase::Finished
        } else if self.question_locked {
            RoomPhase::RoundLocked
        } else {
            RoomPhase::RoundActive
        }
    }

    // -- Transitions ------------------------------------------------------

    /// Ensures a player named `name` exists. Returns `true` if the player
    /// was already present (a reconnect).
    pub(crate) fn join(&mut self, name: &str) -> bool {
        if self.players.contains_key(name) {
            return true;
        }
        let order = self.players.len() as u64;
        self.players.insert(name.to_string(), Player::new(name, order));
        false
    }

    /// Starts (or restarts) the game from question 0 and begins round 1.
    ///
    /// Deliberately not guarded: a second call restarts the whole game.
    pub(crate) fn start_game(
        &mut self,
        now: Instant,
        duration: Duration,
    ) -> RoundStart {
        self.started = true;
        self.finished = false;
        self.current_question = 0;
        self.reset_answer_marks();
        self.begin_round(now, duration)
    }

    /// Opens the current question for answers: unlocks, arms the deadline,
    /// clears the answered set, and bumps `round_id` so any timer from a
    /// previous round becomes a no-op.
    pub(crate) fn begin_round(
        &mut self,
        now: Instant,
        duration: Duration,
    ) -> RoundStart {
        self.question_locked = false;
        let ends_at = now + duration;
        self.question_ends_at = Some(ends_at);
        self.answered.clear();
        self.round_id += 1;
        RoundStart {
            round_id: self.round_id,
            ends_at,
        }
    }

    /// Locks the current question against further answers. Monotonic
    /// within a round; only `begin_round` unlocks.
    pub(crate) fn lock_question(&mut self) {
        self.question_locked = true;
    }

    /// Processes one answer at time `now`.
    ///
    /// Check order mirrors the original server: started → player →
    /// locked → already-answered → deadline. A submit that arrives past
    /// the deadline locks the question *and then* fails with `TimeUp`;
    /// the lock persists (side-effecting failure, part of the contract).
    pub(crate) fn submit(
        &mut self,
        name: &str,
        choice: usize,
        now: Instant,
    ) -> Result<AnswerResult, RoomError> {
        if !self.started {
            return Err(StateError::NotStarted.into());
        }
        let Some(player) = self.players.get_mut(name) else {
            return Err(RoomError::PlayerNotFound(name.to_string()));
        };
        if self.question_locked {
            return Err(StateError::Locked.into());
        }
        if self.answered.contains(name) {
            return Err(StateError::AlreadyAnswered.into());
        }
        if let Some(ends_at) = self.question_ends_at {
            if now >= ends_at {
                self.question_locked = true;
                return Err(StateError::TimeUp.into());
            }
        }

        let correct = self
            .questions
            .get(self.current_question)
            .is_some_and(|q| q.correct_index == choice);
        player.last_answer_correct = Some(correct);
        self.answered.insert(name.to_string());

        let mut bonus = 0;
        if correct {
            let secs = scoring::seconds_left(self.question_ends_at, now);
            bonus = scoring::bonus(secs);
            player.score += bonus;
        }

        Ok(AnswerResult {
            correct,
            score: player.score,
            bonus,
        })
    }

    /// Moves to the next question, or finishes the game on the last one.
    ///
    /// Returns the result plus, for a non-terminal advance, the new
    /// round's bookkeeping so the caller can schedule its timer.
    pub(crate) fn advance(
        &mut self,
        now: Instant,
        duration: Duration,
    ) -> (AdvanceResult, Option<RoundStart>) {
        if self.current_question + 1 < self.questions.len() {
            self.current_question += 1;
            self.reset_answer_marks();
            let round = self.begin_round(now, duration);
            let result = AdvanceResult {
                current_question: self.current_question,
                finished: false,
            };
            (result, Some(round))
        } else {
            // Terminal: lock in place, index stays on the last question.
            self.question_locked = true;
            self.finished = true;
            let result = AdvanceResult {
                current_question: self.current_question,
                finished: true,
            };
            (result, None)
        }
    }

    fn reset_answer_marks(&mut self) {
        for player in self.players.values_mut() {
            player.last_answer_correct = None;
        }
    }

    // -- Read views -------------------------------------------------------

    /// Players ranked by score descending; equal scores keep join order.
    pub fn leaderboard(&self) -> Vec<RankEntry> {
        let mut ranked: Vec<&Player> = self.players.values().collect();
        ranked.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.joined_order.cmp(&b.joined_order))
        });
        ranked
            .into_iter()
            .map(|p| RankEntry {
                name: p.name.clone(),
                score: p.score,
            })
            .collect()
    }

    /// Captures a complete, consistent snapshot of the room at `now`.
    ///
    /// Caller holds the room lock, so the snapshot reflects one instant —
    /// subscribers can never observe a torn state. The current question's
    /// `correct_index` is deliberately absent.
    pub fn snapshot(&self, now: Instant, duration: Duration) -> StateSnapshot {
        let (question, choices) = match self.questions.get(self.current_question)
        {
            Some(q) => (q.text.clone(), q.choices.clone()),
            None => (String::new(), Vec::new()),
        };

        let mut players: Vec<&Player> = self.players.values().collect();
        players.sort_by_key(|p| p.joined_order);

        StateSnapshot {
            pin: self.pin.clone(),
            started: self.started,
            current_question: self.current_question,
            question,
            choices,
            question_locked: self.question_locked,
            seconds_left: scoring::seconds_left(self.question_ends_at, now),
            question_duration: duration.as_secs(),
            answered_count: self.answered.len(),
            players: players.into_iter().map(Player::view).collect(),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
