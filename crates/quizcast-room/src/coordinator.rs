//! The game coordinator: the one entry point for host and player actions.
//!
//! Every mutating operation follows the same shape: resolve the room,
//! apply the transition under the room lock, release the lock, then
//! broadcast the new state. Timers are armed after the lock is released,
//! so a timer callback can never deadlock against the operation that
//! scheduled it.

use std::sync::Arc;

use quizcast_protocol::{Question, RoomPin, StateSnapshot};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::{
    AnswerResult, BroadcastHub, PinGenerator, RankEntry, RoomConfig, RoomError,
    RoomRegistry, RoundTimer, StateError,
};

/// Returned by [`GameCoordinator::create_room`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomCreated {
    pub pin: RoomPin,
    pub host_name: String,
    pub question_count: usize,
}

/// Returned by [`GameCoordinator::join_room`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomJoined {
    pub pin: RoomPin,
    /// Players in the room after this join (the host is not a player).
    pub player_count: usize,
    /// `true` when the name was already present and this was a reconnect.
    pub reconnected: bool,
}

/// Returned by [`GameCoordinator::advance_question`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuestionAdvanced {
    pub current_question: usize,
    pub finished: bool,
}

/// Returned by [`GameCoordinator::leaderboard`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaderboard {
    pub pin: RoomPin,
    pub ranking: Vec<RankEntry>,
}

/// Drives rooms through their lifecycle and keeps subscribers current.
///
/// Cheap to clone; all clones share the same registry, hub, and timers.
#[derive(Debug, Clone)]
pub struct GameCoordinator {
    registry: Arc<RoomRegistry>,
    hub: Arc<BroadcastHub>,
    timer: RoundTimer,
    config: RoomConfig,
}

impl GameCoordinator {
    pub fn new(config: RoomConfig) -> Self {
        let config = config.validated();
        let registry =
            Arc::new(RoomRegistry::new(PinGenerator::new(config.pin_length)));
        let hub =
            Arc::new(BroadcastHub::new(Arc::clone(&registry), config));
        let timer = RoundTimer::new(Arc::clone(&registry), Arc::clone(&hub));
        Self {
            registry,
            hub,
            timer,
            config,
        }
    }

    /// The hub, for wiring subscriber transports.
    pub fn hub(&self) -> &Arc<BroadcastHub> {
        &self.hub
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub async fn room_count(&self) -> usize {
        self.registry.room_count().await
    }

    /// Creates a room hosted by `host_name`. The host controls the game
    /// but is not a player; they join like anyone else if they want to
    /// compete.
    pub async fn create_room(
        &self,
        host_name: &str,
        questions: Vec<Question>,
    ) -> RoomCreated {
        if questions.is_empty() {
            tracing::warn!(host = host_name, "room created with no questions");
        }
        let question_count = questions.len();
        let pin = self.registry.create(host_name.to_string(), questions).await;
        self.hub.register(pin.clone()).await;
        RoomCreated {
            pin,
            host_name: host_name.to_string(),
            question_count,
        }
    }

    /// Adds `name` to the room, or reconnects them if already present.
    ///
    /// Joining does not broadcast; the lobby roster reaches subscribers
    /// with the next state change.
    pub async fn join_room(
        &self,
        pin: &RoomPin,
        name: &str,
    ) -> Result<RoomJoined, RoomError> {
        let room = self.registry.get(pin).await?;
        let mut room = room.lock().await;
        let reconnected = room.join(name);
        if reconnected {
            tracing::debug!(%pin, player = name, "player reconnected");
        } else {
            tracing::info!(%pin, player = name, "player joined");
        }
        Ok(RoomJoined {
            pin: pin.clone(),
            player_count: room.player_count(),
            reconnected,
        })
    }

    /// Starts the game, or restarts it from question 0 if already
    /// running. Arms the first round's auto-lock timer.
    pub async fn start_game(&self, pin: &RoomPin) -> Result<(), RoomError> {
        let room = self.registry.get(pin).await?;
        let round = {
            let mut room = room.lock().await;
            room.start_game(Instant::now(), self.config.question_duration)
        };
        tracing::info!(%pin, round_id = round.round_id, "game started");
        self.hub.broadcast(pin).await;
        self.timer.schedule(pin.clone(), round.round_id, round.ends_at);
        Ok(())
    }

    /// Submits `name`'s answer to the current question.
    ///
    /// Broadcasts on success, and also on a `TimeUp` failure: a late
    /// submit locks the question, and that lock is new state the
    /// subscribers need to see.
    pub async fn submit_answer(
        &self,
        pin: &RoomPin,
        name: &str,
        choice: usize,
    ) -> Result<AnswerResult, RoomError> {
        let room = self.registry.get(pin).await?;
        let result = {
            let mut room = room.lock().await;
            room.submit(name, choice, Instant::now())
        };
        match &result {
            Ok(answer) => {
                tracing::debug!(
                    %pin,
                    player = name,
                    correct = answer.correct,
                    bonus = answer.bonus,
                    "answer accepted"
                );
                self.hub.broadcast(pin).await;
            }
            Err(RoomError::InvalidState(StateError::TimeUp)) => {
                tracing::debug!(%pin, player = name, "late answer locked round");
                self.hub.broadcast(pin).await;
            }
            Err(_) => {}
        }
        result
    }

    /// Advances to the next question, or finishes the game after the
    /// last one. Arms the new round's timer when one starts.
    pub async fn advance_question(
        &self,
        pin: &RoomPin,
    ) -> Result<QuestionAdvanced, RoomError> {
        let room = self.registry.get(pin).await?;
        let (result, round) = {
            let mut room = room.lock().await;
            room.advance(Instant::now(), self.config.question_duration)
        };
        if result.finished {
            tracing::info!(%pin, "game finished");
        } else {
            tracing::info!(%pin, question = result.current_question, "question advanced");
        }
        self.hub.broadcast(pin).await;
        if let Some(round) = round {
            self.timer.schedule(pin.clone(), round.round_id, round.ends_at);
        }
        Ok(QuestionAdvanced {
            current_question: result.current_question,
            finished: result.finished,
        })
    }

    /// The current ranking, best first.
    pub async fn leaderboard(
        &self,
        pin: &RoomPin,
    ) -> Result<Leaderboard, RoomError> {
        let room = self.registry.get(pin).await?;
        let ranking = room.lock().await.leaderboard();
        Ok(Leaderboard {
            pin: pin.clone(),
            ranking,
        })
    }

    /// The room's current snapshot, without broadcasting it.
    pub async fn snapshot(
        &self,
        pin: &RoomPin,
    ) -> Result<StateSnapshot, RoomError> {
        self.hub.snapshot(pin).await
    }
}

impl Default for GameCoordinator {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}
