//! A runnable demo: one room, two questions, a scripted host.
//!
//! Start it, note the pin it logs, and point a WebSocket client at
//! `ws://127.0.0.1:9090` sending `{"type":"Subscribe","pin":"<pin>"}`
//! to watch the game play out. Players join and answer through the
//! coordinator API; this demo drives the host side on a timer so the
//! snapshot stream has something to show.

use std::time::Duration;

use quizcast::{Question, QuizServer, QuizcastError};
use tracing_subscriber::EnvFilter;

fn demo_questions() -> Vec<Question> {
    vec![
        Question::new(
            "Which tool installs Python packages?",
            vec!["pip".into(), "tar".into(), "ssh".into(), "vim".into()],
            0,
        ),
        Question::new(
            "HTTP status 200 means?",
            vec![
                "Not Found".into(),
                "Success".into(),
                "Server Error".into(),
                "Redirect".into(),
            ],
            1,
        ),
    ]
}

#[tokio::main]
async fn main() -> Result<(), QuizcastError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let server = QuizServer::builder().bind("127.0.0.1:9090").build().await?;
    let game = server.coordinator();

    let created = game.create_room("quizmaster", demo_questions()).await;
    let pin = created.pin.clone();
    tracing::info!(%pin, questions = created.question_count, "demo room ready");

    // Scripted host: wait for players, then run both rounds.
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(30)).await;

        if let Err(e) = game.start_game(&pin).await {
            tracing::error!(error = %e, "could not start game");
            return;
        }

        for _ in 0..2 {
            tokio::time::sleep(Duration::from_secs(25)).await;
            match game.advance_question(&pin).await {
                Ok(advanced) if advanced.finished => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(error = %e, "could not advance");
                    return;
                }
            }
        }

        match game.leaderboard(&pin).await {
            Ok(board) => {
                for (place, entry) in board.ranking.iter().enumerate() {
                    tracing::info!(
                        place = place + 1,
                        player = %entry.name,
                        score = entry.score,
                        "final ranking"
                    );
                }
            }
            Err(e) => tracing::error!(error = %e, "could not rank"),
        }
    });

    server.run().await
}
