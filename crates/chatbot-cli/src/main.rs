mod client;
mod transcript;

use std::io::Write;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use client::ChatClient;
use transcript::{parse_input, Input, Sender, Transcript, GREETING};

const DEFAULT_URL: &str = "http://127.0.0.1:4000/chatbot";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // stdout carries the conversation; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let url = std::env::var("CHATBOT_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
    let timeout = std::env::var("CHATBOT_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(60));
    let client = ChatClient::new(url, timeout)?;
    info!(url = client.url(), "chat client configured");

    println!("StudyNotion Assistant");
    println!("Ask about courses, categories, pricing & navigation. /history replays, /reset clears, /quit exits.");
    println!("{GREETING}");

    let mut transcript = Transcript::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Empty => continue,
            Input::Quit => break,
            Input::Reset => {
                if !transcript.is_empty() {
                    info!(cleared = transcript.len(), "transcript reset");
                }
                transcript.clear();
                println!("{GREETING}");
            }
            Input::History => {
                if transcript.is_empty() {
                    println!("(no messages yet)\n");
                } else {
                    println!("{}\n", transcript.render_all());
                }
            }
            Input::Message(text) => {
                transcript.push(Sender::User, text);
                println!("Thinking...");
                let reply = match client.ask(text).await {
                    Ok(reply) => reply,
                    Err(e) => {
                        warn!(error = %e, "chat request failed");
                        format!("❌ {}", e.user_message())
                    }
                };
                transcript.push(Sender::Bot, reply);
                if let Some(rendered) = transcript.render_last() {
                    println!("{rendered}\n");
                }
            }
        }
    }

    Ok(())
}
