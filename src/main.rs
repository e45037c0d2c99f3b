mod terminal;

use std::error::Error;

use ai_llm_service::telemetry;
use colored::Colorize;
use med_answer::{AnswerPipeline, FollowupSet, History, QueryOrigin};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::Level;
use tracing_subscriber::{Layer, filter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::terminal::TerminalProgress;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file, if present.
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries the answer text.
    let env_filter = telemetry::env_filter_with_level("warn", Level::WARN);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(telemetry::layer())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter::filter_fn(|meta| {
                    !meta.target().starts_with(telemetry::TARGET_PREFIX)
                })),
        )
        .try_init()?;

    let pipeline = match AnswerPipeline::from_env() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e.user_message().red());
            return Err(e.into());
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        let query = args.join(" ");
        let progress = TerminalProgress::spinner();
        pipeline
            .process_query(&query, QueryOrigin::TopLevel, &progress)
            .await?;
        return Ok(());
    }

    run_repl(&pipeline).await
}

async fn run_repl(pipeline: &AnswerPipeline) -> Result<(), Box<dyn Error>> {
    println!("{}", "GLP-1 medication assistant".bold());
    println!(
        "{}",
        "Ask about dosage, side effects, storage, cost... (`history`, `quit`)".dimmed()
    );
    if pipeline.config().followups_enabled {
        println!("{}", "Type 1-3 to ask a suggested follow-up.".dimmed());
    }

    let mut history = History::new();
    let mut followups = FollowupSet::empty();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("\n{} ", ">".green().bold());
        std::io::Write::flush(&mut std::io::stdout())?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input {
            "quit" | "exit" => break,
            "history" => {
                print_history(&history);
                continue;
            }
            _ => {}
        }

        let (query, origin) = match pick_followup(&followups, input) {
            Some(q) => (q.to_string(), QueryOrigin::Followup),
            None => (input.to_string(), QueryOrigin::TopLevel),
        };

        let progress = TerminalProgress::spinner();
        match pipeline.process_query(&query, origin, &progress).await {
            Ok(outcome) => {
                // a follow-up answer keeps the previous suggestions on offer
                if origin == QueryOrigin::TopLevel {
                    followups = outcome.followups;
                }
                history.push(outcome.query, outcome.answer);
            }
            // already reported through the progress sink
            Err(_) => continue,
        }
    }

    Ok(())
}

/// `1`..`3` selects one of the current follow-up suggestions.
fn pick_followup<'a>(followups: &'a FollowupSet, input: &str) -> Option<&'a str> {
    let n: usize = input.parse().ok()?;
    followups.get(n.checked_sub(1)?)
}

fn print_history(history: &History) {
    if history.is_empty() {
        println!("{}", "No questions yet.".dimmed());
        return;
    }
    for (i, entry) in history.iter().enumerate() {
        println!(
            "{} {} {}",
            format!("{}.", i + 1).yellow(),
            entry.query,
            format!("[{}]", entry.answer.category()).dimmed()
        );
    }
}
