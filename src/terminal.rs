//! Terminal rendering for a running query.

use std::{
    io::{self, Write},
    sync::Mutex,
    time::Duration,
};

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use med_answer::{Progress, QueryCategory, QueryOutcome};

/// Spinner until the first text arrives, then prints the body as it grows.
pub struct TerminalProgress {
    pb: ProgressBar,
    printed: Mutex<usize>,
}

impl TerminalProgress {
    pub fn spinner() -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            pb.set_style(style.tick_chars("-\\|/ "));
        }
        pb.set_message("Searching medical knowledge base...");
        pb.enable_steady_tick(Duration::from_millis(80));
        Self::with_bar(pb)
    }

    fn with_bar(pb: ProgressBar) -> Self {
        Self {
            pb,
            printed: Mutex::new(0),
        }
    }

    /// `true` once any non-blank body text reached the terminal.
    fn streamed_text(&self) -> bool {
        self.printed.lock().map(|p| *p > 0).unwrap_or(false)
    }

    fn stop_spinner(&self) {
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
    }
}

impl Progress for TerminalProgress {
    fn partial(&self, category: QueryCategory, body: &str) {
        let Ok(mut printed) = self.printed.lock() else {
            return;
        };
        let suffix = if *printed == 0 {
            // whitespace alone may still turn into the apology
            if body.trim().is_empty() {
                return;
            }
            self.stop_spinner();
            println!("{}", category_tag(category));
            body.trim_start()
        } else {
            // the body only ever grows
            match body.get(*printed..) {
                Some(s) => s,
                None => return,
            }
        };
        print!("{suffix}");
        let _ = io::stdout().flush();
        *printed = body.len();
    }

    fn finished(&self, outcome: &QueryOutcome) {
        self.stop_spinner();
        if self.streamed_text() {
            println!();
        } else {
            // nothing streamed (apology text)
            println!("{}", category_tag(outcome.answer.category()));
            println!("{}", outcome.answer.body_text());
        }
        render_sources(outcome);
        render_followups(outcome);
    }

    fn failed(&self, message: &str) {
        self.stop_spinner();
        eprintln!("{}", message.red());
    }
}

fn category_tag(category: QueryCategory) -> String {
    format!("[{}]", category.as_str().to_uppercase())
        .bold()
        .cyan()
        .to_string()
}

fn render_sources(outcome: &QueryOutcome) {
    let sources = outcome.answer.sources();
    if sources.is_empty() {
        return;
    }
    println!("\n{}", "Sources".bold());
    for s in sources {
        println!("  {} {} {}", format!("[{}]", s.ordinal).yellow(), s.title, s.url.dimmed());
    }
}

fn render_followups(outcome: &QueryOutcome) {
    if outcome.followups.is_empty() {
        return;
    }
    println!("\n{}", "You might also ask:".bold());
    for (i, q) in outcome.followups.questions().iter().enumerate() {
        println!("  {} {q}", format!("{}.", i + 1).green());
    }
}
