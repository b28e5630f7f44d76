//! Console reporter for barrier events
//!
//! Message lines and poll results go to stdout, failures to stderr.

use barrier_application::{BarrierError, BarrierReporter, Direction};
use barrier_domain::ParticipantId;
use colored::Colorize;

/// Prints one line per protocol event
pub struct ConsoleReporter {
    color: bool,
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            color: true,
            quiet: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Suppress per-message lines
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn actor_label(&self, actor: ParticipantId) -> String {
        let label = format!("{} ({})", actor.role().as_str().to_uppercase(), actor);
        if !self.color {
            return label;
        }
        if actor.is_controller() {
            label.cyan().bold().to_string()
        } else {
            label.yellow().to_string()
        }
    }

    /// `WORKER (2): has received "::REQUEST::"`
    pub fn message_line(&self, actor: ParticipantId, direction: Direction, token: &str) -> String {
        format!(
            "{}: has {} \"{}\"",
            self.actor_label(actor),
            direction,
            token
        )
    }

    pub fn poll_line(&self, worker: ParticipantId) -> String {
        let line = format!("Poll #{} has been successfully accomplished", worker);
        if self.color {
            line.green().to_string()
        } else {
            line
        }
    }

    /// `<actor>: <cause> (<operation>)`
    pub fn failure_line(&self, actor: ParticipantId, error: &BarrierError) -> String {
        let cause = if self.color {
            error.to_string().red().to_string()
        } else {
            error.to_string()
        };
        format!("{}: {} ({})", self.actor_label(actor), cause, error.operation())
    }

    /// Completion line, preceded by a blank line
    pub fn done_line(&self) -> String {
        let done = if self.color {
            "Done.".bold().to_string()
        } else {
            "Done.".to_string()
        };
        format!("\n{}", done)
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl BarrierReporter for ConsoleReporter {
    fn on_message(&self, actor: ParticipantId, direction: Direction, token: &str) {
        if !self.quiet {
            println!("{}", self.message_line(actor, direction, token));
        }
    }

    fn on_poll_success(&self, worker: ParticipantId) {
        println!("{}", self.poll_line(worker));
    }

    fn on_failure(&self, actor: ParticipantId, error: &BarrierError) {
        eprintln!("{}", self.failure_line(actor, error));
    }

    fn on_complete(&self) {
        println!("{}", self.done_line());
    }
}
