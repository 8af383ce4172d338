use std::sync::{Arc, Mutex};

use quiz_core::model::QuestionImage;
use tokio::io::{AsyncBufReadExt, BufReader};
use ui::vm::{ErrorVm, QuizResultsVm, QuizStepVm};
use ui::{Presenter, UiAction, UiContext, UiEvent};

/// Button currently offered on screen, shared with the input loop.
type PendingAction = Arc<Mutex<Option<UiAction>>>;

/// Renders the quiz as plain text on stdout.
pub struct TerminalPresenter {
    pending: PendingAction,
}

impl TerminalPresenter {
    /// The presenter and the input loop that feeds its buttons back into `ctx`.
    pub fn new(ctx: UiContext) -> (Self, InputLoop) {
        let pending = PendingAction::default();
        let input = InputLoop {
            ctx,
            pending: Arc::clone(&pending),
        };
        (Self { pending }, input)
    }

    fn offer(&self, action: Option<UiAction>) {
        if let Ok(mut pending) = self.pending.lock() {
            *pending = action;
        }
    }
}

fn describe_image(image: &QuestionImage) -> String {
    match image {
        QuestionImage::Named(name) => format!("[poster: {name}]"),
        QuestionImage::Bytes(bytes) => format!("[poster: {} bytes]", bytes.len()),
    }
}

impl Presenter for TerminalPresenter {
    fn show_step(&mut self, step: QuizStepVm) {
        self.offer(None);
        println!();
        println!("Question {}", step.question_number);
        println!("{}", describe_image(&step.image));
        println!("{}", step.question);
    }

    fn show_answer_feedback(&mut self, is_correct: bool) {
        if is_correct {
            println!("Correct!");
        } else {
            println!("Wrong.");
        }
    }

    fn show_results(&mut self, results: QuizResultsVm) {
        println!();
        println!("{}", results.title);
        println!("{}", results.text);
        println!("[enter] {}  [q] quit", results.button_text);
        self.offer(Some(results.action));
    }

    fn show_loading(&mut self) {
        println!("Loading movies...");
    }

    fn hide_loading(&mut self) {}

    fn show_error(&mut self, error: ErrorVm) {
        println!();
        println!("{}", error.title);
        println!("{}", error.message);
        println!("[enter] {}  [q] quit", error.button_text);
        self.offer(Some(error.action));
    }

    fn set_answers_enabled(&mut self, enabled: bool) {
        if enabled {
            println!("[y] yes  [n] no  [q] quit");
        }
    }
}

/// Reads stdin line by line and posts the matching events.
pub struct InputLoop {
    ctx: UiContext,
    pending: PendingAction,
}

impl InputLoop {
    /// Runs until stdin closes or the user quits; either way the controller is told to stop.
    pub async fn run(self) {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(err) => {
                    tracing::warn!(error = %err, "stdin read failed");
                    break;
                }
            };

            let Some(event) = self.parse(&line) else {
                continue;
            };
            let quit = event == UiEvent::Shutdown;
            if !self.ctx.post(event) || quit {
                return;
            }
        }
        self.ctx.post(UiEvent::Shutdown);
    }

    fn parse(&self, line: &str) -> Option<UiEvent> {
        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Some(UiEvent::Answer(true)),
            "n" | "no" => Some(UiEvent::Answer(false)),
            "q" | "quit" => Some(UiEvent::Shutdown),
            "" => self
                .pending
                .lock()
                .ok()
                .and_then(|mut pending| pending.take())
                .map(UiEvent::Action),
            other => {
                tracing::debug!(input = other, "unrecognised input");
                None
            }
        }
    }
}
