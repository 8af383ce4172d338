use crate::vm::{ErrorVm, QuizResultsVm, QuizStepVm};

/// What the quiz screen must be able to show.
///
/// Implementations only render; they never read quiz state. Buttons on results and error
/// screens post the view-model's `action` back through the `UiContext`.
pub trait Presenter: Send {
    fn show_step(&mut self, step: QuizStepVm);

    /// Flash the outcome of the answer just given.
    fn show_answer_feedback(&mut self, is_correct: bool);

    fn show_results(&mut self, results: QuizResultsVm);

    fn show_loading(&mut self);

    fn hide_loading(&mut self);

    fn show_error(&mut self, error: ErrorVm);

    /// Enable or disable the yes/no buttons.
    fn set_answers_enabled(&mut self, enabled: bool);
}
