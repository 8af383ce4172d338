use std::fmt;
use std::sync::Arc;

use quiz_core::model::RoundSettings;
use services::{QuestionSource, QuizRound, RoundStep, SourceEvent, StatisticService, Ticket};

use crate::context::{UiAction, UiContext, UiEvent, UiReceiver};
use crate::presenter::Presenter;
use crate::vm::{ErrorVm, QuizResultsVm, QuizStepVm, RoundResults};

/// How a session gets going after `UiEvent::Start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    /// Ask for the first question right away.
    Immediate,
    /// Have the source load its data first; failures show a retryable error.
    LoadThenPlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    LoadingData,
    LoadFailed,
    AwaitingQuestion,
    PresentingQuestion,
    ShowingAnswerFeedback,
    RoundComplete,
}

/// Drives rounds of questions between a source, a presenter and the statistics store.
///
/// All mutation happens in [`QuizController::handle`], which the owner calls for each
/// event drained from the `UiContext`. Every request the controller sends out is stamped
/// with a fresh [`Ticket`]; only the reply or timer matching the outstanding ticket is
/// acted upon.
pub struct QuizController<P: Presenter> {
    ctx: UiContext,
    presenter: P,
    source: Arc<dyn QuestionSource>,
    statistics: StatisticService,
    settings: RoundSettings,
    mode: StartMode,
    round: QuizRound,
    state: ControllerState,
    next_ticket: Ticket,
    outstanding: Option<Ticket>,
}

impl<P: Presenter> QuizController<P> {
    #[must_use]
    pub fn new(
        ctx: UiContext,
        presenter: P,
        source: Arc<dyn QuestionSource>,
        statistics: StatisticService,
        settings: RoundSettings,
        mode: StartMode,
    ) -> Self {
        Self {
            ctx,
            presenter,
            source,
            statistics,
            round: QuizRound::new(&settings),
            settings,
            mode,
            state: ControllerState::Idle,
            next_ticket: Ticket::new(1),
            outstanding: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    #[must_use]
    pub fn round(&self) -> &QuizRound {
        &self.round
    }

    #[must_use]
    pub fn statistics(&self) -> &StatisticService {
        &self.statistics
    }

    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Handle events until `UiEvent::Shutdown` arrives or every sender is gone.
    pub async fn run(mut self, mut events: UiReceiver) -> Self {
        while let Some(event) = events.recv().await {
            if event == UiEvent::Shutdown {
                tracing::debug!("quiz controller shutting down");
                break;
            }
            self.handle(event).await;
        }
        self
    }

    /// Apply one event to the state machine.
    pub async fn handle(&mut self, event: UiEvent) {
        match event {
            UiEvent::Start => self.on_start(),
            UiEvent::Answer(given) => self.on_answer(given),
            UiEvent::Action(action) => self.on_action(action),
            UiEvent::Source(event) => self.on_source(event),
            UiEvent::FeedbackElapsed { ticket } => self.on_feedback_elapsed(ticket).await,
            UiEvent::Shutdown => {}
        }
    }

    fn on_start(&mut self) {
        if self.state != ControllerState::Idle {
            tracing::debug!(state = ?self.state, "ignoring start outside idle");
            return;
        }
        match self.mode {
            StartMode::Immediate => self.begin_round(),
            StartMode::LoadThenPlay => self.begin_loading(),
        }
    }

    fn on_action(&mut self, action: UiAction) {
        match (action, self.state) {
            (UiAction::PlayAgain, ControllerState::RoundComplete) => self.begin_round(),
            (UiAction::RetryLoad, ControllerState::LoadFailed) => self.begin_loading(),
            (action, state) => tracing::debug!(?action, ?state, "ignoring stale action"),
        }
    }

    fn on_answer(&mut self, given: bool) {
        if self.state != ControllerState::PresentingQuestion {
            tracing::debug!(state = ?self.state, "ignoring answer while input is disabled");
            return;
        }
        self.presenter.set_answers_enabled(false);

        let outcome = match self.round.answer(given) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(error = %err, "answer rejected by round");
                return;
            }
        };
        tracing::debug!(
            index = self.round.current_index(),
            is_correct = outcome.is_correct,
            correct_answers = outcome.correct_answers,
            "answer scored"
        );

        self.presenter.show_answer_feedback(outcome.is_correct);
        self.state = ControllerState::ShowingAnswerFeedback;
        let ticket = self.issue_ticket();
        self.ctx
            .post_after(self.settings.feedback_delay(), UiEvent::FeedbackElapsed { ticket });
    }

    fn on_source(&mut self, event: SourceEvent) {
        if self.outstanding != Some(event.ticket()) {
            tracing::debug!(ticket = %event.ticket(), "dropping stale source reply");
            return;
        }

        match (self.state, event) {
            (ControllerState::AwaitingQuestion, SourceEvent::Question { question, .. }) => {
                self.outstanding = None;
                let Some(question) = question else {
                    tracing::warn!(
                        index = self.round.current_index(),
                        "question source had no question; waiting"
                    );
                    return;
                };
                let index = self.round.current_index();
                let amount = self.round.questions_amount();
                let step = match self.round.present(question) {
                    Ok(question) => QuizStepVm::new(question, index, amount),
                    Err(err) => {
                        tracing::warn!(error = %err, "question arrived for a finished round");
                        return;
                    }
                };
                self.presenter.show_step(step);
                self.presenter.set_answers_enabled(true);
                self.state = ControllerState::PresentingQuestion;
            }
            (ControllerState::LoadingData, SourceEvent::DataLoaded { .. }) => {
                self.outstanding = None;
                self.presenter.hide_loading();
                self.begin_round();
            }
            (ControllerState::LoadingData, SourceEvent::DataLoadFailed { error, .. }) => {
                self.outstanding = None;
                tracing::warn!(error = %error, "question data failed to load");
                self.presenter.hide_loading();
                self.presenter.show_error(ErrorVm::load_failed(&error));
                self.state = ControllerState::LoadFailed;
            }
            (state, event) => {
                tracing::debug!(
                    ?state,
                    ticket = %event.ticket(),
                    "source reply does not fit state"
                );
            }
        }
    }

    async fn on_feedback_elapsed(&mut self, ticket: Ticket) {
        if self.state != ControllerState::ShowingAnswerFeedback || self.outstanding != Some(ticket)
        {
            tracing::debug!(%ticket, "dropping stale feedback timer");
            return;
        }
        self.outstanding = None;

        match self.round.advance() {
            Ok(RoundStep::Continue { index }) => {
                tracing::debug!(index, "moving to next question");
                self.request_question();
            }
            Ok(RoundStep::Finished { correct, total }) => self.finish_round(correct, total).await,
            Err(err) => tracing::warn!(error = %err, "round could not advance"),
        }
    }

    async fn finish_round(&mut self, correct: u32, total: u32) {
        self.statistics.store(correct, total).await;
        let results = RoundResults::collect(correct, total, &self.statistics);
        tracing::info!(correct, total, games = results.games_count, "round complete");

        self.presenter.show_results(QuizResultsVm::from(&results));
        self.state = ControllerState::RoundComplete;
    }

    fn begin_round(&mut self) {
        self.round.reset();
        self.presenter.set_answers_enabled(false);
        self.request_question();
    }

    fn begin_loading(&mut self) {
        self.round.reset();
        self.presenter.set_answers_enabled(false);
        self.presenter.show_loading();
        self.state = ControllerState::LoadingData;
        let ticket = self.issue_ticket();
        self.source.load_data(self.ctx.reply(ticket));
    }

    fn request_question(&mut self) {
        self.state = ControllerState::AwaitingQuestion;
        let ticket = self.issue_ticket();
        self.source.request_next_question(self.ctx.reply(ticket));
    }

    fn issue_ticket(&mut self) -> Ticket {
        let ticket = self.next_ticket;
        self.next_ticket = ticket.next();
        self.outstanding = Some(ticket);
        ticket
    }
}

impl<P: Presenter> fmt::Debug for QuizController<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizController")
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("round", &self.round)
            .field("outstanding", &self.outstanding)
            .finish_non_exhaustive()
    }
}
