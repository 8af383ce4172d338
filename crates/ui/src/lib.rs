#![forbid(unsafe_code)]

pub mod context;
pub mod controller;
pub mod presenter;
pub mod vm;

pub use context::{UiAction, UiContext, UiEvent, UiReceiver};
pub use controller::{ControllerState, QuizController, StartMode};
pub use presenter::Presenter;
