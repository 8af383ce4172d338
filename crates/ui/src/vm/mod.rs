mod error_vm;
mod results_vm;
mod step_vm;
mod time_fmt;

pub use error_vm::ErrorVm;
pub use results_vm::{QuizResultsVm, RoundResults};
pub use step_vm::QuizStepVm;
pub use time_fmt::{format_percent, format_record_date};
