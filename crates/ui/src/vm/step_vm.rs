use quiz_core::model::{Question, QuestionImage};

/// One question as it should appear on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizStepVm {
    pub image: QuestionImage,
    pub question: String,
    /// Position in the round, e.g. `3/10`.
    pub question_number: String,
}

impl QuizStepVm {
    /// `index` is zero-based.
    #[must_use]
    pub fn new(question: &Question, index: u32, questions_amount: u32) -> Self {
        Self {
            image: question.image().clone(),
            question: question.text().to_owned(),
            question_number: format!("{}/{questions_amount}", index + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_one_based() {
        let question = Question::new(QuestionImage::named("Deadpool"), "Rated above 7?", true);
        let vm = QuizStepVm::new(&question, 0, 10);
        assert_eq!(vm.question_number, "1/10");
        assert_eq!(vm.question, "Rated above 7?");
        assert_eq!(vm.image, QuestionImage::named("Deadpool"));

        assert_eq!(QuizStepVm::new(&question, 9, 10).question_number, "10/10");
    }
}
