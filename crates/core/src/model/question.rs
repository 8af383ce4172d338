use std::fmt;

/// Picture shown alongside a question.
#[derive(Clone, PartialEq, Eq)]
pub enum QuestionImage {
    /// Identifier of an asset the presentation layer knows how to resolve.
    Named(String),
    /// Raw image data, opaque to the quiz.
    Bytes(Vec<u8>),
}

impl QuestionImage {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Returns the asset name, if this image is a named asset.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Bytes(_) => None,
        }
    }
}

// Byte payloads can be large; print their length only.
impl fmt::Debug for QuestionImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
        }
    }
}

/// A single yes/no question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    image: QuestionImage,
    text: String,
    correct_answer: bool,
}

impl Question {
    #[must_use]
    pub fn new(image: QuestionImage, text: impl Into<String>, correct_answer: bool) -> Self {
        Self {
            image,
            text: text.into(),
            correct_answer,
        }
    }

    #[must_use]
    pub fn image(&self) -> &QuestionImage {
        &self.image
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn correct_answer(&self) -> bool {
        self.correct_answer
    }

    /// Returns true if `given` matches the expected answer.
    #[must_use]
    pub fn is_correct(&self, given: bool) -> bool {
        given == self.correct_answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checks_answers_against_ground_truth() {
        let question = Question::new(QuestionImage::named("Kill Bill"), "Rated above 6?", true);
        assert!(question.is_correct(true));
        assert!(!question.is_correct(false));
    }

    #[test]
    fn byte_images_debug_print_their_length() {
        let image = QuestionImage::Bytes(vec![0; 2048]);
        assert_eq!(format!("{image:?}"), "Bytes(2048 bytes)");
        assert_eq!(image.name(), None);
    }
}
