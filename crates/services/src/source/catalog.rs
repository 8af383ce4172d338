use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use quiz_core::model::{Question, QuestionImage};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{QuestionSource, SourceReply};
use crate::error::{CatalogError, SourceError};

/// Rating thresholds a question may ask about.
const THRESHOLDS: std::ops::RangeInclusive<u8> = 5..=9;

/// A catalogue entry questions are generated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    /// Asset name of the poster.
    pub image: String,
    pub rating: f32,
}

impl Movie {
    #[must_use]
    pub fn new(title: impl Into<String>, image: impl Into<String>, rating: f32) -> Self {
        Self {
            title: title.into(),
            image: image.into(),
            rating,
        }
    }
}

#[derive(Debug, Clone)]
enum Origin {
    Builtin,
    File(PathBuf),
}

/// Generates "is this movie rated above N?" questions from a movie list.
///
/// The built-in catalogue is available immediately. A file-backed catalogue starts empty
/// and answers every request with no question until `load_data` succeeds.
#[derive(Clone)]
pub struct CatalogQuestionSource {
    origin: Origin,
    movies: Arc<RwLock<Vec<Movie>>>,
    rng: Arc<Mutex<StdRng>>,
}

impl CatalogQuestionSource {
    #[must_use]
    pub fn builtin() -> Self {
        Self::with_origin(Origin::Builtin, builtin_movies())
    }

    #[must_use]
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::with_origin(Origin::File(path.into()), Vec::new())
    }

    /// Replace the random generator with a seeded one for reproducible rounds.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Arc::new(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    fn with_origin(origin: Origin, movies: Vec<Movie>) -> Self {
        Self {
            origin,
            movies: Arc::new(RwLock::new(movies)),
            rng: Arc::new(Mutex::new(StdRng::from_os_rng())),
        }
    }

    /// Number of movies currently available.
    #[must_use]
    pub fn len(&self) -> usize {
        self.movies.read().map_or(0, |movies| movies.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build a question from a random movie, or `None` if the catalogue is empty.
    #[must_use]
    pub fn next_question(&self) -> Option<Question> {
        let movies = self.movies.read().ok()?;
        let mut rng = self.rng.lock().ok()?;
        let movie = movies.choose(&mut *rng)?;
        let threshold: u8 = rng.random_range(THRESHOLDS);

        Some(Question::new(
            QuestionImage::named(movie.image.clone()),
            format!("Is the rating of this movie greater than {threshold}?"),
            movie.rating > f32::from(threshold),
        ))
    }

    fn replace_movies(&self, loaded: Vec<Movie>) -> Result<(), SourceError> {
        let mut movies = self.movies.write().map_err(|_| SourceError::Unavailable)?;
        *movies = loaded;
        Ok(())
    }
}

impl QuestionSource for CatalogQuestionSource {
    fn request_next_question(&self, reply: SourceReply) {
        let question = self.next_question();
        if question.is_none() {
            tracing::debug!(ticket = %reply.ticket(), "catalogue has no movies to ask about");
        }
        reply.question(question);
    }

    fn load_data(&self, reply: SourceReply) {
        let path = match &self.origin {
            Origin::Builtin => {
                let result = self.replace_movies(builtin_movies());
                match result {
                    Ok(()) => reply.data_loaded(),
                    Err(err) => reply.data_load_failed(err),
                }
                return;
            }
            Origin::File(path) => path.clone(),
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            reply.data_load_failed(SourceError::Unavailable);
            return;
        };

        let source = self.clone();
        runtime.spawn(async move {
            let outcome = match read_catalog(&path).await {
                Ok(movies) => {
                    tracing::info!(
                        path = %path.display(),
                        movies = movies.len(),
                        "loaded movie catalogue"
                    );
                    source.replace_movies(movies)
                }
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "movie catalogue load failed"
                    );
                    Err(err.into())
                }
            };
            match outcome {
                Ok(()) => reply.data_loaded(),
                Err(err) => reply.data_load_failed(err),
            }
        });
    }
}

/// Read and validate a JSON array of movies.
///
/// # Errors
///
/// Returns `CatalogError` if the file is unreadable, malformed, or empty.
async fn read_catalog(path: &Path) -> Result<Vec<Movie>, CatalogError> {
    let bytes = tokio::fs::read(path).await?;
    let movies: Vec<Movie> = serde_json::from_slice(&bytes)?;
    if movies.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(movies)
}

fn builtin_movies() -> Vec<Movie> {
    vec![
        Movie::new("The Godfather", "The Godfather", 9.2),
        Movie::new("The Dark Knight", "The Dark Knight", 9.0),
        Movie::new("Kill Bill", "Kill Bill", 8.1),
        Movie::new("The Avengers", "The Avengers", 8.0),
        Movie::new("Deadpool", "Deadpool", 8.0),
        Movie::new("The Green Knight", "The Green Knight", 6.6),
        Movie::new("Old", "Old", 5.8),
        Movie::new(
            "The Ice Age Adventures of Buck Wild",
            "The Ice Age Adventures of Buck Wild",
            4.3,
        ),
        Movie::new("Tesla", "Tesla", 5.1),
        Movie::new("Vivarium", "Vivarium", 5.8),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{SourceEvent, Ticket};
    use tokio::sync::oneshot;

    fn rating_of(image: &QuestionImage) -> f32 {
        let name = image.name().expect("named image");
        builtin_movies()
            .into_iter()
            .find(|movie| movie.image == name)
            .map(|movie| movie.rating)
            .expect("known movie")
    }

    fn threshold_in(text: &str) -> f32 {
        text.trim_end_matches('?')
            .rsplit(' ')
            .next()
            .and_then(|n| n.parse().ok())
            .expect("threshold")
    }

    #[test]
    fn builtin_questions_match_movie_ratings() {
        let source = CatalogQuestionSource::builtin().with_seed(7);
        assert_eq!(source.len(), 10);

        for _ in 0..50 {
            let question = source.next_question().expect("question");
            let threshold = threshold_in(question.text());
            assert!((5.0..=9.0).contains(&threshold));
            assert_eq!(
                question.correct_answer(),
                rating_of(question.image()) > threshold
            );
        }
    }

    #[test]
    fn same_seed_asks_the_same_questions() {
        let a = CatalogQuestionSource::builtin().with_seed(42);
        let b = CatalogQuestionSource::builtin().with_seed(42);
        for _ in 0..10 {
            assert_eq!(a.next_question(), b.next_question());
        }
    }

    #[test]
    fn unloaded_file_catalogue_has_no_questions() {
        let source = CatalogQuestionSource::from_file("/nonexistent/movies.json");
        assert!(source.is_empty());
        assert_eq!(source.next_question(), None);
    }

    #[tokio::test]
    async fn missing_file_fails_the_load() {
        let source = CatalogQuestionSource::from_file("/nonexistent/movies.json");
        let (tx, rx) = oneshot::channel();
        source.load_data(SourceReply::new(Ticket::new(1), move |event| {
            let _ = tx.send(event);
        }));

        let event = rx.await.expect("reply");
        assert!(matches!(
            event,
            SourceEvent::DataLoadFailed {
                error: SourceError::LoadFailed(_),
                ..
            }
        ));
        assert!(source.is_empty());
    }

    #[test]
    fn builtin_load_succeeds_without_a_runtime() {
        let source = CatalogQuestionSource::builtin();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        source.load_data(SourceReply::new(Ticket::new(2), move |event| {
            *sink.lock().unwrap() = Some(event);
        }));

        assert_eq!(
            *seen.lock().unwrap(),
            Some(SourceEvent::DataLoaded {
                ticket: Ticket::new(2)
            })
        );
    }
}
