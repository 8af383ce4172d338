use std::path::PathBuf;

use services::{
    CatalogQuestionSource, QuestionSource, SourceError, SourceEvent, SourceReply, Ticket,
};
use tokio::sync::oneshot;

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("movie-quiz-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).expect("write catalogue");
    path
}

async fn load(source: &CatalogQuestionSource) -> SourceEvent {
    let (tx, rx) = oneshot::channel();
    source.load_data(SourceReply::new(Ticket::new(1), move |event| {
        let _ = tx.send(event);
    }));
    rx.await.expect("reply")
}

#[tokio::test]
async fn loaded_catalogue_serves_questions() {
    let path = scratch_file(
        "ok.json",
        r#"[{"title":"Heat","image":"heat","rating":8.3},
            {"title":"Cats","image":"cats","rating":2.8}]"#,
    );
    let source = CatalogQuestionSource::from_file(&path).with_seed(3);
    assert_eq!(source.next_question(), None);

    let event = load(&source).await;
    assert_eq!(event, SourceEvent::DataLoaded { ticket: Ticket::new(1) });
    assert_eq!(source.len(), 2);

    let question = source.next_question().expect("question");
    let name = question.image().name().expect("named");
    assert!(name == "heat" || name == "cats");

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn empty_catalogue_fails_to_load() {
    let path = scratch_file("empty.json", "[]");
    let source = CatalogQuestionSource::from_file(&path);

    let event = load(&source).await;
    assert!(matches!(
        event,
        SourceEvent::DataLoadFailed {
            error: SourceError::LoadFailed(ref msg),
            ..
        } if msg.contains("no movies")
    ));

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn malformed_catalogue_fails_to_load() {
    let path = scratch_file("bad.json", "{ nope");
    let source = CatalogQuestionSource::from_file(&path);

    let event = load(&source).await;
    assert!(matches!(event, SourceEvent::DataLoadFailed { .. }));
    assert!(source.is_empty());

    let _ = std::fs::remove_file(path);
}
