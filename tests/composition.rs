// Composition tests — verifying that pipeline stages chain together
// correctly.
//
// These tests exercise the data flow between modules:
//   parse -> store -> list -> topics / similarity map
// without any network calls; article HTML comes from inline fixtures and
// storage goes to a tempdir.

use gazette::pipeline::collect::persist_articles;
use gazette::similarity::{matrix, mds};
use gazette::sources::article::Article;
use gazette::store;
use gazette::text;
use gazette::topics::lda::LdaModel;
use gazette::topics::TopicModel;

fn article(title: &str, url: &str, body: String) -> Article {
    Article {
        keywords: text::keywords(&body, 8),
        title: title.to_string(),
        url: url.to_string(),
        body,
    }
}

fn long_body(theme: &str) -> String {
    // Comfortably above the 500-byte storage threshold
    format!(
        "The {theme} report published today describes how {theme} shaped the \
         week across several regions. Officials said the {theme} figures \
         exceeded expectations and analysts expect the {theme} trend to \
         continue through the quarter. Residents interviewed about the \
         {theme} changes described a mix of relief and concern, and several \
         community groups have organized meetings to discuss what the \
         {theme} developments mean for local planning. A follow-up on the \
         {theme} situation is expected next month when new data arrives, \
         and the bureau has promised a full breakdown of the {theme} \
         numbers by district alongside historical comparisons."
    )
}

// ============================================================
// Chain: parse results -> store -> list
// ============================================================

#[test]
fn collection_stores_only_long_articles_per_source() {
    let dir = tempfile::tempdir().unwrap();

    // Two sources, each with three short and two long articles
    for brand in ["cnn", "npr"] {
        let mut batch = Vec::new();
        for i in 0..3 {
            batch.push(article(
                &format!("{brand} brief {i}"),
                &format!("https://example.com/{brand}/brief/{i}"),
                "Too short to archive.".to_string(),
            ));
        }
        batch.push(article(
            &format!("{brand} economy story"),
            &format!("https://example.com/{brand}/economy"),
            long_body("economy"),
        ));
        batch.push(article(
            &format!("{brand} weather story"),
            &format!("https://example.com/{brand}/weather"),
            long_body("weather"),
        ));

        let (stored, skipped) =
            persist_articles(dir.path(), brand, &batch, store::MIN_BODY_LEN).unwrap();
        assert_eq!(stored, 2, "{brand}: long articles stored");
        assert_eq!(skipped, 3, "{brand}: short articles skipped");
    }

    let listed = store::list_articles(dir.path()).unwrap();
    assert_eq!(listed.len(), 4);
    assert_eq!(listed.iter().filter(|a| a.brand == "cnn").count(), 2);
    assert_eq!(listed.iter().filter(|a| a.brand == "npr").count(), 2);

    // Every persisted body exceeds the threshold
    for entry in &listed {
        let content = store::read_article(&entry.path).unwrap();
        assert!(content.len() > store::MIN_BODY_LEN);
        assert!(content.contains("Keywords:"));
    }
}

#[test]
fn stored_article_round_trips_through_list_and_read() {
    let dir = tempfile::tempdir().unwrap();
    let a = article(
        "Senate: vote watch?",
        "https://example.com/senate",
        long_body("senate"),
    );

    let path = store::write_article(dir.path(), "apnews", &a, store::MIN_BODY_LEN)
        .unwrap()
        .unwrap();

    let listed = store::list_articles(dir.path()).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].path, path);
    // Filesystem-hostile punctuation was scrubbed from the name
    assert!(!listed[0].name.contains(':'));
    assert!(!listed[0].name.contains('?'));

    let content = store::read_article(&path).unwrap();
    assert!(content.starts_with(&a.body));
}

// ============================================================
// Chain: stored text -> topics
// ============================================================

#[test]
fn stored_article_produces_three_topics() {
    let body = format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        long_body("economy"),
        long_body("weather"),
        long_body("election"),
        long_body("economy"),
        long_body("weather"),
        long_body("election"),
    );

    let documents = text::preprocess(&body);
    let model = LdaModel::default();
    let topics = model.topic_terms(&documents).unwrap();

    assert_eq!(topics.len(), 3);
    for topic in &topics {
        assert!(!topic.terms.is_empty() && topic.terms.len() <= 3);
    }
    let share_sum: f64 = topics.iter().map(|t| t.share).sum();
    assert!((share_sum - 1.0).abs() < 1e-9);

    // Same input, same topics
    let again = model.topic_terms(&documents).unwrap();
    assert_eq!(topics, again);
}

// ============================================================
// Chain: stored text -> distance matrix -> 2-D map
// ============================================================

#[test]
fn similar_articles_land_closer_on_the_map() {
    let documents = vec![
        ("economy a".to_string(), long_body("economy")),
        ("economy b".to_string(), long_body("economy")),
        ("weather".to_string(), long_body("weather")),
    ];

    let dtm = matrix::vectorize(&documents);
    let distances = matrix::cosine_distance_matrix(&dtm);

    // Distance matrix invariants
    for i in 0..3 {
        assert_eq!(distances[i][i], 0.0);
        for j in 0..3 {
            assert!((distances[i][j] - distances[j][i]).abs() < 1e-12);
        }
    }
    assert!(
        distances[0][1] < distances[0][2],
        "twin economy articles should be closer than economy vs weather"
    );

    let points = mds::project_2d(&distances).unwrap();
    assert_eq!(points.len(), 3);

    let dist = |a: (f64, f64), b: (f64, f64)| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt();
    assert!(
        dist(points[0], points[1]) < dist(points[0], points[2]),
        "map should preserve the nearness of the twin articles"
    );

    // Projection is deterministic
    let again = mds::project_2d(&distances).unwrap();
    assert_eq!(points, again);
}
