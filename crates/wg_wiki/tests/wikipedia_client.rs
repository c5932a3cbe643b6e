use std::collections::HashMap;

use axum::{extract::Query, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use wg_wiki::prelude::*;

async fn fake_api(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let lang = params.get("lang").cloned().unwrap_or_default();
    let param = |key: &str| params.get(key).map(String::as_str).unwrap_or_default();

    if param("action") != "query" || param("format") != "json" || param("formatversion") != "2" {
        return (StatusCode::BAD_REQUEST, Json(json!({}))).into_response();
    }

    if lang == "xx" {
        return (StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response();
    }

    let body = match (param("list"), param("prop"), param("titles")) {
        ("search", _, _) if param("srsearch") == "boom" => json!({
            "error": {"code": "internal_api_error", "info": "Search backend is down"}
        }),
        ("search", _, _) => {
            let limit: usize = param("srlimit").parse().unwrap_or(10);
            let hits: Vec<_> = (1..=limit)
                .map(|i| json!({"ns": 0, "title": format!("{} {} ({})", param("srsearch"), i, lang)}))
                .collect();
            json!({"batchcomplete": true, "query": {"search": hits}})
        }
        ("random", _, _) => json!({
            "query": {"random": [{"id": 1, "ns": 0, "title": format!("Random {}", lang)}]}
        }),
        (_, "links", "Mercury") => json!({
            "query": {"pages": [{"ns": 0, "title": "Mercury", "links": [
                {"ns": 0, "title": "Mercury (planet)"},
                {"ns": 0, "title": "Mercury (element)"},
                {"ns": 0, "title": "Mercury (mythology)"}
            ]}]}
        }),
        (_, _, "Mercury") => json!({
            "query": {"pages": [{
                "ns": 0,
                "title": "Mercury",
                "fullurl": "https://en.wikipedia.org/wiki/Mercury",
                "pageprops": {"disambiguation": ""}
            }]}
        }),
        (_, _, "Atlantis") => json!({
            "query": {"pages": [{"ns": 0, "title": "Atlantis", "missing": true}]}
        }),
        (_, _, "[[") => json!({
            "query": {"pages": [{"title": "[[", "invalidreason": "bad title", "invalid": true}]}
        }),
        (_, _, "Twins") => json!({
            "query": {"pages": [
                {"ns": 0, "title": "Twin A", "fullurl": "https://en.wikipedia.org/wiki/Twin_A"},
                {"ns": 0, "title": "Twin B", "fullurl": "https://en.wikipedia.org/wiki/Twin_B"}
            ]}
        }),
        (_, _, "No URL") => json!({
            "query": {"pages": [{"ns": 0, "title": "No URL", "extract": "Text."}]}
        }),
        (_, _, title) => json!({
            "query": {"pages": [{
                "ns": 0,
                "title": title,
                "fullurl": format!("https://{}.wikipedia.org/wiki/{}", lang, title.replace(' ', "_")),
                "extract": format!("{} is an article. It has text. Quite a lot.", title),
                "categories": [
                    {"ns": 14, "title": "Category:Alpha"},
                    {"ns": 14, "title": "Category:Beta"}
                ]
            }]}
        }),
    };

    Json(body).into_response()
}

async fn spawn_fake_api() -> WikipediaClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/w/api.php", get(fake_api));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    WikipediaClient::new(WikipediaConfig {
        api_url: format!("http://{}/w/api.php?lang={{lang}}", addr),
        ..Default::default()
    })
    .unwrap()
}

fn lang(code: &str) -> Language {
    code.parse().unwrap()
}

#[tokio::test]
async fn test_search_returns_titles_in_order() {
    let client = spawn_fake_api().await;
    let titles = client.search(&lang("en"), "python", 3).await.unwrap();
    assert_eq!(
        titles,
        vec!["python 1 (en)", "python 2 (en)", "python 3 (en)"]
    );
}

#[tokio::test]
async fn test_api_error_is_upstream() {
    let client = spawn_fake_api().await;
    match client.search(&lang("en"), "boom", 3).await {
        Err(Error::Upstream(message)) => {
            assert_eq!(message, "internal_api_error: Search backend is down")
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_http_status_is_upstream() {
    let client = spawn_fake_api().await;
    match client.random_title(&lang("xx")).await {
        Err(Error::Upstream(message)) => assert!(message.contains("503")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_page_success() {
    let client = spawn_fake_api().await;
    let page = client.page(&lang("ru"), "Python").await.unwrap();
    assert_eq!(page.title, "Python");
    assert_eq!(page.url, "https://ru.wikipedia.org/wiki/Python");
    assert_eq!(page.summary, "Python is an article. It has text. Quite a lot.");
    assert_eq!(page.categories, vec!["Alpha", "Beta"]);
}

#[tokio::test]
async fn test_page_disambiguation() {
    let client = spawn_fake_api().await;
    match client.page(&lang("en"), "Mercury").await {
        Err(Error::Ambiguous { title, options }) => {
            assert_eq!(title, "Mercury");
            assert_eq!(options.len(), 3);
            assert_eq!(options[0], "Mercury (planet)");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_page_missing_and_invalid() {
    let client = spawn_fake_api().await;
    assert!(matches!(
        client.page(&lang("en"), "Atlantis").await,
        Err(Error::NotFound(title)) if title == "Atlantis"
    ));
    assert!(matches!(
        client.page(&lang("en"), "[[").await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_page_rejects_multiple_titles() {
    let client = spawn_fake_api().await;
    assert!(matches!(
        client.page(&lang("en"), "Python|Rust").await,
        Err(Error::NotFound(title)) if title == "Python|Rust"
    ));
    assert!(matches!(
        client.page(&lang("en"), "Twins").await,
        Err(Error::Upstream(_))
    ));
}

#[tokio::test]
async fn test_page_without_url_is_upstream() {
    let client = spawn_fake_api().await;
    assert!(matches!(
        client.page(&lang("en"), "No URL").await,
        Err(Error::Upstream(_))
    ));
}

#[tokio::test]
async fn test_random_uses_requested_language() {
    let client = spawn_fake_api().await;
    assert_eq!(client.random_title(&lang("de")).await.unwrap(), "Random de");
    assert_eq!(client.random_title(&lang("ru")).await.unwrap(), "Random ru");
}
