//! Control surface -> relay -> page -> Gemini (mocked) -> relay -> page.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use promptlift_config::{CredentialStore, MemoryStore};
use promptlift_page::{fixtures, shared, Document, DocumentPage, PromptObserver, SiteAdapter};
use promptlift_protocols::{PageNotification, PromptPage, RelayRequest, RelayResponse};
use promptlift_provider_gemini::{GeminiClient, GeminiEnhancer};
use promptlift_relay::{channel, forward_updates, ContentScript, ControlSurface, ImportOutcome};

const ENHANCED: &str = "Please help me fix a bug in my code.";

async fn mock_gemini() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(query_param("key", "AIzaSyEndToEnd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": ENHANCED}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    server
}

fn enhancer_for(server: &MockServer) -> Arc<GeminiEnhancer> {
    let client = GeminiClient::new(Duration::from_secs(5))
        .unwrap()
        .with_base_url(server.uri());
    Arc::new(GeminiEnhancer::new(client))
}

#[tokio::test]
async fn test_import_enhance_insert_on_chatgpt() {
    let server = mock_gemini().await;
    let document = shared(fixtures::chatgpt_page(Some("fix my code")));
    let (client, receiver) = channel();
    ContentScript::new(DocumentPage::new(document.clone())).spawn(receiver);

    let response = client.send(&RelayRequest::GetPrompt).await.unwrap();
    assert_eq!(response, RelayResponse::prompt("fix my code"));

    let mut surface = ControlSurface::new(
        client.clone(),
        enhancer_for(&server),
        CredentialStore::new(MemoryStore::new()),
    );
    surface.save_credential("AIzaSyEndToEnd").unwrap();

    let outcome = surface.import_prompt(fixtures::CHATGPT_URL).await.unwrap();
    assert_eq!(outcome.message(), "fix my code");
    assert_eq!(surface.enhance().await.unwrap(), ENHANCED);
    surface.insert().await.unwrap();

    let page = DocumentPage::new(document);
    assert_eq!(page.read_prompt().await.unwrap().as_str(), ENHANCED);
}

#[tokio::test]
async fn test_gemini_page_write_back_fires_input_event() {
    let server = mock_gemini().await;
    let document = shared(fixtures::gemini_page(Some("fix my code")));
    let (events_tx, mut events_rx) = tokio::sync::mpsc::unbounded_channel();
    {
        let mut doc = document.write();
        let body = doc.body();
        doc.add_event_listener(body, "input", events_tx).unwrap();
    }

    let (client, receiver) = channel();
    ContentScript::new(DocumentPage::new(document.clone())).spawn(receiver);

    let mut surface = ControlSurface::new(
        client,
        enhancer_for(&server),
        CredentialStore::new(MemoryStore::new()),
    );
    surface.save_credential("AIzaSyEndToEnd").unwrap();
    surface.import_prompt(fixtures::GEMINI_URL).await.unwrap();
    surface.enhance().await.unwrap();
    surface.insert().await.unwrap();

    let event = events_rx.try_recv().unwrap();
    assert_eq!(event.event.name, "input");
    assert!(event.event.bubbles && event.event.cancelable);
    assert_eq!(
        DocumentPage::new(document).read_prompt().await.unwrap().as_str(),
        ENHANCED
    );
}

#[tokio::test]
async fn test_unsupported_page_answers_not_found() {
    let (client, receiver) = channel();
    let handle = ContentScript::new(DocumentPage::new(shared(Document::new(
        "https://example.com/",
    ))))
    .spawn(receiver);

    let response = client.send(&RelayRequest::GetPrompt).await.unwrap();
    assert_eq!(response, RelayResponse::error("not found"));

    // The page side keeps serving after the failure.
    let response = client
        .request(json!({"action": "setPrompt", "enhancedPrompt": "x"}))
        .await
        .unwrap();
    assert_eq!(response, json!({"error": "could not set"}));

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_empty_import_never_calls_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (client, receiver) = channel();
    ContentScript::new(DocumentPage::new(shared(fixtures::chatgpt_page(Some("")))))
        .spawn(receiver);
    let mut surface = ControlSurface::new(
        client,
        enhancer_for(&server),
        CredentialStore::new(MemoryStore::new()),
    );
    surface.save_credential("AIzaSyEndToEnd").unwrap();

    assert_eq!(
        surface.import_prompt(fixtures::CHATGPT_URL).await.unwrap(),
        ImportOutcome::Empty
    );
    assert!(surface.enhance().await.is_err());
}

#[tokio::test]
async fn test_typing_reaches_control_surface_as_notifications() {
    let document = shared(fixtures::chatgpt_page(None));
    let (client, receiver) = channel();
    let mut notifications = client.subscribe();

    let observer = PromptObserver::new(document.clone(), SiteAdapter::ChatGpt);
    forward_updates(observer.subscribe(), receiver.notifier());
    let observer = observer.spawn();
    ContentScript::new(DocumentPage::new(document.clone())).spawn(receiver);

    let input = fixtures::render_chatgpt_input(&mut document.write(), "").unwrap();
    for _ in 0..100 {
        if document.read().registration_count(input) == 1 {
            break;
        }
        tokio::task::yield_now().await;
    }
    fixtures::type_into(&mut document.write(), input, "hello there").unwrap();

    let notification = tokio::time::timeout(Duration::from_secs(1), notifications.next())
        .await
        .unwrap();
    assert_eq!(
        notification,
        Some(PageNotification::TextUpdated {
            text: "hello there".to_string()
        })
    );
    assert_eq!(client.get_prompt().await.unwrap().as_str(), "hello there");

    observer.shutdown().await;
}
