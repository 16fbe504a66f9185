// tests/generator_tests.rs

mod common;

use std::sync::Arc;

use common::{spawn_app, token_for, unique_email};
use formgrade::generator::{GeneratorError, OpenAiQuizGenerator, QuizGenerator};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
}

const FENCED_QUESTIONS: &str = "```json\n[\n  {\"question\": \"What is the boiling point of water at sea level?\", \"options\": [\"90C\", \"100C\", \"110C\"], \"correct_answer\": \"100C\", \"marks\": 1},\n  {\"question\": \"Which gas do plants absorb?\", \"options\": [\"Oxygen\", \"Carbon dioxide\"], \"correct_answer\": \"Carbon dioxide\", \"marks\": 2}\n]\n```";

async fn generator_for(server: &MockServer) -> OpenAiQuizGenerator {
    OpenAiQuizGenerator::new("test-key", &server.uri(), "test-model", 5).unwrap()
}

#[tokio::test]
async fn generator_parses_fenced_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(FENCED_QUESTIONS)))
        .expect(1)
        .mount(&server)
        .await;

    let generator = generator_for(&server).await;
    let questions = generator.generate("Water boils. Plants breathe.", 2).await.unwrap();

    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].correct_answer, "100C");
    assert_eq!(questions[1].marks, 2.0);
}

#[tokio::test]
async fn generator_reports_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model overloaded"))
        .mount(&server)
        .await;

    let generator = generator_for(&server).await;
    let err = generator.generate("text", 3).await.unwrap_err();

    match err {
        GeneratorError::Api { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("overloaded"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn generator_rejects_unparseable_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("Sorry, I cannot help with that.")),
        )
        .mount(&server)
        .await;

    let generator = generator_for(&server).await;
    let err = generator.generate("text", 3).await.unwrap_err();
    assert!(matches!(err, GeneratorError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn generate_form_endpoint_persists_valid_questions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(FENCED_QUESTIONS)))
        .mount(&server)
        .await;

    let generator: Arc<dyn QuizGenerator> = Arc::new(generator_for(&server).await);
    let address = spawn_app(Some(generator)).await;
    let client = reqwest::Client::new();
    let creator = token_for(&unique_email("creator"));

    let form = reqwest::multipart::Form::new()
        .text("form_name", "science")
        .text("num_questions", "2")
        .text("show_answers", "false")
        .part(
            "file",
            reqwest::multipart::Part::bytes(b"Water boils at 100C. Plants absorb CO2.".to_vec())
                .file_name("notes.txt"),
        );

    let response = client
        .post(format!("{}/generate-form", address))
        .bearer_auth(&creator)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["form_id"], "science");
    assert_eq!(body["question_count"], 2);

    let fetched: Value = client
        .get(format!("{}/form/science", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["questions"].as_array().unwrap().len(), 2);
    assert!(fetched["questions"][0].get("correct_answer").is_none());
}

#[tokio::test]
async fn generate_form_endpoint_maps_generator_failure_to_502() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let generator: Arc<dyn QuizGenerator> = Arc::new(generator_for(&server).await);
    let address = spawn_app(Some(generator)).await;
    let client = reqwest::Client::new();
    let creator = token_for(&unique_email("creator"));

    let form = reqwest::multipart::Form::new()
        .text("form_name", "science")
        .part("file", reqwest::multipart::Part::bytes(b"Some notes".to_vec()));

    let response = client
        .post(format!("{}/generate-form", address))
        .bearer_auth(&creator)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 502);

    let forms: Value = client
        .get(format!("{}/forms", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(forms["forms"], json!([]));
}
