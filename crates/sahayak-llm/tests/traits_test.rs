use sahayak_llm::{ChatOptions, ChatRequest, ChatResponse, Message};

#[test]
fn test_chat_request_creation() {
    let messages = vec![Message::human("Hello")];
    let request = ChatRequest::new("gpt-4-turbo-preview", messages);

    assert_eq!(request.model, "gpt-4-turbo-preview");
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.options, ChatOptions::default());
}

#[test]
fn test_chat_request_with_options() {
    let options = ChatOptions::new().temperature(0.7).max_tokens(1000);
    let request = ChatRequest::new("gpt-4o", vec![Message::human("Hello")]).with_options(options);

    assert_eq!(request.options.temperature, Some(0.7));
    assert_eq!(request.options.max_tokens, Some(1000));
}

#[test]
fn test_response_text_rejects_empty_content() {
    let mut response = ChatResponse {
        content: Some(String::new()),
        usage: None,
        finish_reason: None,
        model: "gpt-4o".to_string(),
    };
    assert_eq!(response.text(), None);

    response.content = None;
    assert_eq!(response.text(), None);

    response.content = Some("नमस्ते".to_string());
    assert_eq!(response.text(), Some("नमस्ते"));
}
