use sahayak_llm::{Content, Message};

#[test]
fn test_content_text_creation() {
    let content = Content::text("Hello, world!");
    assert_eq!(content.as_text(), "Hello, world!");
}

#[test]
fn test_content_from_string() {
    let content: Content = "Test".into();
    assert_eq!(content.as_text(), "Test");
}

#[test]
fn test_message_roles() {
    assert_eq!(Message::system("You are helpful").role(), "system");
    assert_eq!(Message::human("Hello").role(), "user");
    assert_eq!(Message::ai("Hi there!").role(), "assistant");
}

#[test]
fn test_message_serialization_human() {
    let msg = Message::human("Hello");
    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"role\":\"user\""));
    assert!(json.contains("Hello"));
}

#[test]
fn test_message_serialization_ai() {
    let msg = Message::ai("Response");
    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"role\":\"assistant\""));
}

#[test]
fn test_message_deserialization() {
    let json = r#"{"role":"user","content":"Test"}"#;
    let msg: Message = serde_json::from_str(json).unwrap();
    assert_eq!(msg, Message::human("Test"));
}
