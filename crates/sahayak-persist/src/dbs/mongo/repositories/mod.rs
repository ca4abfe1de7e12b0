pub mod user;
pub mod chat;
pub mod document;

pub use user::MongoUserRepository;
pub use chat::MongoChatRepository;
pub use document::MongoDocumentRepository;
