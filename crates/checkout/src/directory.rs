use checkout_core::models::{Chat, ChatId, InvoiceMessage, MessageId};
use std::collections::HashMap;

/// Chats and messages the client already holds locally.
pub trait ChatDirectory: Send + Sync {
    fn chat(&self, chat_id: &str) -> Option<Chat>;
    fn invoice_message(&self, chat_id: &str, message_id: MessageId) -> Option<InvoiceMessage>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    chats: HashMap<ChatId, Chat>,
    messages: HashMap<(ChatId, MessageId), InvoiceMessage>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chat(mut self, chat: Chat) -> Self {
        self.chats.insert(chat.id.clone(), chat);
        self
    }

    pub fn with_message(
        mut self,
        chat_id: impl Into<ChatId>,
        message_id: MessageId,
        message: InvoiceMessage,
    ) -> Self {
        self.messages.insert((chat_id.into(), message_id), message);
        self
    }
}

impl ChatDirectory for InMemoryDirectory {
    fn chat(&self, chat_id: &str) -> Option<Chat> {
        self.chats.get(chat_id).cloned()
    }

    fn invoice_message(&self, chat_id: &str, message_id: MessageId) -> Option<InvoiceMessage> {
        self.messages
            .get(&(chat_id.to_string(), message_id))
            .cloned()
    }
}
