use crate::models::{Message, make_preview};

/// Messages the mailbox starts with.
pub fn messages() -> Result<Vec<Message>, serde_json::Error> {
    parse(include_str!("../seed.json"))
}

pub fn parse(json: &str) -> Result<Vec<Message>, serde_json::Error> {
    let mut messages: Vec<Message> = serde_json::from_str(json)?;
    for message in &mut messages {
        if message.preview.is_empty() {
            message.preview = make_preview(&message.body);
        }
    }
    Ok(messages)
}
