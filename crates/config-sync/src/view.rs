//! View bindings the client renders into.
//!
//! A view hands out its bound elements on request; `refresh_view` asks for
//! them every time instead of holding on to them.

use hypr_bot_config::RemoteState;

pub trait ListView {
    fn clear(&mut self);
    fn push_item(&mut self, text: &str);
}

pub trait TextView {
    fn set_text(&mut self, text: &str);
}

pub trait StateView {
    fn stream_list(&mut self) -> &mut dyn ListView;

    fn personality_text(&mut self) -> Option<&mut dyn TextView> {
        None
    }
}

/// Clears the bound stream list and repopulates it with one item per key of
/// `state.streams`. Calling it again with the same state renders the same items.
pub fn refresh_view<V: StateView + ?Sized>(state: &RemoteState, view: &mut V) {
    let list = view.stream_list();
    list.clear();
    for id in state.stream_ids() {
        list.push_item(id);
    }

    if let Some(text) = view.personality_text() {
        text.set_text(&state.personality);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListBuffer {
    items: Vec<String>,
}

impl ListBuffer {
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ListView for ListBuffer {
    fn clear(&mut self) {
        self.items.clear();
    }

    fn push_item(&mut self, text: &str) {
        self.items.push(text.to_string());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
}

impl TextBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl TextView for TextBuffer {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

/// In-memory view: a stream list plus the personality text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferedView {
    pub streams: ListBuffer,
    pub personality: TextBuffer,
}

impl StateView for BufferedView {
    fn stream_list(&mut self) -> &mut dyn ListView {
        &mut self.streams
    }

    fn personality_text(&mut self) -> Option<&mut dyn TextView> {
        Some(&mut self.personality)
    }
}
