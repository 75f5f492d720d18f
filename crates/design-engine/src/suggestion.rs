//! Bookkeeping for assistant suggestions.
//!
//! The assistant itself is external. This module records the conversation,
//! hands out request ids, and turns a reply into parameter changes. Replies
//! carry changes either as `[param-update: name: value, ...]` markers or as
//! a `---` fenced block of `label：value` lines.

use std::collections::VecDeque;
use std::sync::OnceLock;

use design_types::ParamValue;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::types::ParameterChange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// What the caller sends to the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    pub id: Uuid,
    pub prompt: String,
    /// Messages before `prompt`, oldest first.
    pub history: Vec<ChatMessage>,
}

/// Discarded ids remembered at once; older ones are forgotten and their late
/// replies are treated as unknown.
pub const MAX_DISCARDED: usize = 64;

/// Tracks in-flight suggestion requests.
///
/// Parameters are never touched while a request is pending. A completed
/// request yields its changes even if a newer request was started since;
/// only an explicit [`discard`](Self::discard) suppresses them.
#[derive(Debug, Clone, Default)]
pub struct SuggestionTracker {
    history: Vec<ChatMessage>,
    /// Oldest first.
    pending: Vec<Uuid>,
    /// Oldest first, at most [`MAX_DISCARDED`].
    discarded: VecDeque<Uuid>,
}

impl SuggestionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, prompt: impl Into<String>) -> SuggestionRequest {
        let prompt = prompt.into();
        let request = SuggestionRequest {
            id: Uuid::new_v4(),
            prompt: prompt.clone(),
            history: self.history.clone(),
        };
        self.history.push(ChatMessage {
            role: ChatRole::User,
            content: prompt,
        });
        self.pending.push(request.id);
        debug!(id = %request.id, pending = self.pending.len(), "suggestion requested");
        request
    }

    /// Record the reply for `id` and extract its changes.
    ///
    /// Returns `None` for discarded or unknown requests.
    pub fn complete(&mut self, id: Uuid, response: &str) -> Option<Vec<ParameterChange>> {
        if let Some(pos) = self.discarded.iter().position(|d| *d == id) {
            self.discarded.remove(pos);
            debug!(%id, "dropping reply to discarded suggestion");
            return None;
        }
        let Some(pos) = self.pending.iter().position(|p| *p == id) else {
            debug!(%id, "reply for unknown suggestion");
            return None;
        };
        if pos + 1 < self.pending.len() {
            debug!(%id, "applying superseded suggestion");
        }
        self.pending.remove(pos);
        self.history.push(ChatMessage {
            role: ChatRole::Assistant,
            content: response.to_string(),
        });
        Some(parse_parameter_updates(response))
    }

    /// Cancel a pending request so its eventual reply is ignored.
    pub fn discard(&mut self, id: Uuid) -> bool {
        let Some(pos) = self.pending.iter().position(|p| *p == id) else {
            return false;
        };
        self.pending.remove(pos);
        if self.discarded.len() == MAX_DISCARDED {
            self.discarded.pop_front();
        }
        self.discarded.push_back(id);
        true
    }

    pub fn is_pending(&self, id: Uuid) -> bool {
        self.pending.contains(&id)
    }

    /// True until the discarded request's reply arrives.
    pub fn is_discarded(&self, id: Uuid) -> bool {
        self.discarded.contains(&id)
    }

    pub fn pending(&self) -> &[Uuid] {
        &self.pending
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }
}

/// Labels used by the assistant's fenced reply format.
const BLOCK_LABELS: &[(&str, &str)] = &[
    ("材料", "material"),
    ("材质", "material"),
    ("座椅宽度", "seat_width"),
    ("座椅深度", "seat_depth"),
    ("座椅高度", "seat_height"),
    ("靠背高度", "backrest_height"),
    ("靠背角度", "backrest_angle"),
    ("桌面宽度", "width"),
    ("桌面长度", "length"),
    ("桌腿高度", "leg_height"),
];

fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\[\s*param-update\s*:\s*([^\]]*)\]").expect("marker pattern should compile")
    })
}

fn block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?ms)^\s*---\s*$(.*?)^\s*---\s*$").expect("block pattern should compile")
    })
}

fn line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*([^:：\n]+?)\s*[:：]\s*(.+?)\s*$").expect("line pattern should compile")
    })
}

/// Numbers become numbers; everything else stays text for the field to read.
fn parse_value(raw: &str) -> ParamValue {
    let raw = raw.trim();
    match raw.parse::<f64>() {
        Ok(n) => ParamValue::Number(n),
        Err(_) => ParamValue::Text(raw.to_string()),
    }
}

fn block_field(label: &str) -> &str {
    BLOCK_LABELS
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, field)| *field)
        .unwrap_or(label)
}

/// Extract every parameter change embedded in an assistant reply, in order.
///
/// Names are passed through unresolved; the store ignores unknown ones.
pub fn parse_parameter_updates(text: &str) -> Vec<ParameterChange> {
    let mut changes = Vec::new();

    for caps in marker_regex().captures_iter(text) {
        for entry in caps[1].split(',') {
            let Some((name, value)) = entry.split_once([':', '=']) else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() || value.trim().is_empty() {
                continue;
            }
            changes.push(ParameterChange::new(name, parse_value(value)));
        }
    }

    for block in block_regex().captures_iter(text) {
        for line in line_regex().captures_iter(&block[1]) {
            changes.push(ParameterChange::new(
                block_field(&line[1]),
                parse_value(&line[2]),
            ));
        }
    }

    changes
}
