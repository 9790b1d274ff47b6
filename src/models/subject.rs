// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Report subjects and where their reports go.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A tracked subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Identifier known to the status source (e.g. username)
    pub id: String,
    /// Telegram chat that receives the report
    pub chat_id: Option<i64>,
}

impl Subject {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            chat_id: None,
        }
    }

    pub fn with_chat(id: impl Into<String>, chat_id: i64) -> Self {
        Self {
            id: id.into(),
            chat_id: Some(chat_id),
        }
    }
}

impl FromStr for Subject {
    type Err = String;

    /// Parse `id` or `id=chat_id`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, chat) = match s.split_once('=') {
            Some((id, chat)) => (id.trim(), Some(chat.trim())),
            None => (s.trim(), None),
        };
        if id.is_empty() {
            return Err(format!("empty subject id in {:?}", s));
        }
        let chat_id = chat
            .map(|c| c.parse::<i64>().map_err(|e| format!("bad chat id {:?}: {}", c, e)))
            .transpose()?;
        Ok(Self {
            id: id.to_string(),
            chat_id,
        })
    }
}

/// Parse a comma-separated subject list, skipping blank entries.
pub fn parse_subject_list(raw: &str) -> Result<Vec<Subject>, String> {
    raw.split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(str::parse)
        .collect()
}
