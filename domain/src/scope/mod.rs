//! Scope items for the scope topic

use crate::document::Document;
use crate::core::question::QuestionType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const BULLET: &str = "• ";

/// Source recorded for items the facilitator adds by hand
pub const MANUAL_SOURCE: &str = "Handmatig toegevoegd";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeCategory {
    OutOfScope,
    InScope,
    Unclear,
}

impl ScopeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeCategory::OutOfScope => "out_of_scope",
            ScopeCategory::InScope => "in_scope",
            ScopeCategory::Unclear => "unclear",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScopeCategory::OutOfScope => "Buiten scope",
            ScopeCategory::InScope => "Binnen scope",
            ScopeCategory::Unclear => "Nog te bepalen",
        }
    }
}

impl fmt::Display for ScopeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScopeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "out_of_scope" | "out" => Ok(ScopeCategory::OutOfScope),
            "in_scope" | "in" => Ok(ScopeCategory::InScope),
            "unclear" => Ok(ScopeCategory::Unclear),
            other => Err(format!("Unknown scope category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeItem {
    pub id: String,
    pub text: String,
    pub category: ScopeCategory,
    pub source: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts_with_goals: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_clarification: Option<String>,
}

/// Split every `out_of_scope` answer into items.
///
/// Answers are split on `,`, `;` and newlines; duplicates are dropped
/// case-insensitively, keeping the first occurrence. Every item starts `unclear`.
pub fn collect_scope_items(documents: &[Document]) -> Vec<ScopeItem> {
    let mut items: Vec<ScopeItem> = Vec::new();
    let mut counter = 0usize;
    for doc in documents {
        let answer = doc.answer(QuestionType::OutOfScope);
        for part in answer.split([',', ';', '\n']).map(str::trim) {
            if part.is_empty() {
                continue;
            }
            let lower = part.to_lowercase();
            if items.iter().any(|i| i.text.to_lowercase() == lower) {
                continue;
            }
            items.push(ScopeItem {
                id: format!("scope-{}", counter),
                text: part.to_string(),
                category: ScopeCategory::Unclear,
                source: doc.respondent_id.clone(),
                conflicts_with_goals: Vec::new(),
                suggested_clarification: None,
            });
            counter += 1;
        }
    }
    items
}

/// Append a hand-written item; returns its id.
pub fn add_manual_item(items: &mut Vec<ScopeItem>, text: impl Into<String>, category: ScopeCategory) -> String {
    let next = items
        .iter()
        .filter_map(|i| i.id.strip_prefix("scope-")?.parse::<usize>().ok())
        .max()
        .map_or(0, |n| n + 1);
    let id = format!("scope-{}", next);
    items.push(ScopeItem {
        id: id.clone(),
        text: text.into(),
        category,
        source: MANUAL_SOURCE.to_string(),
        conflicts_with_goals: Vec::new(),
        suggested_clarification: None,
    });
    id
}

pub fn categorize(items: &mut [ScopeItem], item_id: &str, category: ScopeCategory) -> bool {
    match items.iter_mut().find(|i| i.id == item_id) {
        Some(item) => {
            item.category = category;
            true
        }
        None => false,
    }
}

/// Items nobody classified are treated as out of scope.
pub fn finalize(items: &mut [ScopeItem]) {
    for item in items.iter_mut() {
        if item.category == ScopeCategory::Unclear {
            item.category = ScopeCategory::OutOfScope;
        }
    }
}

/// Approved scope text: one `• item` line per out-of-scope item
pub fn scope_text(items: &[ScopeItem]) -> String {
    items
        .iter()
        .filter(|i| i.category == ScopeCategory::OutOfScope)
        .map(|i| format!("{}{}", BULLET, i.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Out-of-scope entries of an approved scope text, bullets stripped
pub fn parse_scope_text(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| {
            let line = line.trim();
            line.strip_prefix(BULLET.trim_end())
                .map(str::trim_start)
                .unwrap_or(line)
        })
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
