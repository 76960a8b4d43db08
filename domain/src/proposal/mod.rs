//! Proposal variants and their lifecycle
//!
//! Proposals come in sets of three wordings per topic. The facilitator may
//! hand-edit a variant before the group votes on it.
//!
//! ```text
//! Draft ──▶ Voting ──┬──▶ Approved
//!                    └──▶ Rejected
//! ```

use crate::core::ids::{new_id, now};
use crate::core::question::QuestionType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wording style of a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantStyle {
    /// Concise
    Beknopt,
    /// Full
    Volledig,
    /// Balanced
    Gebalanceerd,
}

impl VariantStyle {
    pub const ALL: [VariantStyle; 3] = [
        VariantStyle::Beknopt,
        VariantStyle::Volledig,
        VariantStyle::Gebalanceerd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantStyle::Beknopt => "beknopt",
            VariantStyle::Volledig => "volledig",
            VariantStyle::Gebalanceerd => "gebalanceerd",
        }
    }
}

impl fmt::Display for VariantStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VariantStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beknopt" | "concise" => Ok(VariantStyle::Beknopt),
            "volledig" | "full" => Ok(VariantStyle::Volledig),
            "gebalanceerd" | "balanced" => Ok(VariantStyle::Gebalanceerd),
            other => Err(format!("Unknown variant style: {}", other)),
        }
    }
}

/// One candidate wording (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalVariant {
    pub id: String,
    #[serde(rename = "type", alias = "style")]
    pub style: VariantStyle,
    pub text: String,
    #[serde(default)]
    pub emphasizes: String,
    #[serde(default)]
    pub includes_themes: Vec<String>,
}

impl ProposalVariant {
    pub fn new(id: impl Into<String>, style: VariantStyle, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            style,
            text: text.into(),
            emphasizes: String::new(),
            includes_themes: Vec::new(),
        }
    }

    pub fn emphasizing(mut self, emphasizes: impl Into<String>) -> Self {
        self.emphasizes = emphasizes.into();
        self
    }
}

/// Collaborator result: three variants plus a recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSet {
    pub variants: Vec<ProposalVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation_rationale: Option<String>,
}

impl ProposalSet {
    /// Generic variants used when generation fails, so voting is never blocked
    pub fn placeholder() -> Self {
        Self {
            variants: vec![
                ProposalVariant::new("variant-1", VariantStyle::Beknopt, "Korte versie van de formulering.")
                    .emphasizing("Kernpunten"),
                ProposalVariant::new("variant-2", VariantStyle::Volledig, "Uitgebreide versie met alle nuances.")
                    .emphasizing("Volledigheid"),
                ProposalVariant::new("variant-3", VariantStyle::Gebalanceerd, "Gebalanceerde versie.")
                    .emphasizing("Balans"),
            ],
            recommendation: Some(VariantStyle::Gebalanceerd.to_string()),
            recommendation_rationale: Some("Beste balans tussen beknopt en volledig".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    #[default]
    Draft,
    Voting,
    Approved,
    Rejected,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Draft => "draft",
            ProposalStatus::Voting => "voting",
            ProposalStatus::Approved => "approved",
            ProposalStatus::Rejected => "rejected",
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, ProposalStatus::Approved | ProposalStatus::Rejected)
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProposalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(ProposalStatus::Draft),
            "voting" => Ok(ProposalStatus::Voting),
            "approved" => Ok(ProposalStatus::Approved),
            "rejected" => Ok(ProposalStatus::Rejected),
            other => Err(format!("Unknown proposal status: {}", other)),
        }
    }
}

/// A stored proposal for one topic (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: String,
    pub session_id: String,
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<String>,
    pub variants: Vec<ProposalVariant>,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation_rationale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_variant_id: Option<String>,
}

impl Proposal {
    pub fn new(session_id: impl Into<String>, question_type: QuestionType, set: ProposalSet) -> Self {
        Self {
            id: new_id(),
            session_id: session_id.into(),
            question_type,
            theme_id: None,
            variants: set.variants,
            status: ProposalStatus::Draft,
            created_at: now(),
            recommendation: set.recommendation,
            recommendation_rationale: set.recommendation_rationale,
            approved_at: None,
            approved_variant_id: None,
        }
    }

    pub fn with_theme(mut self, theme_id: impl Into<String>) -> Self {
        self.theme_id = Some(theme_id.into());
        self
    }

    pub fn variant(&self, variant_id: &str) -> Option<&ProposalVariant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }

    /// The variant whose style matches the recommendation, if any
    pub fn recommended_variant(&self) -> Option<&ProposalVariant> {
        let style: VariantStyle = self.recommendation.as_deref()?.parse().ok()?;
        self.variants.iter().find(|v| v.style == style)
    }

    /// Hand-edit a variant's text. Returns `false` if the variant is unknown.
    pub fn edit_variant_text(&mut self, variant_id: &str, text: impl Into<String>) -> bool {
        match self.variants.iter_mut().find(|v| v.id == variant_id) {
            Some(variant) => {
                variant.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Set the status; approving records the approval time and variant.
    pub fn update_status(&mut self, status: ProposalStatus, approved_variant_id: Option<String>) {
        self.status = status;
        if status == ProposalStatus::Approved {
            self.approved_at = Some(now());
            self.approved_variant_id = approved_variant_id;
        }
    }
}
