//! Answers from the question-answering backend.

use std::fmt;

/// Relevance score clamped into `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Relevance(f64);

impl Relevance {
    /// Clamp a raw score into range. Non-finite scores become zero.
    pub fn new(score: f64) -> Self {
        if score.is_finite() {
            Relevance(score.clamp(0.0, 1.0))
        } else {
            Relevance(0.0)
        }
    }

    pub fn score(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Relevance {
    /// Percentage with one decimal place, e.g. `87.5%`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

/// Structured contact details; each part is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
}

/// Which contact line is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Phone,
    Email,
    Website,
    Address,
}

impl ContactInfo {
    /// The present contact lines in display order.
    pub fn lines(&self) -> Vec<(ContactKind, &str)> {
        [
            (ContactKind::Phone, &self.phone),
            (ContactKind::Email, &self.email),
            (ContactKind::Website, &self.website),
            (ContactKind::Address, &self.address),
        ]
        .into_iter()
        .filter_map(|(kind, value)| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(|v| (kind, v))
        })
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }
}

/// One ranked result from the question-answering backend.
#[derive(Debug, Clone, PartialEq)]
pub struct AnsweredExcerpt {
    pub provider: String,
    pub contact: Option<ContactInfo>,
    pub excerpt: String,
    pub relevance: Relevance,
}
