//! Business-rule conflicts reported by draft operations.

use thiserror::Error;

/// The kind of draft entry an operation was working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Goal,
    Milestone,
    Strategy,
    Product,
    Ally,
}

impl ItemKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Goal => "goal",
            Self::Milestone => "milestone",
            Self::Strategy => "strategy",
            Self::Product => "product",
            Self::Ally => "ally",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Discrete reason code shown to the user for a rejected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonCode {
    AlreadySelected,
    InvalidQuantity,
    LimitReached,
    NotFound,
}

impl ReasonCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlreadySelected => "ALREADY_SELECTED",
            Self::InvalidQuantity => "INVALID_QUANTITY",
            Self::LimitReached => "LIMIT_REACHED",
            Self::NotFound => "NOT_FOUND",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A draft operation was refused. The draft is unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    #[error("{kind} {key} is already selected")]
    AlreadySelected { kind: ItemKind, key: String },

    #[error("quantity {requested} is invalid; {available} available")]
    InvalidQuantity { requested: f64, available: f64 },

    #[error("{kind} limit of {limit} reached")]
    LimitReached { kind: ItemKind, limit: f64 },

    #[error("{kind} {key} not found")]
    NotFound { kind: ItemKind, key: String },
}

impl DraftError {
    pub(crate) fn already_selected(kind: ItemKind, key: impl ToString) -> Self {
        Self::AlreadySelected {
            kind,
            key: key.to_string(),
        }
    }

    pub(crate) fn not_found(kind: ItemKind, index: usize) -> Self {
        Self::NotFound {
            kind,
            key: format!("#{index}"),
        }
    }

    /// Reason code for display.
    pub const fn code(&self) -> ReasonCode {
        match self {
            Self::AlreadySelected { .. } => ReasonCode::AlreadySelected,
            Self::InvalidQuantity { .. } => ReasonCode::InvalidQuantity,
            Self::LimitReached { .. } => ReasonCode::LimitReached,
            Self::NotFound { .. } => ReasonCode::NotFound,
        }
    }
}
