//! Form-level validation run before submission.

use thiserror::Error;

use super::{SessionDraft, MAX_RATING, MAX_STRATEGIES};

/// A field that blocks submission.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationIssue {
    #[error("a client is required")]
    MissingClient,

    #[error("a session date and time is required")]
    MissingDateTime,

    #[error("duration must be at least 1 minute")]
    DurationTooShort,

    #[error("{field} rating {value} is outside 0-10")]
    RatingOutOfRange { field: &'static str, value: i32 },

    #[error("product {code}: quantity {quantity} is outside 0 < q <= {available}")]
    QuantityOutOfBounds {
        code: String,
        quantity: f64,
        available: f64,
    },

    #[error("milestone {milestone_id} has {count} strategies (max 5)")]
    TooManyStrategies { milestone_id: i64, count: usize },
}

impl SessionDraft {
    /// Check every field the form layer is responsible for.
    ///
    /// # Errors
    ///
    /// All issues found, in field order.
    pub fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        let mut issues = Vec::new();

        if self.session.client_id.is_none() {
            issues.push(ValidationIssue::MissingClient);
        }
        if self.session.session_date_time.is_none() {
            issues.push(ValidationIssue::MissingDateTime);
        }
        if self.session.duration_minutes < 1 {
            issues.push(ValidationIssue::DurationTooShort);
        }

        let ratings = &self.note.ratings;
        for (field, value) in [
            ("mood", ratings.mood),
            ("focus", ratings.focus),
            ("cooperation", ratings.cooperation),
            ("physical activity", ratings.physical_activity),
        ] {
            if !(0..=i32::from(MAX_RATING)).contains(&value) {
                issues.push(ValidationIssue::RatingOutOfRange { field, value });
            }
        }

        for line in self.note.products() {
            let quantity = line.quantity();
            if quantity.is_nan() || quantity <= 0.0 || quantity > line.available_quantity() {
                issues.push(ValidationIssue::QuantityOutOfBounds {
                    code: line.product_code().to_string(),
                    quantity,
                    available: line.available_quantity(),
                });
            }
        }

        for milestone in self.assessments.iter().flat_map(|a| a.milestones()) {
            let count = milestone.strategies().len();
            if count > MAX_STRATEGIES {
                issues.push(ValidationIssue::TooManyStrategies {
                    milestone_id: milestone.milestone_id(),
                    count,
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}
