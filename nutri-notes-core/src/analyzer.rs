//! Contract of the external service that turns meal descriptions into
//! nutrient breakdowns.

use thiserror::Error;

use crate::models::MealBreakdown;

/// Errors reported by a [`MealAnalyzer`].
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Analyzer not configured: {0}")]
    NotConfigured(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Analyzer returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Could not decode meal breakdowns: {0}")]
    InvalidResponse(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Breaks meal descriptions down into food items.
///
/// Implementations block until the answer is available. The returned list is
/// expected to line up 1:1 with `descriptions`; callers check that and treat a
/// mismatch as a failed day rather than an error of the analyzer itself.
pub trait MealAnalyzer {
    fn meal_breakdowns(
        &self,
        descriptions: &[String],
        knowledge_base: &str,
    ) -> Result<Vec<MealBreakdown>, AnalyzerError>;
}

impl<A: MealAnalyzer + ?Sized> MealAnalyzer for &A {
    fn meal_breakdowns(
        &self,
        descriptions: &[String],
        knowledge_base: &str,
    ) -> Result<Vec<MealBreakdown>, AnalyzerError> {
        (**self).meal_breakdowns(descriptions, knowledge_base)
    }
}

impl<A: MealAnalyzer + ?Sized> MealAnalyzer for Box<A> {
    fn meal_breakdowns(
        &self,
        descriptions: &[String],
        knowledge_base: &str,
    ) -> Result<Vec<MealBreakdown>, AnalyzerError> {
        (**self).meal_breakdowns(descriptions, knowledge_base)
    }
}
