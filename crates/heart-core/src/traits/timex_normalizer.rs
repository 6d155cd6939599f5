//! The external text to normalized-value collaborator.

use crate::errors::HeartResult;

/// Normalizes a temporal expression's raw text into a type-specific value:
/// an ISO date, an ISO date-time, or a duration such as `P6M` / `PT10M`.
///
/// Implementations live outside this workspace. Errors are not caught by the
/// pipeline; they abort processing of the document.
pub trait ITimexNormalizer {
    fn normalize(&self, text: &str, timex_type: &str, dct: &str) -> HeartResult<String>;
}

impl<F> ITimexNormalizer for F
where
    F: Fn(&str, &str, &str) -> HeartResult<String>,
{
    fn normalize(&self, text: &str, timex_type: &str, dct: &str) -> HeartResult<String> {
        self(text, timex_type, dct)
    }
}
