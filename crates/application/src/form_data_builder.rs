use cartrule_core::AppResult;
use serde_json::Value;

/// Port for turning one admin sub-form's data into a domain object.
///
/// Form handlers ask each registered builder whether it `supports` the
/// submitted data and delegate to the first one that does.
pub trait FormDataBuilder: Send + Sync {
    /// Domain object produced by the builder.
    type Output;

    /// Returns whether `data` looks like input this builder understands.
    fn supports(&self, data: &Value) -> bool;

    /// Validates `data` and builds the domain object.
    fn build(&self, data: &Value) -> AppResult<Self::Output>;
}
