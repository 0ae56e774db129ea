use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every rule a payload violated, in field order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation failed for {} field(s).", .errors.len())]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub(crate) fn from_fields(
        outcomes: impl IntoIterator<Item = (&'static str, Option<String>)>,
    ) -> Self {
        let errors = outcomes
            .into_iter()
            .filter_map(|(field, error)| error.map(|message| FieldError { field, message }))
            .collect();
        Self { errors }
    }
}
