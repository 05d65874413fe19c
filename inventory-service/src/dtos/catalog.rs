use serde::Deserialize;

/// Substring filter for catalog list endpoints.
#[derive(Debug, Deserialize)]
pub struct LabelQuery {
    pub q: Option<String>,
}

/// Typeahead resolution input: the composite display text.
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub text: String,
}
