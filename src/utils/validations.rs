// SPDX-License-Identifier: GPL-3.0-only

use crate::error::DexError;

/// Longest search term (and sanitized name) we accept
pub const MAX_SEARCH_LENGTH: usize = 100;
/// Biggest page the list endpoint is asked for
pub const MAX_PAGE_SIZE: i64 = 100;

/// Outcome of validating some user input, holds human readable messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Turns a failed validation into [`DexError::InvalidInput`]
    pub fn into_result(self) -> Result<(), DexError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(DexError::InvalidInput(self.errors))
        }
    }
}

/// Validates a search term. Empty terms are valid, they just match everything.
pub fn validate_search_term(term: &str) -> ValidationResult {
    let mut errors = Vec::new();

    if term.chars().count() > MAX_SEARCH_LENGTH {
        errors.push(format!(
            "The search term cannot exceed {MAX_SEARCH_LENGTH} characters"
        ));
    }

    let allowed = |c: char| c.is_ascii_alphanumeric() || c.is_whitespace() || c == '-' || c == '\'';
    if !term.is_empty() && !term.chars().all(allowed) {
        errors.push(String::from("The search term contains invalid characters"));
    }

    ValidationResult { errors }
}

/// Validates list pagination parameters
pub fn validate_pagination(offset: i64, limit: i64) -> ValidationResult {
    let mut errors = Vec::new();

    if offset < 0 {
        errors.push(String::from(
            "The offset must be an integer greater than or equal to 0",
        ));
    }

    if limit <= 0 {
        errors.push(String::from("The limit must be an integer greater than 0"));
    }

    if limit > MAX_PAGE_SIZE {
        errors.push(format!("The limit cannot exceed {MAX_PAGE_SIZE} items"));
    }

    ValidationResult { errors }
}

/// Pokémon ids are positive integers
pub fn validate_pokemon_id(id: i64) -> ValidationResult {
    let mut errors = Vec::new();

    if id <= 0 {
        errors.push(format!(
            "Invalid ID {id}: it must be an integer greater than 0"
        ));
    }

    ValidationResult { errors }
}

/// Trims, strips angle brackets and caps the length of user provided text
pub fn sanitize_input(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .take(MAX_SEARCH_LENGTH)
        .collect()
}

/// Absolute URL with a host, as the species links PokéApi hands out
pub fn is_valid_url(url: &str) -> bool {
    reqwest::Url::parse(url).is_ok_and(|url| url.has_host())
}
