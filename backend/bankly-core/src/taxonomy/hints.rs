//! Disambiguation of overloaded upstream codes.
//!
//! The upstream API answers most validation failures with the single code
//! `INVALID_PARAMETER` and names the offending field only in free text
//! ("Exceeded the length of 'register name'"). Hints map such text fragments
//! to precise catalog keys.
//!
//! The fragments follow the upstream wording as observed and break if that
//! wording changes. They are data, not a contract: pass your own list to
//! [`ErrorMapper::with_hints`](super::ErrorMapper::with_hints) to adjust.

use std::borrow::Cow;

use regex::{Regex, RegexBuilder};

/// The overloaded upstream code that triggers hint matching.
pub const INVALID_PARAMETER_CODE: &str = "INVALID_PARAMETER";

/// Key used when no hint matches but the text talks about a length.
pub const INVALID_PARAMETER_LENGTH_KEY: &str = "INVALID_PARAMETER_LENGTH";

const LENGTH_FRAGMENT: &str = "length";

/// One text fragment and the catalog key it selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterHint {
    pub fragment: Cow<'static, str>,
    pub key: Cow<'static, str>,
}

impl ParameterHint {
    pub const fn new(fragment: &'static str, key: &'static str) -> Self {
        Self {
            fragment: Cow::Borrowed(fragment),
            key: Cow::Borrowed(key),
        }
    }

    pub fn owned(fragment: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            fragment: Cow::Owned(fragment.into()),
            key: Cow::Owned(key.into()),
        }
    }
}

/// Hints in priority order. Compound field names come before the bare
/// `'name'` so "register name" is not swallowed by it.
pub const DEFAULT_PARAMETER_HINTS: &[ParameterHint] = &[
    ParameterHint::new("length of 'register name'", "INVALID_REGISTER_NAME_LENGTH"),
    ParameterHint::new("length of 'social name'", "INVALID_SOCIAL_NAME_LENGTH"),
    ParameterHint::new("length of 'trade name'", "INVALID_TRADE_NAME_LENGTH"),
    ParameterHint::new("length of 'business name'", "INVALID_BUSINESS_NAME_LENGTH"),
    ParameterHint::new("length of 'mother name'", "INVALID_MOTHER_NAME_LENGTH"),
    ParameterHint::new("length of 'name'", "INVALID_NAME_LENGTH"),
    ParameterHint::new("length of 'email'", "INVALID_EMAIL_LENGTH"),
    ParameterHint::new("length of 'street'", "INVALID_ADDRESS_LENGTH"),
    ParameterHint::new("length of 'address'", "INVALID_ADDRESS_LENGTH"),
    ParameterHint::new("length of 'complement'", "INVALID_COMPLEMENT_LENGTH"),
    ParameterHint::new("length of 'neighborhood'", "INVALID_NEIGHBORHOOD_LENGTH"),
    ParameterHint::new("length of 'city'", "INVALID_CITY_LENGTH"),
    ParameterHint::new("'zip code'", "INVALID_ZIP_CODE"),
    ParameterHint::new("'phone", "INVALID_PHONE_NUMBER"),
    ParameterHint::new("'birth date'", "INVALID_BIRTH_DATE"),
    ParameterHint::new("'document number'", "INVALID_DOCUMENT"),
];

/// Hints compiled to case-insensitive literal matchers.
#[derive(Debug, Clone)]
pub(crate) struct CompiledHints {
    matchers: Vec<(Regex, Cow<'static, str>)>,
    length: Regex,
}

impl CompiledHints {
    pub(crate) fn compile(hints: &[ParameterHint]) -> Self {
        let matchers = hints
            .iter()
            .map(|hint| (literal_matcher(&hint.fragment), hint.key.clone()))
            .collect();

        Self {
            matchers,
            length: literal_matcher(LENGTH_FRAGMENT),
        }
    }

    /// Key for an `INVALID_PARAMETER` failure described by `messages`.
    ///
    /// First matching hint wins, scanning hints in priority order across all
    /// messages. Without a match the result is `INVALID_PARAMETER_LENGTH` if
    /// any message mentions a length, otherwise `INVALID_PARAMETER`.
    pub(crate) fn disambiguate<S: AsRef<str>>(&self, messages: &[S]) -> Cow<'static, str> {
        for (matcher, key) in &self.matchers {
            if messages.iter().any(|m| matcher.is_match(m.as_ref())) {
                return key.clone();
            }
        }

        if messages.iter().any(|m| self.length.is_match(m.as_ref())) {
            Cow::Borrowed(INVALID_PARAMETER_LENGTH_KEY)
        } else {
            Cow::Borrowed(INVALID_PARAMETER_CODE)
        }
    }
}

fn literal_matcher(fragment: &str) -> Regex {
    RegexBuilder::new(&regex::escape(fragment))
        .case_insensitive(true)
        .build()
        .expect("escaped literal is a valid pattern")
}
