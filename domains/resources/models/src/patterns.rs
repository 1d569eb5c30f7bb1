use std::sync::LazyLock;

use regex::Regex;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$")
        .expect("email pattern compiles")
});

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[\d\s-]{10,}$").expect("phone pattern compiles")
});

static ZIP_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{5}(-\d{4})?$").expect("zip code pattern compiles")
});

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?([\da-z.-]+)\.([a-z.]{2,6})([/\w .-]*)*/?$")
        .expect("url pattern compiles")
});

/// Named string formats a field can be constrained to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Email,
    Phone,
    ZipCode,
    Url,
}

impl Pattern {
    pub fn matches(self, value: &str) -> bool {
        let regex = match self {
            Self::Email => &EMAIL,
            Self::Phone => &PHONE,
            Self::ZipCode => &ZIP_CODE,
            Self::Url => &URL,
        };
        regex.is_match(value)
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Email => "email address",
            Self::Phone => "phone number",
            Self::ZipCode => "ZIP code",
            Self::Url => "URL",
        }
    }
}
