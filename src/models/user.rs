use crate::error::{ChooseeError, Result};

/// Who is voting. Decisions are stored server-side under `user_id()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggedInUser {
    Phone(String),
    Authenticated { user_id: String },
}

impl LoggedInUser {
    /// Accepts US numbers in the usual written forms and normalises them to
    /// `+1XXXXXXXXXX`.
    pub fn from_phone(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let (has_plus, rest) = match trimmed.strip_prefix('+') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let mut digits = String::with_capacity(rest.len());
        for c in rest.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' | '.' | '(' | ')' => {}
                _ => return Err(ChooseeError::InvalidPhoneNumber),
            }
        }

        let national = match (has_plus, digits.len()) {
            (false, 10) => digits.as_str(),
            (_, 11) if digits.starts_with('1') => &digits[1..],
            _ => return Err(ChooseeError::InvalidPhoneNumber),
        };

        Ok(LoggedInUser::Phone(format!("+1{}", national)))
    }

    pub fn user_id(&self) -> &str {
        match self {
            LoggedInUser::Phone(number) => number,
            LoggedInUser::Authenticated { user_id } => user_id,
        }
    }
}
