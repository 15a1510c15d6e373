use std::fmt;

use sqlx::FromRow;

use crate::validation::{normalize_email, normalize_name};

// ===== User Models =====

/// A user row as read from one CSV record, after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub name: String,
    pub surname: String,
    pub email: String,
}

impl UserRecord {
    /// Build a record from raw CSV fields, applying name and email normalization.
    pub fn normalized(name: &str, surname: &str, email: &str) -> Self {
        Self {
            name: normalize_name(name),
            surname: normalize_name(surname),
            email: normalize_email(email),
        }
    }
}

impl fmt::Display for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.name, self.surname, self.email)
    }
}

/// A persisted row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_record_from_raw_fields() {
        let record = UserRecord::normalized(" john ", "SMITH", " John@Example.com");
        assert_eq!(record.name, "John");
        assert_eq!(record.surname, "Smith");
        assert_eq!(record.email, "john@example.com");
        assert_eq!(record.to_string(), "John Smith (john@example.com)");
    }
}
