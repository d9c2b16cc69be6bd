use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Librarian,
    Student,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Librarian, Role::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Librarian => "LIBRARIAN",
            Role::Student => "STUDENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid role")]
pub struct InvalidRole;

impl FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(InvalidRole)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("LIBRARIAN".parse::<Role>(), Ok(Role::Librarian));
        assert_eq!("librarian".parse::<Role>(), Ok(Role::Librarian));
        assert_eq!("Student".parse::<Role>(), Ok(Role::Student));
    }

    #[test]
    fn test_parse_rejects_unknown_roles() {
        assert_eq!("ADMIN".parse::<Role>(), Err(InvalidRole));
        assert_eq!("".parse::<Role>(), Err(InvalidRole));
        assert_eq!("STUDENTS".parse::<Role>(), Err(InvalidRole));
    }

    #[test]
    fn test_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Librarian).unwrap(), r#""LIBRARIAN""#);
        let role: Role = serde_json::from_str(r#""STUDENT""#).unwrap();
        assert_eq!(role, Role::Student);
    }
}
