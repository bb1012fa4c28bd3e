use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Profile of the signed-in user as returned by the auth endpoints.
///
/// The server owns the shape of this record; only the commonly present
/// fields are typed, everything else is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("unknown user")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_are_kept() {
        let user: User =
            serde_json::from_str(r#"{"_id":"abc","email":"a@b.co","role":"admin"}"#).unwrap();

        assert_eq!(user.id, None);
        assert_eq!(user.display_name(), "a@b.co");
        assert_eq!(user.extra.get("_id"), Some(&Value::from("abc")));
        assert_eq!(user.extra.get("role"), Some(&Value::from("admin")));
    }
}
