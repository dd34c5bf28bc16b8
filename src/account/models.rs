//! Data models for user accounts

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Store-generated user identifier
pub type UserId = i32;

/// User with a monetary balance
///
/// `balance` is never negative; the store rejects any write that would make it so.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    #[schema(value_type = i32, example = 1)]
    pub id: UserId,
    #[serde(rename = "nombre")]
    #[sqlx(rename = "nombre")]
    #[schema(example = "Ana")]
    pub name: String,
    #[schema(value_type = String, example = "100.00")]
    pub balance: Decimal,
}

/// POST /usuario body
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewUserRequest {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(default)]
    #[schema(value_type = String, example = "100.00")]
    pub balance: Decimal,
}

/// PUT /usuario body
///
/// The browser client sends `name` here while POST uses `nombre`; both are accepted.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserUpdateRequest {
    #[serde(alias = "nombre")]
    pub name: String,
    #[schema(value_type = String, example = "100.00")]
    pub balance: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serializes_spanish_field_names() {
        let user = User {
            id: 7,
            name: "Ana".to_string(),
            balance: Decimal::new(10050, 2),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["nombre"], "Ana");
        assert_eq!(json["balance"], "100.50");
    }

    #[test]
    fn test_update_accepts_name_or_nombre() {
        let a: UserUpdateRequest =
            serde_json::from_str(r#"{"name": "Ana", "balance": 10}"#).unwrap();
        let b: UserUpdateRequest =
            serde_json::from_str(r#"{"nombre": "Ana", "balance": "10"}"#).unwrap();
        assert_eq!(a.name, b.name);
        assert_eq!(a.balance, b.balance);
    }

    #[test]
    fn test_new_user_balance_defaults_to_zero() {
        let req: NewUserRequest = serde_json::from_str(r#"{"nombre": "Beto"}"#).unwrap();
        assert_eq!(req.balance, Decimal::ZERO);
    }
}
