use base64::{Engine as _, engine::general_purpose};
use serde::Deserialize;

use crate::domain::{ClientId, ClientSecret};

/// Build the `Authorization` value used for the `Authentication` endpoint.
///
/// The API expects the upper-case `BASIC` scheme name.
pub fn encode_basic_authorization(client_id: &ClientId, client_secret: &ClientSecret) -> String {
    let credentials = format!("{}:{}", client_id.as_str(), client_secret.expose());
    format!("BASIC {}", general_purpose::STANDARD.encode(credentials))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationJsonResponse {
    pub token: String,
    #[serde(default)]
    pub schema: Option<String>,
    pub expires_in_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceJsonResponse {
    pub balance: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_authorization_encodes_id_and_secret() {
        let header = encode_basic_authorization(
            &ClientId::new("client").unwrap(),
            &ClientSecret::new("secret").unwrap(),
        );
        // base64("client:secret")
        assert_eq!(header, "BASIC Y2xpZW50OnNlY3JldA==");
    }

    #[test]
    fn decode_authentication_payload() {
        let json = r#"
        {
          "token": "abc.def",
          "schema": "JWT",
          "expiresInMinutes": 1440
        }
        "#;

        let parsed: AuthenticationJsonResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.token, "abc.def");
        assert_eq!(parsed.schema.as_deref(), Some("JWT"));
        assert_eq!(parsed.expires_in_minutes, 1440);
    }

    #[test]
    fn decode_authentication_requires_token() {
        let json = r#"{ "expiresInMinutes": 1440 }"#;
        assert!(serde_json::from_str::<AuthenticationJsonResponse>(json).is_err());
    }

    #[test]
    fn decode_balance_payload() {
        let parsed: BalanceJsonResponse = serde_json::from_str(r#"{"balance": 4200}"#).unwrap();
        assert_eq!(parsed.balance, 4200);
    }
}
