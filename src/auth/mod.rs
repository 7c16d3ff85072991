pub mod accounts;
pub mod extractors;
pub mod identity;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserResponse;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use identity::IdentityResolver;
pub use middleware::AuthMiddleware;
pub use password::CredentialStore;
pub use token::{Claims, InvalidToken, JwtSettings, TokenService};

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Email address for the new account.
    #[validate(email, length(max = 255))]
    pub email: String,
    /// Password for the new account, 8 to 100 characters.
    #[validate(length(min = 8, max = 100))]
    pub password: String,
}

/// Represents the payload for a signin request.
#[derive(Debug, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub password: String,
}

/// Response structure after successful signup or signin.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn bearer(access_token: String, user: UserResponse) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_signin_request_validation() {
        let valid_signin = SigninRequest {
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid_signin.validate().is_ok());

        let invalid_email_signin = SigninRequest {
            email: "testexample.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(invalid_email_signin.validate().is_err());

        let empty_password_signin = SigninRequest {
            email: "test@example.com".to_string(),
            password: "".to_string(),
        };
        assert!(empty_password_signin.validate().is_err());
    }

    #[test]
    fn test_signup_request_validation() {
        let valid_signup = SignupRequest {
            email: "test@example.com".to_string(),
            password: "password1".to_string(),
        };
        assert!(valid_signup.validate().is_ok());

        let short_password_signup = SignupRequest {
            email: "test@example.com".to_string(),
            password: "passwd1".to_string(),
        };
        assert!(short_password_signup.validate().is_err());

        let long_password_signup = SignupRequest {
            email: "test@example.com".to_string(),
            password: "p".repeat(101),
        };
        assert!(long_password_signup.validate().is_err());

        let invalid_email_signup = SignupRequest {
            email: "not-an-email".to_string(),
            password: "password1".to_string(),
        };
        assert!(invalid_email_signup.validate().is_err());
    }
}
