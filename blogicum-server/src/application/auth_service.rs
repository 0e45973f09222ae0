use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use tracing::{debug, info};

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, RegisterRequest, User};
use crate::infrastructure::jwt::JwtService;

// Verified against when the username is unknown so both login paths hash once.
const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

#[derive(Debug, Clone)]
pub(crate) struct AuthResult {
    pub(crate) user: User,
    pub(crate) access_token: String,
}

pub(crate) struct AuthService<R: UserRepository> {
    users: R,
    jwt: JwtService,
}

impl<R: UserRepository> AuthService<R> {
    pub(crate) fn new(users: R, jwt: JwtService) -> Self {
        Self { users, jwt }
    }

    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;
        let password_hash = hash_password(&req.password)?;

        let user = self
            .users
            .create_user(NewUser {
                username: req.username,
                email: req.email,
                first_name: req.first_name,
                last_name: req.last_name,
                password_hash,
            })
            .await?;
        info!(user_id = user.id, username = %user.username, "user registered");

        self.issue(user)
    }

    pub(crate) async fn login(&self, req: LoginRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        let Some(credentials) = self.users.find_by_username(&req.username).await? else {
            debug!(username = %req.username, "login for unknown username");
            let _ = verify_password(&req.password, DUMMY_PASSWORD_HASH);
            return Err(DomainError::InvalidCredentials);
        };

        if !verify_password(&req.password, &credentials.password_hash)? {
            debug!(user_id = credentials.user.id, "login with wrong password");
            return Err(DomainError::InvalidCredentials);
        }
        self.issue(credentials.user)
    }

    fn issue(&self, user: User) -> Result<AuthResult, DomainError> {
        let access_token = self
            .jwt
            .generate_token(user.id, &user.username)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(AuthResult { user, access_token })
    }
}

fn argon2() -> Result<Argon2<'static>, DomainError> {
    let params = Params::new(19 * 1024, 2, 1, None)
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn hash_password(raw_password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = argon2()?
        .hash_password(raw_password.as_bytes(), &salt)
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;
    Ok(password_hash.to_string())
}

/// `Ok(false)` on a mismatch; a malformed stored hash is an unexpected error.
fn verify_password(raw_password: &str, password_hash: &str) -> Result<bool, DomainError> {
    let parsed_hash =
        PasswordHash::new(password_hash).map_err(|err| DomainError::Unexpected(err.to_string()))?;
    match argon2()?.verify_password(raw_password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(err) => Err(DomainError::Unexpected(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthService, hash_password, verify_password};
    use crate::application::test_support::InMemoryBlog;
    use crate::data::user_repository::UserRepository;
    use crate::domain::error::DomainError;
    use crate::domain::user::{LoginRequest, RegisterRequest};
    use crate::infrastructure::jwt::JwtService;

    fn test_jwt() -> JwtService {
        JwtService::new("0123456789abcdef0123456789abcdef", 3600)
    }

    fn registration(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn register_normalizes_and_stores_hash() {
        let store = InMemoryBlog::new();
        let service = AuthService::new(store.clone(), test_jwt());

        let result = service
            .register(RegisterRequest {
                first_name: " Ivan ".to_string(),
                last_name: "Petrov".to_string(),
                ..registration("  valid_user  ", "  VALID@EXAMPLE.COM  ", "very-secure-password")
            })
            .await
            .expect("register must succeed");
        assert_eq!(result.user.username, "valid_user");
        assert_eq!(result.user.email, "valid@example.com");
        assert_eq!(result.user.first_name, "Ivan");
        assert!(!result.access_token.is_empty());

        let stored = store
            .find_by_username("valid_user")
            .await
            .expect("lookup must succeed")
            .expect("user must be stored");
        assert_ne!(stored.password_hash, "very-secure-password");
        assert!(stored.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn register_rejects_short_password_before_storing() {
        let store = InMemoryBlog::new();
        let service = AuthService::new(store.clone(), test_jwt());

        let err = service
            .register(registration("valid_user", "valid@example.com", "short"))
            .await
            .expect_err("register must fail");
        assert!(matches!(err, DomainError::Validation { field: "password", .. }));
        assert!(
            store
                .find_by_username("valid_user")
                .await
                .expect("lookup must succeed")
                .is_none()
        );
    }

    #[tokio::test]
    async fn register_reports_taken_username() {
        let service = AuthService::new(InMemoryBlog::new(), test_jwt());
        service
            .register(registration("valid_user", "first@example.com", "password123"))
            .await
            .expect("first registration must succeed");

        let err = service
            .register(registration("valid_user", "second@example.com", "password123"))
            .await
            .expect_err("username is taken");
        assert!(matches!(err, DomainError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn issued_token_carries_user_identity() {
        let service = AuthService::new(InMemoryBlog::new(), test_jwt());

        let result = service
            .register(registration("valid_user", "valid@example.com", "password123"))
            .await
            .expect("register must succeed");
        let claims = test_jwt()
            .verify_token(&result.access_token)
            .expect("token must verify");
        assert_eq!(claims.user_id, result.user.id);
        assert_eq!(claims.username, "valid_user");
    }

    #[tokio::test]
    async fn login_succeeds_with_registered_password() {
        let service = AuthService::new(InMemoryBlog::new(), test_jwt());
        let registered = service
            .register(registration("valid_user", "valid@example.com", "correct-password"))
            .await
            .expect("register must succeed");

        let result = service
            .login(login(" valid_user ", "correct-password"))
            .await
            .expect("login must succeed");
        assert_eq!(result.user.id, registered.user.id);
        assert!(!result.access_token.is_empty());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let service = AuthService::new(InMemoryBlog::new(), test_jwt());
        service
            .register(registration("valid_user", "valid@example.com", "correct-password"))
            .await
            .expect("register must succeed");

        let wrong_password = service
            .login(login("valid_user", "wrong-password"))
            .await
            .expect_err("login must fail");
        let unknown_user = service
            .login(login("ghost", "correct-password"))
            .await
            .expect_err("login must fail");
        assert!(matches!(wrong_password, DomainError::InvalidCredentials));
        assert!(matches!(unknown_user, DomainError::InvalidCredentials));
    }

    #[test]
    fn dummy_hash_is_well_formed() {
        assert_eq!(
            verify_password("anything", super::DUMMY_PASSWORD_HASH).ok(),
            Some(false)
        );
    }

    #[test]
    fn malformed_stored_hash_is_unexpected() {
        let err = verify_password("anything", "not-a-hash").expect_err("must fail");
        assert!(matches!(err, DomainError::Unexpected(_)));

        let hash = hash_password("secret-pass").expect("hash must be created");
        assert_eq!(verify_password("secret-pass", &hash).ok(), Some(true));
    }
}
