// src/services/auth.rs

use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::common::error::AppError;

// A sessão do admin dura 7 dias, igual ao cookie
const SESSION_TTL_DAYS: i64 = 7;
const ADMIN_ROLE: &str = "admin";

// Estrutura de dados ("claims") dentro do JWT da sessão.
// HMAC-SHA256 sobre { role, iat, exp } - é só isso que a sessão carrega.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub role: String,
    pub iat: usize,
    pub exp: usize,
}

// O serviço de autenticação do painel: uma única senha compartilhada
// (hash bcrypt vindo do ambiente) que troca por um token assinado.
#[derive(Clone)]
pub struct AuthService {
    password_hash: String,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(password_hash: String, jwt_secret: String) -> Self {
        Self {
            password_hash,
            jwt_secret,
        }
    }

    pub async fn login(&self, password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let password_hash_clone = self.password_hash.clone();

        // Executa a verificação bcrypt em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token()
    }

    pub fn create_token(&self) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(SESSION_TTL_DAYS);

        let claims = SessionClaims {
            role: ADMIN_ROLE.to_string(),
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    // Assinatura precisa bater E o token não pode estar vencido;
    // qualquer outra coisa é a mesma sessão inválida, sem distinção.
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, AppError> {
        let validation = Validation::default();
        let token_data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidSession)?;

        if token_data.claims.role != ADMIN_ROLE {
            return Err(AppError::InvalidSession);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> AuthService {
        let hash = bcrypt::hash("oficina123", 4).unwrap();
        AuthService::new(hash, secret.to_string())
    }

    #[tokio::test]
    async fn login_with_correct_password_yields_valid_token() {
        let auth = service("test-secret");
        let token = auth.login("oficina123").await.unwrap();

        let claims = auth.validate_token(&token).unwrap();
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_rejected() {
        let auth = service("test-secret");
        let result = auth.login("senha-errada").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let auth = service("secret-a");
        let other = service("secret-b");

        let token = other.create_token().unwrap();
        assert!(matches!(
            auth.validate_token(&token),
            Err(AppError::InvalidSession)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = service("test-secret");

        let now = Utc::now();
        let claims = SessionClaims {
            role: "admin".to_string(),
            iat: (now - chrono::Duration::days(8)).timestamp() as usize,
            exp: (now - chrono::Duration::days(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test-secret".as_ref()),
        )
        .unwrap();

        assert!(matches!(
            auth.validate_token(&token),
            Err(AppError::InvalidSession)
        ));
    }

    #[test]
    fn token_without_admin_role_is_rejected() {
        let auth = service("test-secret");

        let now = Utc::now();
        let claims = SessionClaims {
            role: "viewer".to_string(),
            iat: now.timestamp() as usize,
            exp: (now + chrono::Duration::days(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test-secret".as_ref()),
        )
        .unwrap();

        assert!(matches!(
            auth.validate_token(&token),
            Err(AppError::InvalidSession)
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let auth = service("test-secret");
        assert!(matches!(
            auth.validate_token("nem.de.longe"),
            Err(AppError::InvalidSession)
        ));
    }
}
