//! Credential and token adapters.
//!
//! - [`Argon2CredentialCodec`] implements the credential codec port.
//! - [`JwtTokenService`] implements the token service port with HS256 JWTs.
//! - [`token_config`] loads the signing secret and token lifetime.

mod argon2_credential_codec;
mod jwt_token_service;
pub mod token_config;

pub use argon2_credential_codec::{Argon2CredentialCodec, Argon2Params};
pub use jwt_token_service::JwtTokenService;
pub use token_config::{BuildMode, TokenConfigError, TokenSecret, TokenSettings};
