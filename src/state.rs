use std::sync::Arc;

use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::db::OrmConn;

/// Signing material for access tokens, shared by login and the auth extractor.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: Arc<EncodingKey>,
    pub decoding: Arc<DecodingKey>,
    pub ttl_hours: i64,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8], ttl_hours: i64) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret)),
            decoding: Arc::new(DecodingKey::from_secret(secret)),
            ttl_hours,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub orm: OrmConn,
    pub jwt: JwtKeys,
}
