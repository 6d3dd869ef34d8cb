//! Credential handling: Argon2id hashing ([`password`]) and HS256 bearer
//! tokens ([`jwt`]).

pub mod jwt;
pub mod password;
