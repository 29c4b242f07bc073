// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing key material.
//!
//! Keys are loaded once when the authenticator is built and are read-only
//! afterwards. RSA keys must be PEM encoded (PKCS#1 or PKCS#8 private keys,
//! SPKI or PKCS#1 public keys).

use std::fs;
use std::path::Path;

use jsonwebtoken::{DecodingKey, EncodingKey};

use super::error::SetupError;

/// Keys used to sign and verify tokens.
#[derive(Clone)]
pub enum KeyMaterial {
    /// Shared HMAC secret.
    Secret {
        encoding: EncodingKey,
        decoding: DecodingKey,
    },
    /// RSA key pair. The private key only signs, the public key only verifies.
    RsaPair {
        private: EncodingKey,
        public: DecodingKey,
    },
}

impl KeyMaterial {
    /// Build HMAC keys from a non-empty secret.
    pub fn from_secret(secret: &[u8]) -> Result<Self, SetupError> {
        if secret.is_empty() {
            return Err(SetupError::MissingSecretKey);
        }
        Ok(KeyMaterial::Secret {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        })
    }

    /// Load an RSA key pair from PEM files.
    ///
    /// Unreadable files and malformed keys are reported separately so that
    /// filesystem problems can be told apart from bad key contents.
    pub fn from_rsa_files(private_path: &Path, public_path: &Path) -> Result<Self, SetupError> {
        let private_pem = fs::read(private_path).map_err(|source| SetupError::NoPrivateKeyFile {
            path: private_path.to_path_buf(),
            source,
        })?;
        let private =
            EncodingKey::from_rsa_pem(&private_pem).map_err(SetupError::InvalidPrivateKey)?;

        let public_pem = fs::read(public_path).map_err(|source| SetupError::NoPublicKeyFile {
            path: public_path.to_path_buf(),
            source,
        })?;
        let public = DecodingKey::from_rsa_pem(&public_pem).map_err(SetupError::InvalidPublicKey)?;

        Ok(KeyMaterial::RsaPair { private, public })
    }

    /// Key used for issuance.
    pub fn encoding_key(&self) -> &EncodingKey {
        match self {
            KeyMaterial::Secret { encoding, .. } => encoding,
            KeyMaterial::RsaPair { private, .. } => private,
        }
    }

    /// Key used for verification.
    pub fn decoding_key(&self) -> &DecodingKey {
        match self {
            KeyMaterial::Secret { decoding, .. } => decoding,
            KeyMaterial::RsaPair { public, .. } => public,
        }
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key bytes
        match self {
            KeyMaterial::Secret { .. } => f.write_str("KeyMaterial::Secret(..)"),
            KeyMaterial::RsaPair { .. } => f.write_str("KeyMaterial::RsaPair(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(
            KeyMaterial::from_secret(b""),
            Err(SetupError::MissingSecretKey)
        ));
    }

    #[test]
    fn loads_rsa_fixture_pair() {
        let keys =
            KeyMaterial::from_rsa_files(&fixture("private.pem"), &fixture("public.pem")).unwrap();
        assert!(matches!(keys, KeyMaterial::RsaPair { .. }));
    }

    #[test]
    fn missing_private_key_file() {
        let result = KeyMaterial::from_rsa_files(
            Path::new("/nonexistent/private.pem"),
            &fixture("public.pem"),
        );
        assert!(matches!(result, Err(SetupError::NoPrivateKeyFile { .. })));
    }

    #[test]
    fn missing_public_key_file() {
        let result = KeyMaterial::from_rsa_files(
            &fixture("private.pem"),
            Path::new("/nonexistent/public.pem"),
        );
        assert!(matches!(result, Err(SetupError::NoPublicKeyFile { .. })));
    }

    #[test]
    fn malformed_private_key() {
        let mut garbage = NamedTempFile::new().unwrap();
        writeln!(garbage, "this is not a pem key").unwrap();

        let result = KeyMaterial::from_rsa_files(garbage.path(), &fixture("public.pem"));
        assert!(matches!(result, Err(SetupError::InvalidPrivateKey(_))));
    }

    #[test]
    fn malformed_public_key() {
        let mut garbage = NamedTempFile::new().unwrap();
        writeln!(garbage, "ssh-rsa AAAA not-pem").unwrap();

        let result = KeyMaterial::from_rsa_files(&fixture("private.pem"), garbage.path());
        assert!(matches!(result, Err(SetupError::InvalidPublicKey(_))));
    }

    #[test]
    fn debug_hides_key_bytes() {
        let keys = KeyMaterial::from_secret(b"top-secret").unwrap();
        let printed = format!("{keys:?}");
        assert!(!printed.contains("top-secret"));
    }
}
