// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Supported signing algorithms.

use std::str::FromStr;

use jsonwebtoken::Algorithm;

use super::error::SetupError;

/// Signing algorithms accepted by the authenticator.
///
/// ## Families
///
/// - `HS*` - HMAC with a shared secret
/// - `RS*` - RSA PKCS#1 v1.5 with a private/public key pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SigningAlgorithm {
    #[default]
    HS256,
    HS384,
    HS512,
    RS256,
    RS384,
    RS512,
}

impl SigningAlgorithm {
    /// Whether tokens are signed with a private key and verified with a public key.
    pub fn is_asymmetric(&self) -> bool {
        matches!(
            self,
            SigningAlgorithm::RS256 | SigningAlgorithm::RS384 | SigningAlgorithm::RS512
        )
    }

    /// The `alg` header value for this algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            SigningAlgorithm::HS256 => "HS256",
            SigningAlgorithm::HS384 => "HS384",
            SigningAlgorithm::HS512 => "HS512",
            SigningAlgorithm::RS256 => "RS256",
            SigningAlgorithm::RS384 => "RS384",
            SigningAlgorithm::RS512 => "RS512",
        }
    }

    pub fn jwt_algorithm(&self) -> Algorithm {
        match self {
            SigningAlgorithm::HS256 => Algorithm::HS256,
            SigningAlgorithm::HS384 => Algorithm::HS384,
            SigningAlgorithm::HS512 => Algorithm::HS512,
            SigningAlgorithm::RS256 => Algorithm::RS256,
            SigningAlgorithm::RS384 => Algorithm::RS384,
            SigningAlgorithm::RS512 => Algorithm::RS512,
        }
    }
}

impl FromStr for SigningAlgorithm {
    type Err = SetupError;

    /// Parse an algorithm name. Names are matched exactly, as they appear in
    /// the JWT header.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "HS256" => Ok(SigningAlgorithm::HS256),
            "HS384" => Ok(SigningAlgorithm::HS384),
            "HS512" => Ok(SigningAlgorithm::HS512),
            "RS256" => Ok(SigningAlgorithm::RS256),
            "RS384" => Ok(SigningAlgorithm::RS384),
            "RS512" => Ok(SigningAlgorithm::RS512),
            other => Err(SetupError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

impl std::fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsa_family_is_asymmetric() {
        assert!(SigningAlgorithm::RS256.is_asymmetric());
        assert!(SigningAlgorithm::RS384.is_asymmetric());
        assert!(SigningAlgorithm::RS512.is_asymmetric());
        assert!(!SigningAlgorithm::HS256.is_asymmetric());
        assert!(!SigningAlgorithm::HS512.is_asymmetric());
    }

    #[test]
    fn from_str_parses_known_names() {
        assert_eq!("HS256".parse::<SigningAlgorithm>().unwrap(), SigningAlgorithm::HS256);
        assert_eq!(" RS384 ".parse::<SigningAlgorithm>().unwrap(), SigningAlgorithm::RS384);
    }

    #[test]
    fn from_str_rejects_unknown_names() {
        assert!(matches!(
            "none".parse::<SigningAlgorithm>(),
            Err(SetupError::UnsupportedAlgorithm(name)) if name == "none"
        ));
        // Case matters: header values are compared verbatim
        assert!("hs256".parse::<SigningAlgorithm>().is_err());
        assert!("ES256".parse::<SigningAlgorithm>().is_err());
    }

    #[test]
    fn default_is_hs256() {
        assert_eq!(SigningAlgorithm::default(), SigningAlgorithm::HS256);
        assert_eq!(SigningAlgorithm::default().to_string(), "HS256");
    }
}
