use std::path::PathBuf;
use std::str::FromStr;

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Private key not found: {0}")]
    Missing(String),

    #[error("Private key is not a valid secp256k1 key")]
    Invalid,

    #[error("Could not read key file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Key now derives {actual}, wallet was started as {expected}")]
    AddressChanged { expected: Address, actual: Address },
}

/// Hands out a signer for the duration of one signature.
///
/// Implementations load key material on every call and keep none of it around.
/// Callers must drop the returned signer as soon as the signature exists.
#[cfg_attr(test, mockall::automock)]
pub trait SignerProvider: Send + Sync {
    /// Wallet address. Available without touching the key.
    fn address(&self) -> Address;

    fn load_signer(&self) -> Result<PrivateKeySigner, CredentialError>;
}

fn parse_key(raw: &str) -> Result<PrivateKeySigner, CredentialError> {
    let key = Zeroizing::new(raw.trim().to_string());
    if key.is_empty() {
        return Err(CredentialError::Invalid);
    }
    PrivateKeySigner::from_str(&key).map_err(|_| CredentialError::Invalid)
}

fn check_address(expected: Address, signer: PrivateKeySigner) -> Result<PrivateKeySigner, CredentialError> {
    let actual = signer.address();
    if actual != expected {
        return Err(CredentialError::AddressChanged { expected, actual });
    }
    Ok(signer)
}

/// Reads a hex private key from an environment variable (populated from `.env.local`/`.env`).
///
/// Only the copies made here are zeroized. The variable itself lives in the process
/// environment until exit, which makes [`KeyFileProvider`] the better choice.
#[derive(Debug, Clone)]
pub struct EnvKeyProvider {
    var: String,
    address: Address,
}

impl EnvKeyProvider {
    pub fn new(var: impl Into<String>) -> Result<Self, CredentialError> {
        let var = var.into();
        let address = Self::read(&var)?.address();
        Ok(Self { var, address })
    }

    fn read(var: &str) -> Result<PrivateKeySigner, CredentialError> {
        let raw = Zeroizing::new(std::env::var(var).map_err(|_| CredentialError::Missing(var.to_string()))?);
        parse_key(&raw)
    }
}

impl SignerProvider for EnvKeyProvider {
    fn address(&self) -> Address {
        self.address
    }

    fn load_signer(&self) -> Result<PrivateKeySigner, CredentialError> {
        check_address(self.address, Self::read(&self.var)?)
    }
}

/// Reads a hex private key from a local secret file.
#[derive(Debug, Clone)]
pub struct KeyFileProvider {
    path: PathBuf,
    address: Address,
}

impl KeyFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, CredentialError> {
        let path = path.into();
        let address = Self::read(&path)?.address();
        Ok(Self { path, address })
    }

    fn read(path: &PathBuf) -> Result<PrivateKeySigner, CredentialError> {
        let raw = Zeroizing::new(
            std::fs::read_to_string(path).map_err(|source| CredentialError::Io { path: path.clone(), source })?,
        );
        parse_key(&raw)
    }
}

impl SignerProvider for KeyFileProvider {
    fn address(&self) -> Address {
        self.address
    }

    fn load_signer(&self) -> Result<PrivateKeySigner, CredentialError> {
        check_address(self.address, Self::read(&self.path)?)
    }
}
