use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::warn;

use crate::core::signer::{CredentialError, EnvKeyProvider, KeyFileProvider, SignerProvider};

/// Where the private key comes from. It is read at signing time only.
#[derive(Debug, Clone, Args)]
pub struct SignerCliArgs {
    /// File holding the hex private key. Takes precedence over the environment variable.
    #[arg(env = "RESTAKER_KEY_FILE", long)]
    pub key_file: Option<PathBuf>,

    /// Name of the environment variable holding the hex private key.
    #[arg(env = "RESTAKER_KEY_ENV_VAR", long, default_value = "PRIVATE_KEY")]
    pub key_env_var: String,
}

impl SignerCliArgs {
    pub fn provider(&self) -> Result<Arc<dyn SignerProvider>, CredentialError> {
        match &self.key_file {
            Some(path) => Ok(Arc::new(KeyFileProvider::new(path)?)),
            None => {
                let provider = EnvKeyProvider::new(&self.key_env_var)?;
                warn!(
                    var = %self.key_env_var,
                    "Private key read from the environment, where it stays for the whole run. Prefer --key-file"
                );
                Ok(Arc::new(provider))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use alloy::primitives::address;

    use super::*;

    #[test]
    fn key_file_is_used_before_the_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80").unwrap();
        let args = SignerCliArgs {
            key_file: Some(file.path().to_path_buf()),
            key_env_var: "RESTAKER_TEST_KEY_VAR_THAT_IS_NOT_SET".to_string(),
        };

        let provider = args.provider().unwrap();

        assert_eq!(provider.address(), address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
    }
}
