use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use argon2::password_hash::Output;
use argon2::password_hash::ParamsString;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Block;
use argon2::Params;
use argon2::Version;
use argon2::ARGON2ID_IDENT;
use serde::Deserialize;

use super::errors::PasswordError;

/// Upper bound on a decoded PHC salt.
const MAX_SALT_LEN: usize = 64;

/// Argon2id cost profile used when hashing new passwords.
///
/// Verification never reads this: it re-derives with the parameters embedded
/// in the stored record, so changing the profile leaves existing hashes valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PasswordHashingConfig {
    /// Memory cost in KiB
    pub memory_cost_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
    pub salt_len: usize,
    /// Derived key length in bytes
    pub output_len: usize,
}

impl Default for PasswordHashingConfig {
    fn default() -> Self {
        Self {
            memory_cost_kib: 800_000,
            iterations: 1,
            parallelism: 1,
            salt_len: 16,
            output_len: 16,
        }
    }
}

impl PasswordHashingConfig {
    fn params(&self) -> Result<Params, PasswordError> {
        Params::new(
            self.memory_cost_kib,
            self.iterations,
            self.parallelism,
            Some(self.output_len),
        )
        .map_err(|e| PasswordError::HashingFailure(format!("Invalid Argon2 parameters: {}", e)))
    }
}

/// Password hashing implementation.
///
/// Produces and checks PHC strings of the form
/// `$argon2id$v=19$m=<kib>,t=<iterations>,p=<lanes>$<salt>$<key>`.
///
/// The Argon2 working set is reserved fallibly, so a profile or stored record
/// asking for more memory than the host can give fails with `HashingFailure`.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    config: PasswordHashingConfig,
}

impl PasswordHasher {
    /// Create a hasher with the default cost profile.
    ///
    /// The default profile is within Argon2's parameter ranges.
    pub fn new() -> Self {
        Self {
            config: PasswordHashingConfig::default(),
        }
    }

    /// Create a hasher with a custom cost profile.
    ///
    /// # Errors
    /// * `HashingFailure` - Parameters are outside the ranges Argon2 accepts
    pub fn with_config(config: PasswordHashingConfig) -> Result<Self, PasswordError> {
        config.params()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PasswordHashingConfig {
        &self.config
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailure` - Entropy source failed or the derivation could not run
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let params = self.config.params()?;

        let (salt, salt_string) = fresh_salt(self.config.salt_len)?;

        let output = derive(Version::V0x13, &params, password, &salt)?;
        encode_record(&params, &salt_string, output)
    }

    /// A well-formed record under this hasher's profile that no password
    /// matches.
    ///
    /// Verifying against it costs the same as verifying a real record, so a
    /// login for an unknown account does the same work as a wrong password.
    pub fn decoy_record(&self) -> Result<String, PasswordError> {
        let params = self.config.params()?;

        let (_, salt_string) = fresh_salt(self.config.salt_len)?;

        // Any fixed key works: matching it would need a preimage of Argon2.
        let output = Output::new(&vec![0u8; self.config.output_len]).map_err(hashing_failure)?;
        encode_record(&params, &salt_string, output)
    }

    /// Verify a password against a stored hash.
    ///
    /// The comparison of derived keys is constant time.
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `HashingFailure` - Record is not a well-formed argon2id PHC string, or
    ///   its parameters cannot be run on this host
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::HashingFailure(format!("Invalid password hash: {}", e))
        })?;

        if parsed_hash.algorithm != ARGON2ID_IDENT {
            return Err(PasswordError::HashingFailure(format!(
                "Unsupported password hash algorithm: {}",
                parsed_hash.algorithm
            )));
        }

        let version = parsed_hash
            .version
            .map(Version::try_from)
            .transpose()
            .map_err(hashing_failure)?
            .unwrap_or(Version::V0x13);
        let params = Params::try_from(&parsed_hash).map_err(hashing_failure)?;

        let expected = parsed_hash
            .hash
            .ok_or_else(|| PasswordError::HashingFailure("Password hash has no key".to_string()))?;
        let salt = parsed_hash
            .salt
            .ok_or_else(|| PasswordError::HashingFailure("Password hash has no salt".to_string()))?;

        let mut salt_buf = [0u8; MAX_SALT_LEN];
        let salt = salt.decode_b64(&mut salt_buf).map_err(hashing_failure)?;

        let actual = derive(version, &params, password, salt)?;
        Ok(actual == expected)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Run Argon2id into a working set reserved with `try_reserve_exact`.
fn derive(
    version: Version,
    params: &Params,
    password: &str,
    salt: &[u8],
) -> Result<Output, PasswordError> {
    let block_count = params.block_count();

    let mut blocks: Vec<Block> = Vec::new();
    blocks.try_reserve_exact(block_count).map_err(|e| {
        PasswordError::HashingFailure(format!(
            "Cannot allocate Argon2 working memory ({} KiB): {}",
            params.m_cost(),
            e
        ))
    })?;
    blocks.resize(block_count, Block::default());

    let mut output = vec![0u8; params.output_len().unwrap_or(Params::DEFAULT_OUTPUT_LEN)];
    Argon2::new(Algorithm::Argon2id, version, params.clone())
        .hash_password_into_with_memory(password.as_bytes(), salt, &mut output, &mut blocks)
        .map_err(hashing_failure)?;

    Output::new(&output).map_err(hashing_failure)
}

fn fresh_salt(len: usize) -> Result<(Vec<u8>, SaltString), PasswordError> {
    let mut salt = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| PasswordError::HashingFailure(format!("Entropy source failed: {}", e)))?;

    let salt_string = SaltString::encode_b64(&salt)
        .map_err(|e| PasswordError::HashingFailure(format!("Invalid salt: {}", e)))?;

    Ok((salt, salt_string))
}

fn encode_record(
    params: &Params,
    salt: &SaltString,
    output: Output,
) -> Result<String, PasswordError> {
    let record = PasswordHash {
        algorithm: ARGON2ID_IDENT,
        version: Some(Version::V0x13.into()),
        params: ParamsString::try_from(params).map_err(hashing_failure)?,
        salt: Some(salt.as_salt()),
        hash: Some(output),
    };

    Ok(record.to_string())
}

fn hashing_failure(error: impl std::fmt::Display) -> PasswordError {
    PasswordError::HashingFailure(error.to_string())
}
