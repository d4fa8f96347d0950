//! Centralized constants for key generation and the properties file.

/// Default length of a generated API key.
pub const DEFAULT_KEY_LENGTH: usize = 32;

/// Property holding the comma-separated list of accepted API keys.
pub const DEFAULT_PROPERTY_KEY: &str = "api.security.keys";

/// Fallback location of the backend's properties file, relative to the working directory.
pub const DEFAULT_PROPERTIES_PATH: &str =
    "../Java/backend-api/src/main/resources/application.properties";

/// Location of the properties file below a Maven project root.
pub const PROJECT_PROPERTIES_SUFFIX: &str = "src/main/resources/application.properties";

/// Symbols a key is drawn from, indexed by `byte % 62`.
pub const ALPHABET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Largest byte value (exclusive) accepted by unbiased sampling: 4 * 62.
pub const REJECTION_LIMIT: u8 = 248;

/// Separator between keys in the property value.
pub const KEY_SEPARATOR: char = ',';

/// Prefix of lock files in the system temp directory.
pub const LOCK_PREFIX: &str = "apikey-gen-";

/// Extension of lock files.
pub const LOCK_SUFFIX: &str = ".lock";

/// Hex digits of the target path's SHA-256 used in the lock file name.
pub const LOCK_HASH_LEN: usize = 16;

/// Number of leading characters shown when a key is masked.
pub const MASK_VISIBLE_CHARS: usize = 4;

/// Environment variable overriding the properties file path.
pub const ENV_PROPERTIES: &str = "APIKEY_GEN_PROPERTIES";

/// Environment variable naming the configuration file.
pub const ENV_CONFIG: &str = "APIKEY_GEN_CONFIG";

/// Configuration file looked up in the working directory when none is named.
pub const DEFAULT_CONFIG_FILE: &str = "apikey-gen.toml";
