/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize` and call `Config::from_env()` at startup.
/// A `.env` file in the working directory is read first when present; variables already
/// set in the process environment win.
///
/// # Panics
///
/// Panics if any required env var is missing or cannot be deserialized.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Self {
        if let Some(e) = dotenv_failure(dotenvy::dotenv()) {
            tracing::warn!(error = %e, ".env file could not be loaded");
        }
        envy::from_env().expect("failed to load config from environment")
    }
}

/// A missing `.env` file is normal; any other load error is returned.
fn dotenv_failure<T>(result: dotenvy::Result<T>) -> Option<dotenvy::Error> {
    match result {
        Ok(_) => None,
        Err(e) if e.not_found() => None,
        Err(e) => Some(e),
    }
}
