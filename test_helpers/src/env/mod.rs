//! RAII helpers for mutating environment variables in tests.
//!
//! The process environment is global state, so every mutation goes through a
//! re-entrant mutex and returns a guard that restores the previous value on
//! drop (removing the variable if it was previously absent). Guards for the
//! same key stack and restore in LIFO order.
//!
//! Tests that need several variables pinned for their whole duration should
//! use [`EnvScope`], which holds the lock until the scope is dropped.
//!
//! # Examples
//!
//! ```
//! use strata_config_test_helpers::env;
//!
//! let _guard = env::set_var("STRATA_TEST_KEY", "value");
//! assert_eq!(std::env::var("STRATA_TEST_KEY").as_deref(), Ok("value"));
//! ```

use std::env;
use std::ffi::{OsStr, OsString};
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Guard restoring an environment variable to its prior state on drop.
#[must_use = "dropping the guard restores the prior value"]
#[derive(Debug)]
pub struct EnvVarGuard {
    key: String,
    previous: Option<OsString>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _lock = ENV_MUTEX.lock();
        match self.previous.take() {
            // SAFETY: the global mutex is held for the duration of the write.
            Some(value) => unsafe { env::set_var(&self.key, value) },
            // SAFETY: as above.
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}

fn mutate(key: impl Into<String>, apply: impl FnOnce(&str)) -> EnvVarGuard {
    let key = key.into();
    let _lock = ENV_MUTEX.lock();
    let previous = env::var_os(&key);
    apply(&key);
    EnvVarGuard { key, previous }
}

/// Set `key` to `value`, returning a guard that restores the prior state.
pub fn set_var(key: impl Into<String>, value: impl AsRef<OsStr>) -> EnvVarGuard {
    // SAFETY: `mutate` holds the global mutex while the write happens.
    mutate(key, |k| unsafe { env::set_var(k, value.as_ref()) })
}

/// Remove `key`, returning a guard that restores the prior state.
pub fn remove_var(key: impl Into<String>) -> EnvVarGuard {
    // SAFETY: `mutate` holds the global mutex while the write happens.
    mutate(key, |k| unsafe { env::remove_var(k) })
}

/// Handle for performing several mutations while the lock is held.
#[must_use = "dropping the lock releases environment access"]
pub struct EnvLock {
    _guard: ReentrantMutexGuard<'static, ()>,
}

impl EnvLock {
    /// Set a variable while the lock is held.
    pub fn set_var(&self, key: impl Into<String>, value: impl AsRef<OsStr>) -> EnvVarGuard {
        set_var(key, value)
    }

    /// Remove a variable while the lock is held.
    pub fn remove_var(&self, key: impl Into<String>) -> EnvVarGuard {
        remove_var(key)
    }
}

/// Acquire the environment lock for the lifetime of the returned handle.
pub fn lock() -> EnvLock {
    EnvLock {
        _guard: ENV_MUTEX.lock(),
    }
}

/// Scope that pins a set of variables and holds the lock until dropped.
///
/// Guards are restored before the lock is released, so concurrent tests can
/// never observe a half-restored environment.
///
/// # Examples
///
/// ```
/// use strata_config_test_helpers::env;
///
/// let _scope = env::EnvScope::new_with(|lock| {
///     vec![lock.remove_var("FOO"), lock.set_var("BAR", "1")]
/// });
/// ```
#[must_use = "dropping the scope releases the lock and restores the variables"]
pub struct EnvScope {
    _lock: EnvLock,
    guards: Vec<EnvVarGuard>,
}

impl EnvScope {
    /// Build a scope from guards created by `builder` while the lock is held.
    pub fn new_with(builder: impl FnOnce(&EnvLock) -> Vec<EnvVarGuard>) -> Self {
        let lock = self::lock();
        let guards = builder(&lock);
        Self {
            _lock: lock,
            guards,
        }
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        // Restore while the lock is still held.
        let guards = std::mem::take(&mut self.guards);
        drop(guards);
    }
}
