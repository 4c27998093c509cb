//! Outbox transport
//!
//! Drops finished messages into a pickup directory (a mounted SFTP share or
//! a folder watched by a forwarding agent). Writes go to a `.part` file that
//! is renamed into place, so the pickup side never sees a half-written
//! message.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use codeco_domain::repository::{Delivery, MessageTransport};
use codeco_types::{Error, TransferError};

/// Bounded retry with exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_retries: u32,
    /// Wait before the second attempt; doubles after each failure
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, retry_delay_ms: u64) -> Self {
        Self {
            max_retries,
            retry_delay: Duration::from_millis(retry_delay_ms),
        }
    }

    /// Delay after failed attempt `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.retry_delay.saturating_mul(factor)
    }

    fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }
}

/// Directory-backed [`MessageTransport`]
#[derive(Debug, Clone)]
pub struct OutboxTransport {
    remote_dir: PathBuf,
    retry: RetryPolicy,
}

impl OutboxTransport {
    pub fn new(remote_dir: PathBuf, retry: RetryPolicy) -> Self {
        Self { remote_dir, retry }
    }

    pub fn remote_dir(&self) -> &Path {
        &self.remote_dir
    }

    fn write_once(&self, content: &str, file_name: &str) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.remote_dir)?;
        let target = self.remote_dir.join(file_name);
        let partial = self.remote_dir.join(format!(".{}.part", file_name));
        fs::write(&partial, content)?;
        fs::rename(&partial, &target)?;
        Ok(target)
    }
}

fn check_file_name(file_name: &str) -> Result<(), TransferError> {
    let plain = !file_name.trim().is_empty()
        && !file_name.contains(['/', '\\'])
        && file_name != "."
        && file_name != "..";
    if plain {
        Ok(())
    } else {
        Err(TransferError::InvalidTarget(file_name.to_string()))
    }
}

impl MessageTransport for OutboxTransport {
    fn deliver(&self, content: &str, file_name: &str) -> Result<Delivery, Error> {
        check_file_name(file_name)?;

        let attempts = self.retry.attempts();
        let mut last_error = String::new();
        for attempt in 1..=attempts {
            log::debug!(
                "Delivery attempt {}/{}: {} -> {}",
                attempt,
                attempts,
                file_name,
                self.remote_dir.display()
            );
            match self.write_once(content, file_name) {
                Ok(path) => {
                    log::info!("Delivered {} to {}", file_name, path.display());
                    return Ok(Delivery {
                        remote_path: path.display().to_string(),
                        attempts: attempt,
                    });
                }
                Err(e) => {
                    log::warn!("Delivery attempt {} for {} failed: {}", attempt, file_name, e);
                    last_error = e.to_string();
                    if attempt < attempts {
                        thread::sleep(self.retry.delay_after(attempt));
                    }
                }
            }
        }

        Err(TransferError::Exhausted {
            file_name: file_name.to_string(),
            attempts,
            last_error,
        }
        .into())
    }
}
