use crate::error::GridError;

/// Permit pool of one named semaphore, held by the partition that owns the name.
///
/// All operations are non-blocking; a blocking acquire is built by callers on
/// top of [`SemaphoreContainer::try_acquire`].
#[derive(Debug, Default)]
pub struct SemaphoreContainer {
    name: String,
    available: i32,
    initialized: bool,
}

impl SemaphoreContainer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            available: 0,
            initialized: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the initial permit count. Only the first call succeeds.
    pub fn init(&mut self, permits: i32) -> Result<bool, GridError> {
        check_non_negative(permits)?;
        if self.initialized {
            return Ok(false);
        }
        self.available = permits;
        self.initialized = true;
        Ok(true)
    }

    pub fn available(&self) -> i32 {
        self.available
    }

    pub fn try_acquire(&mut self, permits: i32) -> Result<bool, GridError> {
        check_non_negative(permits)?;
        if self.available < permits {
            return Ok(false);
        }
        self.available -= permits;
        Ok(true)
    }

    pub fn release(&mut self, permits: i32) -> Result<(), GridError> {
        check_non_negative(permits)?;
        self.available = self.available.saturating_add(permits);
        Ok(())
    }

    /// Takes every available permit and returns how many were taken.
    pub fn drain(&mut self) -> i32 {
        let drained = self.available.max(0);
        self.available -= drained;
        drained
    }

    /// Shrinks the pool. The count may go negative, as with
    /// `java.util.concurrent.Semaphore::reducePermits`.
    pub fn reduce(&mut self, permits: i32) -> Result<(), GridError> {
        check_non_negative(permits)?;
        self.available = self.available.saturating_sub(permits);
        Ok(())
    }

    pub fn increase(&mut self, permits: i32) -> Result<(), GridError> {
        check_non_negative(permits)?;
        self.available = self.available.saturating_add(permits);
        Ok(())
    }
}

fn check_non_negative(permits: i32) -> Result<(), GridError> {
    if permits < 0 {
        return Err(GridError::invalid_argument(
            "permits",
            format!("must not be negative, got {}", permits),
        ));
    }
    Ok(())
}
