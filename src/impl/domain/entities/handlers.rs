use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use chrono::{Local, NaiveDate};

use super::tenant::TenantId;

/// Source of "today" as a local calendar date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Source of fresh tenant ids.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> TenantId;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> TenantId {
        TenantId(uuid::Uuid::new_v4().simple().to_string())
    }
}

/// Yields "{prefix}1", "{prefix}2", ...
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> TenantId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        TenantId(format!("{}{}", self.prefix, n))
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

impl<T: IdGenerator + ?Sized> IdGenerator for Arc<T> {
    fn next_id(&self) -> TenantId {
        (**self).next_id()
    }
}
