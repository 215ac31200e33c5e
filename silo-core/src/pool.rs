use crate::{AdapterError, Result};
use std::{
    cmp::min,
    sync::{Condvar, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

/// Creates backend sessions on behalf of a [`Pool`].
pub trait SessionFactory: Send + Sync {
    type Session: Send;
    /// Open a new session. Called with no pool lock held.
    fn create(&self) -> Result<Self::Session>;
}

/// Pool sizing and acquisition bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolOptions {
    /// Whether the pool may be shared across threads. Kept for configuration
    /// parity with classic client libraries; sessions handed out are always
    /// confined to one thread at a time regardless.
    pub threaded: bool,
    /// Sessions opened eagerly at construction.
    pub min: usize,
    /// Hard bound on the total session count.
    pub max: usize,
    /// Sessions opened at a time when the pool grows.
    pub increment: usize,
    /// How long `acquire` may block before failing with `PoolExhausted`.
    pub wait: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            threaded: true,
            min: 1,
            max: 10,
            increment: 1,
            wait: Duration::from_secs(30),
        }
    }
}

struct PoolState<S> {
    idle: Vec<S>,
    total: usize,
}

/// Bounded set of reusable backend sessions.
///
/// All shared state lives behind one pool-wide lock; waiting for capacity
/// goes through a single condition variable. Sessions are handed out by
/// value and come back through [`Pool::release`] (healthy) or
/// [`Pool::discard`] (known bad, e.g. after a protocol-level error).
pub struct Pool<F: SessionFactory> {
    factory: F,
    options: PoolOptions,
    state: Mutex<PoolState<F::Session>>,
    available: Condvar,
}

impl<F: SessionFactory> Pool<F> {
    pub fn new(factory: F, options: PoolOptions) -> Result<Self> {
        if options.max == 0 {
            return Err(AdapterError::configuration("pool max must be at least 1"));
        }
        if options.min > options.max {
            return Err(AdapterError::configuration(format!(
                "pool min ({}) exceeds max ({})",
                options.min, options.max
            )));
        }
        if options.increment == 0 {
            return Err(AdapterError::configuration(
                "pool increment must be at least 1",
            ));
        }
        let pool = Self {
            state: Mutex::new(PoolState {
                idle: Vec::with_capacity(options.max),
                total: 0,
            }),
            available: Condvar::new(),
            factory,
            options,
        };
        for _ in 0..pool.options.min {
            let session = pool.factory.create()?;
            let mut state = pool.lock();
            state.idle.push(session);
            state.total += 1;
        }
        Ok(pool)
    }

    pub fn options(&self) -> &PoolOptions {
        &self.options
    }

    /// Sessions currently idle in the pool.
    pub fn idle(&self) -> usize {
        self.lock().idle.len()
    }

    /// Sessions currently alive, leased or idle.
    pub fn total(&self) -> usize {
        self.lock().total
    }

    /// Lease a session, blocking up to the configured wait when the pool is
    /// at its maximum with none free.
    pub fn acquire(&self) -> Result<F::Session> {
        let deadline = Instant::now() + self.options.wait;
        let mut state = self.lock();
        loop {
            if let Some(session) = state.idle.pop() {
                return Ok(session);
            }
            if state.total < self.options.max {
                let count = min(self.options.increment, self.options.max - state.total);
                state.total += count;
                drop(state);
                return self.grow(count);
            }
            let timeout = deadline.saturating_duration_since(Instant::now());
            if timeout.is_zero() {
                return Err(AdapterError::PoolExhausted);
            }
            let (guard, wait) = self
                .available
                .wait_timeout(state, timeout)
                .unwrap_or_else(PoisonError::into_inner);
            state = guard;
            if wait.timed_out() && state.idle.is_empty() && state.total >= self.options.max {
                return Err(AdapterError::PoolExhausted);
            }
        }
    }

    /// Return a healthy session to the pool.
    pub fn release(&self, session: F::Session) {
        self.lock().idle.push(session);
        self.available.notify_one();
    }

    /// Drop a session known to be in a bad state instead of reusing it. The
    /// freed capacity becomes available to waiters.
    pub fn discard(&self, session: F::Session) {
        drop(session);
        self.lock().total -= 1;
        self.available.notify_one();
    }

    fn lock(&self) -> MutexGuard<'_, PoolState<F::Session>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open `count` reserved sessions, keeping one for the caller and parking
    /// the rest idle. Reservations that cannot be fulfilled are rolled back.
    fn grow(&self, count: usize) -> Result<F::Session> {
        let mut created = Vec::with_capacity(count);
        let mut failure = None;
        for _ in 0..count {
            match self.factory.create() {
                Ok(session) => created.push(session),
                Err(error) => {
                    failure = Some(error);
                    break;
                }
            }
        }
        let mut state = self.lock();
        state.total -= count - created.len();
        let session = created.pop();
        let notify = !created.is_empty() || session.is_none();
        state.idle.extend(created);
        drop(state);
        if notify {
            self.available.notify_all();
        }
        match session {
            Some(session) => Ok(session),
            None => {
                let error = failure.expect("growth without sessions implies a creation failure");
                log::error!("Could not open a new pooled session: {}", error);
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        thread,
    };

    struct Counting {
        opened: AtomicUsize,
        fail_after: usize,
    }

    impl Counting {
        fn new(fail_after: usize) -> Self {
            Self {
                opened: AtomicUsize::new(0),
                fail_after,
            }
        }
    }

    impl SessionFactory for Counting {
        type Session = usize;
        fn create(&self) -> Result<usize> {
            let n = self.opened.fetch_add(1, Ordering::SeqCst);
            if n >= self.fail_after {
                return Err(AdapterError::backend(12541, "no listener"));
            }
            Ok(n)
        }
    }

    fn options(min: usize, max: usize, wait_ms: u64) -> PoolOptions {
        PoolOptions {
            min,
            max,
            wait: Duration::from_millis(wait_ms),
            ..Default::default()
        }
    }

    #[test]
    fn prewarms_min_sessions() {
        let pool = Pool::new(Counting::new(usize::MAX), options(2, 4, 10)).unwrap();
        assert_eq!(pool.total(), 2);
        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn exhaustion_fails_instead_of_hanging() {
        let pool = Pool::new(Counting::new(usize::MAX), options(0, 2, 20)).unwrap();
        let a = pool.acquire().unwrap();
        let _b = pool.acquire().unwrap();
        assert!(matches!(pool.acquire(), Err(AdapterError::PoolExhausted)));
        pool.release(a);
        assert!(pool.acquire().is_ok());
    }

    #[test]
    fn discard_frees_capacity() {
        let pool = Pool::new(Counting::new(usize::MAX), options(0, 1, 20)).unwrap();
        let a = pool.acquire().unwrap();
        pool.discard(a);
        assert_eq!(pool.total(), 0);
        assert!(pool.acquire().is_ok());
        assert_eq!(pool.total(), 1);
    }

    #[test]
    fn waiting_acquire_sees_released_session() {
        let pool = Arc::new(Pool::new(Counting::new(usize::MAX), options(0, 1, 1_000)).unwrap());
        let held = pool.acquire().unwrap();
        let releaser = {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                pool.release(held);
            })
        };
        assert!(pool.acquire().is_ok());
        releaser.join().unwrap();
    }

    #[test]
    fn creation_failure_rolls_back_reservation() {
        let pool = Pool::new(Counting::new(1), options(0, 4, 10)).unwrap();
        assert!(pool.acquire().is_ok());
        assert!(matches!(
            pool.acquire(),
            Err(AdapterError::Backend { code: 12541, .. })
        ));
        assert_eq!(pool.total(), 1);
    }

    #[test]
    fn rejects_inconsistent_bounds() {
        assert!(Pool::new(Counting::new(usize::MAX), options(3, 2, 10)).is_err());
        assert!(
            Pool::new(
                Counting::new(usize::MAX),
                PoolOptions {
                    max: 0,
                    min: 0,
                    ..Default::default()
                }
            )
            .is_err()
        );
    }
}
