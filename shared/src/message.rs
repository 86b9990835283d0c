use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use log::trace;

use crate::constants::DEFAULT_MAX_POOLED_MESSAGES;

/// Contains Config properties which will be used by a [`MessagePool`]
#[derive(Clone, Debug)]
pub struct MessagePoolConfig {
    /// Upper bound on the number of idle messages kept for reuse. Messages
    /// recycled past this bound are dropped.
    pub max_pooled: usize,
}

impl Default for MessagePoolConfig {
    fn default() -> Self {
        Self {
            max_pooled: DEFAULT_MAX_POOLED_MESSAGES,
        }
    }
}

// Message

/// A poolable payload routed to states: an integer `what` code plus an
/// optional parameter value.
///
/// Dispatch entry points take a `Message` by value and recycle it once the
/// outermost dispatch returns, so nothing can read it after it went back to
/// its pool.
pub struct Message<P> {
    what: i32,
    param: Option<P>,
    from_team: bool,
    pool: Weak<RefCell<PoolInner<P>>>,
}

impl<P> Message<P> {
    /// Creates a message that belongs to no pool. Recycling it just drops it.
    pub fn new(what: i32, param: Option<P>) -> Self {
        Self {
            what,
            param,
            from_team: false,
            pool: Weak::new(),
        }
    }

    pub fn what(&self) -> i32 {
        self.what
    }

    pub fn param(&self) -> Option<&P> {
        self.param.as_ref()
    }

    pub fn set_param(&mut self, param: Option<P>) {
        self.param = param;
    }

    pub fn take_param(&mut self) -> Option<P> {
        self.param.take()
    }

    /// Whether the message reached its receiver through a team rather than
    /// being dispatched directly on the controller
    pub fn is_from_team(&self) -> bool {
        self.from_team
    }

    pub fn mark_from_team(&mut self) {
        self.from_team = true;
    }

    pub fn is_pooled(&self) -> bool {
        self.pool.strong_count() > 0
    }

    /// Clears the message and hands it back to the pool it was obtained from
    pub fn recycle(mut self) {
        self.what = 0;
        self.param = None;
        self.from_team = false;

        if let Some(pool) = self.pool.upgrade() {
            pool.borrow_mut().release(self);
        }
    }
}

impl<P: fmt::Debug> fmt::Debug for Message<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("what", &self.what)
            .field("param", &self.param)
            .field("from_team", &self.from_team)
            .field("pooled", &self.is_pooled())
            .finish()
    }
}

// MessagePool

struct PoolInner<P> {
    idle: Vec<Message<P>>,
    config: MessagePoolConfig,
    obtained: u64,
    recycled: u64,
}

impl<P> PoolInner<P> {
    fn release(&mut self, message: Message<P>) {
        self.recycled += 1;
        if self.idle.len() < self.config.max_pooled {
            self.idle.push(message);
        } else {
            trace!(
                "Message pool holds {} idle messages, dropping recycled message",
                self.config.max_pooled
            );
        }
    }
}

/// Hands out reusable [`Message`]s. Cloning the pool yields another handle to
/// the same set of idle messages.
pub struct MessagePool<P> {
    inner: Rc<RefCell<PoolInner<P>>>,
}

impl<P> MessagePool<P> {
    pub fn new() -> Self {
        Self::with_config(MessagePoolConfig::default())
    }

    pub fn with_config(config: MessagePoolConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(PoolInner {
                idle: Vec::new(),
                config,
                obtained: 0,
                recycled: 0,
            })),
        }
    }

    /// Returns an idle message if one is available, otherwise allocates one
    pub fn obtain(&self, what: i32, param: Option<P>) -> Message<P> {
        let mut inner = self.inner.borrow_mut();
        inner.obtained += 1;

        let mut message = inner.idle.pop().unwrap_or_else(|| Message {
            what: 0,
            param: None,
            from_team: false,
            pool: Rc::downgrade(&self.inner),
        });
        message.what = what;
        message.param = param;
        message
    }

    /// Number of idle messages ready for reuse
    pub fn pooled(&self) -> usize {
        self.inner.borrow().idle.len()
    }

    pub fn obtained_count(&self) -> u64 {
        self.inner.borrow().obtained
    }

    pub fn recycled_count(&self) -> u64 {
        self.inner.borrow().recycled
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().idle.clear();
    }
}

impl<P> Clone for MessagePool<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P> Default for MessagePool<P> {
    fn default() -> Self {
        Self::new()
    }
}
