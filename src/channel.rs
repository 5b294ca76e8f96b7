//! Bounded input event queue for `no_std` environments.
//!
//! Filled from the sample-tick interrupt and drained by the main loop.
//! Built on `critical-section` and `heapless::Deque`.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::input::InputEvent;

/// Capacity of the input queue
pub const INPUT_QUEUE_SIZE: usize = 4;

/// Error returned when the queue is full. Carries the rejected event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError<T>(pub T);

/// Fixed-size queue of input events.
///
/// Every access runs in a critical section, so the queue can be shared
/// between interrupt handlers and the main loop through a `static`.
pub struct InputQueue<const SIZE: usize = INPUT_QUEUE_SIZE> {
    inner: Mutex<RefCell<Deque<InputEvent, SIZE>>>,
}

impl<const SIZE: usize> InputQueue<SIZE> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Try to enqueue an event.
    ///
    /// Returns `Err(TrySendError(event))` if the queue is full.
    pub fn try_send(&self, event: InputEvent) -> Result<(), TrySendError<InputEvent>> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(event).map_err(TrySendError)
        })
    }

    /// Take the oldest event, if any
    pub fn try_receive(&self) -> Option<InputEvent> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }

    /// Whether no event is waiting
    pub fn is_empty(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().is_empty())
    }

    /// Iterate over queued events, removing them
    pub const fn drain(&self) -> Drain<'_, SIZE> {
        Drain { queue: self }
    }
}

impl<const SIZE: usize> Default for InputQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Draining iterator returned by [`InputQueue::drain`].
///
/// Events pushed by an interrupt while draining are yielded as well.
pub struct Drain<'a, const SIZE: usize> {
    queue: &'a InputQueue<SIZE>,
}

impl<const SIZE: usize> Iterator for Drain<'_, SIZE> {
    type Item = InputEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.try_receive()
    }
}
