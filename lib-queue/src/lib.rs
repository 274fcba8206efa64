#![cfg_attr(not(test), no_std)]

use core::fmt;
use core::iter::Iterator;
use core::iter::ExactSizeIterator;

/// Fixed capacity FIFO ring that never allocates. Unlike a plain bounded queue a full ring makes
/// room for new items by dropping the oldest one, the freshest events are the ones worth keeping
/// for someone listening to live feedback.
/// 
pub struct Queue<T: Sized, const SIZE: usize> {
    pub(crate) data: [Option<T>; SIZE],
    
    /// Amount of items currently in the queue.
    pub(crate) size: usize,

    /// Index of the oldest item in the queue (i.e. the next item to be taken from the queue)
    pub(crate) bottom: usize,

    /// Total number of items evicted because the ring was full.
    pub(crate) dropped: usize,
}

impl<T: Sized, const SIZE: usize> Queue<T, SIZE> {
    const NONE_T: Option<T> = None;

    pub const fn new() -> Queue<T, SIZE> {
        Queue {
            data: [Self::NONE_T; SIZE],
            size: 0,
            bottom: 0,
            dropped: 0,
        }
    }

    /// Pushes an element to the top of the queue. When the queue is already full the oldest item
    /// is removed to make room and returned to the caller.
    /// 
    pub fn push(&mut self, item: T) -> Option<T> {
        if SIZE == 0 {
            self.dropped += 1;
            return Some(item);
        }

        let mut evicted = None;
        if self.size == SIZE {
            evicted = self.next();
            self.dropped += 1;
        }

        self.data[(self.bottom + self.size) % SIZE] = Some(item);
        self.size += 1;
        evicted
    }

    /// Peeks at the oldest item without removing it.
    /// 
    pub fn front(&self) -> Option<&T> {
        if self.size == 0 {
            return None;
        }
        self.data[self.bottom].as_ref()
    }

    /// Removes every item from the queue.
    /// 
    pub fn clear(&mut self) {
        while self.next().is_some() {}
        self.bottom = 0;
    }

    pub const fn capacity(&self) -> usize {
        SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn is_full(&self) -> bool {
        self.size == SIZE
    }

    /// How many items were lost to overflow since the queue was created.
    /// 
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl<T: Sized, const SIZE: usize> Default for Queue<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Sized + core::fmt::Debug, const SIZE: usize> fmt::Debug for Queue<T, SIZE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Queue [size: {}, dropped: {}]", self.size, self.dropped)
    }
}

impl<T: Sized, const SIZE: usize> Iterator for Queue<T, SIZE> {
    type Item = T;

    /// Removes the oldest element from the queue or returns None if the queue is empty.
    /// 
    fn next(&mut self) -> Option<T> {
        if self.size > 0 {
            let item = self.data[self.bottom].take();
            self.bottom = (self.bottom + 1) % SIZE;
            self.size -= 1; 
            return item;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.size, Some(self.size))
    }
}

impl<T: Sized, const SIZE: usize> ExactSizeIterator for Queue<T, SIZE> {
    fn len(&self) -> usize {
        self.size
    }
}
