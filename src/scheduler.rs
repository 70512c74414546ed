// The MIT License (MIT)

// Copyright (c) 2015 Rustcc Developers

// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:

// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! FIFO scheduler every reaction runs through

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// A unit of deferred work
pub type Task = Box<dyn FnOnce() + 'static>;

/// Deferred execution facility used by Futures
///
/// Implementations must never run `task` inside `schedule` itself, and must
/// run tasks in the order they were scheduled.
pub trait Schedule {
    /// Queue `task` to run after the current call stack unwinds
    fn schedule(&self, task: Task);

    /// Run the oldest queued task, if any.
    ///
    /// Returns `false` when nothing was run. Schedulers driven by something
    /// else (a timer, another event loop) may always return `false`.
    fn run_one(&self) -> bool;
}

thread_local!(static CURRENT: Scheduler = Scheduler::new());

/// Single threaded FIFO task queue
#[derive(Clone, Default)]
pub struct Scheduler {
    queue: Rc<RefCell<VecDeque<Task>>>,
}

impl Scheduler {
    /// Create an empty scheduler
    pub fn new() -> Scheduler {
        Scheduler {
            queue: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// Get the scheduler of the current thread
    pub fn current() -> Scheduler {
        CURRENT.with(|s| s.clone())
    }

    /// Number of queued tasks
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Run tasks until the queue is empty, including the ones queued while
    /// running. Returns the number of tasks run.
    pub fn run(&self) -> usize {
        let mut count = 0;
        while self.run_one() {
            count += 1;
        }

        trace!("Scheduler drained after {} tasks", count);
        count
    }
}

impl Schedule for Scheduler {
    fn schedule(&self, task: Task) {
        self.queue.borrow_mut().push_back(task);
    }

    fn run_one(&self) -> bool {
        // The borrow must end before the task runs, it may schedule more.
        let task = self.queue.borrow_mut().pop_front();

        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Scheduler").field("queued", &self.len()).finish()
    }
}
