// The MIT License (MIT)

// Copyright (c) 2015 Y. T. Chung <zonyitoo@gmail.com>

//  Permission is hereby granted, free of charge, to any person obtaining a
//  copy of this software and associated documentation files (the "Software"),
//  to deal in the Software without restriction, including without limitation
//  the rights to use, copy, modify, merge, publish, distribute, sublicense,
//  and/or sell copies of the Software, and to permit persons to whom the
//  Software is furnished to do so, subject to the following conditions:
//
//  The above copyright notice and this permission notice shall be included in
//  all copies or substantial portions of the Software.
//
//  THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS
//  OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
//  FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
//  AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
//  LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
//  FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
//  DEALINGS IN THE SOFTWARE.

//! Single threaded deferred values with thenable resolution
//!
//! ```
//! use coio_future::Future;
//!
//! let f: Future<i32> = Future::resolved(7);
//! let doubled = f.forward().then(|v| Ok(v * 2));
//!
//! assert_eq!(doubled.sync(), Some(Ok(14)));
//! ```

#[macro_use]
extern crate log;

use std::rc::Rc;

pub use crate::error::Error;
pub use crate::future::{make, Future, IntoResolution, Promise, Resolution, Status, Thenable};
pub use crate::options::{Options, Subscription};
pub use crate::scheduler::{Schedule, Scheduler, Task};

pub mod error;
pub mod future;
pub mod options;
pub mod scheduler;

/// Run every task queued on the current thread's scheduler
#[inline]
pub fn run() -> usize {
    Scheduler::current().run()
}

/// Combine `items` into one Future of their values, in input order
///
/// Items are plain `Result`s, Futures or `Resolution`s. The result is rejected
/// with the reason of the first item to be rejected.
pub fn all<I, R>(items: I) -> Future<Vec<R::Value>, R::Reason>
    where I: IntoIterator<Item = R>,
          R: IntoResolution,
          R::Value: Clone + 'static,
          R::Reason: Clone + From<Error> + 'static
{
    Builder::new().all(items)
}

/// Future configuration. Provides control over the options and the scheduler
/// of new Futures.
pub struct Builder {
    opts: Options,
    scheduler: Rc<dyn Schedule>,
}

impl Builder {
    /// Generates the base configuration, using the current thread's scheduler
    pub fn new() -> Builder {
        Builder {
            opts: Options::new(),
            scheduler: Rc::new(Scheduler::current()),
        }
    }

    /// Names the Future-to-be. The name shows up in `Display` and log output.
    #[inline]
    pub fn name(mut self, name: String) -> Builder {
        self.opts.name = Some(name);
        self
    }

    #[inline]
    pub fn subscription(mut self, subscription: Subscription) -> Builder {
        self.opts.subscription = subscription;
        self
    }

    /// Keep only the latest reaction registered while pending
    ///
    /// Anything registering on the Future, including `then`, `all` and
    /// Futures resolved with it, replaces the earlier registration. Passing
    /// the same pending Future to `all` twice therefore leaves the result
    /// pending forever.
    #[inline]
    pub fn single_subscriber(self) -> Builder {
        self.subscription(Subscription::Single)
    }

    #[inline]
    pub fn options(mut self, opts: Options) -> Builder {
        self.opts = opts;
        self
    }

    /// Run reactions on `scheduler` instead of the current thread's queue
    #[inline]
    pub fn scheduler<S>(mut self, scheduler: S) -> Builder
        where S: Schedule + 'static
    {
        self.scheduler = Rc::new(scheduler);
        self
    }

    /// Create a Future settled by `executor`
    pub fn build<T, E, F>(self, executor: F) -> Future<T, E>
        where T: Clone + 'static,
              E: Clone + From<Error> + 'static,
              F: FnOnce(Promise<T, E>) -> Result<(), E>
    {
        Future::spawn(self.opts, self.scheduler, executor)
    }

    /// Create a pending Future together with the `Promise` settling it
    pub fn pending<T, E>(self) -> (Promise<T, E>, Future<T, E>)
        where T: Clone + 'static,
              E: Clone + From<Error> + 'static
    {
        Future::pending_in(self.opts, self.scheduler)
    }

    /// Create a Future resolved with `value`
    pub fn resolve<R>(self, value: R) -> Future<R::Value, R::Reason>
        where R: IntoResolution,
              R::Value: Clone + 'static,
              R::Reason: Clone + From<Error> + 'static
    {
        Future::resolve_in(self.opts, self.scheduler, value)
    }

    /// Create a Future rejected with `reason`
    pub fn reject<T, E>(self, reason: E) -> Future<T, E>
        where T: Clone + 'static,
              E: Clone + From<Error> + 'static
    {
        Future::resolve_in(self.opts, self.scheduler, Err(reason))
    }

    /// See `all`
    pub fn all<I, R>(self, items: I) -> Future<Vec<R::Value>, R::Reason>
        where I: IntoIterator<Item = R>,
              R: IntoResolution,
              R::Value: Clone + 'static,
              R::Reason: Clone + From<Error> + 'static
    {
        future::join(self.opts, self.scheduler, items)
    }
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}
