// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::error::Error;

use super::cell::Core;
use super::resolve::IntoResolution;

/// The settling half of a Future
///
/// A `Promise` is consumed by `resolve` or `reject`. An executor gets the
/// only external one; once it has been used, the Future ignores any further
/// attempt to settle it from outside, including an error returned by the
/// executor afterwards.
pub struct Promise<T, E = Error> {
    core: Rc<Core<T, E>>,
    done: Rc<Cell<bool>>,
}

impl<T, E> Promise<T, E>
    where T: Clone + 'static,
          E: Clone + From<Error> + 'static
{
    pub(crate) fn with_core(core: Rc<Core<T, E>>) -> Promise<T, E> {
        let done = core.claim_flag();
        Promise {
            core: core,
            done: done,
        }
    }

    /// A promise handed to a thenable the core is following
    pub(crate) fn delegate(core: Rc<Core<T, E>>) -> Promise<T, E> {
        Promise {
            core: core,
            done: Rc::new(Cell::new(false)),
        }
    }

    pub(crate) fn done_flag(&self) -> Rc<Cell<bool>> {
        self.done.clone()
    }

    /// Resolve the Future.
    ///
    /// `Ok(value)` fulfills it, `Err(reason)` rejects it, and a Future or a
    /// `Resolution::Thenable` makes it follow that value's outcome.
    pub fn resolve<R>(self, value: R)
        where R: IntoResolution<Value = T, Reason = E>
    {
        if self.done.replace(true) {
            debug!("{}: promise already used, resolution ignored", self.core);
            return;
        }

        self.core.complete(value.into_resolution());
    }

    /// Reject the Future with `reason`
    pub fn reject(self, reason: E) {
        if self.done.replace(true) {
            debug!("{}: promise already used, rejection ignored", self.core);
            return;
        }

        self.core.settle(Err(reason));
    }
}

impl<T, E> fmt::Debug for Promise<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Promise({})", self.core)
    }
}
