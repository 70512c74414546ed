// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::error::Error;

use super::cell::{Core, Status};
use super::{Future, Promise, Thenable};

/// What a Future is resolved with
///
/// Only `Value` settles the Future on the spot. The other two make it follow
/// the outcome of another deferred value.
pub enum Resolution<T, E> {
    Value(T),
    Future(Future<T, E>),
    Thenable(Box<dyn Thenable<T, E>>),
}

impl<T, E> Resolution<T, E> {
    /// Wrap a foreign thenable
    pub fn thenable<N>(thenable: N) -> Resolution<T, E>
        where N: Thenable<T, E> + 'static
    {
        Resolution::Thenable(Box::new(thenable))
    }
}

impl<T, E> From<Future<T, E>> for Resolution<T, E> {
    fn from(future: Future<T, E>) -> Resolution<T, E> {
        Resolution::Future(future)
    }
}

/// Conversion of handler and executor results into a `Resolution`
///
/// `Err` stands for a thrown error and rejects right away, without any
/// unwrapping.
pub trait IntoResolution {
    type Value;
    type Reason;

    fn into_resolution(self) -> Result<Resolution<Self::Value, Self::Reason>, Self::Reason>;
}

impl<T, E> IntoResolution for Result<T, E> {
    type Value = T;
    type Reason = E;

    #[inline]
    fn into_resolution(self) -> Result<Resolution<T, E>, E> {
        self.map(Resolution::Value)
    }
}

impl<T, E> IntoResolution for Resolution<T, E> {
    type Value = T;
    type Reason = E;

    #[inline]
    fn into_resolution(self) -> Result<Resolution<T, E>, E> {
        Ok(self)
    }
}

impl<T, E> IntoResolution for Future<T, E> {
    type Value = T;
    type Reason = E;

    #[inline]
    fn into_resolution(self) -> Result<Resolution<T, E>, E> {
        Ok(Resolution::Future(self))
    }
}

/// Run `f`, turning a panic into an `Error::Panicked` rejection
pub(crate) fn guarded<R, E, F>(f: F) -> Result<R, E>
    where F: FnOnce() -> Result<R, E>,
          E: From<Error>
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let err = Error::from_panic(payload);
            warn!("{}", err);
            Err(E::from(err))
        }
    }
}

impl<T, E> Core<T, E>
    where T: Clone + 'static,
          E: Clone + From<Error> + 'static
{
    /// Fulfill with `resolution`, following it first if it is deferred itself
    pub fn resolve(self: &Rc<Self>, resolution: Resolution<T, E>) {
        if self.status() != Status::Pending {
            debug!("{}: ignoring resolution, already settled", self);
            return;
        }

        match resolution {
            Resolution::Value(value) => self.settle(Ok(value)),
            Resolution::Future(ref future) if Rc::ptr_eq(future.core(), self) => {
                debug!("{}: resolved with itself", self);
                self.settle(Err(E::from(Error::ChainingCycle)));
            }
            Resolution::Future(future) => self.follow(Box::new(future)),
            Resolution::Thenable(thenable) => self.follow(thenable),
        }
    }

    /// Resolve or reject according to the outcome of a handler
    pub fn complete(self: &Rc<Self>, outcome: Result<Resolution<T, E>, E>) {
        match outcome {
            Ok(resolution) => self.resolve(resolution),
            Err(reason) => self.settle(Err(reason)),
        }
    }

    fn follow(self: &Rc<Self>, thenable: Box<dyn Thenable<T, E>>) {
        trace!("{}: following a thenable", self);

        let core = self.clone();
        self.scheduler().schedule(Box::new(move || {
            let promise = Promise::delegate(core.clone());
            let done = promise.done_flag();

            let registered = guarded(|| {
                thenable.register(promise);
                Ok(())
            });

            if let Err(reason) = registered {
                // A thenable that settled its promise before failing keeps that outcome
                if !done.replace(true) {
                    core.settle(Err(reason));
                }
            }
        }));
    }
}
