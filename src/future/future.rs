// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::rc::Rc;

use crate::error::Error;
use crate::options::Options;
use crate::scheduler::Schedule;
use crate::Builder;

use super::cell::{Core, Status};
use super::resolve::{guarded, IntoResolution, Resolution};
use super::{Promise, Thenable};

type Handler<I, U, E> = Box<dyn FnOnce(I) -> Result<Resolution<U, E>, E> + 'static>;

/// A value that will be fulfilled or rejected at some point
///
/// Cloning a `Future` clones the handle; all clones observe the same outcome.
pub struct Future<T, E = Error> {
    core: Rc<Core<T, E>>,
}

impl<T, E> Future<T, E>
    where T: Clone + 'static,
          E: Clone + From<Error> + 'static
{
    /// Create a Future settled by `executor`.
    ///
    /// The executor runs before `new` returns. An `Err` it returns, or a
    /// panic, rejects the Future unless the promise was used already.
    pub fn new<F>(executor: F) -> Future<T, E>
        where F: FnOnce(Promise<T, E>) -> Result<(), E>
    {
        Builder::new().build(executor)
    }

    /// Create a Future resolved with `value`, following it if it is deferred
    pub fn resolve<R>(value: R) -> Future<T, E>
        where R: IntoResolution<Value = T, Reason = E>
    {
        Builder::new().resolve(value)
    }

    /// Create a Future fulfilled with `value`
    pub fn resolved(value: T) -> Future<T, E> {
        Future::resolve(Ok(value))
    }

    /// Create a Future rejected with `reason`
    pub fn reject(reason: E) -> Future<T, E> {
        Builder::new().reject(reason)
    }

    pub(crate) fn with_core(core: Rc<Core<T, E>>) -> Future<T, E> {
        Future { core: core }
    }

    pub(crate) fn spawn<F>(opts: Options,
                           scheduler: Rc<dyn Schedule>,
                           executor: F)
                           -> Future<T, E>
        where F: FnOnce(Promise<T, E>) -> Result<(), E>
    {
        let core = Core::new(opts, scheduler);
        let claimed = core.claim_flag();
        let promise = Promise::with_core(core.clone());

        if let Err(reason) = guarded(move || executor(promise)) {
            if claimed.replace(true) {
                debug!("{}: executor failed after settling, error dropped", core);
            } else {
                core.settle(Err(reason));
            }
        }

        Future::with_core(core)
    }

    pub(crate) fn pending_in(opts: Options,
                             scheduler: Rc<dyn Schedule>)
                             -> (Promise<T, E>, Future<T, E>) {
        let core = Core::new(opts, scheduler);
        (Promise::with_core(core.clone()), Future::with_core(core))
    }

    pub(crate) fn resolve_in<R>(opts: Options,
                                scheduler: Rc<dyn Schedule>,
                                value: R)
                                -> Future<T, E>
        where R: IntoResolution<Value = T, Reason = E>
    {
        let core = Core::new(opts, scheduler);
        core.claim_flag().set(true);
        core.complete(value.into_resolution());
        Future::with_core(core)
    }

    #[inline]
    pub(crate) fn core(&self) -> &Rc<Core<T, E>> {
        &self.core
    }

    /// React to fulfillment; a rejection passes through unchanged.
    ///
    /// `on_fulfilled` returns `Ok(value)`, `Err(reason)` or another Future to
    /// follow.
    pub fn then<R, F>(&self, on_fulfilled: F) -> Future<R::Value, E>
        where F: FnOnce(T) -> R + 'static,
              R: IntoResolution<Reason = E>,
              R::Value: Clone + 'static
    {
        self.chain(Box::new(move |value| on_fulfilled(value).into_resolution()),
                   Box::new(|reason| Err(reason)))
    }

    /// React to both outcomes
    pub fn then_else<R, F, G>(&self, on_fulfilled: F, on_rejected: G) -> Future<R::Value, E>
        where F: FnOnce(T) -> R + 'static,
              G: FnOnce(E) -> R + 'static,
              R: IntoResolution<Reason = E>,
              R::Value: Clone + 'static
    {
        self.chain(Box::new(move |value| on_fulfilled(value).into_resolution()),
                   Box::new(move |reason| on_rejected(reason).into_resolution()))
    }

    /// A derived Future without handlers, mirroring this one
    pub fn forward(&self) -> Future<T, E> {
        self.chain(Box::new(|value| Ok(Resolution::Value(value))),
                   Box::new(|reason| Err(reason)))
    }

    /// React to rejection; a fulfilled value passes through unchanged.
    pub fn catch<R, G>(&self, on_rejected: G) -> Future<T, E>
        where G: FnOnce(E) -> R + 'static,
              R: IntoResolution<Value = T, Reason = E>
    {
        self.chain(Box::new(|value| Ok(Resolution::Value(value))),
                   Box::new(move |reason| on_rejected(reason).into_resolution()))
    }

    /// Run `on_finally` whatever the outcome, then mirror it.
    ///
    /// If `on_finally` fails, panics, or returns a Future that gets rejected,
    /// the derived Future is rejected with that reason instead.
    pub fn finally<R, F>(&self, on_finally: F) -> Future<T, E>
        where F: FnOnce() -> R + 'static,
              R: IntoResolution<Value = (), Reason = E>
    {
        let opts = self.core.options().derive();
        let scheduler = self.core.scheduler().clone();
        let derived = Core::new(opts.clone(), scheduler.clone());
        let target = derived.clone();

        self.core.subscribe(Box::new(move |result| {
            match guarded(move || on_finally().into_resolution()) {
                Err(reason) => target.settle(Err(reason)),
                Ok(Resolution::Value(())) => target.settle(result),
                Ok(resolution) => {
                    let gate = Core::<(), E>::new(opts, scheduler);
                    gate.resolve(resolution);
                    gate.subscribe(Box::new(move |gated| {
                        match gated {
                            Ok(()) => target.settle(result),
                            Err(reason) => target.settle(Err(reason)),
                        }
                    }));
                }
            }
        }));

        Future::with_core(derived)
    }

    fn chain<U>(&self,
                on_fulfilled: Handler<T, U, E>,
                on_rejected: Handler<E, U, E>)
                -> Future<U, E>
        where U: Clone + 'static
    {
        let derived = Core::new(self.core.options().derive(), self.core.scheduler().clone());
        let target = derived.clone();

        self.core.subscribe(Box::new(move |result| {
            let outcome = guarded(move || {
                match result {
                    Ok(value) => on_fulfilled(value),
                    Err(reason) => on_rejected(reason),
                }
            });

            target.complete(outcome);
        }));

        Future::with_core(derived)
    }

    /// Current state tag
    pub fn status(&self) -> Status {
        self.core.status()
    }

    /// A clone of the outcome, if settled
    pub fn peek(&self) -> Option<Result<T, E>> {
        self.core.result()
    }

    pub fn name(&self) -> Option<&str> {
        self.core.options().name.as_ref().map(|s| &s[..])
    }

    /// Synchronize the execution with the caller and retrieve the result.
    ///
    /// Runs queued tasks of this Future's scheduler until the Future settles.
    /// Returns `None` if the queue runs dry first.
    pub fn sync(&self) -> Option<Result<T, E>> {
        loop {
            if let Some(result) = self.core.result() {
                return Some(result);
            }

            if !self.core.scheduler().run_one() {
                return None;
            }
        }
    }

    /// Whether both handles refer to the same Future
    pub fn ptr_eq(&self, other: &Future<T, E>) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }
}

impl<T, E> Thenable<T, E> for Future<T, E>
    where T: Clone + 'static,
          E: Clone + From<Error> + 'static
{
    fn register(&self, promise: Promise<T, E>) {
        self.core.subscribe(Box::new(move |result| promise.resolve(result)));
    }
}

impl<T, E> Clone for Future<T, E> {
    fn clone(&self) -> Future<T, E> {
        Future { core: self.core.clone() }
    }
}

impl<T, E> fmt::Display for Future<T, E>
    where T: Clone + 'static,
          E: Clone + 'static
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.core.options().name {
            Some(ref name) => write!(f, "Future \"{}\" {{ <{}> }}", name, self.core.status()),
            None => write!(f, "Future {{ <{}> }}", self.core.status()),
        }
    }
}

impl<T, E> fmt::Debug for Future<T, E>
    where T: Clone + 'static,
          E: Clone + 'static
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Future")
            .field("name", &self.core.options().name)
            .field("status", &self.core.status())
            .finish()
    }
}
