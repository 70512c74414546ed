// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::Error;
use crate::options::Options;
use crate::scheduler::Schedule;

use super::cell::Core;
use super::resolve::IntoResolution;
use super::Future;

/// Combine `items` into one Future of their values, in input order.
///
/// The first item to be rejected rejects the result; the others keep running
/// and their outcomes are dropped.
pub fn join<T, E, I>(opts: Options, scheduler: Rc<dyn Schedule>, items: I) -> Future<Vec<T>, E>
    where I: IntoIterator,
          I::Item: IntoResolution<Value = T, Reason = E>,
          T: Clone + 'static,
          E: Clone + From<Error> + 'static
{
    let items: Vec<I::Item> = items.into_iter().collect();
    let aggregate = Core::new(opts.clone(), scheduler.clone());

    if items.is_empty() {
        aggregate.settle(Ok(Vec::new()));
        return Future::with_core(aggregate);
    }

    let total = items.len();
    let results = Rc::new(RefCell::new((0..total).map(|_| None).collect::<Vec<Option<T>>>()));
    let remaining = Rc::new(Cell::new(total));

    trace!("{}: waiting for {} items", aggregate, total);

    for (index, item) in items.into_iter().enumerate() {
        let item = Future::resolve_in(opts.derive(), scheduler.clone(), item);

        let results = results.clone();
        let remaining = remaining.clone();
        let aggregate = aggregate.clone();

        item.core().subscribe(Box::new(move |result| {
            match result {
                Ok(value) => {
                    results.borrow_mut()[index] = Some(value);
                    remaining.set(remaining.get() - 1);

                    if remaining.get() == 0 {
                        let values = results.borrow_mut().drain(..).flatten().collect();
                        aggregate.settle(Ok(values));
                    }
                }
                Err(reason) => {
                    trace!("{}: item {} rejected", aggregate, index);
                    aggregate.settle(Err(reason));
                }
            }
        }));
    }

    Future::with_core(aggregate)
}
