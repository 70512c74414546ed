// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::mem;
use std::rc::Rc;

use crate::options::{Options, Subscription};
use crate::scheduler::Schedule;

/// Callback run once with the outcome of a Future
pub type Reaction<T, E> = Box<dyn FnOnce(Result<T, E>) + 'static>;

/// Diagnostic tag of a Future's state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pending,
    Fulfilled,
    Rejected,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tag = match *self {
            Status::Pending => "pending",
            Status::Fulfilled => "fulfilled",
            Status::Rejected => "rejected",
        };

        f.write_str(tag)
    }
}

enum State<T, E> {
    Pending,
    Fulfilled(T),
    Rejected(E),
}

impl<T, E> State<T, E> {
    #[inline]
    fn is_pending(&self) -> bool {
        match *self {
            State::Pending => true,
            _ => false,
        }
    }
}

// Reactions handed over by drops nested inside an outer `Reactions::drop`
thread_local!(static DEFERRED_DROPS: RefCell<Option<Vec<Box<dyn Any>>>> = RefCell::new(None));

/// Reactions waiting on a pending core, type erased
///
/// Every reaction owns the core of the Future derived from it, so a pending
/// chain is a chain of nested owners. Dropping it walks the chain in a loop
/// instead of recursing once per link.
struct Reactions {
    list: Vec<Box<dyn Any>>,
}

impl Reactions {
    fn new() -> Reactions {
        Reactions { list: Vec::new() }
    }

    #[inline]
    fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    fn push<T, E>(&mut self, reaction: Reaction<T, E>)
        where T: 'static,
              E: 'static
    {
        self.list.push(Box::new(reaction));
    }

    fn take<T, E>(&mut self) -> Vec<Reaction<T, E>>
        where T: 'static,
              E: 'static
    {
        mem::replace(&mut self.list, Vec::new())
            .into_iter()
            .filter_map(|reaction| reaction.downcast::<Reaction<T, E>>().ok())
            .map(|reaction| *reaction)
            .collect()
    }
}

impl Drop for Reactions {
    fn drop(&mut self) {
        if self.list.is_empty() {
            return;
        }

        let list = mem::replace(&mut self.list, Vec::new());

        let outermost = DEFERRED_DROPS.try_with(|deferred| {
            let mut deferred = deferred.borrow_mut();
            match *deferred {
                Some(ref mut pending) => {
                    pending.extend(list);
                    None
                }
                None => {
                    *deferred = Some(Vec::new());
                    Some(list)
                }
            }
        });

        let mut batch = match outermost {
            Ok(Some(batch)) => batch,
            // Handed over to the outer drop
            Ok(None) => return,
            // Thread local storage is being torn down, drop in place
            Err(..) => return,
        };

        loop {
            drop(batch);

            batch = DEFERRED_DROPS.with(|deferred| {
                match *deferred.borrow_mut() {
                    Some(ref mut pending) => mem::replace(pending, Vec::new()),
                    None => Vec::new(),
                }
            });

            if batch.is_empty() {
                break;
            }
        }

        DEFERRED_DROPS.with(|deferred| *deferred.borrow_mut() = None);
    }
}

struct Slot<T, E> {
    state: State<T, E>,
    // Only ever non-empty while `state` is `Pending`
    reactions: Reactions,
}

/// The settlement cell shared by a Future, its Promises and the reactions
/// driving it.
pub struct Core<T, E> {
    slot: RefCell<Slot<T, E>>,
    // Set once a Promise settled this core or committed it to a thenable
    claimed: Rc<Cell<bool>>,
    opts: Options,
    scheduler: Rc<dyn Schedule>,
}

impl<T, E> Core<T, E>
    where T: Clone + 'static,
          E: Clone + 'static
{
    pub fn new(opts: Options, scheduler: Rc<dyn Schedule>) -> Rc<Core<T, E>> {
        Rc::new(Core {
            slot: RefCell::new(Slot {
                state: State::Pending,
                reactions: Reactions::new(),
            }),
            claimed: Rc::new(Cell::new(false)),
            opts: opts,
            scheduler: scheduler,
        })
    }

    #[inline]
    pub fn options(&self) -> &Options {
        &self.opts
    }

    #[inline]
    pub fn scheduler(&self) -> &Rc<dyn Schedule> {
        &self.scheduler
    }

    #[inline]
    pub fn claim_flag(&self) -> Rc<Cell<bool>> {
        self.claimed.clone()
    }

    pub fn status(&self) -> Status {
        match self.slot.borrow().state {
            State::Pending => Status::Pending,
            State::Fulfilled(..) => Status::Fulfilled,
            State::Rejected(..) => Status::Rejected,
        }
    }

    pub fn result(&self) -> Option<Result<T, E>> {
        match self.slot.borrow().state {
            State::Pending => None,
            State::Fulfilled(ref value) => Some(Ok(value.clone())),
            State::Rejected(ref reason) => Some(Err(reason.clone())),
        }
    }

    /// Number of reactions waiting for this core to settle
    #[cfg(test)]
    pub fn waiting(&self) -> usize {
        self.slot.borrow().reactions.len()
    }

    /// Move out of `Pending` for good and schedule every waiting reaction.
    ///
    /// Does nothing if the core has settled already.
    pub fn settle(&self, result: Result<T, E>) {
        let reactions = {
            let mut slot = self.slot.borrow_mut();

            if !slot.state.is_pending() {
                debug!("{}: ignoring settlement, already settled", self);
                return;
            }

            slot.state = match result {
                Ok(ref value) => State::Fulfilled(value.clone()),
                Err(ref reason) => State::Rejected(reason.clone()),
            };

            slot.reactions.take::<T, E>()
        };

        trace!("{}: settled, notifying {} reactions", self, reactions.len());

        for reaction in reactions {
            let result = result.clone();
            self.scheduler.schedule(Box::new(move || reaction(result)));
        }
    }

    /// Run `reaction` with the outcome of this core.
    ///
    /// A settled core schedules it right away, a pending one keeps it until
    /// `settle`.
    pub fn subscribe(&self, reaction: Reaction<T, E>) {
        let mut slot = self.slot.borrow_mut();

        let settled = match slot.state {
            State::Pending => None,
            State::Fulfilled(ref value) => Some(Ok(value.clone())),
            State::Rejected(ref reason) => Some(Err(reason.clone())),
        };

        if let Some(result) = settled {
            drop(slot);
            self.scheduler.schedule(Box::new(move || reaction(result)));
            return;
        }

        let mut replaced = None;
        if self.opts.subscription == Subscription::Single && !slot.reactions.is_empty() {
            warn!("{}: replacing the pending reaction of a single subscriber future", self);
            replaced = Some(mem::replace(&mut slot.reactions, Reactions::new()));
        }

        slot.reactions.push(reaction);
        trace!("{}: reaction registered, {} waiting", self, slot.reactions.len());

        // The replaced reaction may own a whole chain, drop it unborrowed
        drop(slot);
        drop(replaced);
    }
}

impl<T, E> fmt::Display for Core<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.opts.name {
            Some(ref name) => write!(f, "Future({})", name),
            None => write!(f, "Future({:p})", self),
        }
    }
}
