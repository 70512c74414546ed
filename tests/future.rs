extern crate coio_future;
extern crate env_logger;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use coio_future::{make, run, Builder, Error, Future, Options, Schedule, Scheduler, Status,
                  Subscription};

fn init() {
    let _ = env_logger::try_init();
}

#[test]
fn test_flattens_nested_futures() {
    init();

    let f: Future<i32> = Future::resolve(Future::resolve(Future::resolved(5)));
    assert_eq!(f.sync(), Some(Ok(5)));
}

#[test]
fn test_self_resolution_is_rejected() {
    init();

    let slot: Rc<RefCell<Option<Future<i32>>>> = Rc::new(RefCell::new(None));
    let me = slot.clone();

    let f: Future<i32> = Future::new(move |p| {
        Scheduler::current().schedule(Box::new(move || {
            if let Some(me) = me.borrow_mut().take() {
                p.resolve(me);
            }
        }));
        Ok(())
    });
    *slot.borrow_mut() = Some(f.clone());

    assert_eq!(f.sync(), Some(Err(Error::ChainingCycle)));
}

#[test]
fn test_self_resolution_through_make() {
    init();

    let (p, f) = make::<i32, Error>();
    p.resolve(f.clone());

    assert_eq!(f.status(), Status::Rejected);
    assert_eq!(f.peek(), Some(Err(Error::ChainingCycle)));
}

#[test]
fn test_pass_through_without_handlers() {
    init();

    let f: Future<i32> = Future::resolved(7);
    let d = f.forward().then(|v| Ok(v * 2));
    assert_eq!(d.sync(), Some(Ok(14)));

    let f: Future<i32> = Future::reject(Error::from("kept"));
    let d = f.then(|v| Ok(v * 2)).forward();
    assert_eq!(d.sync(), Some(Err(Error::from("kept"))));
}

#[test]
fn test_catch_intercepts() {
    init();

    let f: Future<String> = Future::reject(Error::from("e"));
    let d = f.catch(|r| Ok(format!("recovered:{}", r)));
    assert_eq!(d.sync(), Some(Ok("recovered:e".to_owned())));
}

#[test]
fn test_catch_skips_fulfilled() {
    init();

    let called = Rc::new(Cell::new(false));
    let flag = called.clone();

    let f: Future<i32> = Future::resolved(1);
    let d = f.catch(move |e| {
        flag.set(true);
        Err(e)
    });

    assert_eq!(d.sync(), Some(Ok(1)));
    assert!(!called.get());
}

#[test]
fn test_then_else_takes_the_matching_branch() {
    init();

    let f: Future<i32> = Future::reject(Error::from("bad"));
    let d = f.then_else(|v| Ok(v.to_string()), |e| Ok(format!("error: {}", e)));
    assert_eq!(d.sync(), Some(Ok("error: bad".to_owned())));

    let f: Future<i32> = Future::resolved(3);
    let d = f.then_else(|v| Ok(v.to_string()), |e| Ok(format!("error: {}", e)));
    assert_eq!(d.sync(), Some(Ok("3".to_owned())));
}

#[test]
fn test_handler_error_rejects_derived() {
    init();

    let f: Future<i32> = Future::resolved(1);
    let d = f.then(|_| -> Result<i32, Error> { Err(Error::from("thrown")) })
             .then(|v| Ok(v + 1));
    assert_eq!(d.sync(), Some(Err(Error::from("thrown"))));
}

#[test]
fn test_returned_future_is_followed() {
    init();

    let (p, inner) = make::<i32, Error>();
    let f: Future<i32> = Future::resolved(1);
    let d = f.then(move |_| inner);

    run();
    assert_eq!(d.status(), Status::Pending);

    p.resolve(Ok(42));
    assert_eq!(d.sync(), Some(Ok(42)));
}

#[test]
fn test_always_async() {
    init();

    let f: Future<i32> = Future::resolved(1);
    let ran = Rc::new(Cell::new(false));
    let flag = ran.clone();

    f.then(move |_| {
        flag.set(true);
        Ok(())
    });

    assert!(!ran.get());
    run();
    assert!(ran.get());
}

#[test]
fn test_settle_notifies_asynchronously() {
    init();

    let (p, f) = make::<i32, Error>();
    let ran = Rc::new(Cell::new(false));
    let flag = ran.clone();

    f.then(move |_| {
        flag.set(true);
        Ok(())
    });

    p.resolve(Ok(1));
    assert!(!ran.get());
    run();
    assert!(ran.get());
}

#[test]
fn test_multicast_by_default() {
    init();

    let (p, f) = make::<i32, Error>();
    let d1 = f.then(|v| Ok(v + 1));
    let d2 = f.then(|v| Ok(v + 2));

    p.resolve(Ok(1));
    run();
    assert_eq!(d1.peek(), Some(Ok(2)));
    assert_eq!(d2.peek(), Some(Ok(3)));
}

#[test]
fn test_single_subscriber_while_pending() {
    init();

    let (p, f) = Builder::new().single_subscriber().pending::<i32, Error>();
    let d1 = f.then(|v| Ok(v + 1));
    let d2 = f.then(|v| Ok(v + 2));

    p.resolve(Ok(1));
    run();
    assert_eq!(d1.status(), Status::Pending);
    assert_eq!(d2.peek(), Some(Ok(3)));

    // Once settled, every registration is served
    let d3 = f.then(|v| Ok(v + 3));
    let d4 = f.then(|v| Ok(v + 4));
    run();
    assert_eq!(d3.peek(), Some(Ok(4)));
    assert_eq!(d4.peek(), Some(Ok(5)));
}

#[test]
fn test_derived_futures_inherit_subscription() {
    init();

    let (p, f) = Builder::new().single_subscriber().pending::<i32, Error>();
    let d = f.forward();
    let lost = d.then(|v| Ok(v));
    let kept = d.then(|v| Ok(v * 100));

    p.resolve(Ok(1));
    run();
    assert_eq!(lost.status(), Status::Pending);
    assert_eq!(kept.peek(), Some(Ok(100)));
}

#[test]
fn test_finally_mirrors_outcome() {
    init();

    let calls = Rc::new(Cell::new(0));

    let counter = calls.clone();
    let f: Future<i32> = Future::resolved(5);
    let d = f.finally(move || {
        counter.set(counter.get() + 1);
        Ok(())
    });
    assert_eq!(d.sync(), Some(Ok(5)));

    let counter = calls.clone();
    let f: Future<i32> = Future::reject(Error::from("r"));
    let d = f.finally(move || {
        counter.set(counter.get() + 1);
        Ok(())
    });
    assert_eq!(d.sync(), Some(Err(Error::from("r"))));

    assert_eq!(calls.get(), 2);
}

#[test]
fn test_finally_error_overrides_outcome() {
    init();

    let f: Future<i32> = Future::resolved(5);
    let d = f.finally(|| Err(Error::from("cleanup failed")));
    assert_eq!(d.sync(), Some(Err(Error::from("cleanup failed"))));

    let f: Future<i32> = Future::resolved(5);
    let d = f.finally(|| -> Result<(), Error> { panic!("cleanup panicked") });
    assert_eq!(d.sync(), Some(Err(Error::Panicked("cleanup panicked".to_owned()))));
}

#[test]
fn test_finally_waits_for_returned_future() {
    init();

    let (p, cleanup) = make::<(), Error>();
    let f: Future<i32> = Future::resolved(5);
    let d = f.finally(move || cleanup);

    run();
    assert_eq!(d.status(), Status::Pending);

    p.resolve(Ok(()));
    assert_eq!(d.sync(), Some(Ok(5)));

    let f: Future<i32> = Future::resolved(5);
    let d = f.finally(|| Future::<(), Error>::reject(Error::from("async cleanup")));
    assert_eq!(d.sync(), Some(Err(Error::from("async cleanup"))));
}

#[test]
fn test_sync_on_stalled_future() {
    init();

    let (_p, f) = make::<i32, Error>();
    assert_eq!(f.sync(), None);
}

#[test]
fn test_display_tracks_state() {
    init();

    let (p, f) = Builder::new().name("load".to_owned()).pending::<i32, Error>();
    assert_eq!(f.to_string(), "Future \"load\" { <pending> }");

    p.reject(Error::from("nope"));
    assert_eq!(f.to_string(), "Future \"load\" { <rejected> }");
    assert_eq!(format!("{:?}", f),
               "Future { name: Some(\"load\"), status: Rejected }");
}

#[test]
fn test_drop_long_pending_chain() {
    init();

    let (p, root) = make::<u64, Error>();
    let mut f = root.clone();
    for _ in 0..200_000 {
        f = f.then(|v| Ok(v + 1));
    }

    drop(f);
    drop(p);
    drop(root);

    // Later chains still settle and drop normally
    let (p, root) = make::<u64, Error>();
    let d = root.then(|v| Ok(v + 1)).then(|v| Ok(v * 2));
    p.resolve(Ok(1));
    assert_eq!(d.sync(), Some(Ok(4)));
}

#[test]
fn test_ptr_eq() {
    init();

    let f: Future<i32> = Future::resolved(1);
    assert!(f.ptr_eq(&f.clone()));
    assert!(!f.ptr_eq(&f.forward()));
    assert!(!f.ptr_eq(&Future::resolve(f.clone())));
}

#[test]
fn test_builder_takes_options() {
    init();

    let mut opts = Options::new();
    opts.name("configured".to_owned()).subscription(Subscription::Single);

    let (p, f) = Builder::new().options(opts).pending::<i32, Error>();
    assert_eq!(f.name(), Some("configured"));

    let replaced = f.then(|v| Ok(v));
    let kept = f.then(|v| Ok(v + 1));
    p.resolve(Ok(1));
    run();

    assert_eq!(replaced.status(), Status::Pending);
    assert_eq!(kept.peek(), Some(Ok(2)));
}
