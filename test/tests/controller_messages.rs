/// Tests for message dispatch to a single controller's states
use troupe_controller::Controller;
use troupe_shared::{DispatchPolicy, Message, MessagePool};
use troupe_test::{assert_events, init_logger, Bundle, Event, Journal, RecordingFactory, EAT, MOVE, SLEEP};

fn controller(journal: &Journal, consumers: u32) -> Controller<Bundle> {
    init_logger();
    let c: Controller<Bundle> = Controller::new(RecordingFactory::new("c", journal).with_consumers(consumers));
    c.add_state(MOVE | EAT | SLEEP, None);
    journal.clear();
    c
}

#[test]
fn broadcast_visits_every_matching_state() {
    let journal = Journal::new();
    let c = controller(&journal, EAT);

    let handled = c.dispatch_message(u32::MAX, Message::new(7, None), DispatchPolicy::Broadcast);

    assert!(handled);
    assert_events!(journal, "c", [
        MOVE => Event::Message(7),
        EAT => Event::Message(7),
        SLEEP => Event::Message(7),
    ]);
}

#[test]
fn broadcast_without_handler_returns_false() {
    let journal = Journal::new();
    let c = controller(&journal, 0);

    assert!(!c.dispatch_message(u32::MAX, Message::new(7, None), DispatchPolicy::Broadcast));
    assert_eq!(journal.len(), 3);
}

#[test]
fn consume_stops_at_first_handler() {
    let journal = Journal::new();
    let c = controller(&journal, EAT);

    let handled = c.dispatch_message(u32::MAX, Message::new(7, None), DispatchPolicy::Consume);

    assert!(handled);
    assert_events!(journal, "c", [MOVE => Event::Message(7), EAT => Event::Message(7)]);
}

#[test]
fn mask_selects_receiving_states() {
    let journal = Journal::new();
    let c = controller(&journal, 0);

    c.dispatch_message(SLEEP, Message::new(1, None), DispatchPolicy::Broadcast);

    assert_events!(journal, "c", [SLEEP => Event::Message(1)]);
}

#[test]
fn direct_dispatch_is_not_from_team() {
    let journal = Journal::new();
    let c = controller(&journal, 0);

    c.dispatch_message(MOVE, Message::new(1, None), DispatchPolicy::Broadcast);

    assert!(journal.entries().iter().all(|entry| !entry.from_team));
}

#[test]
fn dispatch_recycles_pooled_message_once() {
    let journal = Journal::new();
    let c = controller(&journal, EAT);
    let pool: MessagePool<Bundle> = MessagePool::new();

    c.dispatch_message(u32::MAX, pool.obtain(3, None), DispatchPolicy::Consume);

    assert_eq!(pool.obtained_count(), 1);
    assert_eq!(pool.recycled_count(), 1);
    assert_eq!(pool.pooled(), 1);
}

#[test]
fn route_message_leaves_recycling_to_the_caller() {
    let journal = Journal::new();
    let c = controller(&journal, 0);
    let pool: MessagePool<Bundle> = MessagePool::new();
    let message = pool.obtain(3, None);

    c.route_message(MOVE, &message, DispatchPolicy::Broadcast);
    c.route_message(EAT, &message, DispatchPolicy::Broadcast);
    assert_eq!(pool.recycled_count(), 0);

    message.recycle();
    assert_eq!(pool.recycled_count(), 1);
    assert_eq!(journal.len(), 2);
}
