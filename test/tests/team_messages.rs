/// Tests for team-wide message routing and ticks
use troupe_controller::Controller;
use troupe_shared::{DispatchPolicy, MemberScope, Message, MessagePool};
use troupe_team::Member;
use troupe_test::{
    assert_events, assert_untouched, bundle, Bundle, Event, RecordingFactory, TeamFixture, ALL_STATES,
    CONSUME, EAT, MOVE, SLEEP,
};

#[test]
fn broadcast_without_handler_visits_every_member() {
    let fixture = TeamFixture::new();
    fixture.populate();

    let message = Message::new(5, Some(bundle(&[("text", "trigger the team message")])));
    let handled = fixture
        .registry
        .dispatch_message(&fixture.team, message, DispatchPolicy::Broadcast, MemberScope::FORMAL);

    assert!(!handled);
    assert_events!(fixture.journal, "c1", [MOVE => Event::Message(5)]);
    assert_events!(fixture.journal, "c2", [EAT => Event::Message(5)]);
    assert_events!(fixture.journal, "c3", [EAT => Event::Message(5), SLEEP => Event::Message(5)]);
    assert!(fixture.journal.entries().iter().all(|entry| entry.from_team));
}

#[test]
fn broadcast_reports_any_handler() {
    let fixture = TeamFixture::new();
    fixture.populate();
    fixture.c3.add_state(CONSUME, None);

    let handled = fixture.registry.dispatch_message(
        &fixture.team,
        Message::new(5, None),
        DispatchPolicy::Broadcast,
        MemberScope::FORMAL,
    );

    assert!(handled);
}

#[test]
fn consume_stops_at_the_handling_member() {
    let fixture = TeamFixture::new();
    fixture.populate();
    fixture.c3.add_state(CONSUME, None);

    // An outer member after the handler must never be reached
    let c4: Controller<Bundle> = Controller::new(RecordingFactory::new("c4", &fixture.journal));
    c4.add_state(MOVE, None);
    assert!(fixture
        .registry
        .add_outer_member(&fixture.team, Member::base(&c4, ALL_STATES)));
    fixture.journal.clear();

    let handled = fixture.registry.dispatch_message(
        &fixture.team,
        Message::new(5, None),
        DispatchPolicy::Consume,
        MemberScope::ALL,
    );

    assert!(handled);
    assert_events!(fixture.journal, "c1", [MOVE => Event::Message(5)]);
    assert_events!(fixture.journal, "c2", [EAT => Event::Message(5)]);
    assert_events!(fixture.journal, "c3", [
        EAT => Event::Message(5),
        SLEEP => Event::Message(5),
        CONSUME => Event::Message(5),
    ]);
    assert_untouched!(fixture.journal, "c4");
}

#[test]
fn scope_selects_member_lists() {
    let fixture = TeamFixture::new();
    fixture.populate();
    let c4: Controller<Bundle> = Controller::new(RecordingFactory::new("c4", &fixture.journal));
    c4.add_state(SLEEP, None);
    fixture
        .registry
        .add_outer_member(&fixture.team, Member::base(&c4, ALL_STATES));
    fixture.journal.clear();

    fixture.registry.dispatch_message(
        &fixture.team,
        Message::new(9, None),
        DispatchPolicy::Broadcast,
        MemberScope::OUTER,
    );

    assert_eq!(fixture.journal.team_receivers(), vec!["c4"]);
}

#[test]
fn message_is_recycled_once_per_outer_dispatch() {
    let fixture = TeamFixture::new();
    fixture.populate();
    let pool: MessagePool<Bundle> = MessagePool::new();

    fixture.registry.dispatch_message(
        &fixture.team,
        pool.obtain(5, None),
        DispatchPolicy::Broadcast,
        MemberScope::ALL,
    );
    assert_eq!(pool.recycled_count(), 1);

    fixture
        .registry
        .dispatch_message_all(pool.obtain(5, None), DispatchPolicy::Broadcast, MemberScope::ALL);
    assert_eq!(pool.recycled_count(), 2);
    assert_eq!(pool.obtained_count(), 2);
    assert_eq!(pool.pooled(), 1);
}

#[test]
fn message_to_a_missing_team_is_still_recycled() {
    let fixture = TeamFixture::new();
    let pool: MessagePool<Bundle> = MessagePool::new();
    assert!(fixture.registry.unregister_team(&fixture.team));

    let handled = fixture.registry.dispatch_message(
        &fixture.team,
        pool.obtain(5, None),
        DispatchPolicy::Consume,
        MemberScope::ALL,
    );

    assert!(!handled);
    assert_eq!(pool.recycled_count(), 1);
}

#[test]
fn consume_across_teams_stops_at_the_first_handling_team() {
    let fixture = TeamFixture::new();
    fixture.populate();
    fixture.c3.add_state(CONSUME, None);
    let c4: Controller<Bundle> = Controller::new(RecordingFactory::new("c4", &fixture.journal));
    c4.add_state(MOVE, None);
    fixture
        .registry
        .register_default_team(vec![Member::base(&c4, ALL_STATES)], Vec::new())
        .expect("team has formal members");
    fixture.journal.clear();

    let handled = fixture
        .registry
        .dispatch_message_all(Message::new(5, None), DispatchPolicy::Consume, MemberScope::ALL);

    assert!(handled);
    assert_untouched!(fixture.journal, "c4");

    fixture.journal.clear();
    fixture
        .registry
        .dispatch_message_all(Message::new(5, None), DispatchPolicy::Broadcast, MemberScope::ALL);
    assert_events!(fixture.journal, "c4", [MOVE => Event::Message(5)]);
}

#[test]
fn update_ticks_every_live_member() {
    let fixture = TeamFixture::new();
    fixture.populate();

    assert!(fixture
        .registry
        .update(&fixture.team, 125, &bundle(&[("text", "trigger the team update")])));

    assert_events!(fixture.journal, "c1", [MOVE => Event::Update(125)]);
    assert_events!(fixture.journal, "c2", [EAT => Event::Update(125)]);
    assert_events!(fixture.journal, "c3", [EAT => Event::Update(125), SLEEP => Event::Update(125)]);
}

#[test]
fn update_skips_dead_members() {
    let TeamFixture {
        registry,
        journal,
        c1,
        c2,
        c3,
        team,
    } = TeamFixture::new();
    c1.add_state(MOVE, None);
    c2.add_state(EAT, None);
    journal.clear();
    drop(c2);

    registry.update_all(16, &Bundle::new());

    assert_events!(journal, "c1", [MOVE => Event::Update(16)]);
    assert_untouched!(journal, "c3");
    assert_eq!(c3.state_flags(), 0);
    let team = registry.team(&team).expect("team is registered");
    assert_eq!(team.formal_members().len(), 2);
}

#[test]
fn update_on_missing_team_returns_false() {
    let fixture = TeamFixture::new();
    fixture.registry.unregister_team(&fixture.team);

    assert!(!fixture.registry.update(&fixture.team, 1, &Bundle::new()));
}
