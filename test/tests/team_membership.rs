/// Tests for members and member edits through the registry
use troupe_controller::Controller;
use troupe_shared::{CooperateMethod, CooperateMethodError, FlagError, MemberScope};
use troupe_team::{Member, Team, TeamError, TeamRegistry};
use troupe_test::{init_logger, Bundle, Journal, RecordingFactory, ALL_STATES, EAT, MOVE, SLEEP};

fn controller(journal: &Journal, owner: &'static str) -> Controller<Bundle> {
    init_logger();
    Controller::new(RecordingFactory::new(owner, journal))
}

#[test]
fn member_requires_positive_states() {
    let journal = Journal::new();
    let c = controller(&journal, "c");

    assert_eq!(
        Member::try_new(&c, 0, CooperateMethod::Base).err(),
        Some(TeamError::InvalidFlags(FlagError::ZeroFlags { flags: 0 }))
    );
}

#[test]
#[should_panic(expected = "Cannot create team member")]
fn member_new_panics_on_zero_states() {
    let journal = Journal::new();
    let c = controller(&journal, "c");
    Member::base(&c, 0);
}

#[test]
fn member_from_raw_validates_the_method_code() {
    let journal = Journal::new();
    let c = controller(&journal, "c");

    assert_eq!(
        Member::from_raw(&c, MOVE, 2).err(),
        Some(TeamError::InvalidCooperateMethod(CooperateMethodError::UnknownMethod { value: 2 }))
    );
    let member = Member::from_raw(&c, MOVE, 3).expect("3 is the all method");
    assert_eq!(member.cooperate_method(), CooperateMethod::All);
}

#[test]
fn members_are_equal_only_while_alive() {
    let journal = Journal::new();
    let c = controller(&journal, "c");
    let other = controller(&journal, "other");

    let member = Member::base(&c, MOVE | EAT);
    assert_eq!(member, Member::base(&c, MOVE | EAT));
    assert_ne!(member, Member::base(&c, MOVE));
    assert_ne!(member, Member::new(&c, MOVE | EAT, CooperateMethod::All));
    assert_ne!(member, Member::base(&other, MOVE | EAT));

    let copy = member.clone();
    drop(c);
    assert!(!member.is_alive());
    assert!(member.controller().is_none());
    assert_ne!(member, copy);
}

#[test]
fn member_debug_shows_liveness() {
    let journal = Journal::new();
    let c = controller(&journal, "c");
    let member = Member::base(&c, EAT);
    assert!(format!("{:?}", member).contains("states: 0x2"));

    drop(c);
    assert!(format!("{:?}", member).contains("<dead>"));
}

#[test]
fn team_requires_formal_members() {
    let journal = Journal::new();
    let c = controller(&journal, "c");
    let registry: TeamRegistry<Bundle> = TeamRegistry::new();

    assert_eq!(
        Team::with_default_callback(Vec::new(), vec![Member::base(&c, MOVE)]).err(),
        Some(TeamError::EmptyFormalMembers)
    );
    assert_eq!(
        registry.register_default_team(Vec::new(), Vec::new()),
        Err(TeamError::EmptyFormalMembers)
    );
    assert_eq!(registry.team_count(), 0);
}

#[test]
fn adding_member_states_reports_only_fresh_states() {
    let journal = Journal::new();
    let c1 = controller(&journal, "c1");
    let c2 = controller(&journal, "c2");
    let registry: TeamRegistry<Bundle> = TeamRegistry::new();
    let key = registry
        .register_default_team(vec![Member::base(&c1, MOVE)], Vec::new())
        .expect("team has formal members");

    assert_eq!(registry.add_formal_member_states(&key, &c1, EAT), Ok(true));
    assert_eq!(registry.add_formal_member_states(&key, &c1, EAT | SLEEP), Ok(false));
    let team = registry.team(&key).expect("team is registered");
    assert_eq!(team.formal_members()[0].states(), MOVE | EAT | SLEEP);

    // Not a member, wrong list, invalid flags
    assert_eq!(registry.add_formal_member_states(&key, &c2, EAT), Ok(false));
    assert_eq!(registry.add_outer_member_states(&key, &c1, EAT), Ok(false));
    assert!(registry.add_formal_member_states(&key, &c1, 0).is_err());
}

#[test]
fn deleting_member_states_removes_emptied_members() {
    let journal = Journal::new();
    let c1 = controller(&journal, "c1");
    let c2 = controller(&journal, "c2");
    let registry: TeamRegistry<Bundle> = TeamRegistry::new();
    let key = registry
        .register_default_team(
            vec![Member::base(&c1, MOVE | EAT), Member::base(&c2, ALL_STATES)],
            vec![Member::base(&c2, EAT)],
        )
        .expect("team has formal members");
    let team = registry.team(&key).expect("team is registered");

    assert_eq!(registry.delete_formal_member_states(&key, &c1, EAT), Ok(true));
    assert_eq!(team.formal_members()[0].states(), MOVE);

    assert_eq!(registry.delete_formal_member_states(&key, &c1, MOVE), Ok(true));
    assert_eq!(team.formal_members().len(), 1);
    assert!(!team.has_formal_controller(&c1));

    // Both lists at once
    assert_eq!(registry.delete_member_states(&key, &c2, EAT), Ok(true));
    assert!(team.outer_members().is_empty());
    assert_eq!(team.formal_members()[0].states(), ALL_STATES & !EAT);

    assert_eq!(registry.delete_outer_member_states(&key, &c2, EAT), Ok(false));
    assert!(registry.delete_member_states(&key, &c2, 0).is_err());
}

#[test]
fn deleting_whole_members() {
    let journal = Journal::new();
    let c1 = controller(&journal, "c1");
    let c2 = controller(&journal, "c2");
    let registry: TeamRegistry<Bundle> = TeamRegistry::new();
    let key = registry
        .register_default_team(
            vec![Member::base(&c1, MOVE), Member::base(&c2, MOVE)],
            vec![Member::base(&c2, EAT)],
        )
        .expect("team has formal members");
    let team = registry.team(&key).expect("team is registered");

    assert!(registry.delete_outer_member(&key, &c2));
    assert!(!registry.delete_outer_member(&key, &c2));
    assert_eq!(team.formal_members().len(), 2);

    assert!(registry.delete_formal_member(&key, &c1));
    assert!(registry.delete_member(&key, &c2));
    assert!(team.formal_members().is_empty());
    assert!(!registry.delete_member(&key, &c2));
}

#[test]
fn membership_queries_span_every_team() {
    let journal = Journal::new();
    let c1 = controller(&journal, "c1");
    let c2 = controller(&journal, "c2");
    let registry: TeamRegistry<Bundle> = TeamRegistry::new();
    let first = registry
        .register_default_team(vec![Member::base(&c1, MOVE)], vec![Member::base(&c2, EAT)])
        .expect("team has formal members");
    let second = registry
        .register_default_team(vec![Member::base(&c2, EAT)], vec![Member::base(&c1, MOVE)])
        .expect("team has formal members");

    let m1 = Member::base(&c1, MOVE);
    assert!(registry.is_formal_member(&m1));
    assert!(registry.is_outer_member(&m1));
    assert_eq!(registry.teams_as_formal(&m1), vec![first]);
    assert_eq!(registry.teams_as_outer(&m1), vec![second]);
    assert_eq!(registry.teams_of(&m1), vec![first, second]);

    // A different subset is a different member
    let m1_wide = Member::base(&c1, MOVE | EAT);
    assert!(registry.teams_of(&m1_wide).is_empty());

    let team = registry.team(&first).expect("team is registered");
    assert!(team.is_formal_member(&m1));
    assert!(team.is_outer_member(&Member::base(&c2, EAT)));
}

#[test]
fn member_edits_on_missing_team_are_noops() {
    let journal = Journal::new();
    let c = controller(&journal, "c");
    let registry: TeamRegistry<Bundle> = TeamRegistry::new();
    let key = registry
        .register_default_team(vec![Member::base(&c, MOVE)], Vec::new())
        .expect("team has formal members");
    registry.unregister_team(&key);

    assert!(!registry.add_formal_member(&key, Member::base(&c, EAT)));
    assert!(!registry.add_outer_member(&key, Member::base(&c, EAT)));
    assert_eq!(registry.add_formal_member_states(&key, &c, EAT), Ok(false));
    assert!(!registry.delete_member(&key, &c));
    assert_eq!(registry.delete_formal_member_states(&key, &c, MOVE), Ok(false));
}

#[test]
fn live_members_prunes_dead_ones() {
    let journal = Journal::new();
    let c1 = controller(&journal, "c1");
    let c2 = controller(&journal, "c2");
    let c3 = controller(&journal, "c3");
    let team = Team::with_default_callback(
        vec![Member::base(&c1, MOVE), Member::base(&c2, MOVE)],
        vec![Member::base(&c3, MOVE)],
    )
    .expect("team has formal members");

    drop(c2);
    drop(c3);

    assert_eq!(team.live_members(MemberScope::FORMAL).len(), 1);
    assert_eq!(team.formal_members().len(), 1);
    // The outer list was not walked yet
    assert_eq!(team.outer_members().len(), 1);
    assert!(team.live_members(MemberScope::ALL)[0].1.ptr_eq(&c1));
    assert!(team.outer_members().is_empty());
}
