//! Open-cluster listing: filtering, ranking, and intent isolation

use chrono::Utc;
use pretty_assertions::assert_eq;
use quadral_domain::{
    Cluster, ClusterStatus, Intent, Membership, PersonalityType, Quadra, UserProfile,
};
use quadral_match::{MatchEngine, MemoryStore};
use quadral_test_utils::{set_mutual_preference, user_of};

fn cluster_with(
    store: &mut MemoryStore,
    quadra: Quadra,
    intent: Intent,
    members: &[&UserProfile],
) -> Cluster {
    let mut cluster = Cluster::new(quadra, intent, Utc::now());
    for member in members {
        let ty = member.socionics_type.expect("fixture members are typed");
        cluster.add_member(Membership::new(member.id, ty, None, Utc::now()));
        store.insert_user((*member).clone());
    }
    store.insert_cluster(cluster.clone());
    cluster
}

#[test]
fn family_listing_skips_taken_seats_and_full_clusters() {
    let mut store = MemoryStore::new();
    let ile = user_of(PersonalityType::ILE);
    let sei = user_of(PersonalityType::SEI);
    let ese = user_of(PersonalityType::ESE);
    let lii = user_of(PersonalityType::LII);

    let seat_taken = cluster_with(&mut store, Quadra::Alpha, Intent::Family, &[&ile]);
    let full = cluster_with(
        &mut store,
        Quadra::Alpha,
        Intent::Family,
        &[&ile, &sei, &ese, &lii],
    );
    let open = cluster_with(&mut store, Quadra::Alpha, Intent::Family, &[&sei]);

    let listed = MatchEngine::new(&store).list_open_clusters(
        Quadra::Alpha,
        PersonalityType::ILE,
        Intent::Family,
        None,
        None,
    );
    let ids: Vec<_> = listed.iter().map(|c| c.cluster_id).collect();
    assert_eq!(ids, vec![open.id]);
    assert!(!ids.contains(&seat_taken.id));
    assert!(!ids.contains(&full.id));
}

#[test]
fn work_listing_allows_repeated_types() {
    let mut store = MemoryStore::new();
    let ile = user_of(PersonalityType::ILE);
    let cluster = cluster_with(&mut store, Quadra::Alpha, Intent::Work, &[&ile]);

    let listed = MatchEngine::new(&store).list_open_clusters(
        Quadra::Alpha,
        PersonalityType::ILE,
        Intent::Work,
        None,
        None,
    );
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].cluster_id, cluster.id);
}

#[test]
fn archived_clusters_never_appear() {
    let mut store = MemoryStore::new();
    let sei = user_of(PersonalityType::SEI);
    let mut cluster = cluster_with(&mut store, Quadra::Alpha, Intent::Family, &[&sei]);
    cluster.status = ClusterStatus::Archived;
    store.insert_cluster(cluster);

    let listed = MatchEngine::new(&store).list_open_clusters(
        Quadra::Alpha,
        PersonalityType::ILE,
        Intent::Family,
        None,
        None,
    );
    assert!(listed.is_empty());
}

#[test]
fn intents_are_isolated_in_listings() {
    let mut store = MemoryStore::new();
    let sei = user_of(PersonalityType::SEI);
    cluster_with(&mut store, Quadra::Alpha, Intent::Family, &[&sei]);

    let listed = MatchEngine::new(&store).list_open_clusters(
        Quadra::Alpha,
        PersonalityType::ILE,
        Intent::Work,
        None,
        None,
    );
    assert!(listed.is_empty(), "family clusters must not leak into work listings");
}

#[test]
fn candidate_ranking_prefers_the_cluster_with_liked_members() {
    let mut store = MemoryStore::new();
    let mut candidate = user_of(PersonalityType::ILE);

    let mut liked = user_of(PersonalityType::SEI);
    set_mutual_preference(&mut candidate, &mut liked, 2);
    let mut disliked = user_of(PersonalityType::SEI);
    set_mutual_preference(&mut candidate, &mut disliked, -2);

    let cold = cluster_with(&mut store, Quadra::Alpha, Intent::Family, &[&disliked]);
    let warm = cluster_with(&mut store, Quadra::Alpha, Intent::Family, &[&liked]);

    let listed = MatchEngine::new(&store).list_open_clusters(
        Quadra::Alpha,
        PersonalityType::ILE,
        Intent::Family,
        None,
        Some(&candidate),
    );
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].cluster_id, warm.id);
    assert_eq!(listed[1].cluster_id, cold.id);
    assert!(listed[0].score > listed[1].score);
}

#[test]
fn fill_ratio_ranking_is_stable_for_ties() {
    let mut store = MemoryStore::new();
    let first_sei = user_of(PersonalityType::SEI);
    let second_sei = user_of(PersonalityType::SEI);
    let first = cluster_with(&mut store, Quadra::Alpha, Intent::Work, &[&first_sei]);
    let second = cluster_with(&mut store, Quadra::Alpha, Intent::Work, &[&second_sei]);

    let listed = MatchEngine::new(&store).list_open_clusters(
        Quadra::Alpha,
        PersonalityType::ILE,
        Intent::Work,
        None,
        None,
    );
    // Equal fill ratio: store order is preserved
    let ids: Vec<_> = listed.iter().map(|c| c.cluster_id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[test]
fn listing_honors_an_explicit_limit() {
    let mut store = MemoryStore::new();
    for _ in 0..6 {
        store.insert_cluster(Cluster::new(Quadra::Gamma, Intent::Work, Utc::now()));
    }
    let listed = MatchEngine::new(&store).list_open_clusters(
        Quadra::Gamma,
        PersonalityType::SEE,
        Intent::Work,
        Some(2),
        None,
    );
    assert_eq!(listed.len(), 2);
}
