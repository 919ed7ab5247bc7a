use leadline_core::domain::{FollowUpMethod, LeadNew, LeadStatus, TagName};
use leadline_core::CoreError;
use leadline_store::repo::{InteractionNew, LeadUpdate};
use leadline_store::{Store, StoreError, StoreErrorKind};

fn store() -> Store {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
}

fn tags(names: &[&str]) -> Vec<TagName> {
    names.iter().map(|name| TagName::new(name).expect("tag")).collect()
}

#[test]
fn lead_crud_roundtrip() {
    let store = store();
    let now = 1_700_000_000;

    let lead = store
        .leads()
        .create(
            now,
            LeadNew {
                name: "  Ana Gómez ".to_string(),
                email: Some("Ana@Example.com".to_string()),
                phone: Some("+57 3001234567".to_string()),
                source: Some("colbrew".to_string()),
                product_interest: Some("Nitro Infusion".to_string()),
                country: Some("Colombia".to_string()),
                tags: tags(&["VIP", "expo"]),
                ..Default::default()
            },
        )
        .expect("create lead");
    assert_eq!(lead.name, "Ana Gómez");
    assert_eq!(lead.email.as_deref(), Some("ana@example.com"));
    assert_eq!(lead.status, LeadStatus::New);
    assert_eq!(lead.created_at, now);

    let fetched = store
        .leads()
        .get(lead.id)
        .expect("get lead")
        .expect("lead exists");
    assert_eq!(fetched, lead);
    let names: Vec<&str> = fetched.tags.iter().map(TagName::as_str).collect();
    assert_eq!(names, vec!["VIP", "expo"]);

    let updated = store
        .leads()
        .update(
            now + 10,
            lead.id,
            LeadUpdate {
                city: Some(Some("Medellín".to_string())),
                email: Some(None),
                tags: Some(tags(&["expo"])),
                ..Default::default()
            },
        )
        .expect("update lead");
    assert_eq!(updated.city.as_deref(), Some("Medellín"));
    assert!(updated.email.is_none());
    assert_eq!(updated.updated_at, now + 10);
    assert_eq!(updated.created_at, now);
    assert_eq!(updated.tags, tags(&["expo"]));

    store.leads().delete(lead.id).expect("delete lead");
    assert!(store.leads().get(lead.id).expect("get lead").is_none());
}

#[test]
fn create_requires_name() {
    let store = store();
    let err = store
        .leads()
        .create(0, LeadNew::default())
        .expect_err("blank name");
    assert!(matches!(err, StoreError::Core(CoreError::EmptyName)));
}

#[test]
fn update_rejects_blank_name() {
    let store = store();
    let lead = store
        .leads()
        .create(
            0,
            LeadNew {
                name: "Ana".to_string(),
                ..Default::default()
            },
        )
        .expect("create");
    let err = store
        .leads()
        .update(
            1,
            lead.id,
            LeadUpdate {
                name: Some(" ".to_string()),
                ..Default::default()
            },
        )
        .expect_err("blank name");
    assert_eq!(err.kind(), StoreErrorKind::InvalidInput);
    assert_eq!(store.leads().get(lead.id).unwrap().unwrap().name, "Ana");
}

#[test]
fn delete_missing_lead_is_not_found() {
    let store = store();
    let err = store
        .leads()
        .delete(leadline_core::LeadId::new())
        .expect_err("missing");
    assert_eq!(err.kind(), StoreErrorKind::NotFound);
}

#[test]
fn delete_cascades_to_interactions() {
    let store = store();
    let lead = store
        .leads()
        .create(
            0,
            LeadNew {
                name: "Ana".to_string(),
                ..Default::default()
            },
        )
        .expect("create");
    store
        .interactions()
        .add(InteractionNew {
            lead_id: lead.id,
            created_at: 5,
            kind: Default::default(),
            content: "first call".to_string(),
        })
        .expect("add interaction");

    store.leads().delete(lead.id).expect("delete");
    let remaining: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM interactions;", [], |row| row.get(0))
        .expect("count");
    assert_eq!(remaining, 0);
}

#[test]
fn status_changes_and_pipeline_advance() {
    let store = store();
    let lead = store
        .leads()
        .create(
            0,
            LeadNew {
                name: "Ana".to_string(),
                ..Default::default()
            },
        )
        .expect("create");

    let lead = store.leads().advance(1, lead.id).expect("advance");
    assert_eq!(lead.status, LeadStatus::Contacted);
    let lead = store
        .leads()
        .set_status(2, lead.id, LeadStatus::Closed)
        .expect("close");
    assert_eq!(lead.status, LeadStatus::Closed);
    assert_eq!(lead.updated_at, 2);

    let err = store.leads().advance(3, lead.id).expect_err("no next stage");
    assert!(matches!(err, StoreError::Core(CoreError::NoNextStatus(_))));
}

#[test]
fn follow_up_defaults_method_and_clears() {
    let store = store();
    let lead = store
        .leads()
        .create(
            0,
            LeadNew {
                name: "Ana".to_string(),
                ..Default::default()
            },
        )
        .expect("create");

    let scheduled = store
        .leads()
        .set_follow_up(1, lead.id, Some(1_000), None)
        .expect("schedule");
    assert_eq!(scheduled.next_follow_up, Some(1_000));
    assert_eq!(scheduled.follow_up_method, Some(FollowUpMethod::WhatsApp));

    let scheduled = store
        .leads()
        .set_follow_up(2, lead.id, Some(2_000), Some(FollowUpMethod::Call))
        .expect("reschedule");
    assert_eq!(scheduled.follow_up_method, Some(FollowUpMethod::Call));

    let cleared = store
        .leads()
        .set_follow_up(3, lead.id, None, None)
        .expect("clear");
    assert_eq!(cleared.next_follow_up, None);
    assert_eq!(cleared.follow_up_method, None);
}

#[test]
fn tags_are_shared_case_insensitively() {
    let store = store();
    for name in ["Ana", "Luis"] {
        store
            .leads()
            .create(
                0,
                LeadNew {
                    name: name.to_string(),
                    tags: tags(if name == "Ana" { &["VIP"] } else { &["vip"] }),
                    ..Default::default()
                },
            )
            .expect("create");
    }
    let counts = store.tags().list_with_counts().expect("tags");
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].0.name.as_str(), "VIP");
    assert_eq!(counts[0].1, 2);
}
