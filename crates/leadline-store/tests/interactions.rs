use leadline_core::domain::{InteractionKind, LeadId, LeadNew};
use leadline_store::repo::InteractionNew;
use leadline_store::{Store, StoreErrorKind};

fn store_with_lead(name: &str) -> (Store, LeadId) {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    let lead = store
        .leads()
        .create(
            1_700_000_000,
            LeadNew {
                name: name.to_string(),
                ..Default::default()
            },
        )
        .expect("create lead");
    (store, lead.id)
}

fn note(lead_id: LeadId, at: i64, kind: InteractionKind, content: &str) -> InteractionNew {
    InteractionNew {
        lead_id,
        created_at: at,
        kind,
        content: content.to_string(),
    }
}

#[test]
fn interactions_list_newest_first() {
    let (store, lead_id) = store_with_lead("Ana");
    store
        .interactions()
        .add(note(lead_id, 10, InteractionKind::Call, "intro call"))
        .expect("add");
    store
        .interactions()
        .add(note(lead_id, 20, InteractionKind::WhatsApp, "sent catalog"))
        .expect("add");

    let items = store.interactions().list_for_lead(lead_id).expect("list");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].content, "sent catalog");
    assert_eq!(items[0].kind, InteractionKind::WhatsApp);
    assert_eq!(items[1].kind, InteractionKind::Call);

    let recent = store.interactions().list_recent(1).expect("recent");
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].lead_name, "Ana");
    assert_eq!(recent[0].interaction.content, "sent catalog");
}

#[test]
fn empty_content_is_rejected() {
    let (store, lead_id) = store_with_lead("Ana");
    let err = store
        .interactions()
        .add(note(lead_id, 10, InteractionKind::Note, "   "))
        .expect_err("empty");
    assert_eq!(err.kind(), StoreErrorKind::InvalidInput);
}

#[test]
fn interaction_for_unknown_lead_is_not_found() {
    let (store, _) = store_with_lead("Ana");
    let err = store
        .interactions()
        .add(note(LeadId::new(), 10, InteractionKind::Note, "hello"))
        .expect_err("missing lead");
    assert_eq!(err.kind(), StoreErrorKind::NotFound);
}
