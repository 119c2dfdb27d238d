mod common;

use std::fs;

use common::{fill_parent_step, open_session, setup_test_env, store_in, temp_base};
use flowmatch::{
    config::{Config, ConfigManager},
    domain::{
        steps::THERAPIST_MAIN_FIELDS, ApplicationState, FileDescriptor, FlowKind,
        SpecializationCatalog, View,
    },
    storage::StatePersistence,
    utils::paths,
    wizard::FormSurface,
};

#[test]
fn session_survives_a_restart() {
    let (mut session, _, base) = setup_test_env();
    session.show_view(View::ParentFlow);
    fill_parent_step(&mut session, 1);
    session.next(FlowKind::Parent).unwrap();
    session
        .upload_file(
            FlowKind::Parent,
            FileDescriptor::new("report.pdf", 2048, "application/pdf"),
        )
        .unwrap();
    session.shutdown();

    let reopened = open_session(&base);
    let state = reopened.state();
    assert_eq!(state.current_view, View::ParentFlow);
    assert_eq!(state.parent_flow.current_step, 2);
    assert_eq!(state.parent_flow.field("city"), Some("תל אביב"));
    assert_eq!(state.parent_flow.uploaded_file_descriptors.len(), 1);
    assert_eq!(reopened.surface().visible_panel(FlowKind::Parent), Some(2));
    assert_eq!(
        reopened.surface().field_value(FlowKind::Parent, "child_name"),
        Some("נועה".to_string())
    );
}

#[test]
fn removed_category_stays_removed_after_a_restart() {
    let (mut session, _, base) = setup_test_env();
    let speech = SpecializationCatalog::standard()
        .find("speech")
        .expect("speech category")
        .label;
    session
        .toggle_chip(FlowKind::Therapist, THERAPIST_MAIN_FIELDS, speech)
        .unwrap();
    session
        .toggle_chip(FlowKind::Therapist, THERAPIST_MAIN_FIELDS, speech)
        .unwrap();
    session.shutdown();

    let reopened = open_session(&base);
    assert_eq!(reopened.category_slots().selected().count(), 0);
    let flow = &reopened.state().therapist_flow;
    assert!(flow.tags(THERAPIST_MAIN_FIELDS).is_empty());
    assert_eq!(flow.field(THERAPIST_MAIN_FIELDS), None);
}

#[test]
fn snapshot_uses_camel_case_keys() {
    let (mut session, _, base) = setup_test_env();
    session.show_view(View::TherapistFlow);
    let slot = session.store().slot().to_string();
    let json = fs::read_to_string(paths::storage_dir_in(&base).join(format!("{}.json", slot)))
        .expect("snapshot written");
    assert!(json.contains("\"currentView\": \"therapist-flow\""));
    assert!(json.contains("\"parentFlow\""));
    assert!(json.contains("\"savedMatches\""));
}

#[test]
fn corrupt_snapshot_falls_back_to_defaults() {
    let base = temp_base();
    let config = Config::default();
    let dir = paths::storage_dir_in(&base);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{}.json", config.storage_slot)), "{not json").unwrap();

    let store = store_in(&base, &config);
    assert_eq!(store.load(), ApplicationState::default());

    let session = open_session(&base);
    assert_eq!(session.state(), &ApplicationState::default());
    assert_eq!(session.surface().visible_panel(FlowKind::Parent), Some(1));
}

#[test]
fn out_of_range_step_is_clamped_on_load() {
    let base = temp_base();
    let config = Config::default();
    let dir = paths::storage_dir_in(&base);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(format!("{}.json", config.storage_slot)),
        r#"{"currentView":"parent-flow","parentFlow":{"currentStep":9}}"#,
    )
    .unwrap();

    let session = open_session(&base);
    assert_eq!(session.state().parent_flow.current_step, 4);
    assert_eq!(session.state().therapist_flow.current_step, 1);
}

#[test]
fn config_round_trip() {
    let base = temp_base();
    let manager = ConfigManager::with_base_dir(base.clone()).unwrap();
    assert_eq!(manager.load().unwrap(), Config::default());

    let mut config = Config::default();
    config.set_value("availability_seed", "42").unwrap();
    config.set_value("toast_lifetime_ms", "1500").unwrap();
    manager.save(&config).unwrap();

    let loaded = ConfigManager::with_base_dir(base).unwrap().load().unwrap();
    assert_eq!(loaded.availability_seed, Some(42));
    assert_eq!(loaded.toast_lifetime_ms, 1500);
    assert!(config.set_value("colour", "blue").is_err());
}
