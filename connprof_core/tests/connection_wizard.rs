use std::sync::Arc;

use connprof_core::storage::{
    ConnectionProfile, MemoryConfig, ProfileStore, SecretCache, PROFILES_KEY,
};
use connprof_core::wizard::connection_wizard::{
    CANCELLED, DUPLICATE_NAME, NO_NAME_CANCELLED, NO_URL_CANCELLED, TLS_ACCEPT, TLS_REJECT,
};
use connprof_core::wizard::validate::INVALID_URL;
use connprof_core::{ConnectionWizard, ProfileError, WizardOutcome};
use log::LevelFilter;
use serde_json::json;

mod common;
use common::fake_surface::{Notice, RecordingNotifier, ScriptedPrompter};

fn setup() -> (ProfileStore, MemoryConfig) {
    //   Logs will appear only when you run with `-- --nocapture`
    //   or when the test fails.
    let _ = env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Debug)
        .is_test(true)
        .try_init();

    let config = MemoryConfig::new();
    let store = ProfileStore::new(Arc::new(config.clone()), SecretCache::new());
    (store, config)
}

async fn run_wizard(
    store: &ProfileStore,
    prompter: &mut ScriptedPrompter,
) -> (Result<WizardOutcome, ProfileError>, RecordingNotifier) {
    let notifier = RecordingNotifier::default();
    let outcome = ConnectionWizard::new(store, prompter, &notifier).run().await;
    (outcome, notifier)
}

#[tokio::test]
async fn creates_profile_end_to_end() {
    let (store, config) = setup();
    let mut prompter = ScriptedPrompter::new([
        Some("A"),
        Some("https://h:1443"),
        Some("u"),
        Some("p"),
        Some(TLS_REJECT),
    ]);

    let (outcome, notifier) = run_wizard(&store, &mut prompter).await;

    assert_eq!(outcome.unwrap(), WizardOutcome::Created("A".into()));
    assert_eq!(
        notifier.notices(),
        [Notice::Info("Profile A was created.".into())]
    );

    // ── list() hands the password back from the session cache ────────────
    let listed = store.list().await.unwrap();
    assert_eq!(
        listed,
        [ConnectionProfile {
            name: "A".into(),
            url: "https://h:1443".into(),
            username: Some("u".into()),
            password: Some("p".into()),
            reject_unauthorized: true,
        }]
    );

    // ── the persisted document has the same record minus the password ────
    assert_eq!(
        config.raw(PROFILES_KEY).await.unwrap(),
        json!([{
            "name": "A",
            "url": "https://h:1443",
            "username": "u",
            "reject_unauthorized": "true"
        }])
    );
}

#[tokio::test]
async fn password_prompt_hides_input() {
    let (store, _config) = setup();
    let mut prompter = ScriptedPrompter::new([
        Some("A"),
        Some("https://h:1443"),
        Some("u"),
        Some("p"),
        Some(TLS_ACCEPT),
    ]);

    let _ = run_wizard(&store, &mut prompter).await;

    let hidden: Vec<bool> = prompter.asked.iter().map(|(_, hidden)| *hidden).collect();
    assert_eq!(hidden, [false, false, false, true, false]);
}

#[tokio::test]
async fn invalid_url_is_reprompted_inline() {
    let (store, _config) = setup();
    let mut prompter = ScriptedPrompter::new([
        Some("sys1"),
        Some("myhost.com"),
        Some("https://myhost.com:443"),
        None,
        None,
        Some("2"),
    ]);

    let (outcome, notifier) = run_wizard(&store, &mut prompter).await;

    assert_eq!(outcome.unwrap(), WizardOutcome::Created("sys1".into()));
    assert_eq!(
        prompter.rejected,
        [("myhost.com".to_string(), INVALID_URL.to_string())]
    );
    assert!(notifier.errors().is_empty());

    let created = store.find("sys1").await.unwrap().unwrap();
    assert_eq!(created.url, "https://myhost.com:443");
    assert_eq!(created.username, None);
    assert_eq!(created.password, None);
    assert!(!created.reject_unauthorized);
}

#[tokio::test]
async fn duplicate_name_leaves_store_unchanged() {
    let (store, config) = setup();
    store
        .update(&[ConnectionProfile::new("sys1", "https://old:1443")])
        .await
        .unwrap();
    let before = config.raw(PROFILES_KEY).await;

    let mut prompter = ScriptedPrompter::new([
        Some("sys1"),
        Some("https://new:1443"),
        Some("u"),
        Some("p"),
        Some(TLS_REJECT),
    ]);
    let (outcome, notifier) = run_wizard(&store, &mut prompter).await;

    assert_eq!(outcome.unwrap(), WizardOutcome::DuplicateName("sys1".into()));
    assert_eq!(notifier.notices(), [Notice::Error(DUPLICATE_NAME.into())]);
    assert_eq!(config.raw(PROFILES_KEY).await, before);
    assert_eq!(store.secrets().get("sys1").await, None);
}

#[tokio::test]
async fn appends_to_existing_profiles() {
    let (store, _config) = setup();
    store
        .update(&[ConnectionProfile::new("first", "https://one:1443")])
        .await
        .unwrap();

    let mut prompter = ScriptedPrompter::new([
        Some("second"),
        Some("https://two:1443"),
        Some(""),
        Some(""),
        Some(TLS_REJECT),
    ]);
    let (outcome, _notifier) = run_wizard(&store, &mut prompter).await;
    assert_eq!(outcome.unwrap(), WizardOutcome::Created("second".into()));

    let names: Vec<_> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["first", "second"]);
}

/// Every cancellable step ends with an info message, never an error, and
/// writes nothing.
#[tokio::test]
async fn cancelling_required_prompts_is_informational() {
    let cases: [(Vec<Option<&str>>, &str); 5] = [
        (vec![None], NO_NAME_CANCELLED),
        (vec![Some("   ")], NO_NAME_CANCELLED),
        (vec![Some("sys1"), None], NO_URL_CANCELLED),
        (vec![Some("sys1"), Some("")], NO_URL_CANCELLED),
        (
            vec![Some("sys1"), Some("https://h:1443"), Some("u"), Some("p"), None],
            CANCELLED,
        ),
    ];

    for (script, expected) in cases {
        let (store, config) = setup();
        let mut prompter = ScriptedPrompter::new(script.clone());

        let (outcome, notifier) = run_wizard(&store, &mut prompter).await;

        assert_eq!(outcome.unwrap(), WizardOutcome::Cancelled, "script {script:?}");
        assert_eq!(
            notifier.notices(),
            [Notice::Info(expected.into())],
            "script {script:?}"
        );
        assert_eq!(config.raw(PROFILES_KEY).await, None, "script {script:?}");
        assert_eq!(prompter.remaining(), 0);
    }
}

#[tokio::test]
async fn unknown_tls_choice_cancels() {
    let (store, config) = setup();
    let mut prompter = ScriptedPrompter::new([
        Some("sys1"),
        Some("https://h:1443"),
        None,
        None,
        Some("maybe"),
    ]);

    let (outcome, notifier) = run_wizard(&store, &mut prompter).await;

    assert_eq!(outcome.unwrap(), WizardOutcome::Cancelled);
    assert_eq!(notifier.notices(), [Notice::Info(CANCELLED.into())]);
    assert_eq!(config.raw(PROFILES_KEY).await, None);
}

#[tokio::test]
async fn persistence_failure_propagates_without_notification() {
    let (store, config) = setup();
    config.set_fail_writes(true);
    let mut prompter = ScriptedPrompter::new([
        Some("sys1"),
        Some("https://h:1443"),
        Some("u"),
        Some("p"),
        Some(TLS_REJECT),
    ]);

    let (outcome, notifier) = run_wizard(&store, &mut prompter).await;

    assert!(matches!(outcome, Err(ProfileError::IoError(_))));
    assert!(notifier.notices().is_empty());
    assert!(!store.secrets().contains("sys1").await);
}

#[tokio::test]
async fn creating_a_profile_keeps_records_that_do_not_parse() {
    let (store, config) = setup();
    config
        .insert_raw(
            PROFILES_KEY,
            json!([
                { "name": "prod", "url": "https://prod:1443", "reject_unauthorized": "yes" },
                { "name": "legacy", "url": "https://legacy:443", "reject_unauthorized": "true", "port": 443 }
            ]),
        )
        .await;

    let mut prompter = ScriptedPrompter::new([
        Some("new"),
        Some("https://new:1443"),
        None,
        None,
        Some(TLS_REJECT),
    ]);
    let (outcome, _notifier) = run_wizard(&store, &mut prompter).await;
    assert_eq!(outcome.unwrap(), WizardOutcome::Created("new".into()));

    assert_eq!(
        config.raw(PROFILES_KEY).await.unwrap(),
        json!([
            { "name": "prod", "url": "https://prod:1443", "reject_unauthorized": "yes" },
            { "name": "legacy", "url": "https://legacy:443", "reject_unauthorized": "true", "port": 443 },
            { "name": "new", "url": "https://new:1443", "reject_unauthorized": "true" }
        ]),
        "existing records must survive creating another profile"
    );
}

#[tokio::test]
async fn name_of_unparsable_record_is_reported_as_duplicate() {
    let (store, config) = setup();
    config
        .insert_raw(
            PROFILES_KEY,
            json!([{ "name": "sys1", "url": "https://old:1443", "reject_unauthorized": "yes" }]),
        )
        .await;
    let before = config.raw(PROFILES_KEY).await;

    let mut prompter = ScriptedPrompter::new([
        Some("sys1"),
        Some("https://new:1443"),
        None,
        None,
        Some(TLS_ACCEPT),
    ]);
    let (outcome, notifier) = run_wizard(&store, &mut prompter).await;

    assert_eq!(outcome.unwrap(), WizardOutcome::DuplicateName("sys1".into()));
    assert_eq!(notifier.notices(), [Notice::Error(DUPLICATE_NAME.into())]);
    assert_eq!(config.raw(PROFILES_KEY).await, before);
}

#[tokio::test]
async fn blank_url_cancels_without_reprompting() {
    let (store, config) = setup();
    let mut prompter = ScriptedPrompter::new([Some("sys1"), Some("   ")]);

    let (outcome, notifier) = run_wizard(&store, &mut prompter).await;

    assert_eq!(outcome.unwrap(), WizardOutcome::Cancelled);
    assert!(prompter.rejected.is_empty());
    assert_eq!(notifier.notices(), [Notice::Info(NO_URL_CANCELLED.into())]);
    assert_eq!(config.raw(PROFILES_KEY).await, None);
}
