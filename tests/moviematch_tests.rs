use std::sync::Arc;
use std::time::Duration;

use tokio_test::{assert_err, assert_ok};

use moviematch::{
    db,
    error::{AccountError, AppError, ContactError, MatchError},
    models::{MatchOutcome, Mood, User, UserId},
    stores::{MemoryMoodStore, MoodStore},
    App, Config,
};

async fn create_test_app() -> (App, Arc<MemoryMoodStore>) {
    let pool = db::create_pool("sqlite::memory:", 1).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    let moods = Arc::new(MemoryMoodStore::new());
    let app = App::from_parts(pool, moods.clone(), &Config::default());
    (app, moods)
}

async fn register(app: &App, name: &str) -> User {
    app.accounts.register(name, "secret").await.unwrap()
}

async fn like(app: &App, user: &User, genre: &str, movies: &[&str]) {
    let movies: Vec<String> = movies.iter().map(|m| m.to_string()).collect();
    app.preferences
        .update_genre(&user.user_id, genre, &movies)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_register_then_login() {
    let (app, _) = create_test_app().await;

    let ann = register(&app, "  ann ").await;
    assert_eq!(ann.username, "ann");
    assert_eq!(ann.user_id.as_str().len(), 6);

    let logged_in = assert_ok!(app.accounts.login(ann.user_id.as_str(), "secret").await);
    assert_eq!(logged_in.user_id, ann.user_id);

    let err = assert_err!(app.accounts.login(ann.user_id.as_str(), "wrong").await);
    assert!(matches!(err, AppError::Account(AccountError::InvalidCredentials)));
}

#[tokio::test]
async fn test_register_rejects_taken_username() {
    let (app, _) = create_test_app().await;
    register(&app, "ann").await;

    let err = assert_err!(app.accounts.register("ann", "other").await);
    assert_eq!(err.message_id(), "name_exists");
}

#[tokio::test]
async fn test_password_recovery_flow() {
    let (app, _) = create_test_app().await;
    let ann = register(&app, "ann").await;

    let ticket = app.accounts.start_recovery("ann").await.unwrap();
    assert_eq!(ticket.user_id, ann.user_id);
    assert_err!(app.accounts.reset_password(&ticket, "not-a-code", "fresh").await);

    assert_ok!(app.accounts.reset_password(&ticket, &ticket.code, "fresh").await);
    assert_ok!(app.accounts.login(ann.user_id.as_str(), "fresh").await);
}

#[tokio::test]
async fn test_update_genre_replaces_and_deduplicates() {
    let (app, _) = create_test_app().await;
    let ann = register(&app, "ann").await;

    like(&app, &ann, "Action", &["A", "B"]).await;
    like(&app, &ann, "Action", &["C", "C", "D"]).await;
    like(&app, &ann, "Drama", &["E"]).await;

    let action = app.preferences.movies_for_genre(&ann.user_id, "Action").await.unwrap();
    assert_eq!(action, vec!["C".to_string(), "D".to_string()]);

    let genres = app.preferences.available_genres(&ann.user_id).await.unwrap();
    assert_eq!(genres, vec!["Action".to_string(), "Drama".to_string()]);

    like(&app, &ann, "Drama", &[]).await;
    let genres = app.preferences.available_genres(&ann.user_id).await.unwrap();
    assert_eq!(genres, vec!["Action".to_string()]);
}

#[tokio::test]
async fn test_contacts_newest_first_and_duplicate_rejected() {
    let (app, _) = create_test_app().await;
    let ann = register(&app, "ann").await;
    let bea = register(&app, "bea").await;
    let cal = register(&app, "cal").await;

    app.contacts.add_contact(&ann.user_id, bea.user_id.as_str()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    app.contacts.add_contact(&ann.user_id, cal.user_id.as_str()).await.unwrap();

    let err = assert_err!(app.contacts.add_contact(&ann.user_id, bea.user_id.as_str()).await);
    assert!(matches!(err, AppError::Contact(ContactError::ContactAlreadyExists)));

    let listed: Vec<UserId> = app
        .contacts
        .list(&ann.user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.contact_id)
        .collect();
    assert_eq!(listed, vec![cal.user_id.clone(), bea.user_id.clone()]);

    // directional: bea does not see ann
    assert!(app.contacts.list(&bea.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rename_and_delete_contact() {
    let (app, _) = create_test_app().await;
    let ann = register(&app, "ann").await;
    let bea = register(&app, "bea").await;
    app.contacts.add_contact(&ann.user_id, bea.user_id.as_str()).await.unwrap();

    let renamed = app.contacts.rename(&ann.user_id, &bea.user_id, " Bea ").await.unwrap();
    assert_eq!(renamed.label(), "Bea");
    assert_eq!(app.contacts.list(&ann.user_id).await.unwrap()[0].display_name, "Bea");

    assert_ok!(app.contacts.delete(&ann.user_id, &bea.user_id).await);
    let err = assert_err!(app.contacts.delete(&ann.user_id, &bea.user_id).await);
    assert_eq!(err.message_id(), "contact_not_found");
}

#[tokio::test]
async fn test_delete_account_cascades() {
    let (app, moods) = create_test_app().await;
    let ann = register(&app, "ann").await;
    let bea = register(&app, "bea").await;

    like(&app, &ann, "Action", &["A"]).await;
    app.contacts.add_contact(&ann.user_id, bea.user_id.as_str()).await.unwrap();
    app.contacts.add_contact(&bea.user_id, ann.user_id.as_str()).await.unwrap();
    let mood: Mood = ["Action"].into_iter().collect();
    app.preferences.save_mood(&ann.user_id, &mood).await.unwrap();

    assert_ok!(app.accounts.delete_account(&ann.user_id).await);

    assert!(app.preferences.preferences_for_user(&ann.user_id).await.unwrap().is_empty());
    assert!(app.contacts.list(&bea.user_id).await.unwrap().is_empty());
    assert!(moods.get_mood_for_user(&ann.user_id).await.unwrap().is_unrestricted());

    let err = assert_err!(app.accounts.login(ann.user_id.as_str(), "secret").await);
    assert_eq!(err.message_id(), "not_found");
}

#[tokio::test]
async fn test_direct_match_through_session() {
    let (app, _) = create_test_app().await;
    let ann = register(&app, "ann").await;
    let bea = register(&app, "bea").await;

    like(&app, &ann, "Action", &["A", "B"]).await;
    like(&app, &ann, "Drama", &["X"]).await;
    like(&app, &bea, "Action", &["B", "C"]).await;
    like(&app, &bea, "Drama", &["X"]).await;

    let bea_mood: Mood = ["Action"].into_iter().collect();
    app.preferences.save_mood(&bea.user_id, &bea_mood).await.unwrap();

    let session = app.session(ann.user_id.clone());
    session.set_peer_input(bea.user_id.as_str()).await;
    let outcome = session.find_direct_match().await.unwrap();
    assert_eq!(outcome.movies(), &["B".to_string()]);

    let added = session.add_matched_peer().await.unwrap();
    assert_eq!(added.contact_id, bea.user_id);
    let err = assert_err!(session.add_matched_peer().await);
    assert!(matches!(err, AppError::Contact(ContactError::ContactAlreadyExists)));
    assert_eq!(app.contacts.list(&ann.user_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_direct_match_unknown_peer_is_recorded() {
    let (app, _) = create_test_app().await;
    let ann = register(&app, "ann").await;
    like(&app, &ann, "Action", &["A"]).await;

    let session = app.session(ann.user_id.clone());
    session.set_peer_input("999999").await;
    assert_err!(session.find_direct_match().await);
    assert_eq!(session.result().await, Some(Err(MatchError::PeerNotFound)));
}

#[tokio::test]
async fn test_group_match_reports_members_without_preferences() {
    let (app, _) = create_test_app().await;
    let ann = register(&app, "ann").await;
    let bea = register(&app, "bea").await;
    let cal = register(&app, "cal").await;
    let dan = register(&app, "dan").await;

    like(&app, &ann, "Action", &["A", "B"]).await;
    like(&app, &bea, "Action", &["A", "B", "C"]).await;
    like(&app, &cal, "Action", &["B"]).await;

    for friend in [&bea, &cal, &dan] {
        app.contacts
            .add_contact(&ann.user_id, friend.user_id.as_str())
            .await
            .unwrap();
    }
    app.contacts.rename(&ann.user_id, &dan.user_id, "Dan").await.unwrap();

    let session = app.session(ann.user_id.clone());
    let selected = vec![bea.user_id.clone(), cal.user_id.clone(), dan.user_id.clone()];
    match session.find_group_match(&selected).await.unwrap() {
        MatchOutcome::Group(found) => {
            assert_eq!(found.movies, vec!["B".to_string()]);
            assert_eq!(found.missing_members, vec!["Dan".to_string()]);
        }
        other => panic!("expected group outcome, got {:?}", other),
    }
}
