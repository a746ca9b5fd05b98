use dotenv::dotenv;
use pretty_assertions::assert_eq;
use tasknest::models::{Task, TaskQuery, TaskUpdate, User};
use tasknest::store::{postgres, PgTaskStore, PgUserStore, TaskStore, UserStore};
use tasknest::AppError;
use uuid::Uuid;

async fn stores() -> (PgUserStore, PgTaskStore, sqlx::PgPool) {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let pool = postgres::connect(&database_url, 2)
        .await
        .expect("Failed to connect to test DB");
    (
        PgUserStore::new(pool.clone()),
        PgTaskStore::new(pool.clone()),
        pool,
    )
}

async fn cleanup_user(pool: &sqlx::PgPool, email: &str) {
    let _ = sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await;
}

fn user(email: &str) -> User {
    User::new(
        "Ana".into(),
        "Ruiz".into(),
        email.into(),
        "12345678".into(),
        "$2b$04$placeholderplaceholderplaceholderplaceholderplacehol".into(),
    )
}

#[ignore = "requires DATABASE_URL"]
#[actix_rt::test]
async fn test_pg_user_store_uniqueness() {
    let (users, _, pool) = stores().await;
    let email = "pg_unique@example.com";
    cleanup_user(&pool, email).await;

    let created = users.insert(user(email)).await.unwrap();
    let found = users.find_by_email(email).await.unwrap().unwrap();
    assert_eq!(found.id, created.id);

    assert!(matches!(
        users.insert(user(email)).await,
        Err(AppError::DuplicateEmail)
    ));

    cleanup_user(&pool, email).await;
}

#[ignore = "requires DATABASE_URL"]
#[actix_rt::test]
async fn test_pg_task_store_ownership() {
    let (users, tasks, pool) = stores().await;
    let (owner_email, other_email) = ("pg_owner@example.com", "pg_other@example.com");
    cleanup_user(&pool, owner_email).await;
    cleanup_user(&pool, other_email).await;

    let owner = users.insert(user(owner_email)).await.unwrap();
    let other = users.insert(user(other_email)).await.unwrap();

    let task = tasks
        .insert(Task::new("title".into(), "desc".into(), owner.id))
        .await
        .unwrap();

    let patch = TaskUpdate {
        completed: Some(true),
        ..Default::default()
    };
    assert!(tasks
        .update_owned(task.id, other.id, &patch)
        .await
        .unwrap()
        .is_none());
    assert!(!tasks.delete_owned(task.id, other.id).await.unwrap());

    let updated = tasks
        .update_owned(task.id, owner.id, &patch)
        .await
        .unwrap()
        .unwrap();
    assert!(updated.completed);
    assert_eq!(updated.title, "title");

    let listed = tasks
        .find_by_owner(owner.id, &TaskQuery::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert!(tasks
        .find_by_owner(other.id, &TaskQuery::default())
        .await
        .unwrap()
        .is_empty());

    assert!(tasks.delete_owned(task.id, owner.id).await.unwrap());
    assert!(tasks.find_owned(task.id, owner.id).await.unwrap().is_none());
    assert!(tasks.find_owned(Uuid::new_v4(), owner.id).await.unwrap().is_none());

    cleanup_user(&pool, owner_email).await;
    cleanup_user(&pool, other_email).await;
}
