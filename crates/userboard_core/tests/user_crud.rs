use rusqlite::Connection;
use userboard_core::db::migrations::latest_version;
use userboard_core::db::open_db_in_memory;
use userboard_core::{
    NewUser, RepoError, SqliteUserRepository, UserName, UserRepository, UserService,
    UserValidationError,
};

#[test]
fn create_returns_inserted_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    let created = repo
        .create_user(&NewUser::new(UserName::parse("Alice").unwrap()))
        .unwrap();

    assert_eq!(created.id, 1);
    assert_eq!(created.name, "Alice");
    assert!(!created.created_at.is_empty());
}

#[test]
fn list_on_empty_store_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    assert!(repo.list_users().unwrap().is_empty());
    assert_eq!(repo.count_users().unwrap(), 0);
}

#[test]
fn list_orders_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());

    let first = service.create_user("A").unwrap();
    let second = service.create_user("B").unwrap();

    let names: Vec<_> = service
        .list_users()
        .unwrap()
        .into_iter()
        .map(|user| user.name)
        .collect();
    assert_eq!(names, vec!["B", "A"]);
    assert!(second.id > first.id);
}

#[test]
fn list_orders_by_created_at_before_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();

    conn.execute_batch(
        "INSERT INTO users (name, created_at) VALUES ('newer', '2026-01-02 00:00:00');
         INSERT INTO users (name, created_at) VALUES ('older', '2026-01-01 00:00:00');",
    )
    .unwrap();

    let names: Vec<_> = repo
        .list_users()
        .unwrap()
        .into_iter()
        .map(|user| user.name)
        .collect();
    assert_eq!(names, vec!["newer", "older"]);
}

#[test]
fn list_is_idempotent_without_writes() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());
    service.create_user("one").unwrap();
    service.create_user("two").unwrap();

    assert_eq!(service.list_users().unwrap(), service.list_users().unwrap());
}

#[test]
fn service_trims_name_before_storage() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());

    let created = service.create_user("   Carol  ").unwrap();
    assert_eq!(created.name, "Carol");

    let stored: String = conn
        .query_row("SELECT name FROM users WHERE id = ?1;", [created.id], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(stored, "Carol");
}

#[test]
fn service_rejects_blank_name_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());

    let err = service.create_user(" \t ").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(UserValidationError::EmptyName)
    ));
    assert_eq!(service.count_users().unwrap(), 0);
}

#[test]
fn special_characters_roundtrip_verbatim() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());

    for raw in ["O'Brien", "Robert'); DROP TABLE users;--", "名前 \"quoted\" %_"] {
        let created = service.create_user(raw).unwrap();
        assert_eq!(created.name, raw);
    }

    let listed: Vec<_> = service
        .list_users()
        .unwrap()
        .into_iter()
        .map(|user| user.name)
        .collect();
    assert!(listed.contains(&"O'Brien".to_string()));
    assert_eq!(service.count_users().unwrap(), 3);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteUserRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_users_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteUserRepository::try_new(&conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("users"))));
}

#[test]
fn repository_rejects_users_table_missing_created_at() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteUserRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "users",
            column: "created_at"
        })
    ));
}

#[test]
fn query_failure_surfaces_as_db_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&conn).unwrap();
    conn.execute_batch("DROP TABLE items; DROP TABLE users;")
        .unwrap();

    let err = repo.list_users().unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert!(err.to_string().contains("no such table"));
}

#[test]
fn verified_connection_can_be_wrapped_without_rechecking() {
    let conn = open_db_in_memory().unwrap();
    SqliteUserRepository::verify_schema(&conn).unwrap();

    let service = UserService::new(SqliteUserRepository::new_verified(&conn));
    let created = service.create_user("Eve").unwrap();
    assert_eq!(service.list_users().unwrap(), vec![created]);
}

#[test]
fn verify_schema_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let err = SqliteUserRepository::verify_schema(&conn).unwrap_err();
    assert!(matches!(err, RepoError::UninitializedConnection { .. }));
}
