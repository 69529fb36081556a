//! End-to-end authentication and authorization against SQLite.

use std::sync::Arc;

use sqlauth_core::{
    generate_bcrypt_salt, generate_salt, AuthOptions, Credentials, HashStrategy, MacAlgorithm,
    PasswordEncoder, PasswordStrategy, SqlAuthenticator, Value,
};
use sqlauth_sqlite::SqliteExecutor;

const TIM_HASH: &str = "IlyjozrPOpYmejRNoxijTbNn8NBBFNhKqJUsjY5CXzo=";
const TIM_SALT: &str = "R4direUPfPNIZoIiuaUI7+tcjqoZ9Fks8rrZc/0URvI=";

async fn seeded() -> Arc<SqliteExecutor> {
    let executor = SqliteExecutor::open_in_memory().unwrap();
    executor.create_default_schema().await.unwrap();
    executor
        .execute_batch(&format!(
            "INSERT INTO USER VALUES ('tim', '{TIM_HASH}', '{TIM_SALT}');
             INSERT INTO USER_ROLES VALUES ('tim', 'dev');
             INSERT INTO USER_ROLES VALUES ('tim', 'admin');
             INSERT INTO ROLES_PERMS VALUES ('dev', 'commit_code');
             INSERT INTO ROLES_PERMS VALUES ('dev', 'eat_pizza');
             INSERT INTO ROLES_PERMS VALUES ('admin', 'merge_pr');"
        ))
        .await
        .unwrap();
    Arc::new(executor)
}

#[tokio::test]
async fn test_authenticate_and_authorize() {
    let auth = SqlAuthenticator::new(seeded().await);

    let principal = auth
        .authenticate(&Credentials::new("tim", "sausages"))
        .await
        .unwrap();
    assert_eq!(principal.username(), "tim");

    assert!(principal.is_authorized("role:dev").await.unwrap());
    assert!(principal.is_authorized("role:admin").await.unwrap());
    assert!(!principal.is_authorized("role:manager").await.unwrap());
    assert!(principal.is_authorized("commit_code").await.unwrap());
    assert!(principal.is_authorized("merge_pr").await.unwrap());
    assert!(!principal.is_authorized("eat_sandwich").await.unwrap());

    let mut perms = principal.permissions().await.unwrap();
    perms.sort();
    assert_eq!(perms, vec!["commit_code", "eat_pizza", "merge_pr"]);
}

#[tokio::test]
async fn test_rejections() {
    let auth = SqlAuthenticator::new(seeded().await);

    let bad_pwd = auth
        .authenticate(&Credentials::new("tim", "eggs"))
        .await
        .unwrap_err();
    let bad_user = auth
        .authenticate(&Credentials::new("blah", "whatever"))
        .await
        .unwrap_err();
    assert_eq!(bad_pwd.to_string(), "Invalid username/password");
    assert_eq!(bad_user.to_string(), "Invalid username/password");
}

#[tokio::test]
async fn test_duplicate_user_rows() {
    let executor = seeded().await;
    executor
        .execute(
            "INSERT INTO USER VALUES (?, ?, ?)",
            &[
                Value::from("tim"),
                Value::from(TIM_HASH),
                Value::from(TIM_SALT),
            ],
        )
        .await
        .unwrap();

    let err = SqlAuthenticator::new(executor)
        .authenticate(&Credentials::new("tim", "sausages"))
        .await
        .unwrap_err();
    assert!(err.is_integrity());
    assert_eq!(err.to_string(), "Failure in authentication");
}

#[tokio::test]
async fn test_alternate_layout_with_hmac() {
    let executor = SqliteExecutor::open_in_memory().unwrap();
    executor
        .execute_batch(
            "CREATE TABLE user2 (user_name TEXT, pwd TEXT, pwd_salt TEXT);
             CREATE TABLE user_roles2 (user_name TEXT, role TEXT);
             CREATE TABLE roles_perms2 (role TEXT, perm TEXT);
             INSERT INTO user_roles2 VALUES ('lopus', 'dev');
             INSERT INTO roles_perms2 VALUES ('dev', 'commit_code');",
        )
        .await
        .unwrap();

    let strategy = HashStrategy::hmac(MacAlgorithm::HmacSha512).with_encoder(PasswordEncoder::Hex);
    let salt = generate_salt();
    let hash = strategy.compute("secret_pwd", Some(salt.as_str())).unwrap();
    executor
        .execute(
            "INSERT INTO user2 VALUES (?, ?, ?)",
            &[Value::from("lopus"), Value::from(hash), Value::from(salt)],
        )
        .await
        .unwrap();

    let options = AuthOptions::new()
        .with_authentication_query("SELECT pwd, pwd_salt FROM user2 WHERE user_name = ?")
        .with_roles_query("SELECT role FROM user_roles2 WHERE user_name = ?")
        .with_permissions_query(
            "SELECT perm FROM roles_perms2 rp, user_roles2 ur WHERE ur.user_name = ? AND ur.role = rp.role",
        )
        .with_password_algorithm("hmacsha512")
        .with_password_encoder(PasswordEncoder::Hex);
    let auth = SqlAuthenticator::from_options(Arc::new(executor), options).unwrap();

    let principal = auth
        .authenticate(&Credentials::new("lopus", "secret_pwd"))
        .await
        .unwrap();
    assert!(principal.is_authorized("role:dev").await.unwrap());
    assert!(principal.is_authorized("commit_code").await.unwrap());
    assert!(!principal.is_authorized("merge_pr").await.unwrap());

    assert!(auth
        .authenticate(&Credentials::new("lopus", "wrong"))
        .await
        .unwrap_err()
        .is_credential_failure());
}

#[tokio::test]
async fn test_bcrypt_in_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("auth.db");

    let salt = generate_bcrypt_salt(4);
    let hash = HashStrategy::bcrypt()
        .compute("hunter2", Some(salt.as_str()))
        .unwrap();
    {
        let executor = SqliteExecutor::open(&path).unwrap();
        executor.create_default_schema().await.unwrap();
        executor
            .execute(
                "INSERT INTO USER VALUES (?, ?, ?)",
                &[Value::from("ann"), Value::from(hash), Value::from(salt)],
            )
            .await
            .unwrap();
    }

    let executor = Arc::new(SqliteExecutor::open(&path).unwrap());
    let auth = SqlAuthenticator::new(executor).with_password_strategy(HashStrategy::bcrypt());

    let principal = auth
        .authenticate(&Credentials::new("ann", "hunter2"))
        .await
        .unwrap();
    assert_eq!(principal.username(), "ann");
    // No role rows for ann.
    assert!(principal.roles().await.unwrap().is_empty());
    assert!(auth
        .authenticate(&Credentials::new("ann", "hunter3"))
        .await
        .unwrap_err()
        .is_credential_failure());
}

#[tokio::test]
async fn test_missing_tables_surface_as_query_errors() {
    let executor = Arc::new(SqliteExecutor::open_in_memory().unwrap());
    let err = SqlAuthenticator::new(executor)
        .authenticate(&Credentials::new("tim", "sausages"))
        .await
        .unwrap_err();
    assert!(err.is_query());
    assert!(err.to_string().contains("no such table"));
}
