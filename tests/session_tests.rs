// tests/session_tests.rs

use narang::{
    models::user::Role,
    session::{
        Session, SessionStore,
        gate::{ADMIN_HOME, ADMIN_LOGIN_PATH, LOGIN_PATH, STUDENT_HOME, gate},
    },
};

fn student_session() -> Session {
    Session {
        user_id: "u-1".to_string(),
        username: "siswa".to_string(),
        email: Some("siswa@narang.id".to_string()),
        name: "Siswa Demo".to_string(),
        role: Role::Student,
        kelas: Some("4".to_string()),
        student_id: Some("SD2024001".to_string()),
        barcode: Some("NRGDEMO123".to_string()),
        login_time: 1_740_963_600_000,
    }
}

fn admin_session() -> Session {
    Session {
        user_id: "u-0".to_string(),
        username: "admin".to_string(),
        email: Some("admin@narang.id".to_string()),
        name: "Admin Narang".to_string(),
        role: Role::Admin,
        kelas: None,
        student_id: None,
        barcode: None,
        login_time: 1_740_963_600_000,
    }
}

#[test]
fn saved_session_loads_back_unchanged() {
    let store = SessionStore::new("secret", 600);
    let session = student_session();

    let token = store.save_session(&session).unwrap();
    let loaded = store.load_session(Some(&token)).unwrap();

    assert_eq!(loaded, session);
    let identity = loaded.student().unwrap();
    assert_eq!(identity.student_id, "SD2024001");
    assert_eq!(identity.barcode, "NRGDEMO123");
}

#[test]
fn admin_session_has_no_student_identity() {
    let store = SessionStore::new("secret", 600);
    let token = store.save_session(&admin_session()).unwrap();

    let loaded = store.load_session(Some(&token)).unwrap();
    assert_eq!(loaded.role, Role::Admin);
    assert!(loaded.student().is_none());
}

#[test]
fn unreadable_tokens_mean_no_session() {
    let store = SessionStore::new("secret", 600);
    let token = store.save_session(&student_session()).unwrap();

    assert!(store.load_session(None).is_none());
    assert!(store.load_session(Some("not-a-token")).is_none());
    assert!(store.load_session(Some(&format!("{}x", token))).is_none());

    let other = SessionStore::new("another-secret", 600);
    assert!(other.load_session(Some(&token)).is_none());
}

#[test]
fn cleared_session_is_gone() {
    let store = SessionStore::new("secret", 600);
    let token = store.save_session(&student_session()).unwrap();
    let untouched = store.save_session(&student_session()).unwrap();

    assert!(store.clear_session(&token));
    assert!(store.load_session(Some(&token)).is_none());
    assert!(!store.clear_session(&token));

    // Clones share the revocation list.
    assert!(store.clone().load_session(Some(&token)).is_none());
    assert!(store.load_session(Some(&untouched)).is_some());
}

#[test]
fn gate_sends_each_role_home() {
    let student = student_session();
    let admin = admin_session();

    assert_eq!(gate(Some(&student), Role::Student), Ok(()));
    assert_eq!(gate(Some(&admin), Role::Admin), Ok(()));
    assert_eq!(gate(Some(&admin), Role::Student), Err(ADMIN_HOME));
    assert_eq!(gate(Some(&student), Role::Admin), Err(STUDENT_HOME));
    assert_eq!(gate(None, Role::Student), Err(LOGIN_PATH));
    assert_eq!(gate(None, Role::Admin), Err(ADMIN_LOGIN_PATH));
}
