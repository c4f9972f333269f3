use datakit_core::db::open_db_in_memory;
use datakit_core::sql::query::{limit, order_by, where_cmp, where_eq};
use datakit_core::sql::{Cmp, Order};
use datakit_core::{
    scan_column, MappingError, MappingResult, Model, Params, SqlError, SqlTable,
};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct User {
    id: i64,
    email: String,
    first_name: String,
    active: bool,
    created_at: i64,
}

impl User {
    fn new(email: &str, first_name: &str) -> Self {
        Self {
            id: 0,
            email: email.to_string(),
            first_name: first_name.to_string(),
            active: true,
            created_at: 1_700_000_000_000,
        }
    }
}

impl Model for User {
    fn primary(&self) -> (&'static str, Value) {
        ("id", Value::Integer(self.id))
    }

    fn scan(&mut self, fields: &[String], row: &Row<'_>) -> MappingResult<()> {
        for (idx, field) in fields.iter().enumerate() {
            match field.as_str() {
                "id" => self.id = scan_column(row, idx, field)?,
                "email" => self.email = scan_column(row, idx, field)?,
                "first_name" => self.first_name = scan_column(row, idx, field)?,
                "active" => self.active = scan_column(row, idx, field)?,
                "created_at" => self.created_at = scan_column(row, idx, field)?,
                other => return Err(MappingError::UnknownColumn(other.to_string())),
            }
        }
        Ok(())
    }

    fn params(&self) -> Params {
        Params::from([
            ("email", Value::Text(self.email.clone())),
            ("first_name", Value::Text(self.first_name.clone())),
            ("active", Value::from(self.active)),
            ("created_at", Value::Integer(self.created_at)),
        ])
    }
}

fn users_db() -> Connection {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            first_name TEXT NOT NULL,
            active INTEGER NOT NULL,
            created_at INTEGER NOT NULL
        );",
    )
    .unwrap();
    conn
}

fn users(conn: &Connection) -> SqlTable<'_, User> {
    SqlTable::try_new(conn, "users", User::default).unwrap()
}

#[test]
fn create_scans_generated_key_back_into_model() {
    let conn = users_db();
    let table = users(&conn);

    let mut user = User::new("a@example.com", "Ada");
    let key = table.create(&mut user).unwrap();

    assert_eq!(key, Some(Value::Integer(1)));
    assert_eq!(user.id, 1);

    let mut second = User::new("b@example.com", "Bob");
    assert_eq!(table.create(&mut second).unwrap(), Some(Value::Integer(2)));
}

#[test]
fn get_by_param_returns_the_inserted_row() {
    let conn = users_db();
    let table = users(&conn);
    let mut user = User::new("a@example.com", "Ada");
    table.create(&mut user).unwrap();

    let loaded = table
        .get(&[where_eq("email", "a@example.com".to_string())])
        .unwrap()
        .unwrap();

    assert_eq!(loaded, user);
}

#[test]
fn get_without_match_is_none_not_error() {
    let conn = users_db();
    let table = users(&conn);

    let loaded = table.get(&[where_eq("id", 404)]).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn update_writes_every_param() {
    let conn = users_db();
    let table = users(&conn);
    let mut user = User::new("a@example.com", "Ada");
    table.create(&mut user).unwrap();

    user.first_name = "Augusta".to_string();
    user.active = false;
    table.update(&user).unwrap();

    let loaded = table.get(&[where_eq("id", user.id)]).unwrap().unwrap();
    assert_eq!(loaded.first_name, "Augusta");
    assert!(!loaded.active);
}

#[test]
fn update_and_delete_of_missing_row_report_not_found() {
    let conn = users_db();
    let table = users(&conn);
    let mut ghost = User::new("ghost@example.com", "Ghost");
    ghost.id = 77;

    assert!(matches!(
        table.update(&ghost),
        Err(SqlError::NotFound { ref key, .. }) if key == "77"
    ));
    assert!(matches!(
        table.delete(&ghost),
        Err(SqlError::NotFound { .. })
    ));
}

#[test]
fn delete_removes_the_row() {
    let conn = users_db();
    let table = users(&conn);
    let mut user = User::new("a@example.com", "Ada");
    table.create(&mut user).unwrap();

    table.delete(&user).unwrap();

    assert!(table.get(&[where_eq("id", user.id)]).unwrap().is_none());
    assert!(table.all(&[]).unwrap().is_empty());
}

#[test]
fn all_applies_predicates_ordering_and_limit() {
    let conn = users_db();
    let table = users(&conn);
    for (email, name) in [
        ("c@example.com", "Cy"),
        ("a@example.com", "Ada"),
        ("b@example.com", "Bob"),
    ] {
        table.create(&mut User::new(email, name)).unwrap();
    }

    let ordered = table.all(&[order_by("email", Order::Asc)]).unwrap();
    let emails: Vec<_> = ordered.iter().map(|user| user.email.as_str()).collect();
    assert_eq!(emails, vec!["a@example.com", "b@example.com", "c@example.com"]);

    let filtered = table
        .all(&[
            where_cmp("id", Cmp::Gt, 1),
            order_by("id", Order::Desc),
            limit(1),
        ])
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered.lookup(0).first_name, "Bob");
}

#[test]
fn select_binds_columns_by_name_in_any_order() {
    let conn = users_db();
    let table = users(&conn);
    let mut user = User::new("a@example.com", "Ada");
    table.create(&mut user).unwrap();

    let partial = table.select(&["email", "id"], &[]).unwrap();

    let loaded = partial.lookup(0);
    assert_eq!(loaded.id, user.id);
    assert_eq!(loaded.email, "a@example.com");
    assert_eq!(loaded.first_name, "");
}

#[test]
fn unknown_column_aborts_bulk_read() {
    let conn = users_db();
    conn.execute_batch("ALTER TABLE users ADD COLUMN nickname TEXT;")
        .unwrap();
    let table = users(&conn);
    table.create(&mut User::new("a@example.com", "Ada")).unwrap();

    let err = table.all(&[]).unwrap_err();
    assert!(matches!(
        err,
        SqlError::Mapping(MappingError::UnknownColumn(ref column)) if column == "nickname"
    ));
}

#[test]
fn mistyped_column_is_a_mapping_error() {
    let conn = users_db();
    conn.execute(
        "INSERT INTO users (email, first_name, active, created_at) VALUES ('x@example.com', 'X', 1, 'yesterday')",
        [],
    )
    .unwrap();
    let table = users(&conn);

    let err = table.all(&[]).unwrap_err();
    assert!(matches!(
        err,
        SqlError::Mapping(MappingError::Column { ref column, .. }) if column == "created_at"
    ));
}

#[test]
fn driver_errors_propagate_as_db_errors() {
    let conn = users_db();
    let table = users(&conn);
    table.create(&mut User::new("a@example.com", "Ada")).unwrap();

    let err = table
        .create(&mut User::new("a@example.com", "Again"))
        .unwrap_err();
    assert!(matches!(err, SqlError::Db(_)));
}

#[test]
fn invalid_table_name_is_rejected_up_front() {
    let conn = users_db();
    let result = SqlTable::<User>::try_new(&conn, "users;--", User::default);
    assert!(matches!(result, Err(SqlError::InvalidQuery(_))));
}
