//! End-to-end execution against an in-memory SQLite database.

use sqlfluent::{
    Chain, ConditionGroup, Database, DbConfig, DbError, Join, SortDir, StatementKind, Value,
    values,
};

fn setup() -> Database {
    let db = Database::open(&DbConfig::memory().table_prefix("app_")).unwrap();
    db.run_sql(
        "CREATE TABLE #__users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            age INTEGER,
            city TEXT,
            \"group\" TEXT
        )",
    )
    .unwrap();
    db.run_sql("CREATE TABLE #__roles (user_id INTEGER, role TEXT)")
        .unwrap();
    db
}

fn seed(db: &Database) {
    let mut stmt = db.statement();
    stmt.multiple_insert([
        values! { "name" => "ada", "age" => 36, "city" => "London", "group" => "admins" },
        values! { "name" => "alan", "age" => 41, "city" => "NY", "group" => "staff" },
        values! { "name" => "grace", "age" => 17, "city" => "NY", "group" => "staff" },
    ])
    .insert_into("#__users")
    .unwrap();
    db.execute(&mut stmt).unwrap();
}

fn names(stmt: &sqlfluent::StatementBuilder) -> Vec<String> {
    stmt.results()
        .unwrap_or_default()
        .iter()
        .filter_map(|row| row.get("name").and_then(Value::as_str).map(String::from))
        .collect()
}

#[test]
fn insert_records_last_insert_id() {
    let db = setup();
    let mut stmt = db.statement();
    stmt.insert(values! { "name" => "ada", "age" => 36 })
        .insert_into("#__users")
        .unwrap();
    db.execute(&mut stmt).unwrap();

    assert_eq!(stmt.kind(), StatementKind::Insert);
    assert_eq!(stmt.last_insert_id(), Some(1));
    assert!(stmt.result().is_none());
}

#[test]
fn select_with_conditions_and_limit() {
    let db = setup();
    seed(&db);

    let mut adults_in_ny = ConditionGroup::new();
    adults_in_ny.gt("age", 18).eq("city", "NY");

    let mut stmt = db.statement();
    stmt.select(["id", "name"])
        .from("#__users")
        .unwrap()
        .add_condition(&adults_in_ny, Chain::And)
        .unwrap()
        .limit(10)
        .unwrap();
    db.execute(&mut stmt).unwrap();

    assert_eq!(names(&stmt), vec!["alan"]);
    let row = stmt.result().unwrap();
    assert_eq!(row.columns(), ["id", "name"]);
    assert_eq!(row.get("id"), Some(&Value::Int(2)));
}

#[test]
fn or_chained_groups_and_ordering() {
    let db = setup();
    seed(&db);

    let mut young = ConditionGroup::new();
    young.lt("age", 18);
    let mut london = ConditionGroup::new();
    london.eq("city", "London");

    let mut stmt = db.statement();
    stmt.select(["name"])
        .from("#__users")
        .unwrap()
        .add_condition(&young, Chain::And)
        .unwrap()
        .add_condition(&london, Chain::Or)
        .unwrap()
        .order_by("name", SortDir::Desc)
        .unwrap();
    db.execute(&mut stmt).unwrap();

    assert_eq!(names(&stmt), vec!["grace", "ada"]);
}

#[test]
fn in_lists_and_raw_conditions() {
    let db = setup();
    seed(&db);

    let mut group = ConditionGroup::new();
    group
        .in_list("name", vec!["ada", "alan", "nobody"])
        .and_raw("age BETWEEN :lo AND :hi", values! { "lo" => 30, "hi" => 40 });

    let mut stmt = db.statement();
    stmt.select(["name"])
        .from("#__users")
        .unwrap()
        .add_condition(&group, Chain::And)
        .unwrap();
    db.execute(&mut stmt).unwrap();
    assert_eq!(names(&stmt), vec!["ada"]);

    let mut nobody = ConditionGroup::new();
    nobody.in_list("id", Vec::<i64>::new());
    stmt.new_query()
        .select(["name"])
        .from("#__users")
        .unwrap()
        .add_condition(&nobody, Chain::And)
        .unwrap();
    db.execute(&mut stmt).unwrap();
    assert!(stmt.results().is_none());
}

#[test]
fn reserved_column_round_trip() {
    let db = setup();
    seed(&db);

    let mut admins = ConditionGroup::new();
    admins.eq("group", "admins");

    let mut stmt = db.statement();
    stmt.select(["name"])
        .from("#__users")
        .unwrap()
        .add_condition(&admins, Chain::And)
        .unwrap();
    db.execute(&mut stmt).unwrap();
    assert_eq!(names(&stmt), vec!["ada"]);
}

#[test]
fn update_and_delete() {
    let db = setup();
    seed(&db);

    let mut alan = ConditionGroup::new();
    alan.eq("name", "alan");

    let mut stmt = db.statement();
    stmt.update("#__users")
        .set("city", "Manchester")
        .unwrap()
        .set("age", 42)
        .unwrap()
        .add_condition(&alan, Chain::And)
        .unwrap();
    db.execute(&mut stmt).unwrap();
    assert!(stmt.results().is_none());
    assert_eq!(stmt.last_insert_id(), None);

    let rows = db
        .run_sql("SELECT city, age FROM #__users WHERE name = 'alan'")
        .unwrap();
    assert_eq!(rows[0].get("city"), Some(&Value::Text("Manchester".into())));
    assert_eq!(rows[0].get("age"), Some(&Value::Int(42)));

    let mut minors = ConditionGroup::new();
    minors.lt("age", 18);
    stmt.new_query().delete(&minors).from("#__users").unwrap();
    db.execute(&mut stmt).unwrap();

    let rows = db.run_sql("SELECT COUNT(*) AS n FROM #__users").unwrap();
    assert_eq!(rows[0].get("n"), Some(&Value::Int(2)));
}

#[test]
fn update_non_ascii_columns() {
    let db = setup();
    db.run_sql("CREATE TABLE #__people (名前 TEXT, 年齢 INTEGER)")
        .unwrap();
    db.run_sql("INSERT INTO #__people (名前, 年齢) VALUES ('a', 1)")
        .unwrap();

    let mut stmt = db.statement();
    stmt.update("#__people")
        .set("名前", "b")
        .unwrap()
        .set("年齢", 2)
        .unwrap();
    db.execute(&mut stmt).unwrap();

    let rows = db.run_sql("SELECT 名前, 年齢 FROM #__people").unwrap();
    assert_eq!(rows[0].get("名前"), Some(&Value::Text("b".into())));
    assert_eq!(rows[0].get("年齢"), Some(&Value::Int(2)));
}

#[test]
fn joins_resolve_prefixed_tables() {
    let db = setup();
    seed(&db);
    db.run_sql("INSERT INTO #__roles (user_id, role) VALUES (1, 'owner')")
        .unwrap();

    let mut stmt = db.statement();
    stmt.select([("u.name", "name"), ("r.role", "role")])
        .from_as("#__users", "u")
        .unwrap()
        .join(Join::inner("#__roles", "r.user_id = u.id").alias("r"))
        .unwrap();
    db.execute(&mut stmt).unwrap();

    let row = stmt.result().unwrap();
    assert_eq!(row.get("name"), Some(&Value::Text("ada".into())));
    assert_eq!(row.get("role"), Some(&Value::Text("owner".into())));
    assert_eq!(stmt.results().map(|rows| rows.len()), Some(1));
}

#[test]
fn rows_serialize_in_column_order() {
    let db = setup();
    seed(&db);

    let rows = db
        .run_sql("SELECT name, age FROM #__users ORDER BY id LIMIT 1")
        .unwrap();
    assert_eq!(
        serde_json::to_string(&rows[0]).unwrap(),
        r#"{"name":"ada","age":36}"#
    );
}

#[test]
fn backend_rejects_malformed_statement() {
    let db = setup();
    let mut stmt = db.statement();
    stmt.select(["name"]).from("#__missing").unwrap();

    let err = db.execute(&mut stmt).unwrap_err();
    assert!(err.is_backend(), "unexpected error: {err}");
    assert!(stmt.results().is_none());
}

#[test]
fn constraint_violation_is_backend_error() {
    let db = setup();
    let mut stmt = db.statement();
    stmt.insert(values! { "age" => 1 }).insert_into("#__users").unwrap();
    assert!(db.execute(&mut stmt).unwrap_err().is_backend());
}

#[test]
fn execute_without_kind_fails() {
    let db = setup();
    let mut stmt = db.statement();
    let err = db.execute(&mut stmt).unwrap_err();
    assert!(matches!(err, DbError::State { .. }));
}

#[test]
fn missing_database_is_configuration_error() {
    let err = Database::open(&DbConfig::new("")).unwrap_err();
    assert!(err.is_configuration());

    let err = DbConfig::from_lookup(|_| None).unwrap_err();
    assert!(err.is_configuration());
}
