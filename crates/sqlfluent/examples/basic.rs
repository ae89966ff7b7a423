//! Basic usage example for sqlfluent
//!
//! Run with: cargo run --example basic -p sqlfluent
//!
//! Optionally set in a .env file or the environment:
//! SQLFLUENT_DATABASE=demo.db
//! SQLFLUENT_TABLE_PREFIX=demo_
//! RUST_LOG=sqlfluent.sql=debug

use sqlfluent::{Chain, ConditionGroup, Database, DbConfig, DbError, Join, SortDir, values};

fn main() -> Result<(), DbError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sqlfluent.sql=debug".into()),
        )
        .init();

    // Fall back to a throwaway in-memory database
    let config = DbConfig::from_env().unwrap_or_else(|_| DbConfig::memory().table_prefix("demo_"));
    let db = Database::open(&config)?;

    db.run_sql(
        "CREATE TABLE IF NOT EXISTS #__users (
            id INTEGER PRIMARY KEY,
            username TEXT NOT NULL,
            age INTEGER,
            city TEXT
        )",
    )?;
    db.run_sql("CREATE TABLE IF NOT EXISTS #__roles (user_id INTEGER, role TEXT)")?;

    // INSERT
    let mut stmt = db.statement();
    stmt.multiple_insert([
        values! { "username" => "alice", "age" => 31, "city" => "NY" },
        values! { "username" => "bob", "age" => 17, "city" => "NY" },
        values! { "username" => "carol", "age" => 45, "city" => "Paris" },
    ])
    .insert_into("#__users")?;
    println!("{}", stmt.dump()?);
    db.execute(&mut stmt)?;
    println!("last insert id: {:?}", stmt.last_insert_id());

    let alice_id = db
        .run_sql("SELECT id FROM #__users WHERE username = 'alice'")?
        .first()
        .and_then(|row| row.get("id"))
        .and_then(|id| id.as_i64())
        .unwrap_or(1);
    stmt.new_query()
        .insert(values! { "user_id" => alice_id, "role" => "admin" })
        .insert_into("#__roles")?;
    db.execute(&mut stmt)?;

    // SELECT with two condition groups
    let mut adults_in_ny = ConditionGroup::new();
    adults_in_ny.gte("age", 18).eq("city", "NY");
    let mut parisians = ConditionGroup::new();
    parisians.eq("city", "Paris");

    stmt.new_query()
        .select(["u.id", "u.username"])
        .select([("COALESCE(r.role, 'member')", "role")])
        .from_as("#__users", "u")?
        .join(Join::left("#__roles", "r.user_id = u.id").alias("r"))?
        .add_condition(&adults_in_ny, Chain::And)?
        .add_condition(&parisians, Chain::Or)?
        .order_by("u.username", SortDir::Asc)?
        .limit(10)?;
    println!("{}", stmt.dump()?);
    println!("bound: {:?}", stmt.bound_values());
    db.execute(&mut stmt)?;

    for row in stmt.results().unwrap_or_default() {
        println!("{}", row.to_json());
    }

    // UPDATE
    let mut bob = ConditionGroup::new();
    bob.eq("username", "bob");
    stmt.new_query()
        .update("#__users")
        .set("age", 18)?
        .add_condition(&bob, Chain::And)?;
    db.execute(&mut stmt)?;

    // DELETE
    let mut gone = ConditionGroup::new();
    gone.in_list("username", vec!["carol"]);
    stmt.new_query().delete(&gone).from("#__users")?;
    db.execute(&mut stmt)?;

    let remaining = db.run_sql("SELECT COUNT(*) AS n FROM #__users")?;
    println!("remaining users: {}", remaining[0].to_json());

    Ok(())
}
