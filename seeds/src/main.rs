#[macro_use]
extern crate log;

use dotenv::dotenv;

use db::{get_conn, models::Player, new_pool, run_migrations};
use errors::Error;

/// (name, team, admin)
const ROSTER: &[(&str, i32, bool)] = &[
    ("David", 1, false),
    ("Rosanne", 2, false),
    ("Elaine", 3, false),
    ("Katherine", 2, false),
    ("Vicky", 3, false),
    ("Emily", 1, false),
    ("Adam", 2, true),
    ("Alex", 3, false),
    ("Neal", 1, false),
    ("Ben", 2, false),
    ("Lizzy", 1, true),
    ("Jemima", 3, false),
    ("Olivia", 3, false),
];

fn main() -> Result<(), Error> {
    dotenv().ok();
    env_logger::init();

    let pool = new_pool()?;
    let conn = get_conn(&pool)?;
    run_migrations(&conn)?;

    if Player::count(&conn)? > 0 {
        info!("Players already exist, skipping seed");
        return Ok(());
    }

    for (name, team, is_admin) in ROSTER {
        Player::create(&conn, name, *team, *is_admin)?;
    }
    info!("Seeded {} players", ROSTER.len());

    Ok(())
}
