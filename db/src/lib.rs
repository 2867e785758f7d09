#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;
#[macro_use]
extern crate log;

use std::env;
use std::fs;
use std::path::Path;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use r2d2::Error;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type Connection = PooledConnection<ConnectionManager<SqliteConnection>>;
pub mod models;
pub mod schema;

embed_migrations!();

const DEFAULT_DATABASE_URL: &str = "data/game.db";

#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn get_conn(pool: &DbPool) -> Result<Connection, Error> {
    pool.get().map_err(|err| {
        error!("Failed to get connection - {}", err.to_string());
        err
    })
}

pub fn database_url() -> String {
    env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

pub fn new_pool() -> Result<DbPool, errors::Error> {
    new_pool_with_url(&database_url())
}

pub fn new_pool_with_url(database_url: &str) -> Result<DbPool, errors::Error> {
    if let Some(parent) = Path::new(database_url).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|err| {
                errors::Error::InternalServerError(format!(
                    "Could not create database directory - {}",
                    err
                ))
            })?;
        }
    }

    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)?;

    Ok(pool)
}

pub fn run_migrations(conn: &SqliteConnection) -> Result<(), errors::Error> {
    embedded_migrations::run(conn).map_err(|err| {
        error!("Failed to run migrations - {}", err);
        errors::Error::InternalServerError(err.to_string())
    })
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use std::ops::Deref;

    use tempfile::TempDir;

    use super::{get_conn, new_pool_with_url, run_migrations, Connection};

    /// A migrated connection to a throwaway database. The file goes away with it.
    pub struct TestConn {
        conn: Connection,
        _dir: TempDir,
    }

    impl Deref for TestConn {
        type Target = Connection;

        fn deref(&self) -> &Connection {
            &self.conn
        }
    }

    pub fn test_conn() -> TestConn {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("game.db");
        let pool = new_pool_with_url(path.to_str().unwrap()).unwrap();
        let conn = get_conn(&pool).unwrap();
        run_migrations(&conn).unwrap();
        TestConn { conn, _dir: dir }
    }
}
