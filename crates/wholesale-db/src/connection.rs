//! Opening the mirror database.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;
use crate::mirror::SurrealMirror;
use crate::schema::run_migrations;

/// Where the mirror lives. The password never appears in `Debug` output.
#[derive(Clone)]
pub struct DbConfig {
    /// `host:port` of the SurrealDB websocket endpoint.
    pub endpoint: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            endpoint: "127.0.0.1:8000".into(),
            namespace: "wholesale".into(),
            database: "mirror".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DbConfig {{ endpoint: {:?}, namespace: {:?}, database: {:?}, username: {:?}, password: <redacted> }}",
            self.endpoint, self.namespace, self.database, self.username
        )
    }
}

/// Connect to the mirror, bring its schema up to date and hand back the
/// repositories over it. Called once at startup.
pub async fn open_mirror(config: &DbConfig) -> Result<SurrealMirror<Client>, DbError> {
    let db = Surreal::new::<Ws>(config.endpoint.as_str()).await?;
    db.signin(Root {
        username: config.username.clone(),
        password: config.password.clone(),
    })
    .await?;
    db.use_ns(config.namespace.as_str())
        .use_db(config.database.as_str())
        .await?;
    run_migrations(&db).await?;

    info!(
        endpoint = %config.endpoint,
        namespace = %config.namespace,
        database = %config.database,
        "Mirror database ready"
    );
    Ok(SurrealMirror::new(db))
}
