use std::net::Ipv4Addr;

use tracing::info;

use tasknest::{auth, create_app, db, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("TASKNEST_PORT")
        .expect("TASKNEST_PORT to be set")
        .parse()
        .expect("port number");

    let db_path = std::env::var("TASKNEST_DB").unwrap_or_else(|_| "tasks.db".to_string());

    let db = db::init_db(&db_path).expect("initializing database");
    let _ = db::cleanup_expired_sessions(&db);

    // Identity creation is out-of-band; the seed variable is the only way
    // this binary mints a user.
    if let Ok(seed) = std::env::var("TASKNEST_SEED_USER") {
        seed_user(&db, &seed);
    }

    let state = AppState { db };
    let app = create_app(state);
    let addr = (Ipv4Addr::UNSPECIFIED, port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to port");

    info!("running on {addr:?}");

    axum::serve(listener, app).await.expect("failed serving");
}

/// `TASKNEST_SEED_USER=email:password`; skipped if the email already exists.
fn seed_user(db: &db::DbPool, seed: &str) {
    let Some((email, password)) = seed.split_once(':') else {
        panic!("TASKNEST_SEED_USER must look like email:password");
    };

    match db::get_user_by_email(db, email) {
        Ok(Some(_)) => {}
        Ok(None) => {
            let name = email.split('@').next().unwrap_or(email);
            let hash = auth::hash_password(password);
            db::create_user(db, email, name, &hash).expect("seeding user");
            info!(email, "Seeded user");
        }
        Err(e) => panic!("looking up seed user: {e:?}"),
    }
}
