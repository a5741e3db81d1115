use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default number of posts per listing page.
const DEFAULT_PAGE_SIZE: i64 = 10;
/// Default lifetime of a cached home listing.
const DEFAULT_HOME_CACHE_TTL_SECS: u64 = 20;

#[derive(Clone)]
pub struct Settings {
    pub port: u16,
    pub addr: SocketAddr,
    pub database_url: String,
    pub jwt_secret: String,
    pub page_size: i64,
    pub home_cache_ttl: Duration,
    pub media_root: PathBuf,
}

impl Settings {
    pub fn new() -> Self {
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let page_size = env::var("PAGE_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let home_cache_ttl = Duration::from_secs(
            env::var("HOME_CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_HOME_CACHE_TTL_SECS),
        );

        let media_root =
            PathBuf::from(env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string()));

        Self {
            port,
            addr,
            database_url,
            jwt_secret,
            page_size,
            home_cache_ttl,
            media_root,
        }
    }
}
