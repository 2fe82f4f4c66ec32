//! Startup banner

use super::constants::APP_NAME;

pub fn print_banner(host: &str, port: u16, datastore_url: &str) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("  {} v{}", APP_NAME, version);
    println!("  Listening on http://{}:{}", host, port);
    println!("  Datastore: {}", datastore_url);
    println!();
}
