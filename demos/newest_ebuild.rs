//! Print the newest ebuild of each package named on the command line
//!
//! Trees come from make.conf and the `PORTDIR` / `PORTDIR_OVERLAY`
//! environment variables. Set `RUST_LOG=debug` to see how each lookup is
//! resolved.

use portage_tree::{Config, Error, TreeResolver, VersionRecord};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::load().expect("Failed to load configuration");
    let resolver = TreeResolver::new(&config).expect("Failed to open trees");

    println!("Primary tree: {}", resolver.primary().root().display());
    for overlay in resolver.overlays() {
        println!("Overlay:      {}", overlay.root().display());
    }
    println!();

    for name in std::env::args().skip(1) {
        match resolver.newest_ebuild_path(&name, true) {
            Ok(path) => {
                let record = VersionRecord::parse(&path).expect("Failed to parse ebuild name");
                println!("{}: {} ({})", name, record, path.display());
            }
            Err(Error::AmbiguousPackage { candidates, .. }) => {
                println!("{}: ambiguous, did you mean one of:", name);
                for candidate in candidates {
                    println!("   - {}", candidate);
                }
            }
            Err(e) => println!("{}: {}", name, e),
        }
    }
}
