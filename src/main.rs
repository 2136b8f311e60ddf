//! Browser entry point; mounts the report into `<body>`.

// The library target uses the rest of the dependency set.
#![allow(unused_crate_dependencies)]

use career_network_explorer::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App)
}
