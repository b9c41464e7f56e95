fn main() {
	env_logger::init();

	let mut opts;

	/* Parse console input */
	let parsed_options = {
		let args: Vec<String> = std::env::args().collect();

		opts = getopts::Options::new();
		opts.optflag( "h", "help",         "Show help");
		opts.optflag( "v", "verbose",      "Print every input even when nothing resolved");
		opts.optopt(  "",  "max-attempts", "Give up after N levels of search, 0 for no limit", "N");
		opts.optopt(  "",  "timeout-ms",   "Give up after N milliseconds, 0 for no limit", "N");
		opts.parsing_style(getopts::ParsingStyle::FloatingFrees);

		let parsed_options = match opts.parse(&args[1..]) {
			Ok(m)  => { m }
			Err(e) => { println!("Unable to parse options: {}", e); return }
		};

		if parsed_options.opt_present("h") {
			eprintln!("{}", opts.usage("Usage: vresolve-rs-terminal [options] SCENARIO"));
			return;
		}

		parsed_options
	};

	let options = match resolver_options(&parsed_options) {
		Ok(o) => o,
		Err(e) => { log::error!("Invalid options: {}", e); return },
	};

	let Some(path) = parsed_options.free.first() else {
		log::error!("Scenario path not provided.");
		eprintln!("{}", opts.usage("Usage: vresolve-rs-terminal [options] SCENARIO"));
		return;
	};

	match resolve_scenario(path, &options, parsed_options.opt_present("v")) {
		Ok(_) => {},
		Err(e) => log::error!("Failed to resolve scenario: {}", e),
	}
}

/// Environment first, then any flags given.
fn resolver_options(parsed_options: &getopts::Matches) -> Result<vresolve_rs::ResolverOptions, Error> {
	let mut options = vresolve_rs::ResolverOptions::from_env()?;

	if let Some(n) = parsed_options.opt_str("max-attempts") {
		let n = n.parse::<u64>().map_err(|_| Error::InvalidArgument("max-attempts", n))?;
		options.set_max_attempts(if n == 0 { None } else { Some(n) });
	}

	if let Some(n) = parsed_options.opt_str("timeout-ms") {
		let n = n.parse::<u64>().map_err(|_| Error::InvalidArgument("timeout-ms", n))?;
		options.set_timeout(if n == 0 { None } else { Some(std::time::Duration::from_millis(n)) });
	}

	Ok(options)
}

fn resolve_scenario(path: impl AsRef<std::path::Path>, options: &vresolve_rs::ResolverOptions, verbose: bool) -> Result<(), Error> {
	let scenario = vresolve_rs::Scenario::load(path)?;
	log::debug!("Loaded scenario with {} inputs, {} versions and {} build outputs",
		scenario.inputs.0.len(),
		scenario.db.resource_versions.len(),
		scenario.db.build_outputs.len(),
	);

	match scenario.resolve(options)? {
		Some(mapping) => {
			println!("Resolved inputs:");
			for (name, version) in &mapping {
				if version.first_occurrence {
					println!("\t{}: {} (first occurrence)", name, version.version_id);
				} else {
					println!("\t{}: {}", name, version.version_id);
				}
			}
		},
		None => {
			println!("Inputs not resolvable yet.");
			if verbose {
				for config in &scenario.inputs.0 {
					println!("\t{}: resource {} passed {:?} pinned {:?}", config.name, config.resource_id, config.passed, config.pinned_version_id);
				}
			}
		},
	}

	Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("vresolve-rs error: {0}")]
	VresolveRs(#[from] vresolve_rs::Error),
	#[error("invalid value for {0}: {1}")]
	InvalidArgument(&'static str, String),
}
