//! Compares the resolver with trying every combination on small random histories.

use proptest::prelude::*;
use vresolve_rs::ResolverOptions;
use vresolve_rs_test_utils::*;

proptest! {
	#![proptest_config(ProptestConfig::with_cases(512))]

	#[test]
	fn resolver_agrees_with_brute_force(scenario in arb_scenario()) {
		let candidates = scenario.inputs.candidates(&scenario.db).expect("generated scenarios are valid");

		let Some(candidates) = candidates else {
			/* Some input has no version through its passed jobs, so no combination exists either */
			prop_assert!(scenario.inputs.0.iter().any(|c| !c.passed.is_empty()));
			return Ok(());
		};

		let expected = brute_force(&candidates);
		let resolved = candidates.resolve(&ResolverOptions::unbounded());
		prop_assert_eq!(expected.is_some(), resolved.is_some(), "brute force {:?}, resolver {:?} for {}", expected, resolved, candidates);

		if let Some(resolved) = resolved {
			for input in candidates.inputs() {
				if let Some(pin) = input.pinned_version_id() {
					prop_assert_eq!(resolved[input.input()], pin);
				}
			}

			let mapping = scenario.resolve(&ResolverOptions::unbounded()).expect("generated scenarios are valid");
			let mapping = mapping.expect("resolving the scenario agrees with resolving its candidates");
			prop_assert!(passed_constraints_hold(&scenario, &mapping), "passed constraints broken by {:?}", mapping);
		}
	}

	#[test]
	fn pruning_is_a_fixed_point(scenario in arb_scenario()) {
		if let Some(candidates) = scenario.inputs.candidates(&scenario.db).expect("generated scenarios are valid") {
			let jobs = candidates.jobs();
			let once = candidates.prune_to_common_builds(&jobs);
			let twice = once.prune_to_common_builds(&jobs);
			for (a, b) in once.inputs().iter().zip(twice.inputs()) {
				prop_assert_eq!(a.candidates(), b.candidates());
			}
		}
	}
}
