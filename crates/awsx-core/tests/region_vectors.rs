//! Region resolve/expand/order vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use awsx_core::options::RunOptions;
use awsx_core::policy::PolicySet;
use awsx_core::region::{expand_set, order, resolve, StaticEnabledRegions};
use awsx_core::session::SessionFactory;

mod vector_loader;
use vector_loader::{load, ExpectedInstance};

#[test]
fn expansion_vectors() {
    let files = [
        "expand_queue_two_regions.yaml",
        "expand_global_first_region.yaml",
        "expand_global_all_only.yaml",
        "expand_all_intersects_enabled.yaml",
        "expand_unavailable_region_skipped.yaml",
        "expand_all_no_enabled_regions.yaml",
        "expand_stable_region_order.yaml",
        "expand_single_region_keeps_output.yaml",
        "expand_empty_set.yaml",
        "expand_repeated_region_once.yaml",
    ];

    for f in files {
        let v = load(f);
        let options = Arc::new(RunOptions {
            output_dir: v.output_dir.clone(),
            ..RunOptions::with_regions(v.regions.clone())
        });
        let set = PolicySet::new(f, v.policies.clone()).unwrap();
        let directory = StaticEnabledRegions(v.enabled.clone().unwrap_or_default());

        let res = resolve(&options, &set, &v.catalog, &directory, "awsx");

        if let Some(code) = v.expect_error {
            let e = res.expect_err("expected resolution error");
            assert_eq!(e.code().as_str(), code, "vector={}", v.description);
            continue;
        }

        let resolved = res.expect("expected resolution");
        let session = SessionFactory::from_options(&options).into_handle();
        let got: Vec<ExpectedInstance> = order(expand_set(&set, &resolved, &options, &session))
            .iter()
            .map(|i| ExpectedInstance {
                policy: i.name().to_owned(),
                region: i.region().to_owned(),
                output_dir: i.options.output_dir().map(str::to_owned),
            })
            .collect();

        assert_eq!(got, v.expect.expect("missing expect block"), "vector={}", v.description);
    }
}
