mod support;

use checkout_core::entities::{ServerClass, ServerId};
use checkout_core::generator::{CustomerGenerator, GeneratorConfig};
use checkout_core::registry::Registry;
use checkout_core::runner::run_replica;
use checkout_core::test_helpers::{run_to_completion, test_customer, TEST_SEED};
use support::reference_params;

#[test]
fn express_counter_never_takes_oversized_baskets() {
    let mut registry = Registry::new(CustomerGenerator::from_seed(
        TEST_SEED,
        GeneratorConfig::default(),
    ));
    let standard = registry.add_server(ServerClass::Standard, 0.05, None);
    let express = registry.add_server(ServerClass::Express, 0.03, Some(10));

    let mut to_express = 0;
    for _ in 0..10_000 {
        let customer = registry.generator_mut().next_customer(None);
        let items = customer.item_count;
        let target = registry.select_best(items).expect("standard counter accepts all");
        if items > 10 {
            assert_eq!(target, standard);
        }
        if target == express {
            assert!(items <= 10, "express took {items} items");
            to_express += 1;
        }
        let server = registry.server_mut(target).expect("server");
        server.enqueue(customer);
        // Keep the queues short so both counters stay competitive.
        if server.queue_len() > 3 {
            if let Some(id) = server.head().map(|c| c.id) {
                server.begin_service(0.0);
                server.complete(id, 0.0);
            }
        }
    }
    assert!(to_express > 0);
}

#[test]
fn express_counter_records_only_small_baskets_in_full_runs() {
    // Counter index 3 is express under the default layout.
    let params = reference_params().with_arrival_rate(4.0);
    let layout = params.server_layout(4);
    assert_eq!(layout[3].class, ServerClass::Express);

    let (world, metrics) = run_to_completion(&layout, &params, 4_000, 1_000_000);
    let telemetry = world.resource::<checkout_core::telemetry::ReplicaTelemetry>();
    let on_express: Vec<_> = telemetry
        .completed
        .iter()
        .filter(|r| r.server == ServerId(4))
        .collect();
    assert!(!on_express.is_empty());
    assert!(on_express.iter().all(|r| r.item_count <= 10));
    assert_eq!(metrics.abandoned, 0);
}

#[test]
fn arrivals_join_the_least_loaded_counter() {
    let mut registry = checkout_core::test_helpers::standard_registry(3);
    // 10 items at 0.05 plus 0.5 overhead: one minute of work.
    registry
        .server_mut(ServerId(1))
        .expect("server")
        .enqueue(test_customer(1, 10, 0.5, 0.0));
    registry
        .server_mut(ServerId(2))
        .expect("server")
        .enqueue(test_customer(2, 2, 0.1, 0.0));
    registry
        .server_mut(ServerId(3))
        .expect("server")
        .enqueue(test_customer(3, 20, 0.5, 0.0));
    assert_eq!(registry.select_best(5), Some(ServerId(2)));
}

#[test]
fn express_only_layout_abandons_large_baskets() {
    use checkout_core::scenario::ServerSpec;
    let params = reference_params();
    let metrics = run_replica(&[ServerSpec::express(0.03, 10)], &params, 12);
    assert!(metrics.abandoned > 0);
    assert!(metrics.arrivals > metrics.abandoned);
    support::assert_conserved(&metrics);
}
