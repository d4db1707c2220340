/*! Integration tests for fieldtree.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - accessor: Tests for custom accessors driving derivation and updates
 * - events: Tests for subscriptions, bubbling, and dispatch guarantees
 * - plugins: Tests for the plugin chain and capability composition
 * - propagation: Tests for bidirectional write propagation
 * - transient: Tests for transient buffering and flushing
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("fieldtree=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod accessor;
mod events;
mod helpers;
mod transient;
