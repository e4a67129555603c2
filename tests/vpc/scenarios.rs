//! BDD scenarios for declaring a VPC component.

use rstest_bdd_macros::scenario;

use super::test_helpers::{VpcContext, vpc_context};

#[scenario(
    path = "tests/features/vpc.feature",
    name = "Declare a VPC with default settings"
)]
fn scenario_default_settings(vpc_context: VpcContext) {
    drop(vpc_context);
}

#[scenario(
    path = "tests/features/vpc.feature",
    name = "Override the instance tenancy"
)]
fn scenario_tenancy_override(vpc_context: VpcContext) {
    drop(vpc_context);
}

#[scenario(
    path = "tests/features/vpc.feature",
    name = "Disable DNS hostnames explicitly"
)]
fn scenario_dns_hostnames_disabled(vpc_context: VpcContext) {
    drop(vpc_context);
}

#[scenario(
    path = "tests/features/vpc.feature",
    name = "Reject an empty address block"
)]
fn scenario_empty_cidr_block(vpc_context: VpcContext) {
    drop(vpc_context);
}

#[scenario(path = "tests/features/vpc.feature", name = "Reject absent arguments")]
fn scenario_absent_arguments(vpc_context: VpcContext) {
    drop(vpc_context);
}

#[scenario(
    path = "tests/features/vpc.feature",
    name = "Surface provider registration failures"
)]
fn scenario_provider_failure(vpc_context: VpcContext) {
    drop(vpc_context);
}

#[scenario(
    path = "tests/features/vpc.feature",
    name = "Mirror provider outputs after apply"
)]
fn scenario_outputs_mirrored(vpc_context: VpcContext) {
    drop(vpc_context);
}
