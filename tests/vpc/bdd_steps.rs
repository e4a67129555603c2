//! BDD step definitions for declaring a VPC component.

use paws::test_support::{FailurePoint, VpcCall, sample_attributes};
use paws::{ResourceOptions, Vpc, VpcArgs};
use rstest_bdd_macros::{given, then, when};
use tokio::runtime::Runtime;

use super::test_helpers::{VpcContext, VpcOutcome};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
    #[error("failed to start runtime: {0}")]
    Runtime(String),
}

fn args_mut(vpc_context: &mut VpcContext) -> Result<&mut VpcArgs, StepError> {
    vpc_context
        .args
        .as_mut()
        .ok_or_else(|| StepError::Assertion(String::from("no VPC arguments were given")))
}

fn declared(vpc_context: &VpcContext) -> Result<&Vpc, StepError> {
    match &vpc_context.outcome {
        Some(VpcOutcome::Declared(vpc)) => Ok(vpc.as_ref()),
        Some(other) => Err(StepError::Assertion(format!(
            "expected a declared VPC, got {other:?}"
        ))),
        None => Err(StepError::Assertion(String::from("missing outcome"))),
    }
}

fn only_provider_call(vpc_context: &VpcContext) -> Result<VpcCall, StepError> {
    let mut calls = vpc_context.engine.vpcs();
    if calls.len() != 1 {
        return Err(StepError::Assertion(format!(
            "expected one provider VPC registration, got {}",
            calls.len()
        )));
    }
    calls
        .pop()
        .ok_or_else(|| StepError::Assertion(String::from("missing provider VPC registration")))
}

#[given("VPC arguments with address block \"{cidr_block}\"")]
fn args_with_cidr(mut vpc_context: VpcContext, cidr_block: String) -> VpcContext {
    vpc_context.args = Some(VpcArgs::builder(cidr_block).build());
    vpc_context
}

#[given("VPC arguments with an empty address block")]
fn args_with_empty_cidr(mut vpc_context: VpcContext) -> VpcContext {
    vpc_context.args = Some(VpcArgs::default());
    vpc_context
}

#[given("no VPC arguments")]
fn no_args(mut vpc_context: VpcContext) -> VpcContext {
    vpc_context.args = None;
    vpc_context
}

#[given("the tag \"{key}\" set to \"{value}\"")]
fn with_tag(
    mut vpc_context: VpcContext,
    key: String,
    value: String,
) -> Result<VpcContext, StepError> {
    args_mut(&mut vpc_context)?.tags.insert(key, value);
    Ok(vpc_context)
}

#[given("the instance tenancy \"{tenancy}\"")]
fn with_tenancy(mut vpc_context: VpcContext, tenancy: String) -> Result<VpcContext, StepError> {
    args_mut(&mut vpc_context)?.instance_tenancy = Some(tenancy);
    Ok(vpc_context)
}

#[given("DNS hostnames set to \"{enabled}\"")]
fn with_dns_hostnames(
    mut vpc_context: VpcContext,
    enabled: bool,
) -> Result<VpcContext, StepError> {
    args_mut(&mut vpc_context)?.enable_dns_hostnames = Some(enabled);
    Ok(vpc_context)
}

#[given("the engine rejects the provider VPC")]
fn engine_rejects_provider(vpc_context: VpcContext) -> VpcContext {
    vpc_context.engine.fail_at(FailurePoint::Vpc);
    vpc_context
}

#[when("I declare the VPC \"{name}\"")]
fn declare_vpc(mut vpc_context: VpcContext, name: String) -> Result<VpcContext, StepError> {
    let runtime = Runtime::new().map_err(|err| StepError::Runtime(err.to_string()))?;
    let engine = vpc_context.engine.clone();
    let args = vpc_context.args.clone();
    let result = runtime.block_on(async move {
        Vpc::new(&engine, &name, args.as_ref(), &ResourceOptions::new()).await
    });
    vpc_context.outcome = Some(VpcOutcome::from_result(result));
    Ok(vpc_context)
}

#[when("the engine applies the provider VPC")]
fn engine_applies(vpc_context: VpcContext) -> Result<VpcContext, StepError> {
    let cidr_block = vpc_context
        .args
        .as_ref()
        .map(|args| args.cidr_block.clone())
        .unwrap_or_default();
    vpc_context
        .engine
        .resolve_all(&sample_attributes(&cidr_block));
    Ok(vpc_context)
}

#[then("the declaration succeeds")]
fn declaration_succeeds(vpc_context: &VpcContext) -> Result<(), StepError> {
    declared(vpc_context).map(|_| ())
}

#[then("the provider VPC uses address block \"{cidr_block}\"")]
fn provider_cidr(vpc_context: &VpcContext, cidr_block: String) -> Result<(), StepError> {
    let call = only_provider_call(vpc_context)?;
    if call.args.cidr_block == cidr_block {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected address block '{cidr_block}', got '{}'",
            call.args.cidr_block
        )))
    }
}

#[then("the provider VPC has DNS hostnames \"{hostnames}\" and DNS support \"{support}\"")]
fn provider_dns(
    vpc_context: &VpcContext,
    hostnames: bool,
    support: bool,
) -> Result<(), StepError> {
    let call = only_provider_call(vpc_context)?;
    let actual = (call.args.enable_dns_hostnames, call.args.enable_dns_support);
    if actual == (hostnames, support) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected DNS flags ({hostnames}, {support}), got {actual:?}"
        )))
    }
}

#[then("the provider VPC uses tenancy \"{tenancy}\"")]
fn provider_tenancy(vpc_context: &VpcContext, tenancy: String) -> Result<(), StepError> {
    let call = only_provider_call(vpc_context)?;
    if call.args.instance_tenancy == tenancy {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected tenancy '{tenancy}', got '{}'",
            call.args.instance_tenancy
        )))
    }
}

#[then("the provider VPC tags equal the requested tags")]
fn provider_tags(vpc_context: &VpcContext) -> Result<(), StepError> {
    let call = only_provider_call(vpc_context)?;
    let requested = vpc_context
        .args
        .as_ref()
        .map(|args| args.tags.clone())
        .unwrap_or_default();
    if call.args.tags == requested {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected tags {requested:?}, got {:?}",
            call.args.tags
        )))
    }
}

#[then("the provider VPC is owned by the composite")]
fn provider_parented(vpc_context: &VpcContext) -> Result<(), StepError> {
    let vpc = declared(vpc_context)?;
    let call = only_provider_call(vpc_context)?;
    if call.options.parent.as_ref() == Some(&vpc.resource) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected parent {}, got {:?}",
            vpc.resource.urn, call.options.parent
        )))
    }
}

#[then("the declaration fails with missing argument \"{argument}\"")]
fn fails_with_missing_argument(
    vpc_context: &VpcContext,
    argument: String,
) -> Result<(), StepError> {
    match &vpc_context.outcome {
        Some(VpcOutcome::MissingArgument(name)) if *name == argument => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected missing argument '{argument}', got {other:?}"
        ))),
    }
}

#[then("the declaration fails with a registration error")]
fn fails_with_registration(vpc_context: &VpcContext) -> Result<(), StepError> {
    match &vpc_context.outcome {
        Some(VpcOutcome::Registration(_)) => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected a registration error, got {other:?}"
        ))),
    }
}

#[then("the engine received no registrations")]
fn no_registrations(vpc_context: &VpcContext) -> Result<(), StepError> {
    let calls = vpc_context.engine.call_count();
    if calls == 0 {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected no engine calls, got {calls}"
        )))
    }
}

#[then("no outputs were published")]
fn no_outputs(vpc_context: &VpcContext) -> Result<(), StepError> {
    if vpc_context.engine.outputs().is_empty() {
        Ok(())
    } else {
        Err(StepError::Assertion(String::from(
            "outputs should not be published after a failed registration",
        )))
    }
}

#[then("the VPC output \"{key}\" resolves to \"{expected}\"")]
fn output_resolves(
    vpc_context: &VpcContext,
    key: String,
    expected: String,
) -> Result<(), StepError> {
    let vpc = declared(vpc_context)?;
    let outputs = vpc.outputs();
    let output = outputs
        .get(key.as_str())
        .ok_or_else(|| StepError::Assertion(format!("unknown output '{key}'")))?;
    match output.try_value() {
        Some(actual) if actual == expected => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected output {key} to be '{expected}', got {other:?}"
        ))),
    }
}
