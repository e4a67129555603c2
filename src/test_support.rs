//! Test support utilities shared across unit and integration tests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::engine::{
    Ec2VpcAttributes, Ec2VpcOutputs, Ec2VpcResolvers, Engine, EngineFuture, OutputMap,
    ResourceOptions, ResourceRef,
};
use crate::vpc::Ec2VpcArgs;

/// Registration step that [`RecordingEngine`] can be scripted to fail.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailurePoint {
    /// Composite resource registration.
    Component,
    /// Provider VPC registration.
    Vpc,
    /// Output publication.
    Outputs,
}

/// Errors produced by [`RecordingEngine`] when a failure is scripted.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum RecordingEngineError {
    /// Scripted composite registration failure.
    #[error("component registration rejected: {0}")]
    Component(String),
    /// Scripted provider registration failure.
    #[error("vpc registration rejected: {0}")]
    Vpc(String),
    /// Scripted output registration failure.
    #[error("output registration rejected: {0}")]
    Outputs(String),
}

/// Records a composite registration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComponentCall {
    /// Type token passed by the caller.
    pub type_token: String,
    /// Logical name passed by the caller.
    pub name: String,
    /// Modifiers as received.
    pub options: ResourceOptions,
}

/// Records a provider VPC registration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VpcCall {
    /// Logical name passed by the caller.
    pub name: String,
    /// Provider arguments as received.
    pub args: Ec2VpcArgs,
    /// Modifiers as received.
    pub options: ResourceOptions,
}

/// Records an output publication.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OutputsCall {
    /// Resource the outputs were published on.
    pub resource: ResourceRef,
    /// Published output names in key order.
    pub names: Vec<String>,
}

#[derive(Debug, Default)]
struct State {
    failure: Option<FailurePoint>,
    components: Vec<ComponentCall>,
    vpcs: Vec<VpcCall>,
    outputs: Vec<OutputsCall>,
    resolvers: Vec<Ec2VpcResolvers>,
}

/// Engine double that records every call and holds provider outputs until
/// the test resolves them.
#[derive(Clone, Debug, Default)]
pub struct RecordingEngine {
    state: Arc<Mutex<State>>,
}

impl RecordingEngine {
    /// Creates an engine that accepts every registration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes the given registration step fail from now on.
    pub fn fail_at(&self, point: FailurePoint) {
        self.lock().failure = Some(point);
    }

    /// Returns recorded composite registrations.
    #[must_use]
    pub fn components(&self) -> Vec<ComponentCall> {
        self.lock().components.clone()
    }

    /// Returns recorded provider registrations.
    #[must_use]
    pub fn vpcs(&self) -> Vec<VpcCall> {
        self.lock().vpcs.clone()
    }

    /// Returns recorded output publications.
    #[must_use]
    pub fn outputs(&self) -> Vec<OutputsCall> {
        self.lock().outputs.clone()
    }

    /// Total number of registration calls received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        let state = self.lock();
        state.components.len() + state.vpcs.len() + state.outputs.len()
    }

    /// Resolves every held provider output with `attributes`.
    pub fn resolve_all(&self, attributes: &Ec2VpcAttributes) {
        let resolvers = std::mem::take(&mut self.lock().resolvers);
        for resolver in resolvers {
            resolver.resolve(attributes.clone());
        }
    }

    /// Drops every held resolver without resolving, as a failed apply would.
    pub fn abandon_all(&self) {
        self.lock().resolvers.clear();
    }

    fn check(&self, point: FailurePoint, detail: &str) -> Result<(), RecordingEngineError> {
        if self.lock().failure != Some(point) {
            return Ok(());
        }
        Err(match point {
            FailurePoint::Component => RecordingEngineError::Component(detail.to_owned()),
            FailurePoint::Vpc => RecordingEngineError::Vpc(detail.to_owned()),
            FailurePoint::Outputs => RecordingEngineError::Outputs(detail.to_owned()),
        })
    }
}

/// Attribute values used by tests that resolve outputs.
#[must_use]
pub fn sample_attributes(cidr_block: &str) -> Ec2VpcAttributes {
    Ec2VpcAttributes {
        id: String::from("vpc-0abc"),
        cidr_block: cidr_block.to_owned(),
        ipv6_cidr_block: String::new(),
        default_route_table_id: String::from("rtb-0abc"),
        default_security_group_id: String::from("sg-0abc"),
        main_route_table_id: String::from("rtb-0abc"),
        dhcp_options_id: String::from("dopt-0abc"),
        arn: String::from("arn:aws:ec2:us-east-1:123456789012:vpc/vpc-0abc"),
        owner_id: String::from("123456789012"),
    }
}

impl Engine for RecordingEngine {
    type Error = RecordingEngineError;

    fn register_component<'a>(
        &'a self,
        type_token: &'a str,
        name: &'a str,
        options: &'a ResourceOptions,
    ) -> EngineFuture<'a, ResourceRef, Self::Error> {
        Box::pin(async move {
            self.lock().components.push(ComponentCall {
                type_token: type_token.to_owned(),
                name: name.to_owned(),
                options: options.clone(),
            });
            self.check(FailurePoint::Component, name)?;
            Ok(ResourceRef::new(format!("urn:test::{type_token}::{name}")))
        })
    }

    fn register_vpc<'a>(
        &'a self,
        name: &'a str,
        args: &'a Ec2VpcArgs,
        options: &'a ResourceOptions,
    ) -> EngineFuture<'a, Ec2VpcOutputs, Self::Error> {
        Box::pin(async move {
            self.lock().vpcs.push(VpcCall {
                name: name.to_owned(),
                args: args.clone(),
                options: options.clone(),
            });
            self.check(FailurePoint::Vpc, name)?;
            let (resolvers, outputs) = Ec2VpcOutputs::pending();
            self.lock().resolvers.push(resolvers);
            Ok(outputs)
        })
    }

    fn register_outputs<'a>(
        &'a self,
        resource: &'a ResourceRef,
        outputs: OutputMap,
    ) -> EngineFuture<'a, (), Self::Error> {
        Box::pin(async move {
            self.lock().outputs.push(OutputsCall {
                resource: resource.clone(),
                names: outputs.keys().map(|key| (*key).to_owned()).collect(),
            });
            self.check(FailurePoint::Outputs, &resource.urn)
        })
    }
}
