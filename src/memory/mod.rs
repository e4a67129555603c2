//! In-process engine that records declarations and simulates apply.
//!
//! [`MemoryEngine`] keeps the declared resource graph in memory, enforces URN
//! uniqueness and parent existence, and resolves provider outputs with
//! generated identifiers when [`MemoryEngine::apply`] is called. It backs the
//! `paws plan` command and doubles as a realistic engine in tests.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::engine::{
    Ec2VpcAttributes, Ec2VpcOutputs, Ec2VpcResolvers, Engine, EngineFuture, OutputMap,
    ResourceOptions, ResourceRef,
};
use crate::vpc::Ec2VpcArgs;

/// Type token used for provider VPC declarations.
pub const EC2_VPC_TYPE_TOKEN: &str = "aws:ec2/vpc:Vpc";

const SHORT_ID_LEN: usize = 17;

/// Errors raised by the in-memory engine.
#[derive(Debug, Error)]
pub enum MemoryEngineError {
    /// Raised when a resource with the same URN is already declared.
    #[error("duplicate resource: {urn}")]
    DuplicateResource {
        /// Conflicting URN.
        urn: String,
    },
    /// Raised when a registration names a parent that was never declared.
    #[error("unknown parent resource: {urn}")]
    UnknownParent {
        /// Missing parent URN.
        urn: String,
    },
    /// Raised when outputs are registered for an undeclared resource.
    #[error("unknown resource: {urn}")]
    UnknownResource {
        /// Missing URN.
        urn: String,
    },
    /// Raised when resource inputs cannot be captured as JSON.
    #[error("failed to record inputs for {urn}: {source}")]
    Inputs {
        /// Resource whose inputs failed to serialise.
        urn: String,
        /// Serialisation failure.
        #[source]
        source: serde_json::Error,
    },
}

/// A single declaration captured by the engine.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Unique resource name.
    pub urn: String,
    /// Resource type token.
    pub type_token: String,
    /// Logical name supplied by the caller.
    pub name: String,
    /// Registration modifiers as received.
    pub options: ResourceOptions,
    /// Provider inputs, `null` for composite resources.
    pub inputs: serde_json::Value,
    /// Output names published for the resource.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<String>,
}

/// Attributes assigned to a provider resource during apply.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AppliedResource {
    /// Resource that was applied.
    pub urn: String,
    /// Attributes reported to its outputs.
    pub attributes: Ec2VpcAttributes,
}

/// Deployment coordinates used to build URNs and ARNs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deployment {
    /// Project name embedded in URNs.
    pub project: String,
    /// Stack name embedded in URNs.
    pub stack: String,
    /// Region embedded in ARNs.
    pub region: String,
    /// Account reported as owner.
    pub account_id: String,
}

struct PendingVpc {
    urn: String,
    args: Ec2VpcArgs,
    resolvers: Ec2VpcResolvers,
}

#[derive(Default)]
struct Graph {
    registrations: Vec<Registration>,
    pending: Vec<PendingVpc>,
}

impl Graph {
    fn position(&self, urn: &str) -> Option<usize> {
        self.registrations.iter().position(|entry| entry.urn == urn)
    }

    fn type_chain(&self, parent: Option<&ResourceRef>, type_token: &str) -> String {
        parent
            .and_then(|reference| self.position(&reference.urn))
            .and_then(|index| self.registrations.get(index))
            .map_or_else(
                || type_token.to_owned(),
                |entry| format!("{}${type_token}", qualified_type(&entry.urn)),
            )
    }
}

/// Returns the type segment of a URN built by [`MemoryEngine`].
fn qualified_type(urn: &str) -> &str {
    urn.rsplit("::").nth(1).unwrap_or(urn)
}

/// Engine that keeps the resource graph in memory.
pub struct MemoryEngine {
    deployment: Deployment,
    graph: Mutex<Graph>,
}

impl MemoryEngine {
    /// Creates an empty engine for the given deployment.
    #[must_use]
    pub fn new(deployment: Deployment) -> Self {
        Self {
            deployment,
            graph: Mutex::new(Graph::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Graph> {
        self.graph.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns every declaration in registration order.
    #[must_use]
    pub fn registrations(&self) -> Vec<Registration> {
        self.lock().registrations.clone()
    }

    /// Resolves every pending provider output with generated identifiers.
    pub fn apply(&self) -> Vec<AppliedResource> {
        let pending = std::mem::take(&mut self.lock().pending);
        pending
            .into_iter()
            .map(|vpc| {
                let attributes = self.attributes_for(&vpc.args);
                debug!(urn = %vpc.urn, id = %attributes.id, "applied provider vpc");
                vpc.resolvers.resolve(attributes.clone());
                AppliedResource {
                    urn: vpc.urn,
                    attributes,
                }
            })
            .collect()
    }

    /// Fails every pending provider output with `message`.
    pub fn fail_apply(&self, message: &str) {
        let pending = std::mem::take(&mut self.lock().pending);
        for vpc in pending {
            debug!(urn = %vpc.urn, "apply failed for provider vpc");
            vpc.resolvers.reject(message);
        }
    }

    fn attributes_for(&self, args: &Ec2VpcArgs) -> Ec2VpcAttributes {
        let id = short_id("vpc");
        let route_table = short_id("rtb");
        Ec2VpcAttributes {
            arn: format!(
                "arn:aws:ec2:{}:{}:vpc/{id}",
                self.deployment.region, self.deployment.account_id
            ),
            cidr_block: args.cidr_block.clone(),
            ipv6_cidr_block: args.ipv6_cidr_block.clone().unwrap_or_default(),
            default_route_table_id: route_table.clone(),
            default_security_group_id: short_id("sg"),
            main_route_table_id: route_table,
            dhcp_options_id: short_id("dopt"),
            owner_id: self.deployment.account_id.clone(),
            id,
        }
    }

    fn declare(
        &self,
        type_token: &str,
        name: &str,
        options: &ResourceOptions,
        inputs: Option<&Ec2VpcArgs>,
    ) -> Result<String, MemoryEngineError> {
        let mut graph = self.lock();
        if let Some(parent) = &options.parent
            && graph.position(&parent.urn).is_none()
        {
            return Err(MemoryEngineError::UnknownParent {
                urn: parent.urn.clone(),
            });
        }

        let chain = graph.type_chain(options.parent.as_ref(), type_token);
        let urn = format!(
            "urn:paws:{}::{}::{chain}::{name}",
            self.deployment.stack, self.deployment.project
        );
        if graph.position(&urn).is_some() {
            return Err(MemoryEngineError::DuplicateResource { urn });
        }

        let recorded = match inputs {
            Some(args) => {
                serde_json::to_value(args).map_err(|source| MemoryEngineError::Inputs {
                    urn: urn.clone(),
                    source,
                })?
            }
            None => serde_json::Value::Null,
        };
        graph.registrations.push(Registration {
            urn: urn.clone(),
            type_token: type_token.to_owned(),
            name: name.to_owned(),
            options: options.clone(),
            inputs: recorded,
            outputs: Vec::new(),
        });
        Ok(urn)
    }
}

fn short_id(prefix: &str) -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SHORT_ID_LEN)
        .collect();
    format!("{prefix}-{suffix}")
}

impl Engine for MemoryEngine {
    type Error = MemoryEngineError;

    fn register_component<'a>(
        &'a self,
        type_token: &'a str,
        name: &'a str,
        options: &'a ResourceOptions,
    ) -> EngineFuture<'a, ResourceRef, Self::Error> {
        Box::pin(async move {
            let urn = self.declare(type_token, name, options, None)?;
            Ok(ResourceRef::new(urn))
        })
    }

    fn register_vpc<'a>(
        &'a self,
        name: &'a str,
        args: &'a Ec2VpcArgs,
        options: &'a ResourceOptions,
    ) -> EngineFuture<'a, Ec2VpcOutputs, Self::Error> {
        Box::pin(async move {
            let urn = self.declare(EC2_VPC_TYPE_TOKEN, name, options, Some(args))?;
            let (resolvers, outputs) = Ec2VpcOutputs::pending();
            self.lock().pending.push(PendingVpc {
                urn,
                args: args.clone(),
                resolvers,
            });
            Ok(outputs)
        })
    }

    fn register_outputs<'a>(
        &'a self,
        resource: &'a ResourceRef,
        outputs: OutputMap,
    ) -> EngineFuture<'a, (), Self::Error> {
        Box::pin(async move {
            let mut graph = self.lock();
            let index =
                graph
                    .position(&resource.urn)
                    .ok_or_else(|| MemoryEngineError::UnknownResource {
                        urn: resource.urn.clone(),
                    })?;
            if let Some(entry) = graph.registrations.get_mut(index) {
                entry.outputs = outputs.keys().map(|key| (*key).to_owned()).collect();
            }
            Ok(())
        })
    }
}
