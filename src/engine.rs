//! Contract consumed from the external provisioning engine.
//!
//! The engine owns the resource graph, diffing, apply and state storage. This
//! crate only declares desired state through the [`Engine`] trait and wires
//! the deferred values it hands back.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use serde::Serialize;

use crate::output::{Output, OutputResolver};
use crate::vpc::Ec2VpcArgs;

/// Future returned by engine registration calls.
pub type EngineFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Named outputs published on a composite resource.
pub type OutputMap = BTreeMap<&'static str, Output<String>>;

/// Reference to a node in the engine's resource graph.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ResourceRef {
    /// Engine-assigned unique resource name.
    pub urn: String,
}

impl ResourceRef {
    /// Wraps an engine-assigned URN.
    #[must_use]
    pub fn new(urn: impl Into<String>) -> Self {
        Self { urn: urn.into() }
    }
}

/// Registration modifiers forwarded to the engine without interpretation.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ResourceOptions {
    /// Owning resource, used by the engine for lifecycle ordering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ResourceRef>,
    /// Additional explicit dependencies.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<ResourceRef>,
    /// Whether the engine should refuse to delete the resource.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub protect: bool,
    /// Attribute names whose drift the engine should ignore.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignore_changes: Vec<String>,
}

impl ResourceOptions {
    /// Starts an empty set of modifiers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the owning resource.
    #[must_use]
    pub fn parent(mut self, parent: ResourceRef) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Adds an explicit dependency.
    #[must_use]
    pub fn depends_on(mut self, dependency: ResourceRef) -> Self {
        self.depends_on.push(dependency);
        self
    }

    /// Sets the deletion protection flag.
    #[must_use]
    pub const fn protect(mut self, protect: bool) -> Self {
        self.protect = protect;
        self
    }

    /// Adds an attribute whose drift should be ignored.
    #[must_use]
    pub fn ignore_changes(mut self, attribute: impl Into<String>) -> Self {
        self.ignore_changes.push(attribute.into());
        self
    }
}

/// Deferred attributes of a provider-level VPC resource.
#[derive(Clone, Debug)]
pub struct Ec2VpcOutputs {
    /// Provider resource identifier.
    pub id: Output<String>,
    /// Realised IPv4 address block.
    pub cidr_block: Output<String>,
    /// Realised IPv6 address block.
    pub ipv6_cidr_block: Output<String>,
    /// Default route table identifier.
    pub default_route_table_id: Output<String>,
    /// Default security group identifier.
    pub default_security_group_id: Output<String>,
    /// Main route table identifier.
    pub main_route_table_id: Output<String>,
    /// DHCP options set identifier.
    pub dhcp_options_id: Output<String>,
    /// Resource ARN.
    pub arn: Output<String>,
    /// Owning account identifier.
    pub owner_id: Output<String>,
}

impl Ec2VpcOutputs {
    /// Creates unresolved outputs plus the resolvers an engine completes
    /// during apply.
    #[must_use]
    pub fn pending() -> (Ec2VpcResolvers, Self) {
        let (id_tx, id) = Output::pending();
        let (cidr_tx, cidr_block) = Output::pending();
        let (ipv6_tx, ipv6_cidr_block) = Output::pending();
        let (rtb_tx, default_route_table_id) = Output::pending();
        let (sg_tx, default_security_group_id) = Output::pending();
        let (main_tx, main_route_table_id) = Output::pending();
        let (dhcp_tx, dhcp_options_id) = Output::pending();
        let (arn_tx, arn) = Output::pending();
        let (owner_tx, owner_id) = Output::pending();
        let resolvers = Ec2VpcResolvers {
            id: id_tx,
            cidr_block: cidr_tx,
            ipv6_cidr_block: ipv6_tx,
            default_route_table_id: rtb_tx,
            default_security_group_id: sg_tx,
            main_route_table_id: main_tx,
            dhcp_options_id: dhcp_tx,
            arn: arn_tx,
            owner_id: owner_tx,
        };
        let outputs = Self {
            id,
            cidr_block,
            ipv6_cidr_block,
            default_route_table_id,
            default_security_group_id,
            main_route_table_id,
            dhcp_options_id,
            arn,
            owner_id,
        };
        (resolvers, outputs)
    }
}

/// Concrete attribute values reported by the provider after apply.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ec2VpcAttributes {
    /// Provider resource identifier.
    pub id: String,
    /// Realised IPv4 address block.
    pub cidr_block: String,
    /// Realised IPv6 address block, empty when none was assigned.
    pub ipv6_cidr_block: String,
    /// Default route table identifier.
    pub default_route_table_id: String,
    /// Default security group identifier.
    pub default_security_group_id: String,
    /// Main route table identifier.
    pub main_route_table_id: String,
    /// DHCP options set identifier.
    pub dhcp_options_id: String,
    /// Resource ARN.
    pub arn: String,
    /// Owning account identifier.
    pub owner_id: String,
}

/// Write side of [`Ec2VpcOutputs`].
#[derive(Debug)]
pub struct Ec2VpcResolvers {
    id: OutputResolver<String>,
    cidr_block: OutputResolver<String>,
    ipv6_cidr_block: OutputResolver<String>,
    default_route_table_id: OutputResolver<String>,
    default_security_group_id: OutputResolver<String>,
    main_route_table_id: OutputResolver<String>,
    dhcp_options_id: OutputResolver<String>,
    arn: OutputResolver<String>,
    owner_id: OutputResolver<String>,
}

impl Ec2VpcResolvers {
    /// Resolves every attribute at once.
    pub fn resolve(self, attributes: Ec2VpcAttributes) {
        self.id.resolve(attributes.id);
        self.cidr_block.resolve(attributes.cidr_block);
        self.ipv6_cidr_block.resolve(attributes.ipv6_cidr_block);
        self.default_route_table_id
            .resolve(attributes.default_route_table_id);
        self.default_security_group_id
            .resolve(attributes.default_security_group_id);
        self.main_route_table_id
            .resolve(attributes.main_route_table_id);
        self.dhcp_options_id.resolve(attributes.dhcp_options_id);
        self.arn.resolve(attributes.arn);
        self.owner_id.resolve(attributes.owner_id);
    }

    /// Fails every attribute with the same provider message.
    pub fn reject(self, message: &str) {
        self.id.reject(message);
        self.cidr_block.reject(message);
        self.ipv6_cidr_block.reject(message);
        self.default_route_table_id.reject(message);
        self.default_security_group_id.reject(message);
        self.main_route_table_id.reject(message);
        self.dhcp_options_id.reject(message);
        self.arn.reject(message);
        self.owner_id.reject(message);
    }
}

/// Declarative interface implemented by provisioning engines.
pub trait Engine {
    /// Engine specific error type returned by registrations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Registers a logical composite resource with no cloud counterpart.
    fn register_component<'a>(
        &'a self,
        type_token: &'a str,
        name: &'a str,
        options: &'a ResourceOptions,
    ) -> EngineFuture<'a, ResourceRef, Self::Error>;

    /// Declares a provider VPC resource and returns its deferred attributes.
    fn register_vpc<'a>(
        &'a self,
        name: &'a str,
        args: &'a Ec2VpcArgs,
        options: &'a ResourceOptions,
    ) -> EngineFuture<'a, Ec2VpcOutputs, Self::Error>;

    /// Publishes the outputs of a composite resource.
    fn register_outputs<'a>(
        &'a self,
        resource: &'a ResourceRef,
        outputs: OutputMap,
    ) -> EngineFuture<'a, (), Self::Error>;
}
