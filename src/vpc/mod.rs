//! Composite VPC resource.
//!
//! [`Vpc::new`] validates the caller's arguments, registers a composite node
//! of type [`VPC_TYPE_TOKEN`], declares one provider VPC parented by that
//! node and mirrors the provider's deferred attributes onto the composite.

use tracing::debug;

use crate::engine::{Ec2VpcOutputs, Engine, OutputMap, ResourceOptions, ResourceRef};
use crate::output::Output;

mod args;
mod error;

pub use args::{DEFAULT_INSTANCE_TENANCY, Ec2VpcArgs, VpcArgs, VpcArgsBuilder, resolve};
pub use error::{MissingArgument, VpcError};

/// Type token under which the composite resource is registered.
pub const VPC_TYPE_TOKEN: &str = "paws:vpc:Vpc";

/// Output names published on the composite resource, in registration order.
pub const OUTPUT_NAMES: [&str; 9] = [
    "vpcId",
    "cidrBlock",
    "ipv6CidrBlock",
    "defaultRouteTableId",
    "defaultSecurityGroupId",
    "mainRouteTableId",
    "dhcpOptionsId",
    "arn",
    "ownerId",
];

/// Handle to a declared VPC.
///
/// Every attribute is a deferred value shared with the underlying provider
/// resource and resolves once the engine has applied it.
#[derive(Clone, Debug)]
pub struct Vpc {
    /// Composite resource node owning the provider VPC.
    pub resource: ResourceRef,
    /// Provider VPC identifier.
    pub vpc_id: Output<String>,
    /// Realised IPv4 block.
    pub cidr_block: Output<String>,
    /// Realised IPv6 block.
    pub ipv6_cidr_block: Output<String>,
    /// Default route table identifier.
    pub default_route_table_id: Output<String>,
    /// Default security group identifier.
    pub default_security_group_id: Output<String>,
    /// Main route table identifier.
    pub main_route_table_id: Output<String>,
    /// DHCP options set identifier.
    pub dhcp_options_id: Output<String>,
    /// VPC ARN.
    pub arn: Output<String>,
    /// Owning account identifier.
    pub owner_id: Output<String>,
}

impl Vpc {
    /// Declares a VPC named `name` on `engine`.
    ///
    /// `options` are forwarded unchanged to the composite registration; the
    /// provider VPC is registered with the composite as its only parent.
    ///
    /// # Errors
    ///
    /// Returns [`VpcError::MissingArgument`] without touching the engine when
    /// `args` is absent or has an empty `cidr_block`, and
    /// [`VpcError::Registration`] with the engine's error when any
    /// registration fails.
    pub async fn new<E: Engine>(
        engine: &E,
        name: &str,
        args: Option<&VpcArgs>,
        options: &ResourceOptions,
    ) -> Result<Self, VpcError<E::Error>> {
        let provider_args = resolve(args)?;

        let resource = engine
            .register_component(VPC_TYPE_TOKEN, name, options)
            .await
            .map_err(VpcError::Registration)?;
        debug!(urn = %resource.urn, "registered vpc component");

        let child_options = ResourceOptions::new().parent(resource.clone());
        let provider = engine
            .register_vpc(name, &provider_args, &child_options)
            .await
            .map_err(VpcError::Registration)?;
        debug!(parent = %resource.urn, cidr_block = %provider_args.cidr_block, "declared provider vpc");

        let vpc = Self::mirror(resource, provider);
        engine
            .register_outputs(&vpc.resource, vpc.outputs())
            .await
            .map_err(VpcError::Registration)?;
        Ok(vpc)
    }

    fn mirror(resource: ResourceRef, provider: Ec2VpcOutputs) -> Self {
        Self {
            resource,
            vpc_id: provider.id,
            cidr_block: provider.cidr_block,
            ipv6_cidr_block: provider.ipv6_cidr_block,
            default_route_table_id: provider.default_route_table_id,
            default_security_group_id: provider.default_security_group_id,
            main_route_table_id: provider.main_route_table_id,
            dhcp_options_id: provider.dhcp_options_id,
            arn: provider.arn,
            owner_id: provider.owner_id,
        }
    }

    /// Returns the published outputs keyed by [`OUTPUT_NAMES`].
    #[must_use]
    pub fn outputs(&self) -> OutputMap {
        let values = [
            &self.vpc_id,
            &self.cidr_block,
            &self.ipv6_cidr_block,
            &self.default_route_table_id,
            &self.default_security_group_id,
            &self.main_route_table_id,
            &self.dhcp_options_id,
            &self.arn,
            &self.owner_id,
        ];
        OUTPUT_NAMES
            .into_iter()
            .zip(values)
            .map(|(key, output)| (key, output.clone()))
            .collect()
    }
}
