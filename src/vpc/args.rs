//! Caller-facing VPC arguments and their resolution into provider arguments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::MissingArgument;

/// Tenancy applied when the caller does not choose one.
pub const DEFAULT_INSTANCE_TENANCY: &str = "default";

/// Arguments accepted by [`crate::Vpc::new`].
///
/// Optional fields stay `None` unless the caller sets them, so an explicit
/// value equal to the default is still forwarded as an override.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct VpcArgs {
    /// IPv4 address block in CIDR notation. Required.
    pub cidr_block: String,
    /// Whether instances receive public DNS hostnames.
    pub enable_dns_hostnames: Option<bool>,
    /// Whether the provider DNS resolver is enabled.
    pub enable_dns_support: Option<bool>,
    /// Tenancy of instances launched into the VPC.
    pub instance_tenancy: Option<String>,
    /// IPAM pool used to allocate the IPv4 block.
    pub ipv4_ipam_pool_id: Option<String>,
    /// Netmask length requested from the IPv4 IPAM pool.
    pub ipv4_netmask_length: Option<u8>,
    /// Explicit IPv6 address block.
    pub ipv6_cidr_block: Option<String>,
    /// IPAM pool used to allocate the IPv6 block.
    pub ipv6_ipam_pool_id: Option<String>,
    /// Netmask length requested from the IPv6 IPAM pool.
    pub ipv6_netmask_length: Option<u8>,
    /// Whether the provider should assign an Amazon-provided IPv6 block.
    pub assign_generated_ipv6_cidr_block: Option<bool>,
    /// Tags propagated verbatim to the VPC.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl VpcArgs {
    /// Starts a builder for [`VpcArgs`].
    #[must_use]
    pub fn builder(cidr_block: impl Into<String>) -> VpcArgsBuilder {
        VpcArgsBuilder::new(cidr_block)
    }
}

/// Fluent builder for [`VpcArgs`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VpcArgsBuilder {
    args: VpcArgs,
}

impl VpcArgsBuilder {
    /// Creates a builder with the required address block.
    #[must_use]
    pub fn new(cidr_block: impl Into<String>) -> Self {
        Self {
            args: VpcArgs {
                cidr_block: cidr_block.into(),
                ..VpcArgs::default()
            },
        }
    }

    /// Overrides the DNS hostnames flag.
    #[must_use]
    pub const fn enable_dns_hostnames(mut self, value: bool) -> Self {
        self.args.enable_dns_hostnames = Some(value);
        self
    }

    /// Overrides the DNS support flag.
    #[must_use]
    pub const fn enable_dns_support(mut self, value: bool) -> Self {
        self.args.enable_dns_support = Some(value);
        self
    }

    /// Overrides the instance tenancy.
    #[must_use]
    pub fn instance_tenancy(mut self, value: impl Into<String>) -> Self {
        self.args.instance_tenancy = Some(value.into());
        self
    }

    /// Sets the IPv4 IPAM pool.
    #[must_use]
    pub fn ipv4_ipam_pool_id(mut self, value: impl Into<String>) -> Self {
        self.args.ipv4_ipam_pool_id = Some(value.into());
        self
    }

    /// Sets the IPv4 netmask length.
    #[must_use]
    pub const fn ipv4_netmask_length(mut self, value: u8) -> Self {
        self.args.ipv4_netmask_length = Some(value);
        self
    }

    /// Sets an explicit IPv6 block.
    #[must_use]
    pub fn ipv6_cidr_block(mut self, value: impl Into<String>) -> Self {
        self.args.ipv6_cidr_block = Some(value.into());
        self
    }

    /// Sets the IPv6 IPAM pool.
    #[must_use]
    pub fn ipv6_ipam_pool_id(mut self, value: impl Into<String>) -> Self {
        self.args.ipv6_ipam_pool_id = Some(value.into());
        self
    }

    /// Sets the IPv6 netmask length.
    #[must_use]
    pub const fn ipv6_netmask_length(mut self, value: u8) -> Self {
        self.args.ipv6_netmask_length = Some(value);
        self
    }

    /// Requests a provider-assigned IPv6 block.
    #[must_use]
    pub const fn assign_generated_ipv6_cidr_block(mut self, value: bool) -> Self {
        self.args.assign_generated_ipv6_cidr_block = Some(value);
        self
    }

    /// Adds a single tag, replacing any previous value for the key.
    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.tags.insert(key.into(), value.into());
        self
    }

    /// Replaces the whole tag set.
    #[must_use]
    pub fn tags(mut self, tags: BTreeMap<String, String>) -> Self {
        self.args.tags = tags;
        self
    }

    /// Returns the assembled arguments. Validation happens in
    /// [`resolve`] so the builder never fails.
    #[must_use]
    pub fn build(self) -> VpcArgs {
        self.args
    }
}

/// Provider-level arguments with the component's defaults applied.
///
/// `None` fields are omitted from the declaration so the engine applies its
/// own default.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ec2VpcArgs {
    /// IPv4 address block.
    pub cidr_block: String,
    /// DNS hostnames flag.
    pub enable_dns_hostnames: bool,
    /// DNS support flag.
    pub enable_dns_support: bool,
    /// Instance tenancy.
    pub instance_tenancy: String,
    /// IPv4 IPAM pool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4_ipam_pool_id: Option<String>,
    /// IPv4 netmask length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4_netmask_length: Option<u8>,
    /// Explicit IPv6 block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6_cidr_block: Option<String>,
    /// IPv6 IPAM pool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6_ipam_pool_id: Option<String>,
    /// IPv6 netmask length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6_netmask_length: Option<u8>,
    /// Provider-assigned IPv6 block flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assign_generated_ipv6_cidr_block: Option<bool>,
    /// Tags, copied verbatim.
    pub tags: BTreeMap<String, String>,
}

/// Validates caller arguments and applies the default policy.
///
/// No CIDR syntax or cross-field checks happen here; the engine rejects
/// malformed values at apply time.
///
/// # Errors
///
/// Returns [`MissingArgument`] naming `args` when no arguments were supplied
/// and `cidr_block` when the address block is empty.
pub fn resolve(args: Option<&VpcArgs>) -> Result<Ec2VpcArgs, MissingArgument> {
    let Some(requested) = args else {
        return Err(MissingArgument("args"));
    };
    if requested.cidr_block.is_empty() {
        return Err(MissingArgument("cidr_block"));
    }

    Ok(Ec2VpcArgs {
        cidr_block: requested.cidr_block.clone(),
        enable_dns_hostnames: requested.enable_dns_hostnames.unwrap_or(true),
        enable_dns_support: requested.enable_dns_support.unwrap_or(true),
        instance_tenancy: requested
            .instance_tenancy
            .clone()
            .unwrap_or_else(|| DEFAULT_INSTANCE_TENANCY.to_owned()),
        ipv4_ipam_pool_id: requested.ipv4_ipam_pool_id.clone(),
        ipv4_netmask_length: requested.ipv4_netmask_length,
        ipv6_cidr_block: requested.ipv6_cidr_block.clone(),
        ipv6_ipam_pool_id: requested.ipv6_ipam_pool_id.clone(),
        ipv6_netmask_length: requested.ipv6_netmask_length,
        assign_generated_ipv6_cidr_block: requested.assign_generated_ipv6_cidr_block,
        tags: requested.tags.clone(),
    })
}
