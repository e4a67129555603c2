//! Configuration loading via `ortho-config`.

use std::collections::BTreeMap;
use std::ffi::OsString;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::memory::Deployment;
use crate::vpc::VpcArgs;

/// VPC declaration settings derived from configuration files and
/// environment variables.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "PAWS_VPC",
    discovery(
        app_name = "paws",
        env_var = "PAWS_CONFIG_PATH",
        config_file_name = "paws.toml",
        dotfile_name = ".paws.toml",
        project_file_name = "paws.toml"
    )
)]
pub struct VpcConfig {
    /// Logical name of the VPC within the stack. Defaults to `vpc`.
    #[ortho_config(default = "vpc".to_owned())]
    pub name: String,
    /// IPv4 address block in CIDR notation. This value is required.
    pub cidr_block: String,
    /// Overrides the DNS hostnames default (`true`).
    pub enable_dns_hostnames: Option<bool>,
    /// Overrides the DNS support default (`true`).
    pub enable_dns_support: Option<bool>,
    /// Overrides the tenancy default (`default`).
    pub instance_tenancy: Option<String>,
    /// IPv4 IPAM pool identifier.
    pub ipv4_ipam_pool_id: Option<String>,
    /// IPv4 netmask length requested from the pool.
    pub ipv4_netmask_length: Option<u8>,
    /// Explicit IPv6 block.
    pub ipv6_cidr_block: Option<String>,
    /// IPv6 IPAM pool identifier.
    pub ipv6_ipam_pool_id: Option<String>,
    /// IPv6 netmask length requested from the pool.
    pub ipv6_netmask_length: Option<u8>,
    /// Requests a provider-assigned IPv6 block.
    pub assign_generated_ipv6_cidr_block: Option<bool>,
    /// Tags as `KEY=VALUE` pairs.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Deployment coordinates for the in-memory engine.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "PAWS_ENGINE",
    discovery(
        app_name = "paws",
        env_var = "PAWS_CONFIG_PATH",
        config_file_name = "paws.toml",
        dotfile_name = ".paws.toml",
        project_file_name = "paws.toml"
    )
)]
pub struct EngineConfig {
    /// Project name embedded in resource URNs.
    #[ortho_config(default = "paws".to_owned())]
    pub project: String,
    /// Stack name embedded in resource URNs.
    #[ortho_config(default = "dev".to_owned())]
    pub stack: String,
    /// Region used when rendering ARNs.
    #[ortho_config(default = "us-east-1".to_owned())]
    pub region: String,
    /// Account reported as the owner of planned resources.
    #[ortho_config(default = "123456789012".to_owned())]
    pub account_id: String,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }
}

fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField(format!(
            "missing {}: set {} or add {} to paws.toml",
            metadata.description, metadata.env_var, metadata.toml_key
        )));
    }
    Ok(())
}

impl VpcConfig {
    /// Loads configuration without attempting to parse CLI arguments. Values
    /// merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("paws")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Performs semantic validation on required fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when the name or address block
    /// is empty, and [`ConfigError::InvalidTag`] when a tag is malformed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_field(
            &self.name,
            &FieldMetadata::new("VPC name", "PAWS_VPC_NAME", "name"),
        )?;
        require_field(
            &self.cidr_block,
            &FieldMetadata::new("VPC address block", "PAWS_VPC_CIDR_BLOCK", "cidr_block"),
        )?;
        self.parse_tags().map(drop)
    }

    /// Builds [`VpcArgs`] from the configured values. Unset overrides stay
    /// unset so the component defaults apply.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when validation fails.
    pub fn as_args(&self) -> Result<VpcArgs, ConfigError> {
        self.validate()?;
        Ok(VpcArgs {
            cidr_block: self.cidr_block.clone(),
            enable_dns_hostnames: self.enable_dns_hostnames,
            enable_dns_support: self.enable_dns_support,
            instance_tenancy: self.instance_tenancy.clone(),
            ipv4_ipam_pool_id: self.ipv4_ipam_pool_id.clone(),
            ipv4_netmask_length: self.ipv4_netmask_length,
            ipv6_cidr_block: self.ipv6_cidr_block.clone(),
            ipv6_ipam_pool_id: self.ipv6_ipam_pool_id.clone(),
            ipv6_netmask_length: self.ipv6_netmask_length,
            assign_generated_ipv6_cidr_block: self.assign_generated_ipv6_cidr_block,
            tags: self.parse_tags()?,
        })
    }

    fn parse_tags(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        self.tags.iter().map(String::as_str).map(parse_tag).collect()
    }
}

/// Splits a `KEY=VALUE` tag. Values may be empty and may contain `=`.
fn parse_tag(entry: &str) -> Result<(String, String), ConfigError> {
    match entry.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.to_owned()))
        }
        _ => Err(ConfigError::InvalidTag(entry.to_owned())),
    }
}

impl EngineConfig {
    /// Loads engine settings without parsing CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("paws")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Ensures every coordinate is present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] naming the empty field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_field(
            &self.project,
            &FieldMetadata::new("project name", "PAWS_ENGINE_PROJECT", "project"),
        )?;
        require_field(
            &self.stack,
            &FieldMetadata::new("stack name", "PAWS_ENGINE_STACK", "stack"),
        )?;
        require_field(
            &self.region,
            &FieldMetadata::new("region", "PAWS_ENGINE_REGION", "region"),
        )?;
        require_field(
            &self.account_id,
            &FieldMetadata::new("account ID", "PAWS_ENGINE_ACCOUNT_ID", "account_id"),
        )
    }

    /// Converts the settings into engine deployment coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when validation fails.
    pub fn as_deployment(&self) -> Result<Deployment, ConfigError> {
        self.validate()?;
        Ok(Deployment {
            project: self.project.clone(),
            stack: self.stack.clone(),
            region: self.region.clone(),
            account_id: self.account_id.clone(),
        })
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Indicates a tag entry is not of the form `KEY=VALUE`.
    #[error("invalid tag '{0}': expected KEY=VALUE")]
    InvalidTag(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
