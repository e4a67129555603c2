//! Reusable VPC component for declarative provisioning engines.
//!
//! [`Vpc::new`] validates caller arguments, applies the default network
//! policy, registers a composite resource with the engine and mirrors the
//! provider VPC's deferred attributes onto it. The engine itself is reached
//! through the [`Engine`] trait; [`MemoryEngine`] is an in-process
//! implementation used for local planning.

pub mod config;
pub mod engine;
pub mod memory;
pub mod output;
pub mod test_support;
pub mod vpc;

pub use config::{ConfigError, EngineConfig, VpcConfig};
pub use engine::{
    Ec2VpcAttributes, Ec2VpcOutputs, Engine, EngineFuture, OutputMap, ResourceOptions, ResourceRef,
};
pub use memory::{Deployment, MemoryEngine, MemoryEngineError};
pub use output::{Output, OutputError, OutputResolver};
pub use vpc::{
    DEFAULT_INSTANCE_TENANCY, Ec2VpcArgs, MissingArgument, OUTPUT_NAMES, VPC_TYPE_TOKEN, Vpc,
    VpcArgs, VpcArgsBuilder, VpcError,
};
