//! Shared fixtures for VPC declaration scenarios.

use paws::test_support::{RecordingEngine, RecordingEngineError};
use paws::{Vpc, VpcArgs, VpcError};
use rstest::fixture;

#[derive(Clone, Debug)]
pub struct VpcContext {
    pub engine: RecordingEngine,
    pub args: Option<VpcArgs>,
    pub outcome: Option<VpcOutcome>,
}

#[derive(Clone, Debug)]
pub enum VpcOutcome {
    Declared(Box<Vpc>),
    MissingArgument(&'static str),
    Registration(RecordingEngineError),
}

impl VpcOutcome {
    pub fn from_result(result: Result<Vpc, VpcError<RecordingEngineError>>) -> Self {
        match result {
            Ok(vpc) => Self::Declared(Box::new(vpc)),
            Err(VpcError::MissingArgument(missing)) => Self::MissingArgument(missing.0),
            Err(VpcError::Registration(err)) => Self::Registration(err),
        }
    }
}

#[fixture]
pub fn vpc_context() -> VpcContext {
    VpcContext {
        engine: RecordingEngine::new(),
        args: None,
        outcome: None,
    }
}
