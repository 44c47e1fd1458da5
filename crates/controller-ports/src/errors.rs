//! Typed use-case errors for the controller application layer.
//!
//! Each component gets its own error enum (same convention the teacher
//! applies in `use_case_errors.rs`: clearer ownership than one
//! god-error). Every variant also maps onto the cross-cutting §7 error
//! taxonomy via [`CoreError::kind`], which is the one thing the
//! outermost axum handler actually needs to pick an HTTP status.

use gns3_domain_types::ErrorCode;
use thiserror::Error;

/// The seven-way classification of §7, independent of which component
/// raised the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorKind {
    Validation,
    NotFound,
    Conflict,
    ComputeUnreachable,
    DriverError,
    Timeout,
    Internal,
}

impl CoreErrorKind {
    /// HTTP status code per §7's table.
    pub fn http_status(self) -> u16 {
        match self {
            CoreErrorKind::Validation => 400,
            CoreErrorKind::NotFound => 404,
            CoreErrorKind::Conflict => 409,
            CoreErrorKind::ComputeUnreachable => 503,
            CoreErrorKind::DriverError => 500,
            CoreErrorKind::Timeout => 504,
            CoreErrorKind::Internal => 500,
        }
    }
}

pub trait CoreError: std::error::Error {
    fn kind(&self) -> CoreErrorKind;
}

#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("compute not found: {0}")]
    NotFound(String),
    #[error("a compute named {0:?} is already registered")]
    AlreadyRegistered(String),
    #[error("compute is unreachable: {0}")]
    Unreachable(String),
    #[error("compute rejected the request: {0}")]
    Protocol(String),
    #[error("request to compute timed out")]
    Timeout,
    #[error("invalid compute configuration: {0}")]
    Validation(String),
}

impl ErrorCode for ComputeError {
    fn code(&self) -> &'static str {
        match self {
            ComputeError::NotFound(_) => "COMPUTE_NOT_FOUND",
            ComputeError::AlreadyRegistered(_) => "COMPUTE_ALREADY_REGISTERED",
            ComputeError::Unreachable(_) => "COMPUTE_UNREACHABLE",
            ComputeError::Protocol(_) => "COMPUTE_PROTOCOL_ERROR",
            ComputeError::Timeout => "COMPUTE_TIMEOUT",
            ComputeError::Validation(_) => "COMPUTE_VALIDATION_ERROR",
        }
    }
}

impl CoreError for ComputeError {
    fn kind(&self) -> CoreErrorKind {
        match self {
            ComputeError::NotFound(_) => CoreErrorKind::NotFound,
            ComputeError::AlreadyRegistered(_) => CoreErrorKind::Conflict,
            ComputeError::Unreachable(_) => CoreErrorKind::ComputeUnreachable,
            ComputeError::Protocol(_) => CoreErrorKind::DriverError,
            ComputeError::Timeout => CoreErrorKind::Timeout,
            ComputeError::Validation(_) => CoreErrorKind::Validation,
        }
    }
}

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("node not found: {0}")]
    NotFound(String),
    #[error("a node named {0:?} already exists in this project")]
    NameTaken(String),
    #[error(transparent)]
    Lifecycle(#[from] gns3_domain::NodeLifecycleError),
    #[error("compute for this node is unreachable: {0}")]
    ComputeUnreachable(String),
    #[error("driver reported a failure: {0}")]
    Driver(String),
    #[error("node operation timed out")]
    Timeout,
    #[error("invalid node configuration: {0}")]
    Validation(String),
}

impl ErrorCode for NodeError {
    fn code(&self) -> &'static str {
        match self {
            NodeError::NotFound(_) => "NODE_NOT_FOUND",
            NodeError::NameTaken(_) => "NODE_NAME_TAKEN",
            NodeError::Lifecycle(e) => e.code(),
            NodeError::ComputeUnreachable(_) => "NODE_COMPUTE_UNREACHABLE",
            NodeError::Driver(_) => "NODE_DRIVER_ERROR",
            NodeError::Timeout => "NODE_TIMEOUT",
            NodeError::Validation(_) => "NODE_VALIDATION_ERROR",
        }
    }
}

impl CoreError for NodeError {
    fn kind(&self) -> CoreErrorKind {
        match self {
            NodeError::NotFound(_) => CoreErrorKind::NotFound,
            NodeError::NameTaken(_) => CoreErrorKind::Conflict,
            NodeError::Lifecycle(_) => CoreErrorKind::Conflict,
            NodeError::ComputeUnreachable(_) => CoreErrorKind::ComputeUnreachable,
            NodeError::Driver(_) => CoreErrorKind::DriverError,
            NodeError::Timeout => CoreErrorKind::Timeout,
            NodeError::Validation(_) => CoreErrorKind::Validation,
        }
    }
}

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("link not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("port is already in use by another link")]
    PortInUse,
    #[error("no free port available on compute {0}")]
    NoPortAvailable(String),
    #[error("compute is unreachable: {0}")]
    ComputeUnreachable(String),
    #[error("driver failed to install NIO: {0}")]
    Driver(String),
    #[error("link operation timed out")]
    Timeout,
}

impl ErrorCode for LinkError {
    fn code(&self) -> &'static str {
        match self {
            LinkError::NotFound(_) => "LINK_NOT_FOUND",
            LinkError::Validation(_) => "LINK_VALIDATION_ERROR",
            LinkError::PortInUse => "LINK_PORT_IN_USE",
            LinkError::NoPortAvailable(_) => "LINK_NO_PORT_AVAILABLE",
            LinkError::ComputeUnreachable(_) => "LINK_COMPUTE_UNREACHABLE",
            LinkError::Driver(_) => "LINK_DRIVER_ERROR",
            LinkError::Timeout => "LINK_TIMEOUT",
        }
    }
}

impl CoreError for LinkError {
    fn kind(&self) -> CoreErrorKind {
        match self {
            LinkError::NotFound(_) => CoreErrorKind::NotFound,
            LinkError::Validation(_) => CoreErrorKind::Validation,
            LinkError::PortInUse => CoreErrorKind::Conflict,
            LinkError::NoPortAvailable(_) => CoreErrorKind::Conflict,
            LinkError::ComputeUnreachable(_) => CoreErrorKind::ComputeUnreachable,
            LinkError::Driver(_) => CoreErrorKind::DriverError,
            LinkError::Timeout => CoreErrorKind::Timeout,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("project not found: {0}")]
    NotFound(String),
    #[error("snapshot not found: {0}")]
    SnapshotNotFound(String),
    #[error("a project named {0:?} already exists")]
    NameTaken(String),
    #[error("project is running; stop all nodes first")]
    ProjectRunning,
    #[error("project is closed")]
    ProjectClosed,
    #[error("compute {0} is not registered")]
    ComputeNotRegistered(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("archive error: {0}")]
    Archive(String),
    #[error("invalid request: {0}")]
    Validation(String),
}

impl ErrorCode for ProjectError {
    fn code(&self) -> &'static str {
        match self {
            ProjectError::NotFound(_) => "PROJECT_NOT_FOUND",
            ProjectError::SnapshotNotFound(_) => "PROJECT_SNAPSHOT_NOT_FOUND",
            ProjectError::NameTaken(_) => "PROJECT_NAME_TAKEN",
            ProjectError::ProjectRunning => "PROJECT_RUNNING",
            ProjectError::ProjectClosed => "PROJECT_CLOSED",
            ProjectError::ComputeNotRegistered(_) => "PROJECT_COMPUTE_NOT_REGISTERED",
            ProjectError::Storage(_) => "PROJECT_STORAGE_ERROR",
            ProjectError::Archive(_) => "PROJECT_ARCHIVE_ERROR",
            ProjectError::Validation(_) => "PROJECT_VALIDATION_ERROR",
        }
    }
}

impl CoreError for ProjectError {
    fn kind(&self) -> CoreErrorKind {
        match self {
            ProjectError::NotFound(_) => CoreErrorKind::NotFound,
            ProjectError::SnapshotNotFound(_) => CoreErrorKind::NotFound,
            ProjectError::NameTaken(_) => CoreErrorKind::Conflict,
            ProjectError::ProjectRunning => CoreErrorKind::Conflict,
            ProjectError::ProjectClosed => CoreErrorKind::Conflict,
            ProjectError::ComputeNotRegistered(_) => CoreErrorKind::Validation,
            ProjectError::Storage(_) => CoreErrorKind::Internal,
            ProjectError::Archive(_) => CoreErrorKind::Internal,
            ProjectError::Validation(_) => CoreErrorKind::Validation,
        }
    }
}
