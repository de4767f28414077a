//! Configuration Management Module
//!
//! Provides the service configuration types and JSON file storage.

mod storage;

pub use storage::{
    ConfigError, ConfigResult, ConfigStore, ConverterConfig, ServiceConfig,
    DEFAULT_IMAGE_TYPES, DEFAULT_TIMEOUT_MS,
};
