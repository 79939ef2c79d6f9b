// Infrastructure layer - External dependencies and adapters
pub mod cloudwatch_gateway;
pub mod cloudwatch_mapper;
pub mod config;
