mod registry_dto;

pub use registry_dto::*;
